use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Anything the dashboard can read CSV bytes from.
#[async_trait]
pub trait CsvSource: Send + Sync {
    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;

    async fn read_bytes(&self) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn fixed_csv_url(&self) -> &str;
    fn page_title(&self) -> &str;
    fn preview_rows(&self) -> usize;
    fn request_timeout(&self) -> Option<Duration>;
    fn max_upload_bytes(&self) -> usize;
}
