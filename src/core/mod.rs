pub mod loader;
pub mod parser;

pub use crate::domain::model::{Dataset, UploadedFile};
pub use crate::domain::ports::{ConfigProvider, CsvSource};
pub use crate::utils::error::Result;
