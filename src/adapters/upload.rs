use crate::domain::model::UploadedFile;
use crate::domain::ports::CsvSource;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::validate_file_extension;
use async_trait::async_trait;

pub const ALLOWED_EXTENSIONS: &[&str] = &["csv"];

/// An uploaded file held fully in memory.
pub struct UploadSource {
    file: UploadedFile,
}

impl UploadSource {
    pub fn new(file: UploadedFile) -> Self {
        Self { file }
    }
}

#[async_trait]
impl CsvSource for UploadSource {
    fn describe(&self) -> String {
        format!("upload {} ({} bytes)", self.file.filename, self.file.content.len())
    }

    async fn read_bytes(&self) -> Result<Vec<u8>> {
        validate_file_extension("file", &self.file.filename, ALLOWED_EXTENSIONS).map_err(|e| {
            DashboardError::UploadError {
                message: match e {
                    DashboardError::InvalidConfigValueError { reason, .. } => reason,
                    other => other.to_string(),
                },
            }
        })?;

        Ok(self.file.content.clone())
    }
}
