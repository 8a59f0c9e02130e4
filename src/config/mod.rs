#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

/// Published sheet used by the "Configured CSV URL" section.
pub const DEFAULT_FIXED_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSAbs_1_H6dm93hdkIlg-z-Gm89_29Kv9ExaO7p0loMdrehE01-ex0gh5dSLFmeC9OtAANo0nkR243H/pub?gid=247290797&single=true&output=csv";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8501";
pub const DEFAULT_PAGE_TITLE: &str = "Lab 2 — Data Connections";
pub const DEFAULT_PREVIEW_ROWS: usize = 20;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

/// Settings after defaults, the TOML file and command line flags are merged.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub bind_address: String,
    pub fixed_csv_url: String,
    pub page_title: String,
    pub preview_rows: usize,
    /// 0 disables the timeout.
    pub timeout_seconds: u64,
    pub max_upload_mb: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            fixed_csv_url: DEFAULT_FIXED_CSV_URL.to_string(),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl DashboardConfig {
    /// 套用 TOML 檔案中有設定的值
    pub fn merge_toml(mut self, file: &TomlConfig) -> Self {
        if let Some(addr) = &file.server.bind_address {
            self.bind_address = addr.clone();
        }
        if let Some(url) = &file.source.fixed_csv_url {
            self.fixed_csv_url = url.clone();
        }
        if let Some(timeout) = file.source.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(rows) = file.display.preview_rows {
            self.preview_rows = rows;
        }
        if let Some(title) = &file.display.page_title {
            self.page_title = title.clone();
        }
        if let Some(size) = file.upload.max_size_mb {
            self.max_upload_mb = size;
        }
        self
    }
}

impl ConfigProvider for DashboardConfig {
    fn fixed_csv_url(&self) -> &str {
        &self.fixed_csv_url
    }

    fn page_title(&self) -> &str {
        &self.page_title
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("bind_address", &self.bind_address)?;
        validation::validate_url("fixed_csv_url", &self.fixed_csv_url)?;
        validation::validate_non_empty_string("page_title", &self.page_title)?;
        validation::validate_positive_number("preview_rows", self.preview_rows, 1)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 0, 600)?;
        validation::validate_positive_number("max_upload_mb", self.max_upload_mb, 1)?;
        Ok(())
    }
}
