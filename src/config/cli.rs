use super::toml_config::TomlConfig;
use super::DashboardConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "data-connections")]
#[command(about = "Dashboard that previews CSV data from a public sheet URL or an upload")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, e.g. 127.0.0.1:8501
    #[arg(long)]
    pub bind: Option<String>,

    /// CSV URL shown in the "Configured CSV URL" section
    #[arg(long)]
    pub fixed_csv_url: Option<String>,

    /// Number of rows shown in each preview table
    #[arg(long)]
    pub preview_rows: Option<usize>,

    /// HTTP timeout for CSV downloads, 0 disables it
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Largest accepted upload in megabytes
    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 預設值 < TOML 檔案 < 命令列參數
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            config = config.merge_toml(&file);
        }

        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if let Some(url) = &self.fixed_csv_url {
            config.fixed_csv_url = url.clone();
        }
        if let Some(rows) = self.preview_rows {
            config.preview_rows = rows;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if let Some(size) = self.max_upload_mb {
            config.max_upload_mb = size;
        }

        config.validate()?;
        Ok(config)
    }
}
