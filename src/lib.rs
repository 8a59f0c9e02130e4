pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::{router, serve, AppState};
pub use app::dashboard::Dashboard;
pub use config::DashboardConfig;
pub use crate::core::{loader::DatasetLoader, parser::parse_csv, Dataset};
pub use utils::error::{DashboardError, Result};
