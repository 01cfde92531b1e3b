#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, PageCommand};
pub use toml_config::{
    ApiConfig, ComparisonMode, DisplayConfig, Endpoints, InsightsConfig, LoggingConfig,
    ReportConfig,
};
