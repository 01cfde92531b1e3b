pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpInsightsClient, LocalStorage};
#[cfg(feature = "cli")]
pub use config::{CliConfig, PageCommand};
pub use config::InsightsConfig;

pub use app::pages::{AnalyticsController, DashboardController, KeyInsightsController};
pub use app::presentation::PageView;
pub use crate::core::engine::{ReportEngine, ReportOutcome};
pub use domain::model::{ApiResult, JobFilter};
pub use domain::ports::{InsightsSource, PageController, Storage};
pub use utils::error::{InsightsError, Result};
