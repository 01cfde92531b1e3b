pub mod analytics;
pub mod dashboard;
pub mod key_insights;
#[cfg(test)]
pub(crate) mod stub;

pub use analytics::{AnalyticsController, AnalyticsData};
pub use dashboard::{DashboardController, DashboardData};
pub use key_insights::{KeyInsightsController, KeyInsightsData};

use crate::app::presentation::Widget;
use crate::domain::model::ApiResult;

/// Builds a widget from a successful dataset, or an inline error in its place.
pub(crate) fn widget_from<T>(
    id: &str,
    title: &str,
    result: &ApiResult<T>,
    build: impl FnOnce(&T) -> Widget,
) -> Widget {
    match result {
        ApiResult::Success { data } => build(data),
        ApiResult::Error { message } => Widget::unavailable(id, title, message.clone()),
    }
}

pub(crate) fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}
