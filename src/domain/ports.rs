use crate::app::presentation::PageView;
use crate::domain::model::{
    ApiResult, CompanyStat, DomainComparison, DomainCount, DomainSalary, JobFilter, JobRecord,
    KeyInsights, LocationStat, SalaryRangeCount,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where `path` ends up, for reporting back to the user.
    fn location(&self, path: &str) -> String;
}

/// Read side of the insights backend. Implementations never fail: every
/// transport, status, or decode problem comes back as `ApiResult::Error`.
#[async_trait]
pub trait InsightsSource: Send + Sync {
    async fn domains(&self) -> ApiResult<Vec<String>>;
    async fn locations(&self) -> ApiResult<Vec<String>>;
    async fn top_domains(&self) -> ApiResult<Vec<DomainCount>>;
    async fn salary_insights(&self) -> ApiResult<Vec<DomainSalary>>;
    async fn jobs_by_city(&self) -> ApiResult<Vec<LocationStat>>;
    async fn company_hiring(&self) -> ApiResult<Vec<CompanyStat>>;
    async fn salary_ranges(&self) -> ApiResult<Vec<SalaryRangeCount>>;
    async fn filter_data(&self, filter: &JobFilter) -> ApiResult<Vec<JobRecord>>;
    async fn compare_domains(&self, domains: &[String]) -> ApiResult<Vec<DomainComparison>>;
    async fn key_insights(&self) -> ApiResult<KeyInsights>;
}

/// A page that loads its datasets and turns them into a view it owns.
#[async_trait]
pub trait PageController: Send + Sync {
    type Data: Send;

    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Self::Data;

    /// Replaces the current view with one built from `data`.
    fn render(&mut self, data: Self::Data) -> &PageView;

    fn view(&self) -> Option<&PageView>;
}
