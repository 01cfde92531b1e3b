use crate::config::{ComparisonMode, Endpoints, InsightsConfig};
use crate::core::aggregate::top_n;
use crate::domain::model::{
    ApiResult, CompanyStat, DomainComparison, DomainCount, DomainSalary, JobFilter, JobRecord,
    KeyInsights, LocationStat, SalaryRangeCount,
};
use crate::domain::ports::InsightsSource;
use crate::utils::error::{InsightsError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Upper bound on domains in one comparison request.
pub const MAX_DOMAINS_TO_COMPARE: usize = 5;

/// reqwest-backed client for the insights REST API.
pub struct HttpInsightsClient {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpInsightsClient {
    pub fn new(config: &InsightsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.api.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                InsightsError::InvalidConfigValueError {
                    field: "api.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                InsightsError::InvalidConfigValueError {
                    field: format!("api.headers.{}", name.as_str()),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches `path` and folds every failure into `ApiResult::Error`.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        match self.try_fetch(path, query).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("⚠️  Request to {} failed: {}", path, e);
                ApiResult::error(non_empty_message(e.to_string()))
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResult<T>> {
        let url = self.url(path);
        tracing::debug!("Making API request to: {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(InsightsError::HttpStatusError {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        unwrap_envelope(body)
    }
}

fn non_empty_message(message: String) -> String {
    if message.trim().is_empty() {
        "Request failed".to_string()
    } else {
        message
    }
}

/// Accepts both `{"status": ..., "data"|"message": ...}` and bare payloads.
fn unwrap_envelope<T: DeserializeOwned>(body: serde_json::Value) -> Result<ApiResult<T>> {
    let status = body
        .as_object()
        .and_then(|obj| obj.get("status"))
        .and_then(|s| s.as_str())
        .map(str::to_string);

    match status.as_deref() {
        Some("success") => {
            let data = body.get("data").cloned().unwrap_or(serde_json::Value::Null);
            Ok(ApiResult::success(serde_json::from_value(data)?))
        }
        Some("error") => {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            Ok(ApiResult::error(non_empty_message(message)))
        }
        _ => Ok(ApiResult::success(serde_json::from_value(body)?)),
    }
}

#[derive(Deserialize)]
struct PairSide {
    name: String,
    count: u64,
    avg_salary: f64,
    #[serde(default)]
    min_salary: Option<f64>,
    #[serde(default)]
    max_salary: Option<f64>,
    #[serde(default)]
    top_companies: HashMap<String, u64>,
    #[serde(default)]
    top_locations: HashMap<String, u64>,
}

#[derive(Deserialize)]
struct PairComparisonBody {
    domain1: PairSide,
    domain2: PairSide,
}

/// Name-keyed counts as a count-descending list, ties by name.
fn ranked<T: Clone>(counts: HashMap<String, u64>, build: impl Fn(String, u64) -> T, count_of: impl Fn(&T) -> u64) -> Vec<T> {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let items: Vec<T> = entries.into_iter().map(|(name, count)| build(name, count)).collect();
    top_n(&items, items.len(), |item| count_of(item) as f64)
}

impl From<PairSide> for DomainComparison {
    fn from(side: PairSide) -> Self {
        Self {
            domain: side.name,
            count: side.count,
            avg_salary: side.avg_salary,
            avg_min_salary: side.min_salary,
            avg_max_salary: side.max_salary,
            top_companies: ranked(
                side.top_companies,
                |company, count| CompanyStat { company, count },
                |c| c.count,
            ),
            top_locations: ranked(
                side.top_locations,
                |city, count| LocationStat { city, count },
                |l| l.count,
            ),
        }
    }
}

#[async_trait]
impl InsightsSource for HttpInsightsClient {
    async fn domains(&self) -> ApiResult<Vec<String>> {
        self.fetch(&self.endpoints.domains, &[]).await
    }

    async fn locations(&self) -> ApiResult<Vec<String>> {
        self.fetch(&self.endpoints.locations, &[]).await
    }

    async fn top_domains(&self) -> ApiResult<Vec<DomainCount>> {
        self.fetch(&self.endpoints.top_domains, &[]).await
    }

    async fn salary_insights(&self) -> ApiResult<Vec<DomainSalary>> {
        self.fetch(&self.endpoints.salary_insights, &[]).await
    }

    async fn jobs_by_city(&self) -> ApiResult<Vec<LocationStat>> {
        self.fetch(&self.endpoints.jobs_by_city, &[]).await
    }

    async fn company_hiring(&self) -> ApiResult<Vec<CompanyStat>> {
        self.fetch(&self.endpoints.company_hiring, &[]).await
    }

    async fn salary_ranges(&self) -> ApiResult<Vec<SalaryRangeCount>> {
        self.fetch(&self.endpoints.salary_range, &[]).await
    }

    async fn filter_data(&self, filter: &JobFilter) -> ApiResult<Vec<JobRecord>> {
        self.fetch(&self.endpoints.filter_data, &filter.query_pairs()).await
    }

    async fn compare_domains(&self, domains: &[String]) -> ApiResult<Vec<DomainComparison>> {
        if domains.is_empty() {
            return ApiResult::error("No domains specified for comparison");
        }
        if domains.len() > MAX_DOMAINS_TO_COMPARE {
            return ApiResult::error(format!(
                "You can compare at most {} domains at once",
                MAX_DOMAINS_TO_COMPARE
            ));
        }

        match self.endpoints.comparison_mode {
            ComparisonMode::Multi => {
                let query: Vec<(&str, String)> =
                    domains.iter().map(|d| ("domains", d.clone())).collect();
                self.fetch(&self.endpoints.domain_comparison, &query).await
            }
            ComparisonMode::Pair => {
                let [first, second] = domains else {
                    return ApiResult::error("Both domains are required for comparison");
                };
                let query = [("domain1", first.clone()), ("domain2", second.clone())];
                self.fetch::<PairComparisonBody>(&self.endpoints.domain_comparison, &query)
                    .await
                    .map(|body| {
                        vec![
                            DomainComparison::from(body.domain1),
                            DomainComparison::from(body.domain2),
                        ]
                    })
            }
        }
    }

    async fn key_insights(&self) -> ApiResult<KeyInsights> {
        self.fetch(&self.endpoints.key_insights, &[]).await
    }
}
