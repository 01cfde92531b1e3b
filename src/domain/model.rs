use crate::utils::error::{InsightsError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

/// Location label the backend uses for remote listings.
pub const REMOTE_LOCATION: &str = "Work from home";

/// Filter value meaning "no restriction" for domain and location.
pub const ALL: &str = "All";

/// Uniform outcome of every fetch against the insights backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResult<T> {
    Success { data: T },
    Error { message: String },
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success { data } => ApiResult::Success { data: f(data) },
            Self::Error { message } => ApiResult::Error { message },
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Error { message } => Err(InsightsError::RemoteError { message }),
        }
    }
}

/// One listing row as returned by the filter endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawJobRecord")]
pub struct JobRecord {
    pub company: String,
    pub title: String,
    pub location: String,
    pub domain: String,
    pub avg_salary: f64,
}

#[derive(Deserialize)]
struct RawJobRecord {
    #[serde(alias = "Company")]
    company: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(alias = "Location", default)]
    location: String,
    #[serde(alias = "Job Title")]
    domain: String,
    #[serde(alias = "avgSalary")]
    avg_salary: f64,
}

impl From<RawJobRecord> for JobRecord {
    fn from(raw: RawJobRecord) -> Self {
        let title = raw.title.unwrap_or_else(|| raw.domain.clone());
        Self {
            company: raw.company,
            title,
            location: raw.location,
            domain: raw.domain,
            avg_salary: raw.avg_salary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSalary {
    pub domain: String,
    pub avg_salary: f64,
}

/// Demand and pay for one domain, joined from the count and salary feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainStat {
    pub domain: String,
    pub count: u64,
    pub avg_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStat {
    pub city: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyStat {
    #[serde(alias = "Company")]
    pub company: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRangeCount {
    pub range: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainComparison {
    pub domain: String,
    pub count: u64,
    pub avg_salary: f64,
    #[serde(default)]
    pub avg_min_salary: Option<f64>,
    #[serde(default)]
    pub avg_max_salary: Option<f64>,
    #[serde(default)]
    pub top_companies: Vec<CompanyStat>,
    #[serde(default)]
    pub top_locations: Vec<LocationStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInsights {
    pub top_hiring_domain: String,
    pub top_paying_domain: String,
    pub top_hiring_company: String,
    pub top_location: String,
    pub avg_internship_salary: f64,
    pub total_domains: u64,
    pub total_companies: u64,
    pub total_listings: u64,
}

/// Query for the filter endpoint. `None` and `"All"` both mean unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilter {
    pub domain: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}

impl JobFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let restricting = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != ALL)
                .map(str::to_string)
        };

        if let Some(domain) = restricting(&self.domain) {
            pairs.push(("domain", domain));
        }
        if let Some(location) = restricting(&self.location) {
            pairs.push(("location", location));
        }
        if let Some(min) = self.min_salary {
            pairs.push(("min_salary", min.to_string()));
        }
        if let Some(max) = self.max_salary {
            pairs.push(("max_salary", max.to_string()));
        }

        pairs
    }

    pub fn is_unrestricted(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

impl Validate for JobFilter {
    fn validate(&self) -> Result<()> {
        for (field, bound) in [
            ("filter.min_salary", self.min_salary),
            ("filter.max_salary", self.max_salary),
        ] {
            let Some(value) = bound else { continue };
            // NaN slips past range comparisons.
            if !value.is_finite() {
                return Err(InsightsError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Salary bound must be a finite number".to_string(),
                });
            }
            validate_range(field, value, 0.0, f64::MAX)?;
        }
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(InsightsError::InvalidConfigValueError {
                    field: "filter.min_salary".to_string(),
                    value: min.to_string(),
                    reason: format!("Minimum salary exceeds maximum salary {}", max),
                });
            }
        }
        Ok(())
    }
}
