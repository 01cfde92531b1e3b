use crate::utils::error::{InsightsError, Result};
use crate::utils::validation::{
    validate_endpoint_path, validate_non_empty_string, validate_one_of, validate_path,
    validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub api: ApiConfig,
    pub endpoints: Endpoints,
    pub report: ReportConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub headers: HashMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
            headers: HashMap::new(),
        }
    }
}

/// How the comparison endpoint expects its domains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Repeated `domains=` parameters, one result row per domain.
    #[default]
    Multi,
    /// `domain1=` and `domain2=`, answered with a `{domain1, domain2}` object.
    Pair,
}

/// Endpoint paths relative to `api.base_url`. Older backends use
/// `/salary-ranges` and `/compare-domains`; point these at whichever exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub domains: String,
    pub locations: String,
    pub top_domains: String,
    pub salary_insights: String,
    pub jobs_by_city: String,
    pub company_hiring: String,
    pub salary_range: String,
    pub filter_data: String,
    pub domain_comparison: String,
    pub key_insights: String,
    pub comparison_mode: ComparisonMode,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            domains: "/domains".to_string(),
            locations: "/locations".to_string(),
            top_domains: "/top-domains".to_string(),
            salary_insights: "/salary-insights".to_string(),
            jobs_by_city: "/jobs-by-city".to_string(),
            company_hiring: "/company-hiring".to_string(),
            salary_range: "/salary-range".to_string(),
            filter_data: "/filter-data".to_string(),
            domain_comparison: "/domain-comparison".to_string(),
            key_insights: "/key-insights".to_string(),
            comparison_mode: ComparisonMode::Multi,
        }
    }
}

impl Endpoints {
    fn paths(&self) -> [(&'static str, &str); 10] {
        [
            ("endpoints.domains", self.domains.as_str()),
            ("endpoints.locations", self.locations.as_str()),
            ("endpoints.top_domains", self.top_domains.as_str()),
            ("endpoints.salary_insights", self.salary_insights.as_str()),
            ("endpoints.jobs_by_city", self.jobs_by_city.as_str()),
            ("endpoints.company_hiring", self.company_hiring.as_str()),
            ("endpoints.salary_range", self.salary_range.as_str()),
            ("endpoints.filter_data", self.filter_data.as_str()),
            ("endpoints.domain_comparison", self.domain_comparison.as_str()),
            ("endpoints.key_insights", self.key_insights.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
    pub formats: Vec<String>,
    /// Bundle the written files into `<page>_report.zip`.
    pub zip: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "./reports".to_string(),
            formats: vec!["json".to_string()],
            zip: false,
        }
    }
}

impl ReportConfig {
    pub fn wants(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f == format)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl InsightsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| InsightsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InsightsError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for InsightsConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;

        for (field, path) in self.endpoints.paths() {
            validate_endpoint_path(field, path)?;
        }

        validate_path("report.output_path", &self.report.output_path)?;
        for format in &self.report.formats {
            validate_one_of("report.formats", format, &SUPPORTED_FORMATS)?;
        }

        validate_non_empty_string("display.currency_symbol", &self.display.currency_symbol)?;

        Ok(())
    }
}
