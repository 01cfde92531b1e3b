use crate::config::InsightsConfig;
use crate::domain::model::JobFilter;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "internship-insights")]
#[command(about = "Job-market insights from the internship analytics backend")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override api.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override report.output_path
    #[arg(long)]
    pub output_path: Option<String>,

    /// Override report.formats (json, csv)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Bundle the report files into a zip archive
    #[arg(long)]
    pub zip: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub page: PageCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum PageCommand {
    /// Demand, salary distribution, locations and top companies
    Dashboard,
    /// Salary and location breakdowns with optional filtering and comparison
    Analytics {
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        min_salary: Option<f64>,
        #[arg(long)]
        max_salary: Option<f64>,
        /// Domains to compare, comma separated
        #[arg(long, value_delimiter = ',')]
        compare: Vec<String>,
    },
    /// Demand/salary quadrants, hiring patterns and recommendations
    KeyInsights,
}

impl PageCommand {
    /// The filter to apply after the analytics page loads, if any was given.
    pub fn filter(&self) -> Option<JobFilter> {
        match self {
            PageCommand::Analytics {
                domain,
                location,
                min_salary,
                max_salary,
                ..
            } => {
                let filter = JobFilter {
                    domain: domain.clone(),
                    location: location.clone(),
                    min_salary: *min_salary,
                    max_salary: *max_salary,
                };
                (filter != JobFilter::default()).then_some(filter)
            }
            _ => None,
        }
    }
}

impl CliConfig {
    /// Loads the file config (or defaults) and layers the flags on top.
    pub fn resolve(&self) -> crate::Result<InsightsConfig> {
        let mut config = match &self.config {
            Some(path) => InsightsConfig::from_file(path)?,
            None => InsightsConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut InsightsConfig) {
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.report.output_path = output_path.clone();
        }
        if !self.format.is_empty() {
            config.report.formats = self.format.clone();
        }
        if self.zip {
            config.report.zip = true;
        }
    }
}
