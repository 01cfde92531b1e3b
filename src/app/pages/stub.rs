//! Canned in-memory source for controller tests.

use crate::domain::model::{
    ApiResult, CompanyStat, DomainComparison, DomainCount, DomainSalary, JobFilter, JobRecord,
    KeyInsights, LocationStat, SalaryRangeCount,
};
use crate::domain::ports::InsightsSource;
use async_trait::async_trait;
use std::sync::Mutex;

pub struct StubSource {
    pub domains: ApiResult<Vec<String>>,
    pub locations: ApiResult<Vec<String>>,
    pub top_domains: ApiResult<Vec<DomainCount>>,
    pub salary_insights: ApiResult<Vec<DomainSalary>>,
    pub jobs_by_city: ApiResult<Vec<LocationStat>>,
    pub company_hiring: ApiResult<Vec<CompanyStat>>,
    pub salary_ranges: ApiResult<Vec<SalaryRangeCount>>,
    pub jobs: ApiResult<Vec<JobRecord>>,
    pub comparison: ApiResult<Vec<DomainComparison>>,
    pub key_insights: ApiResult<KeyInsights>,
    pub filters_seen: Mutex<Vec<JobFilter>>,
}

fn count(domain: &str, count: u64) -> DomainCount {
    DomainCount {
        domain: domain.to_string(),
        count,
    }
}

fn salary(domain: &str, avg_salary: f64) -> DomainSalary {
    DomainSalary {
        domain: domain.to_string(),
        avg_salary,
    }
}

fn city(city: &str, count: u64) -> LocationStat {
    LocationStat {
        city: city.to_string(),
        count,
    }
}

fn company(company: &str, count: u64) -> CompanyStat {
    CompanyStat {
        company: company.to_string(),
        count,
    }
}

pub fn job(company: &str, location: &str, domain: &str, avg_salary: f64) -> JobRecord {
    JobRecord {
        company: company.to_string(),
        title: domain.to_string(),
        location: location.to_string(),
        domain: domain.to_string(),
        avg_salary,
    }
}

pub fn comparison(domain: &str, count: u64, avg_salary: f64) -> DomainComparison {
    DomainComparison {
        domain: domain.to_string(),
        count,
        avg_salary,
        avg_min_salary: None,
        avg_max_salary: None,
        top_companies: vec![company("Acme", 3)],
        top_locations: vec![city("Delhi", 2)],
    }
}

impl StubSource {
    pub fn sample() -> Self {
        Self {
            domains: ApiResult::success(vec![
                "Data Scientist".to_string(),
                "Web Development".to_string(),
                "Machine Learning Engineer".to_string(),
            ]),
            locations: ApiResult::success(vec![
                "Bangalore".to_string(),
                "Delhi".to_string(),
                "Work from home".to_string(),
            ]),
            top_domains: ApiResult::success(vec![
                count("Data Scientist", 30),
                count("Web Development", 25),
                count("Machine Learning Engineer", 10),
                count("Graphic Design", 5),
            ]),
            salary_insights: ApiResult::success(vec![
                salary("Machine Learning Engineer", 18000.0),
                salary("Data Scientist", 15000.0),
                salary("Web Development", 8000.0),
                salary("Content Writing", 4000.0),
            ]),
            jobs_by_city: ApiResult::success(vec![
                city("Bangalore", 20),
                city("Delhi", 15),
                city("Mumbai", 10),
                city("Work from home", 40),
            ]),
            company_hiring: ApiResult::success(vec![
                company("Acme", 12),
                company("Beta Labs", 9),
                company("Cogent", 4),
            ]),
            salary_ranges: ApiResult::success(vec![
                SalaryRangeCount { range: "5K-10K".to_string(), count: 35 },
                SalaryRangeCount { range: "0-5K".to_string(), count: 50 },
                SalaryRangeCount { range: "30K+".to_string(), count: 15 },
            ]),
            jobs: ApiResult::success(vec![
                job("Acme", "Delhi, Mumbai", "Data Scientist", 15000.0),
                job("Acme", "Delhi", "Data Scientist", 12000.0),
                job("Beta Labs", "Work from home", "Web Development", 6000.0),
            ]),
            comparison: ApiResult::success(vec![
                comparison("Data Scientist", 30, 15000.0),
                comparison("Web Development", 25, 8000.0),
            ]),
            key_insights: ApiResult::success(KeyInsights {
                top_hiring_domain: "Data Scientist".to_string(),
                top_paying_domain: "Machine Learning Engineer".to_string(),
                top_hiring_company: "Acme".to_string(),
                top_location: "Work from home".to_string(),
                avg_internship_salary: 10250.0,
                total_domains: 4,
                total_companies: 3,
                total_listings: 100,
            }),
            filters_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            domains: ApiResult::error(message),
            locations: ApiResult::error(message),
            top_domains: ApiResult::error(message),
            salary_insights: ApiResult::error(message),
            jobs_by_city: ApiResult::error(message),
            company_hiring: ApiResult::error(message),
            salary_ranges: ApiResult::error(message),
            jobs: ApiResult::error(message),
            comparison: ApiResult::error(message),
            key_insights: ApiResult::error(message),
            filters_seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl InsightsSource for StubSource {
    async fn domains(&self) -> ApiResult<Vec<String>> {
        self.domains.clone()
    }

    async fn locations(&self) -> ApiResult<Vec<String>> {
        self.locations.clone()
    }

    async fn top_domains(&self) -> ApiResult<Vec<DomainCount>> {
        self.top_domains.clone()
    }

    async fn salary_insights(&self) -> ApiResult<Vec<DomainSalary>> {
        self.salary_insights.clone()
    }

    async fn jobs_by_city(&self) -> ApiResult<Vec<LocationStat>> {
        self.jobs_by_city.clone()
    }

    async fn company_hiring(&self) -> ApiResult<Vec<CompanyStat>> {
        self.company_hiring.clone()
    }

    async fn salary_ranges(&self) -> ApiResult<Vec<SalaryRangeCount>> {
        self.salary_ranges.clone()
    }

    async fn filter_data(&self, filter: &JobFilter) -> ApiResult<Vec<JobRecord>> {
        if let Ok(mut seen) = self.filters_seen.lock() {
            seen.push(filter.clone());
        }
        self.jobs.clone()
    }

    async fn compare_domains(&self, domains: &[String]) -> ApiResult<Vec<DomainComparison>> {
        self.comparison
            .clone()
            .map(|rows| rows.into_iter().filter(|r| domains.contains(&r.domain)).collect())
    }

    async fn key_insights(&self) -> ApiResult<KeyInsights> {
        self.key_insights.clone()
    }
}
