use crate::app::insights::{highest_paying, most_in_demand, remote_work_trend};
use crate::app::pages::{or_na, widget_from};
use crate::app::presentation::{format_currency, format_number, ChartData, ChartKind, PageView, Table, Widget};
use crate::core::aggregate::{split_remote, top_n};
use crate::core::histogram::{order_range_counts, standard_buckets};
use crate::core::stats::salary_stats_from_insights;
use crate::domain::model::{
    ApiResult, CompanyStat, DomainCount, DomainSalary, KeyInsights, LocationStat, SalaryRangeCount,
};
use crate::domain::ports::{InsightsSource, PageController};
use async_trait::async_trait;

pub const PAGE: &str = "dashboard";

const TOP_DOMAINS: usize = 7;
const TOP_PHYSICAL_LOCATIONS: usize = 6;
const TOP_COMPANIES: usize = 5;

/// Everything the dashboard fetches, each dataset with its own outcome.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub top_domains: ApiResult<Vec<DomainCount>>,
    pub salary_ranges: ApiResult<Vec<SalaryRangeCount>>,
    pub locations: ApiResult<Vec<LocationStat>>,
    pub companies: ApiResult<Vec<CompanyStat>>,
    pub salary_insights: ApiResult<Vec<DomainSalary>>,
    pub key_insights: ApiResult<KeyInsights>,
}

impl DashboardData {
    fn all_failed(&self) -> bool {
        !(self.top_domains.is_success()
            || self.salary_ranges.is_success()
            || self.locations.is_success()
            || self.companies.is_success()
            || self.salary_insights.is_success()
            || self.key_insights.is_success())
    }
}

pub struct DashboardController<S: InsightsSource> {
    source: S,
    currency: String,
    view: Option<PageView>,
}

impl<S: InsightsSource> DashboardController<S> {
    pub fn new(source: S, currency: impl Into<String>) -> Self {
        Self {
            source,
            currency: currency.into(),
            view: None,
        }
    }

    fn build(&self, data: &DashboardData) -> PageView {
        if data.all_failed() {
            tracing::error!("❌ Every dashboard request failed");
            return PageView::failed(PAGE, "Failed to load dashboard data. Please try refreshing the page.");
        }

        let mut view = PageView::new(PAGE);

        view.push(widget_from("domain-demand", "Domain Demand", &data.top_domains, |domains| {
            let top = top_n(domains, TOP_DOMAINS, |d| d.count as f64);
            Widget::chart(
                "domain-demand",
                "Domain Demand",
                ChartData::from_rows(ChartKind::Bar, &["Job Count"], &top),
            )
        }));

        view.push(widget_from(
            "salary-distribution",
            "Salary Distribution",
            &data.salary_ranges,
            |ranges| {
                let ordered = order_range_counts(ranges, &standard_buckets());
                Widget::chart(
                    "salary-distribution",
                    "Salary Distribution",
                    ChartData::from_rows(ChartKind::Bar, &["Number of Jobs"], &ordered),
                )
            },
        ));

        view.push(widget_from(
            "location-distribution",
            "Location Distribution",
            &data.locations,
            |locations| {
                let (remote, physical) = split_remote(locations);
                let shown: Vec<LocationStat> = remote
                    .into_iter()
                    .chain(physical.into_iter().take(TOP_PHYSICAL_LOCATIONS))
                    .collect();
                Widget::chart(
                    "location-distribution",
                    "Location Distribution",
                    ChartData::from_rows(ChartKind::Pie, &["Job Count"], &shown),
                )
            },
        ));

        view.push(widget_from("top-companies", "Top Hiring Companies", &data.companies, |companies| {
            let table = top_n(companies, TOP_COMPANIES, |c| c.count as f64)
                .into_iter()
                .fold(Table::new(&["Company", "Openings"]), |table, c| {
                    table.row([c.company, c.count.to_string()])
                });
            Widget::table("top-companies", "Top Hiring Companies", table)
        }));

        view.push(self.stats_overview(data));
        view.push(self.quick_insights(data));

        view
    }

    fn stats_overview(&self, data: &DashboardData) -> Widget {
        let total = data
            .key_insights
            .data()
            .map(|k| format_number(k.total_listings as f64));
        let avg_salary = data
            .salary_insights
            .data()
            .and_then(|s| salary_stats_from_insights(s).ok())
            .map(|stats| format_currency(stats.mean, &self.currency));
        let top_domain = data
            .top_domains
            .data()
            .and_then(|d| top_n(d, 1, |d| d.count as f64).into_iter().next())
            .map(|d| d.domain);
        let top_location = data
            .locations
            .data()
            .and_then(|l| split_remote(l).1.into_iter().next())
            .map(|l| l.city);

        let table = Table::new(&["Metric", "Value"])
            .row(["Total listings".to_string(), or_na(total)])
            .row(["Average salary".to_string(), or_na(avg_salary)])
            .row(["Top domain".to_string(), or_na(top_domain)])
            .row(["Top location".to_string(), or_na(top_location)]);

        Widget::table("stats-overview", "Overview", table)
    }

    fn quick_insights(&self, data: &DashboardData) -> Widget {
        let mut table = Table::new(&["Insight", "Detail"]);

        if let Some(top) = data
            .top_domains
            .data()
            .and_then(|d| top_n(d, 1, |d| d.count as f64).into_iter().next())
        {
            table = table.row(["Most in demand".to_string(), most_in_demand(&top)]);
        }

        if let Some(top) = data
            .salary_insights
            .data()
            .and_then(|s| top_n(s, 1, |s| s.avg_salary).into_iter().next())
        {
            table = table.row(["Highest paying".to_string(), highest_paying(&top, &self.currency)]);
        }

        let remote = data
            .locations
            .data()
            .map(|l| split_remote(l).0.map(|r| r.count).unwrap_or(0));
        let total = data.key_insights.data().map(|k| k.total_listings);
        if let Some((headline, trend)) = remote
            .zip(total)
            .and_then(|(remote, total)| remote_work_trend(remote, total))
        {
            table = table
                .row(["Location trend".to_string(), headline])
                .row(["Work mode".to_string(), trend]);
        }

        Widget::table("quick-insights", "Quick Insights", table)
    }
}

#[async_trait]
impl<S: InsightsSource> PageController for DashboardController<S> {
    type Data = DashboardData;

    fn name(&self) -> &'static str {
        PAGE
    }

    async fn fetch(&self) -> DashboardData {
        let (top_domains, salary_ranges, locations, companies, salary_insights, key_insights) = tokio::join!(
            self.source.top_domains(),
            self.source.salary_ranges(),
            self.source.jobs_by_city(),
            self.source.company_hiring(),
            self.source.salary_insights(),
            self.source.key_insights(),
        );

        DashboardData {
            top_domains,
            salary_ranges,
            locations,
            companies,
            salary_insights,
            key_insights,
        }
    }

    fn render(&mut self, data: DashboardData) -> &PageView {
        let view = self.build(&data);
        self.view.insert(view)
    }

    fn view(&self) -> Option<&PageView> {
        self.view.as_ref()
    }
}
