use crate::adapters::http::MAX_DOMAINS_TO_COMPARE;
use crate::app::insights::comparison_analysis;
use crate::app::pages::{or_na, widget_from};
use crate::app::presentation::{format_currency, format_number, ChartData, ChartKind, PageView, Table, Widget};
use crate::core::aggregate::{compare_pair, split_remote, summarize_jobs, top_n};
use crate::core::histogram::{order_range_counts, range_histogram, standard_buckets};
use crate::domain::model::{
    ApiResult, DomainComparison, DomainSalary, JobFilter, JobRecord, LocationStat, SalaryRangeCount,
};
use crate::domain::ports::{InsightsSource, PageController};
use crate::utils::validation::Validate;
use async_trait::async_trait;

pub const PAGE: &str = "analytics";

const TOP_SALARY_DOMAINS: usize = 10;
const TOP_PHYSICAL_LOCATIONS: usize = 8;
const FILTERED_ROW_LIMIT: usize = 100;
const TOP_PER_COMPARISON: usize = 3;

const FILTERED_JOBS: &str = "filtered-jobs";
const FILTERED_SUMMARY: &str = "filtered-summary";
const FILTERED_SALARY_RANGE: &str = "filtered-salary-range";
const DOMAIN_COMPARISON: &str = "domain-comparison";
const COMPARISON_DETAILS: &str = "comparison-details";
const COMPARISON_ANALYSIS: &str = "comparison-analysis";

const NO_MATCHES: &str = "No internships match the selected filters";

#[derive(Debug, Clone)]
pub struct AnalyticsData {
    pub domains: ApiResult<Vec<String>>,
    pub locations: ApiResult<Vec<String>>,
    pub salary_insights: ApiResult<Vec<DomainSalary>>,
    pub jobs_by_city: ApiResult<Vec<LocationStat>>,
    pub salary_ranges: ApiResult<Vec<SalaryRangeCount>>,
}

impl AnalyticsData {
    fn all_failed(&self) -> bool {
        !(self.domains.is_success()
            || self.locations.is_success()
            || self.salary_insights.is_success()
            || self.jobs_by_city.is_success()
            || self.salary_ranges.is_success())
    }
}

/// Salary and location breakdowns, plus the interactive filter and
/// comparison panels layered onto the rendered view.
pub struct AnalyticsController<S: InsightsSource> {
    source: S,
    currency: String,
    view: Option<PageView>,
}

impl<S: InsightsSource> AnalyticsController<S> {
    pub fn new(source: S, currency: impl Into<String>) -> Self {
        Self {
            source,
            currency: currency.into(),
            view: None,
        }
    }

    /// Fetches listings for `filter` and swaps in the filtered table and summary.
    pub async fn on_filter_change(&mut self, filter: JobFilter) -> &PageView {
        let widgets = match filter.validate() {
            Ok(()) => {
                if filter.is_unrestricted() {
                    tracing::info!("🔍 No filter restrictions, showing all listings");
                } else {
                    tracing::info!("🔍 Applying filter {:?}", filter.query_pairs());
                }
                let result = self.source.filter_data(&filter).await;
                [
                    self.filtered_jobs(&result),
                    self.filtered_summary(&result),
                    filtered_salary_range(&result),
                ]
            }
            Err(e) => {
                tracing::warn!("⚠️ Rejected filter: {}", e);
                let message = e.to_string();
                [
                    Widget::unavailable(FILTERED_JOBS, "Filtered Internships", message.clone()),
                    Widget::unavailable(FILTERED_SUMMARY, "Filter Summary", message.clone()),
                    Widget::unavailable(FILTERED_SALARY_RANGE, "Filtered Salary Ranges", message),
                ]
            }
        };

        let view = self.view.get_or_insert_with(|| PageView::new(PAGE));
        for widget in widgets {
            view.replace_widget(widget);
        }
        view
    }

    /// Compares the given domains. An empty list clears the comparison panel.
    pub async fn compare(&mut self, domains: &[String]) -> &PageView {
        if domains.is_empty() {
            let view = self.view.get_or_insert_with(|| PageView::new(PAGE));
            for id in [DOMAIN_COMPARISON, COMPARISON_DETAILS, COMPARISON_ANALYSIS] {
                view.remove_widget(id);
            }
            return view;
        }

        tracing::info!("⚖️ Comparing {} domains (max {})", domains.len(), MAX_DOMAINS_TO_COMPARE);
        let result = self.source.compare_domains(domains).await;

        let chart = widget_from(DOMAIN_COMPARISON, "Domain Comparison", &result, |rows| {
            Widget::chart(
                DOMAIN_COMPARISON,
                "Domain Comparison",
                ChartData::from_rows(ChartKind::Bar, &["Average Salary", "Job Count"], rows),
            )
        });
        let details = widget_from(COMPARISON_DETAILS, "Comparison Details", &result, |rows| {
            Widget::table(COMPARISON_DETAILS, "Comparison Details", self.comparison_table(rows))
        });
        let analysis = result.data().and_then(|rows| match rows.as_slice() {
            [first, second] => {
                let text = comparison_analysis(&compare_pair(first, second), &self.currency).join(" ");
                Some(Widget::text(COMPARISON_ANALYSIS, "Comparison Analysis", text))
            }
            _ => None,
        });

        let view = self.view.get_or_insert_with(|| PageView::new(PAGE));
        view.replace_widget(chart);
        view.replace_widget(details);
        match analysis {
            Some(widget) => view.replace_widget(widget),
            None => view.remove_widget(COMPARISON_ANALYSIS),
        }
        view
    }

    fn comparison_table(&self, rows: &[DomainComparison]) -> Table {
        rows.iter().fold(
            Table::new(&["Domain", "Openings", "Average Salary", "Top Companies", "Top Locations"]),
            |table, row| {
                let companies: Vec<&str> = row
                    .top_companies
                    .iter()
                    .take(TOP_PER_COMPARISON)
                    .map(|c| c.company.as_str())
                    .collect();
                let locations: Vec<&str> = row
                    .top_locations
                    .iter()
                    .take(TOP_PER_COMPARISON)
                    .map(|l| l.city.as_str())
                    .collect();
                table.row([
                    row.domain.clone(),
                    row.count.to_string(),
                    format_currency(row.avg_salary, &self.currency),
                    companies.join(", "),
                    locations.join(", "),
                ])
            },
        )
    }

    fn filtered_jobs(&self, result: &ApiResult<Vec<JobRecord>>) -> Widget {
        widget_from(FILTERED_JOBS, "Filtered Internships", result, |jobs| {
            if jobs.is_empty() {
                return Widget::unavailable(FILTERED_JOBS, "Filtered Internships", NO_MATCHES);
            }
            let table = jobs.iter().take(FILTERED_ROW_LIMIT).fold(
                Table::new(&["Company", "Title", "Location", "Domain", "Salary"]),
                |table, job| {
                    table.row([
                        job.company.clone(),
                        job.title.clone(),
                        job.location.clone(),
                        job.domain.clone(),
                        format_currency(job.avg_salary, &self.currency),
                    ])
                },
            );
            Widget::table(FILTERED_JOBS, "Filtered Internships", table)
        })
    }

    fn filtered_summary(&self, result: &ApiResult<Vec<JobRecord>>) -> Widget {
        widget_from(FILTERED_SUMMARY, "Filter Summary", result, |jobs| {
            if jobs.is_empty() {
                return Widget::text(FILTERED_SUMMARY, "Filter Summary", NO_MATCHES);
            }
            let summary = summarize_jobs(jobs);
            let salary = summary.salary;

            let table = Table::new(&["Metric", "Value"])
                .row(["Matching listings".to_string(), format_number(summary.total as f64)])
                .row([
                    "Average salary".to_string(),
                    or_na(salary.map(|s| format_currency(s.mean, &self.currency))),
                ])
                .row([
                    "Median salary".to_string(),
                    or_na(salary.map(|s| format_currency(s.median, &self.currency))),
                ])
                .row([
                    "Salary range".to_string(),
                    or_na(salary.map(|s| {
                        format!(
                            "{} - {}",
                            format_currency(s.min, &self.currency),
                            format_currency(s.max, &self.currency)
                        )
                    })),
                ])
                .row(["Top domain".to_string(), or_na(summary.domains.first().map(|d| d.domain.clone()))])
                .row(["Top company".to_string(), or_na(summary.companies.first().map(|c| c.company.clone()))])
                .row(["Top location".to_string(), or_na(summary.locations.first().map(|l| l.city.clone()))]);

            Widget::table(FILTERED_SUMMARY, "Filter Summary", table)
        })
    }

    fn build(&self, data: &AnalyticsData) -> PageView {
        if data.all_failed() {
            tracing::error!("❌ Every analytics request failed");
            return PageView::failed(PAGE, "Failed to load analytics data. Please try refreshing the page.");
        }

        let mut view = PageView::new(PAGE);

        view.push(widget_from(
            "salary-by-domain",
            "Average Salary by Domain",
            &data.salary_insights,
            |salaries| {
                let top = top_n(salaries, TOP_SALARY_DOMAINS, |s| s.avg_salary);
                Widget::chart(
                    "salary-by-domain",
                    "Average Salary by Domain",
                    ChartData::from_rows(ChartKind::Bar, &["Average Salary"], &top),
                )
            },
        ));

        view.push(widget_from(
            "geo-distribution",
            "Jobs by Location",
            &data.jobs_by_city,
            |locations| {
                let (_, physical) = split_remote(locations);
                let shown: Vec<LocationStat> = physical.into_iter().take(TOP_PHYSICAL_LOCATIONS).collect();
                Widget::chart(
                    "geo-distribution",
                    "Jobs by Location",
                    ChartData::from_rows(ChartKind::HorizontalBar, &["Job Count"], &shown),
                )
            },
        ));

        view.push(widget_from(
            "salary-range",
            "Salary Range Distribution",
            &data.salary_ranges,
            |ranges| {
                let ordered = order_range_counts(ranges, &standard_buckets());
                Widget::chart(
                    "salary-range",
                    "Salary Range Distribution",
                    ChartData::from_rows(ChartKind::Bar, &["Number of Jobs"], &ordered),
                )
            },
        ));

        view.push(filter_options(data));

        view
    }
}

/// Histogram of the filtered listings over the standard salary ranges.
fn filtered_salary_range(result: &ApiResult<Vec<JobRecord>>) -> Widget {
    widget_from(FILTERED_SALARY_RANGE, "Filtered Salary Ranges", result, |jobs| {
        if jobs.is_empty() {
            return Widget::unavailable(FILTERED_SALARY_RANGE, "Filtered Salary Ranges", NO_MATCHES);
        }
        let salaries: Vec<f64> = jobs.iter().map(|job| job.avg_salary).collect();
        match range_histogram(&salaries, &standard_buckets()) {
            Ok(counts) => Widget::chart(
                FILTERED_SALARY_RANGE,
                "Filtered Salary Ranges",
                ChartData::from_rows(ChartKind::Bar, &["Number of Jobs"], &counts),
            ),
            Err(e) => {
                tracing::warn!("⚠️ Cannot bucket filtered salaries: {}", e);
                Widget::unavailable(FILTERED_SALARY_RANGE, "Filtered Salary Ranges", e.to_string())
            }
        }
    })
}

fn filter_options(data: &AnalyticsData) -> Widget {
    let options = |values: &Vec<String>| {
        std::iter::once("All")
            .chain(values.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = Table::new(&["Filter", "Options"]);
    if let Some(domains) = data.domains.data() {
        table = table.row(["Domain".to_string(), options(domains)]);
    }
    if let Some(locations) = data.locations.data() {
        table = table.row(["Location".to_string(), options(locations)]);
    }

    if table.rows.is_empty() {
        let message = data
            .domains
            .error_message()
            .or(data.locations.error_message())
            .unwrap_or_default()
            .to_string();
        return Widget::unavailable("filter-options", "Filter Options", message);
    }
    Widget::table("filter-options", "Filter Options", table)
}

#[async_trait]
impl<S: InsightsSource> PageController for AnalyticsController<S> {
    type Data = AnalyticsData;

    fn name(&self) -> &'static str {
        PAGE
    }

    async fn fetch(&self) -> AnalyticsData {
        let (domains, locations, salary_insights, jobs_by_city, salary_ranges) = tokio::join!(
            self.source.domains(),
            self.source.locations(),
            self.source.salary_insights(),
            self.source.jobs_by_city(),
            self.source.salary_ranges(),
        );

        AnalyticsData {
            domains,
            locations,
            salary_insights,
            jobs_by_city,
            salary_ranges,
        }
    }

    fn render(&mut self, data: AnalyticsData) -> &PageView {
        let view = self.build(&data);
        self.view.insert(view)
    }

    fn view(&self) -> Option<&PageView> {
        self.view.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pages::stub::StubSource;
    use crate::app::presentation::WidgetContent;

    fn table(view: &PageView, id: &str) -> Table {
        match &view.widget(id).unwrap().content {
            WidgetContent::Table(table) => table.clone(),
            other => panic!("{} is not a table: {:?}", id, other),
        }
    }

    async fn rendered(source: StubSource) -> AnalyticsController<StubSource> {
        let mut controller = AnalyticsController::new(source, "₹");
        let data = controller.fetch().await;
        controller.render(data);
        controller
    }

    #[tokio::test]
    async fn test_initial_render() {
        let controller = rendered(StubSource::sample()).await;
        let view = controller.view().unwrap();

        match &view.widget("salary-by-domain").unwrap().content {
            WidgetContent::Chart(chart) => {
                assert_eq!(chart.labels[0], "Machine Learning Engineer");
                assert_eq!(chart.series[0][0], 18000.0);
            }
            other => panic!("unexpected {:?}", other),
        }

        match &view.widget("geo-distribution").unwrap().content {
            WidgetContent::Chart(chart) => {
                assert_eq!(chart.kind, ChartKind::HorizontalBar);
                assert!(!chart.labels.iter().any(|l| l == "Work from home"));
                assert_eq!(chart.labels[0], "Bangalore");
            }
            other => panic!("unexpected {:?}", other),
        }

        let options = table(view, "filter-options");
        assert!(options.rows[0][1].starts_with("All, Data Scientist"));
    }

    #[tokio::test]
    async fn test_filter_change_renders_summary() {
        let mut controller = rendered(StubSource::sample()).await;
        let filter = JobFilter {
            domain: Some("Data Scientist".to_string()),
            ..Default::default()
        };

        let view = controller.on_filter_change(filter.clone()).await.clone();

        let jobs = table(&view, FILTERED_JOBS);
        assert_eq!(jobs.rows.len(), 3);
        assert_eq!(jobs.rows[0][4], "₹15,000");

        let summary = table(&view, FILTERED_SUMMARY);
        assert_eq!(summary.rows[0], vec!["Matching listings", "3"]);
        assert_eq!(summary.rows[2], vec!["Median salary", "₹12,000"]);
        assert_eq!(summary.rows[4], vec!["Top domain", "Data Scientist"]);
        assert_eq!(summary.rows[6], vec!["Top location", "Delhi"]);

        match &view.widget(FILTERED_SALARY_RANGE).unwrap().content {
            WidgetContent::Chart(chart) => {
                assert_eq!(chart.labels.len(), 7);
                // 6000 in 5K-10K, 12000 in 10K-15K, 15000 in 15K-20K
                assert_eq!(chart.series[0], vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
            }
            other => panic!("unexpected {:?}", other),
        }

        let seen = controller.source.filters_seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[filter]);
    }

    #[tokio::test]
    async fn test_empty_filter_result_is_not_an_error() {
        let mut source = StubSource::sample();
        source.jobs = ApiResult::success(vec![]);
        let mut controller = rendered(source).await;

        let view = controller.on_filter_change(JobFilter::default()).await;

        assert_eq!(
            view.widget(FILTERED_SUMMARY).unwrap().content,
            WidgetContent::Text(NO_MATCHES.to_string())
        );
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_negative_salary_makes_only_histogram_unavailable() {
        let mut source = StubSource::sample();
        source.jobs = ApiResult::success(vec![crate::app::pages::stub::job("Acme", "Delhi", "Data Scientist", -1.0)]);
        let mut controller = rendered(source).await;

        let view = controller.on_filter_change(JobFilter::default()).await;

        assert!(view.widget(FILTERED_JOBS).unwrap().is_available());
        assert!(!view.widget(FILTERED_SALARY_RANGE).unwrap().is_available());
    }

    #[tokio::test]
    async fn test_invalid_filter_skips_request() {
        let mut controller = rendered(StubSource::sample()).await;
        let filter = JobFilter {
            min_salary: Some(20000.0),
            max_salary: Some(1000.0),
            ..Default::default()
        };

        let view = controller.on_filter_change(filter).await;

        assert!(!view.widget(FILTERED_JOBS).unwrap().is_available());
        assert!(controller.source.filters_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nan_salary_filter_skips_request() {
        let mut controller = rendered(StubSource::sample()).await;
        let filter = JobFilter {
            min_salary: Some(f64::NAN),
            ..Default::default()
        };

        let view = controller.on_filter_change(filter).await;

        assert!(!view.widget(FILTERED_SUMMARY).unwrap().is_available());
        assert!(controller.source.filters_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pair_comparison_adds_analysis() {
        let mut controller = rendered(StubSource::sample()).await;
        let domains = vec!["Data Scientist".to_string(), "Web Development".to_string()];

        let view = controller.compare(&domains).await;

        let details = table(view, COMPARISON_DETAILS);
        assert_eq!(details.rows.len(), 2);
        assert_eq!(details.rows[0][3], "Acme");
        match &view.widget(COMPARISON_ANALYSIS).unwrap().content {
            WidgetContent::Text(text) => assert!(text.starts_with("Data Scientist offers a higher average salary")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clearing_comparison_removes_widgets() {
        let mut controller = rendered(StubSource::sample()).await;
        let domains = vec!["Data Scientist".to_string(), "Web Development".to_string()];
        controller.compare(&domains).await;

        let view = controller.compare(&[]).await;

        assert!(view.widget(DOMAIN_COMPARISON).is_none());
        assert!(view.widget(COMPARISON_ANALYSIS).is_none());
        assert!(view.widget("salary-by-domain").is_some());
    }

    #[tokio::test]
    async fn test_failed_comparison_is_local() {
        let mut source = StubSource::sample();
        source.comparison = ApiResult::error("HTTP error! Status: 404");
        let mut controller = rendered(source).await;

        let view = controller.compare(&["Data Scientist".to_string()]).await;

        assert!(!view.widget(DOMAIN_COMPARISON).unwrap().is_available());
        assert!(view.widget("salary-range").unwrap().is_available());
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_everything_failing_is_a_page_error() {
        let controller = rendered(StubSource::failing("connection refused")).await;
        assert!(controller.view().unwrap().is_failed());
    }
}
