use crate::app::insights::{company_hiring_insight, salary_vs_demand_insight, top_domains_insight};
use crate::app::presentation::{format_currency, ChartData, ChartKind, PageView, Table, Widget};
use crate::core::aggregate::{join_domain_count_and_salary, top_n};
use crate::core::quadrant::{classify_quadrants, Quadrant, QuadrantClassification};
use crate::core::stats::salary_stats_from_insights;
use crate::domain::model::{ApiResult, CompanyStat, DomainCount, DomainSalary, DomainStat};
use crate::domain::ports::{InsightsSource, PageController};
use async_trait::async_trait;

pub const PAGE: &str = "key-insights";

const TOP_DOMAINS: usize = 5;
const TOP_SALARY_VS_DEMAND: usize = 15;
const TOP_COMPANIES: usize = 10;
const DOMAINS_PER_RECOMMENDATION: usize = 2;

#[derive(Debug, Clone)]
pub struct KeyInsightsData {
    pub top_domains: ApiResult<Vec<DomainCount>>,
    pub salary_insights: ApiResult<Vec<DomainSalary>>,
    pub company_hiring: ApiResult<Vec<CompanyStat>>,
}

pub struct KeyInsightsController<S: InsightsSource> {
    source: S,
    currency: String,
    view: Option<PageView>,
}

impl<S: InsightsSource> KeyInsightsController<S> {
    pub fn new(source: S, currency: impl Into<String>) -> Self {
        Self {
            source,
            currency: currency.into(),
            view: None,
        }
    }

    fn build(&self, data: KeyInsightsData) -> PageView {
        // This page needs all three feeds to say anything meaningful.
        let fetched = data.top_domains.into_result().and_then(|domains| {
            Ok((
                domains,
                data.salary_insights.into_result()?,
                data.company_hiring.into_result()?,
            ))
        });
        let (domains, salaries, companies) = match fetched {
            Ok(feeds) => feeds,
            Err(e) => {
                tracing::error!("❌ Key insights request failed: {}", e);
                return PageView::failed(PAGE, "Failed to load insights data. Please try refreshing the page.");
            }
        };
        let mut view = PageView::new(PAGE);

        let top = top_n(&domains, TOP_DOMAINS, |d| d.count as f64);
        view.push(Widget::chart(
            "top-domains",
            "Top Domains",
            ChartData::from_rows(ChartKind::Bar, &["Job Count"], &top),
        ));
        if let Some(text) = top_domains_insight(&domains) {
            view.push(Widget::text("top-domains-insight", "Top Domains Insight", text));
        }

        let joined = join_domain_count_and_salary(&domains, &salaries);
        let shown = top_n(&joined, TOP_SALARY_VS_DEMAND, |s| s.count as f64);
        view.push(Widget::chart(
            "salary-vs-demand",
            "Salary vs Demand",
            ChartData::from_rows(ChartKind::Scatter, &["Average Salary", "Job Count"], &shown),
        ));
        if let Some(text) = salary_vs_demand_insight(&shown, &self.currency) {
            view.push(Widget::text("salary-vs-demand-insight", "Salary vs Demand Insight", text));
        }

        let quadrants = classify_quadrants(&joined);
        view.push(Widget::table("quadrants", "Demand and Salary Quadrants", quadrant_table(&quadrants)));

        let hiring = top_n(&companies, TOP_COMPANIES, |c| c.count as f64);
        view.push(Widget::chart(
            "hiring-patterns",
            "Company Hiring Patterns",
            ChartData::from_rows(ChartKind::HorizontalBar, &["Openings"], &hiring),
        ));
        if let Some(text) = company_hiring_insight(&companies) {
            view.push(Widget::text("hiring-insight", "Hiring Insight", text));
        }

        view.push(match salary_stats_from_insights(&salaries) {
            Ok(stats) => Widget::table(
                "salary-stats",
                "Salary Statistics",
                Table::new(&["Statistic", "Value"])
                    .row(["Minimum".to_string(), format_currency(stats.min, &self.currency)])
                    .row(["Maximum".to_string(), format_currency(stats.max, &self.currency)])
                    .row(["Mean".to_string(), format_currency(stats.mean, &self.currency)])
                    .row(["Median".to_string(), format_currency(stats.median, &self.currency)])
                    .row(["Domains".to_string(), stats.count.to_string()]),
            ),
            Err(e) => Widget::unavailable("salary-stats", "Salary Statistics", e.to_string()),
        });

        view.push(Widget::table(
            "recommendations",
            "Recommendations",
            self.recommendations(&quadrants, &hiring),
        ));

        view
    }

    fn recommendations(&self, quadrants: &QuadrantClassification, companies: &[CompanyStat]) -> Table {
        let mut table = Table::new(&["Priority", "Recommendation"]);

        let sweet_spot = top_n(
            quadrants.bucket(Quadrant::HighDemandHighSalary),
            DOMAINS_PER_RECOMMENDATION,
            |s| s.count as f64,
        );
        for stat in &sweet_spot {
            table = table.row([
                "high".to_string(),
                format!(
                    "Build {} skills: {} openings at an above-average {}.",
                    stat.domain,
                    stat.count,
                    format_currency(stat.avg_salary, &self.currency)
                ),
            ]);
        }

        if let Some(niche) = top_n(quadrants.bucket(Quadrant::LowDemandHighSalary), 1, |s| s.avg_salary)
            .first()
        {
            table = table.row(["medium".to_string(), niche_recommendation(niche, &self.currency)]);
        }

        let names: Vec<&str> = companies
            .iter()
            .take(DOMAINS_PER_RECOMMENDATION)
            .map(|c| c.company.as_str())
            .collect();
        if !names.is_empty() {
            table = table.row([
                "medium".to_string(),
                format!(
                    "Target top hiring companies such as {} and tailor applications to their requirements.",
                    names.join(" and ")
                ),
            ]);
        }

        table.row([
            "high",
            "Companies across all domains value practical experience; keep a portfolio of relevant projects.",
        ])
    }
}

fn niche_recommendation(stat: &DomainStat, currency: &str) -> String {
    format!(
        "{} pays well ({}) with fewer openings, a niche worth specializing in.",
        stat.domain,
        format_currency(stat.avg_salary, currency)
    )
}

fn quadrant_table(quadrants: &QuadrantClassification) -> Table {
    Quadrant::ALL.into_iter().fold(Table::new(&["Quadrant", "Domains"]), |table, q| {
        let names: Vec<&str> = quadrants.bucket(q).iter().map(|s| s.domain.as_str()).collect();
        let cell = if names.is_empty() { "-".to_string() } else { names.join(", ") };
        table.row([q.label().to_string(), cell])
    })
}

#[async_trait]
impl<S: InsightsSource> PageController for KeyInsightsController<S> {
    type Data = KeyInsightsData;

    fn name(&self) -> &'static str {
        PAGE
    }

    async fn fetch(&self) -> KeyInsightsData {
        let (top_domains, salary_insights, company_hiring) = tokio::join!(
            self.source.top_domains(),
            self.source.salary_insights(),
            self.source.company_hiring(),
        );

        KeyInsightsData {
            top_domains,
            salary_insights,
            company_hiring,
        }
    }

    fn render(&mut self, data: KeyInsightsData) -> &PageView {
        let view = self.build(data);
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

    async fn render(source: StubSource) -> PageView {
        let mut controller = KeyInsightsController::new(source, "₹");
        let data = controller.fetch().await;
        controller.render(data).clone()
    }

    fn table(view: &PageView, id: &str) -> Table {
        match &view.widget(id).unwrap().content {
            WidgetContent::Table(table) => table.clone(),
            other => panic!("{} is not a table: {:?}", id, other),
        }
    }

    #[tokio::test]
    async fn test_full_render() {
        let view = render(StubSource::sample()).await;

        assert!(view.error.is_none());
        match &view.widget("salary-vs-demand").unwrap().content {
            WidgetContent::Chart(chart) => {
                assert_eq!(chart.kind, ChartKind::Scatter);
                // Graphic Design has no salary entry and drops out of the join
                assert_eq!(chart.labels, vec!["Data Scientist", "Web Development", "Machine Learning Engineer"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        let stats = table(&view, "salary-stats");
        assert_eq!(stats.rows[0], vec!["Minimum", "₹4,000"]);
        assert_eq!(stats.rows[3], vec!["Median", "₹11,500"]);

        let quadrants = table(&view, "quadrants");
        assert_eq!(quadrants.rows.len(), 4);
        assert_eq!(quadrants.rows[0][1], "Data Scientist");

        let recommendations = table(&view, "recommendations");
        assert!(recommendations.rows[0][1].starts_with("Build Data Scientist skills"));
        assert!(recommendations.rows.iter().any(|r| r[1].contains("Acme and Beta Labs")));
    }

    #[tokio::test]
    async fn test_any_failed_feed_is_a_page_error() {
        let mut source = StubSource::sample();
        source.company_hiring = ApiResult::error("HTTP error! Status: 503");

        let view = render(source).await;

        assert!(view.is_failed());
        assert!(view.widgets.is_empty());
    }

    #[tokio::test]
    async fn test_first_feed_failure_is_a_page_error() {
        let mut source = StubSource::sample();
        source.top_domains = ApiResult::error("Failed to fetch");
        source.salary_insights = ApiResult::error("HTTP error! Status: 500");

        let view = render(source).await;

        assert!(view.is_failed());
        assert_eq!(
            view.error.as_deref(),
            Some("Failed to load insights data. Please try refreshing the page.")
        );
    }

    #[tokio::test]
    async fn test_empty_feeds_degrade_to_unavailable_widgets() {
        let mut source = StubSource::sample();
        source.top_domains = ApiResult::success(vec![]);
        source.salary_insights = ApiResult::success(vec![]);

        let view = render(source).await;

        assert!(!view.is_failed());
        assert!(!view.widget("top-domains").unwrap().is_available());
        assert!(!view.widget("salary-stats").unwrap().is_available());
        assert!(view.widget("top-domains-insight").is_none());
    }
}
