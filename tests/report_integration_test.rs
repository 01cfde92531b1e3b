use httpmock::prelude::*;
use internship_insights::app::presentation::WidgetContent;
use internship_insights::{
    AnalyticsController, DashboardController, HttpInsightsClient, InsightsConfig, JobFilter,
    KeyInsightsController, LocalStorage, PageController, PageView, ReportEngine,
};
use tempfile::TempDir;

fn mock_dashboard_backend(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/top-domains");
        then.status(200).json_body(serde_json::json!({
            "status": "success",
            "data": [
                {"domain": "Data Scientist", "count": 30},
                {"domain": "Web Development", "count": 25},
                {"domain": "Machine Learning Engineer", "count": 10}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/salary-range");
        then.status(200).json_body(serde_json::json!([
            {"range": "30K+", "count": 5},
            {"range": "0-5K", "count": 40},
            {"range": "5K-10K", "count": 20}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/jobs-by-city");
        then.status(200).json_body(serde_json::json!([
            {"city": "Work from home", "count": 60},
            {"city": "Bangalore", "count": 25},
            {"city": "Delhi", "count": 15}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/company-hiring");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/salary-insights");
        then.status(200).json_body(serde_json::json!([
            {"domain": "Machine Learning Engineer", "avg_salary": 18000.0},
            {"domain": "Data Scientist", "avg_salary": 15000.0},
            {"domain": "Web Development", "avg_salary": 8000.0}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/key-insights");
        then.status(200).json_body(serde_json::json!({
            "status": "success",
            "data": {
                "top_hiring_domain": "Data Scientist",
                "top_paying_domain": "Machine Learning Engineer",
                "top_hiring_company": "Acme",
                "top_location": "Work from home",
                "avg_internship_salary": 13666.0,
                "total_domains": 3,
                "total_companies": 12,
                "total_listings": 100
            }
        }));
    });
}

fn config_for(server: &MockServer, output: &TempDir) -> InsightsConfig {
    let mut config = InsightsConfig::default();
    config.api.base_url = server.url("/api");
    config.report.output_path = output.path().to_str().unwrap().to_string();
    config
}

#[tokio::test]
async fn test_dashboard_report_end_to_end() {
    let server = MockServer::start();
    mock_dashboard_backend(&server);
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&server, &temp_dir);
    config.report.formats = vec!["json".to_string(), "csv".to_string()];

    let client = HttpInsightsClient::new(&config).unwrap();
    let storage = LocalStorage::new(config.report.output_path.clone());
    let controller = DashboardController::new(client, config.display.currency_symbol.clone());
    let mut engine = ReportEngine::new(controller, storage, config.report.clone());

    let outcome = engine.run().await.unwrap();

    assert!(outcome.page_error.is_none());
    assert_eq!(outcome.unavailable_widgets, 1);

    let json = std::fs::read(temp_dir.path().join("dashboard.json")).unwrap();
    let view: PageView = serde_json::from_slice(&json).unwrap();
    let companies = view.widgets.iter().find(|w| w.id == "top-companies").unwrap();
    assert_eq!(
        companies.content,
        WidgetContent::Unavailable {
            message: "HTTP error! Status: 500".to_string()
        }
    );

    let salary_csv =
        std::fs::read_to_string(temp_dir.path().join("dashboard_salary-distribution.csv")).unwrap();
    let lines: Vec<&str> = salary_csv.lines().collect();
    assert_eq!(lines[0], "label,Number of Jobs");
    assert_eq!(lines[1], "0-5K,40");
    assert_eq!(lines.len(), 8);

    let text = view.to_string();
    assert!(text.contains("60% of internships are remote (Work from Home)"));
}

#[tokio::test]
async fn test_key_insights_fails_as_a_page_when_a_feed_fails() {
    let server = MockServer::start();
    mock_dashboard_backend(&server);
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, &temp_dir);

    let client = HttpInsightsClient::new(&config).unwrap();
    let storage = LocalStorage::new(config.report.output_path.clone());
    let mut engine = ReportEngine::new(KeyInsightsController::new(client, "₹"), storage, config.report.clone());

    let outcome = engine.run().await.unwrap();

    assert!(outcome.page_error.is_some());
    assert_eq!(outcome.widgets, 0);
    assert!(temp_dir.path().join("key-insights.json").exists());
}

#[tokio::test]
async fn test_analytics_filter_and_zip_bundle() {
    let server = MockServer::start();
    mock_dashboard_backend(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/domains");
        then.status(200)
            .json_body(serde_json::json!(["Data Scientist", "Web Development"]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/locations");
        then.status(200).json_body(serde_json::json!(["Bangalore", "Delhi"]));
    });
    let filter_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/filter-data")
            .query_param("domain", "Data Scientist");
        then.status(200).json_body(serde_json::json!({
            "status": "success",
            "data": [
                {"Company": "Acme", "Location": "Bangalore", "Job Title": "Data Scientist", "avg_salary": 16000.0},
                {"Company": "Beta", "Location": "Delhi", "Job Title": "Data Scientist", "avg_salary": 12000.0}
            ]
        }));
    });

    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&server, &temp_dir);
    config.report.formats = vec!["json".to_string(), "csv".to_string()];
    config.report.zip = true;

    let client = HttpInsightsClient::new(&config).unwrap();
    let storage = LocalStorage::new(config.report.output_path.clone());
    let mut engine = ReportEngine::new(AnalyticsController::new(client, "₹"), storage, config.report.clone());

    engine.refresh().await;
    engine
        .controller_mut()
        .on_filter_change(JobFilter {
            domain: Some("Data Scientist".to_string()),
            ..Default::default()
        })
        .await;
    let outcome = engine.store().await.unwrap();

    filter_mock.assert();
    assert_eq!(engine.controller().name(), "analytics");
    assert_eq!(outcome.files.len(), 1);
    assert!(outcome.files[0].ends_with("analytics_report.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("analytics_report.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    let mut jobs = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("analytics_filtered-jobs.csv").unwrap(), &mut jobs)
        .unwrap();
    assert!(jobs.contains("Acme"));
    assert!(jobs.contains("₹16,000"));
}
