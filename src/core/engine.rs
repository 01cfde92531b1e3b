use crate::app::presentation::PageView;
use crate::config::ReportConfig;
use crate::domain::ports::{PageController, Storage};
use crate::utils::error::{InsightsError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// What one report run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub page: String,
    /// Storage locations of every file written, in write order.
    pub files: Vec<String>,
    pub widgets: usize,
    pub unavailable_widgets: usize,
    pub page_error: Option<String>,
}

/// Drives a page controller through fetch, render and store.
pub struct ReportEngine<C: PageController, S: Storage> {
    controller: C,
    storage: S,
    config: ReportConfig,
}

impl<C: PageController, S: Storage> ReportEngine<C, S> {
    pub fn new(controller: C, storage: S, config: ReportConfig) -> Self {
        Self {
            controller,
            storage,
            config,
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// For follow-up interactions (filtering, comparison) before storing.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub async fn refresh(&mut self) -> &PageView {
        tracing::info!("📥 Loading {} page", self.controller.name());
        let data = self.controller.fetch().await;
        let view = self.controller.render(data);
        tracing::info!(
            "🧩 Rendered {} widgets ({} unavailable)",
            view.widgets.len(),
            view.widgets.iter().filter(|w| !w.is_available()).count()
        );
        view
    }

    /// Persists the controller's current view.
    pub async fn store(&self) -> Result<ReportOutcome> {
        let view = self
            .controller
            .view()
            .ok_or_else(|| InsightsError::empty("rendered view"))?;
        store_view(&self.storage, &self.config, view).await
    }

    pub async fn run(&mut self) -> Result<ReportOutcome> {
        self.refresh().await;
        self.store().await
    }
}

fn report_files(config: &ReportConfig, view: &PageView) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();

    if config.wants("json") {
        files.push((format!("{}.json", view.page), serde_json::to_vec_pretty(view)?));
    }

    if config.wants("csv") {
        for widget in &view.widgets {
            if let Some(csv) = widget.to_csv()? {
                files.push((format!("{}_{}.csv", view.page, widget.id), csv.into_bytes()));
            }
        }
    }

    Ok(files)
}

fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

async fn store_view<S: Storage>(storage: &S, config: &ReportConfig, view: &PageView) -> Result<ReportOutcome> {
    let mut files = report_files(config, view)?;

    if config.zip && !files.is_empty() {
        let archive = bundle(&files)?;
        tracing::debug!("Bundling {} files into zip ({} bytes)", files.len(), archive.len());
        files = vec![(format!("{}_report.zip", view.page), archive)];
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, data) in &files {
        storage.write_file(name, data).await?;
        let location = storage.location(name);
        tracing::debug!("💾 Wrote {}", location);
        written.push(location);
    }

    Ok(ReportOutcome {
        page: view.page.clone(),
        files: written,
        widgets: view.widgets.len(),
        unavailable_widgets: view.widgets.iter().filter(|w| !w.is_available()).count(),
        page_error: view.error.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pages::stub::StubSource;
    use crate::app::pages::DashboardController;
    use crate::domain::model::ApiResult;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().await.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("mock/{}", path)
        }
    }

    fn config(formats: &[&str], zip: bool) -> ReportConfig {
        ReportConfig {
            output_path: "unused".to_string(),
            formats: formats.iter().map(|f| f.to_string()).collect(),
            zip,
        }
    }

    #[tokio::test]
    async fn test_run_writes_json_view() {
        let storage = MockStorage::new();
        let controller = DashboardController::new(StubSource::sample(), "₹");
        let mut engine = ReportEngine::new(controller, storage.clone(), config(&["json"], false));

        let outcome = engine.run().await.unwrap();

        assert_eq!(outcome.page, "dashboard");
        assert_eq!(outcome.files, vec!["mock/dashboard.json"]);
        assert_eq!(outcome.unavailable_widgets, 0);

        let json = storage.get_file("dashboard.json").await.unwrap();
        let view: PageView = serde_json::from_slice(&json).unwrap();
        assert_eq!(view.widgets.len(), outcome.widgets);
    }

    #[tokio::test]
    async fn test_csv_skips_unavailable_widgets() {
        let storage = MockStorage::new();
        let mut source = StubSource::sample();
        source.company_hiring = ApiResult::error("HTTP error! Status: 500");
        let controller = DashboardController::new(source, "₹");
        let mut engine = ReportEngine::new(controller, storage.clone(), config(&["csv"], false));

        let outcome = engine.run().await.unwrap();

        assert_eq!(outcome.unavailable_widgets, 1);
        let names = storage.names().await;
        assert!(names.contains(&"dashboard_domain-demand.csv".to_string()));
        assert!(!names.contains(&"dashboard_top-companies.csv".to_string()));
        assert!(!names.iter().any(|n| n.ends_with(".json")));
    }

    #[tokio::test]
    async fn test_zip_bundles_all_files() {
        let storage = MockStorage::new();
        let controller = DashboardController::new(StubSource::sample(), "₹");
        let mut engine = ReportEngine::new(controller, storage.clone(), config(&["json", "csv"], true));

        let outcome = engine.run().await.unwrap();

        assert_eq!(outcome.files, vec!["mock/dashboard_report.zip"]);
        let bytes = storage.get_file("dashboard_report.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("dashboard.json").is_ok());
        assert!(archive.by_name("dashboard_salary-distribution.csv").is_ok());
    }

    #[tokio::test]
    async fn test_store_before_render_fails() {
        let engine = ReportEngine::new(
            DashboardController::new(StubSource::sample(), "₹"),
            MockStorage::new(),
            config(&["json"], false),
        );

        let err = engine.store().await.unwrap_err();
        assert!(matches!(err, InsightsError::EmptyInput { .. }));
    }
}
