use anyhow::Context;
use clap::Parser;
use internship_insights::utils::error::ErrorSeverity;
use internship_insights::utils::{logger, validation::Validate};
use internship_insights::{
    AnalyticsController, CliConfig, DashboardController, HttpInsightsClient, KeyInsightsController,
    LocalStorage, PageCommand, PageController, ReportEngine, ReportOutcome, Storage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.logging.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting internship-insights");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let client = HttpInsightsClient::new(&config).context("Failed to build the HTTP client")?;
    let storage = LocalStorage::new(config.report.output_path.clone());
    let currency = config.display.currency_symbol.clone();
    let report = config.report.clone();

    let result = match &cli.page {
        PageCommand::Dashboard => {
            let mut engine = ReportEngine::new(DashboardController::new(client, currency), storage, report);
            engine.refresh().await;
            finish(&engine).await
        }
        PageCommand::Analytics { compare, .. } => {
            let mut engine = ReportEngine::new(AnalyticsController::new(client, currency), storage, report);
            engine.refresh().await;
            if let Some(filter) = cli.page.filter() {
                engine.controller_mut().on_filter_change(filter).await;
            }
            if !compare.is_empty() {
                engine.controller_mut().compare(compare).await;
            }
            finish(&engine).await
        }
        PageCommand::KeyInsights => {
            let mut engine = ReportEngine::new(KeyInsightsController::new(client, currency), storage, report);
            engine.refresh().await;
            finish(&engine).await
        }
    };

    match result {
        Ok(outcome) => {
            for file in &outcome.files {
                tracing::info!("📁 Report saved to: {}", file);
            }
            if let Some(error) = &outcome.page_error {
                tracing::error!("❌ {} page failed to load: {}", outcome.page, error);
                std::process::exit(2);
            }
            tracing::info!(
                "✅ {} page rendered ({} widgets, {} unavailable)",
                outcome.page,
                outcome.widgets,
                outcome.unavailable_widgets
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// Prints the rendered view and stores it.
async fn finish<C: PageController, S: Storage>(
    engine: &ReportEngine<C, S>,
) -> internship_insights::Result<ReportOutcome> {
    if let Some(view) = engine.controller().view() {
        println!("{}", view);
    }
    engine.store().await
}
