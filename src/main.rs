use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tuition_reports::config::{Config, DatabaseConfig, LogFormat, StoreBackend};
use tuition_reports::middleware::{ErrorHandler, RequestId};
use tuition_reports::modules::collaborators::{HttpPaymentClient, HttpRegistrationClient};
use tuition_reports::modules::reports::{
    self, InMemoryReportRepository, MySqlReportRepository, ReconciliationService,
    ReportRepository, ReportService,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!("Starting Tuition Payment Status Reports service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let report_repo: Arc<dyn ReportRepository> = match (config.store, &config.database) {
        (StoreBackend::MySql, Some(database)) => {
            let pool = database
                .create_pool()
                .await
                .context("Failed to create database pool")?;
            DatabaseConfig::migrate(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!(
                "Database pool initialized ({} connections)",
                database.max_connections
            );
            Arc::new(MySqlReportRepository::new(pool))
        }
        (StoreBackend::MySql, None) => anyhow::bail!("REPORT_STORE=mysql requires DATABASE_URL"),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory report store; reports are lost on restart");
            Arc::new(InMemoryReportRepository::new())
        }
    };

    let registration = Arc::new(
        HttpRegistrationClient::new(&config.registration)
            .context("Failed to build registration client")?,
    );
    let payments = Arc::new(
        HttpPaymentClient::new(&config.payment).context("Failed to build payment client")?,
    );

    let engine = Arc::new(ReconciliationService::new(
        report_repo.clone(),
        registration,
        payments,
    ));
    let report_service = Arc::new(ReportService::new(
        engine,
        report_repo,
        config.refresh_policy,
    ));
    tracing::info!("Report refresh policy: {:?}", config.refresh_policy);

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET", "POST"]))
            .app_data(web::Data::new(report_service.clone()))
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
            .configure(reports::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("tuition_reports={},actix_web=info", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tuition-reports"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Tuition Payment Status Reports",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
