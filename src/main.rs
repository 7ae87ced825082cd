use std::process;
use std::sync::Arc;

use clap::Parser;
use periodika::{
    application::{catalog::service::CatalogService, error::AppError},
    cache::{CacheConfig, MemoryCacheStore, ResultCache},
    config::{self, CliArgs},
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let repositories = PostgresRepositories::connect(&settings.database)
        .await
        .map_err(AppError::from)?;

    let cache_config = CacheConfig::from(&settings.cache);
    let store = Arc::new(MemoryCacheStore::new(&cache_config));
    let cache = Arc::new(ResultCache::new(store, cache_config));
    let catalog = Arc::new(CatalogService::new(Arc::new(repositories), cache));

    let router = http::router(ApiState { catalog });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::Infra(InfraError::Io(err)))?;
    info!(addr = %settings.server.addr, "Serving catalog API");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Infra(InfraError::Io(err)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(error = %error, "Failed to listen for shutdown signal");
    }
}
