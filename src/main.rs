use crate::config::PipelineConfig;
use crate::domain::{LookupTables, Normalizer};
use crate::errors::PipelineError;
use crate::fetcher::SalesFetcher;
use crate::pipeline::Pipeline;
use chrono::Utc;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod calendar;
mod config;
mod domain;
mod errors;
mod fetcher;
mod pipeline;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Configuration (an optional .env is read first)
    dotenvy::dotenv().ok();
    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Logging, to stdout or the configured log file
    if let Err(e) = init_tracing(config.log_file.as_deref()) {
        eprintln!("❌ Logging initialization failed: {e}");
        std::process::exit(1);
    }

    let fetcher = match SalesFetcher::new(
        &config.api_base,
        &config.user_agent,
        config.request_timeout,
    ) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!(error = %e, "sales fetcher init failed");
            std::process::exit(1);
        }
    };

    let tables = LookupTables::default();
    let known = tables.server_ids();
    for id in config.server_ids.iter().filter(|id| !known.contains(id)) {
        tracing::warn!(server_id = id, "server id has no display name");
    }

    // 3️⃣ One pass over every server
    let pipeline = Pipeline::new(
        fetcher,
        Normalizer::new(tables, config.cycle),
        config.output_dir.clone(),
        config.strategy,
    );

    tracing::info!(
        servers = config.server_ids.len(),
        strategy = ?config.strategy,
        cycle = ?config.cycle,
        "starting housing calendar run"
    );
    let report = pipeline.run(&config.server_ids, Utc::now());

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "run finished"
    );
}

fn init_tracing(log_file: Option<&Path>) -> Result<(), PipelineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "house_calendar=info".into());

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }

    Ok(())
}
