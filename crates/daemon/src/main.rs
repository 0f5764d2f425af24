//! Upkeep Maintenance Scheduler - Main Entry Point
//!
//! Daily reminder digests and audit reports over the maintenance window store.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use upkeep_core::application::trigger::constants::STOP_GRACE_PERIOD;
use upkeep_core::application::{
    AuditJob, JobTrigger, MaintenanceWindowService, ReminderJob, ScheduledJob,
};
use upkeep_core::port::id_provider::UuidProvider;
use upkeep_core::port::time_provider::SystemTimeProvider;
use upkeep_core::port::{Notifier, TimeProvider};
use upkeep_infra_notify::{LogNotifier, TelegramNotifier};
use upkeep_infra_report::PdfReportRenderer;
use upkeep_infra_sqlite::{
    create_pool, run_migrations, SqliteContactProvider, SqliteFindingReportSource,
    SqliteWindowRepository,
};

use crate::config::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (fails fast on bad times/zones)
    let settings = Settings::load().context("invalid configuration")?;

    // 2. Initialize logging
    telemetry::init_logging(settings.log_format)?;

    info!(
        environment = %settings.environment,
        timezone = %settings.timezone,
        "Upkeep scheduler v{} starting...",
        VERSION
    );

    // 3. Initialize database
    if let Some(parent) = Path::new(&settings.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }
    info!(db_path = %settings.db_path, "Initializing database...");

    let pool = create_pool(&settings.database_url())
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider::new(settings.timezone));
    let window_repo = Arc::new(SqliteWindowRepository::new(pool.clone()));
    let window_service = Arc::new(MaintenanceWindowService::new(
        window_repo.clone(),
        window_repo,
        Arc::new(UuidProvider),
        time_provider.clone(),
    ));

    let notifier: Arc<dyn Notifier> = match &settings.telegram {
        Some(telegram) => {
            info!(api_url = %telegram.api_url, "Using Telegram notifier");
            Arc::new(
                TelegramNotifier::new(
                    &telegram.api_url,
                    &telegram.bot_token,
                    settings.notify_timeout,
                )
                .map_err(|e| anyhow::anyhow!("Notifier setup failed: {}", e))?,
            )
        }
        None => {
            info!("No bot token configured, notifications are only logged");
            Arc::new(LogNotifier::new())
        }
    };

    let reminder: Arc<dyn ScheduledJob> = Arc::new(ReminderJob::new(
        window_service,
        Arc::new(SqliteContactProvider::new(pool.clone())),
        notifier,
        settings.notify_concurrency,
    ));
    let audit: Arc<dyn ScheduledJob> = Arc::new(AuditJob::new(
        Arc::new(SqliteFindingReportSource::new(pool.clone())),
        Arc::new(PdfReportRenderer::new(settings.timezone)),
        time_provider.clone(),
        settings.report_dir.clone(),
    ));

    // 5. Start job trigger
    let mut trigger = JobTrigger::new(time_provider)
        .daily(settings.reminder_time, reminder)
        .daily(settings.audit_time, audit);
    if !settings.is_production() {
        info!(delay = ?settings.startup_delay, "Startup verification run enabled");
        trigger = trigger.with_startup_run(settings.startup_delay);
    }
    let running = trigger.start();

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!(grace = ?STOP_GRACE_PERIOD, "Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    running.stop().await;
    pool.close().await;
    telemetry::shutdown();

    info!("Shutdown complete.");

    Ok(())
}
