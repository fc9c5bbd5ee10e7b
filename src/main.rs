use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tasky::appsettings::AppSettings;
use tasky::dispatch::SmsRelayDispatcher;
use tasky::scheduler::TaskScheduler;
use tasky::signal::LogStatusSignal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load().context("Could not load settings")?;
    let dispatcher = SmsRelayDispatcher::new(
        settings.relay.url,
        Duration::from_secs(settings.relay.timeout_secs),
    )?;

    let scheduler = TaskScheduler::start(Arc::new(dispatcher), Arc::new(LogStatusSignal));
    log::info!("Reminder scheduler running");

    // Ingestion collaborators hold the scheduler reference and feed it
    // drafts; this process keeps the loop alive until interrupted.
    tokio::signal::ctrl_c()
        .await
        .context("Could not listen for shutdown signal")?;

    log::info!("Shutting down");
    scheduler.shutdown().await;

    Ok(())
}
