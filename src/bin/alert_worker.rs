//! Alert worker
//!
//! Consumes the alert queue and prints one line per message. Runs until killed.

use env_logger::Env;

use b3_dashboard::config::AppConfig;
use b3_dashboard::services::alert_service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, report) = AppConfig::load();

    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    report.log();

    log::info!(
        "Connecting to broker, queue {}",
        config.broker.queue
    );
    println!("Waiting for notifications...");

    alert_service::run_consumer(&config.broker).await?;
    Ok(())
}
