use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use vilert::application::config::AppConfig;
use vilert::application::services::dispatch::AlertDispatcher;
use vilert::application::services::ingest::IngestService;
use vilert::domain::ports::channel::NotificationChannel;
use vilert::domain::ports::device_registry::DeviceRegistry;
use vilert::domain::ports::reading_store::ReadingStore;
use vilert::domain::rules::{default_rules, RuleEngine};
use vilert::infrastructure::mqtt::subscriber::MqttSubscriber;
use vilert::infrastructure::notifications::email::EmailChannel;
use vilert::infrastructure::notifications::telegram::TelegramChannel;
use vilert::infrastructure::notifications::whatsapp::WhatsAppChannel;
use vilert::infrastructure::persistence::sqlite_store::SqliteStore;
use vilert::presentation::cli::app::Cli;
use vilert::presentation::cli::commands::serve::run_serve;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  VILERT — Telemetry Alerting".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build every channel the configuration enables. A channel that fails to
/// initialize is skipped with a warning rather than aborting startup.
fn build_channels(config: &AppConfig) -> Vec<Arc<dyn NotificationChannel>> {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();

    if let Some(ref bot_token) = config.telegram.bot_token {
        match TelegramChannel::new(bot_token.clone()) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => tracing::warn!("Telegram channel disabled: {e}"),
        }
    }

    if let (Some(sid), Some(token), Some(from)) = (
        config.twilio.account_sid.clone(),
        config.twilio.auth_token.clone(),
        config.twilio.from_number.clone(),
    ) {
        match WhatsAppChannel::new(sid, token, from) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => tracing::warn!("WhatsApp channel disabled: {e}"),
        }
    }

    if let Some(ref host) = config.smtp.host {
        let credentials = match (config.smtp.username.clone(), config.smtp.password.clone()) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        };
        match EmailChannel::new(
            host,
            config.smtp.port,
            credentials,
            config.smtp.from_address.clone(),
        ) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => tracing::warn!("Email channel disabled: {e}"),
        }
    }

    if channels.is_empty() {
        tracing::warn!("No notification channels configured; breaches will only be logged");
    }

    channels
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    print_banner();

    // Manual DI — main.rs is the only place that knows concrete types
    let store = Arc::new(SqliteStore::new(&config.database.path)?);

    let cooldown_secs =
        i64::try_from(config.alerts.cooldown_secs).context("alerts.cooldown_secs out of range")?;
    let offline_secs = i64::try_from(config.liveness.offline_after_secs)
        .context("liveness.offline_after_secs out of range")?;

    let dispatcher = AlertDispatcher::new(
        build_channels(&config),
        config.recipients.clone(),
        chrono::Duration::seconds(cooldown_secs),
    );

    let service = Arc::new(IngestService::new(
        Arc::clone(&store) as Arc<dyn ReadingStore>,
        Arc::clone(&store) as Arc<dyn DeviceRegistry>,
        RuleEngine::new(default_rules()),
        dispatcher,
        chrono::Duration::seconds(offline_secs),
    ));

    let subscriber = MqttSubscriber::new(&config.mqtt);
    tracing::info!(
        "Broker {}:{}, topic filter {}",
        config.mqtt.host,
        config.mqtt.port,
        subscriber.data_topic_filter()
    );
    tracing::info!(
        "{} recipient(s), cooldown {}s, offline after {}s",
        config.recipients.len(),
        config.alerts.cooldown_secs,
        config.liveness.offline_after_secs
    );

    run_serve(
        service,
        subscriber,
        Duration::from_secs(config.liveness.sweep_interval_secs),
    )
    .await
}
