use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::services::ingest::IngestService;
use crate::infrastructure::mqtt::subscriber::MqttSubscriber;

/// Run the service: broker consumer task plus the periodic offline sweep.
///
/// The sweep timer is independent of message arrival and uses
/// [`tokio::time::MissedTickBehavior::Skip`] so a long pause (suspend,
/// debugger) does not burst-fire missed ticks. The loop runs until it
/// receives a SIGINT (Ctrl+C) via [`tokio::signal::ctrl_c()`], then closes
/// the broker connection and stops the consumer. Note: SIGTERM is **not**
/// handled — if systemd or container orchestration requires SIGTERM
/// support, add a handler via `tokio::signal::unix::signal(SignalKind::terminate())`.
///
/// # Errors
///
/// Currently infallible in practice; the `Result` keeps the signature
/// aligned with the application boundary.
pub async fn run_serve(
    service: Arc<IngestService>,
    subscriber: MqttSubscriber,
    sweep_interval: Duration,
) -> anyhow::Result<()> {
    tracing::info!("Service started (sweep interval: {}s)", sweep_interval.as_secs());

    let client = subscriber.client();
    let consumer = tokio::spawn(subscriber.run(Arc::clone(&service)));

    let mut interval = tokio::time::interval(sweep_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let transitioned = service.sweep_once(Utc::now());
                if transitioned > 0 {
                    tracing::info!("Sweep marked {transitioned} device(s) offline");
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, closing broker connection...");
                break;
            }
        }
    }

    if let Err(e) = client.disconnect().await {
        tracing::warn!("MQTT disconnect failed: {e}");
    }
    consumer.abort();
    Ok(())
}
