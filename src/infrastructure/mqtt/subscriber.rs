use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::application::config::MqttConfig;
use crate::application::services::ingest::IngestService;

use super::decoder;

/// Pause before polling again after a connection-level error. The event
/// loop reconnects on its own; this only keeps a dead broker from spinning
/// the loop hot.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// MQTT consumer bound to the `<namespace>/+/data` filter.
///
/// Each inbound publish is handled in its own task over the shared ingest
/// service, so one slow handler never stalls the event loop; per-device
/// state inside the service is synchronized by the service itself.
pub struct MqttSubscriber {
    client: AsyncClient,
    event_loop: EventLoop,
    namespace: String,
}

impl MqttSubscriber {
    /// Build the client and event loop. No network activity happens until
    /// [`run`](Self::run) starts polling.
    #[must_use]
    pub fn new(config: &MqttConfig) -> Self {
        let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(30));
        let (client, event_loop) = AsyncClient::new(options, 64);

        Self {
            client,
            event_loop,
            namespace: config.namespace.clone(),
        }
    }

    /// Topic filter consumed by this service.
    #[must_use]
    pub fn data_topic_filter(&self) -> String {
        format!("{}/+/{}", self.namespace, decoder::DATA_SUBTYPE)
    }

    /// Handle used to disconnect on shutdown.
    #[must_use]
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Drive the event loop until the surrounding task is cancelled.
    ///
    /// Subscribes on every ConnAck so a broker reconnect restores the
    /// subscription. Decode failures drop the message; transport errors log
    /// and back off. Nothing in here returns — the loop survives every
    /// per-message failure by design of the error policy.
    pub async fn run(mut self, service: Arc<IngestService>) {
        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!("Connected to MQTT broker");
                    let filter = self.data_topic_filter();
                    if let Err(e) = self
                        .client
                        .subscribe(filter.as_str(), QoS::AtLeastOnce)
                        .await
                    {
                        tracing::error!("Failed to subscribe to {filter}: {e}");
                    } else {
                        tracing::info!("Subscribed to {filter}");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let service = Arc::clone(&service);
                    let namespace = self.namespace.clone();
                    tokio::spawn(async move {
                        handle_publish(&namespace, &publish.topic, &publish.payload, &service)
                            .await;
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("MQTT connection error: {e}");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }
}

/// Decode one inbound message and run it through the ingest pipeline.
/// Never propagates an error: undecodable messages are logged and dropped.
async fn handle_publish(namespace: &str, topic: &str, payload: &[u8], service: &IngestService) {
    match decoder::decode(namespace, topic, payload) {
        Ok(Some(reading)) => {
            service.handle_reading(reading).await;
        }
        Ok(None) => {
            tracing::debug!("Ignoring non-data message on {topic}");
        }
        Err(e) => {
            tracing::warn!("Dropping undecodable message on {topic}: {e}");
        }
    }
}
