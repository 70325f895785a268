#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;

use vilert::application::services::dispatch::AlertDispatcher;
use vilert::application::services::ingest::IngestService;
use vilert::domain::entities::device::DeviceThresholds;
use vilert::domain::ports::channel::{ChannelError, NotificationChannel};
use vilert::domain::ports::device_registry::DeviceRegistry;
use vilert::domain::ports::reading_store::{InsertOutcome, ReadingStore};
use vilert::domain::rules::{default_rules, RuleEngine};
use vilert::domain::value_objects::{ChannelKind, DeviceStatus};
use vilert::infrastructure::mqtt::decoder;
use vilert::infrastructure::persistence::in_memory::InMemoryStore;

struct RecordingChannel {
    kind: ChannelKind,
    count: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl RecordingChannel {
    fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            count: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn last_message(&self) -> Option<String> {
        self.messages.lock().expect("lock").last().cloned()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, _address: &str, message: &str) -> Result<(), ChannelError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().expect("lock").push(message.to_string());
        Ok(())
    }
}

fn recipient_with_chat_id(chat_id: &str) -> vilert::domain::entities::recipient::Recipient {
    vilert::domain::entities::recipient::Recipient {
        chat_id: Some(chat_id.to_string()),
        ..Default::default()
    }
}

fn bounded_device(device_id: &str) -> DeviceThresholds {
    DeviceThresholds {
        hum_min: Some(30.0),
        hum_max: Some(70.0),
        temp_min: Some(10.0),
        temp_max: Some(40.0),
        ..DeviceThresholds::unbounded(device_id)
    }
}

fn make_service(
    store: &Arc<InMemoryStore>,
    channel: &Arc<RecordingChannel>,
) -> IngestService {
    IngestService::new(
        Arc::clone(store) as Arc<dyn ReadingStore>,
        Arc::clone(store) as Arc<dyn DeviceRegistry>,
        RuleEngine::new(default_rules()),
        AlertDispatcher::new(
            vec![Arc::clone(channel) as Arc<dyn NotificationChannel>],
            vec![recipient_with_chat_id("42")],
            Duration::seconds(120),
        ),
        Duration::seconds(60),
    )
}

fn payload(timestamp: &str, humidity: f64, temperature: f64) -> Vec<u8> {
    format!(
        r#"{{"timestamp": "{timestamp}", "humidity": {humidity}, "temperature": {temperature}}}"#
    )
    .into_bytes()
}

#[tokio::test]
async fn in_range_message_is_stored_marked_online_and_silent() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(bounded_device("dev-1"));
    let channel = Arc::new(RecordingChannel::new(ChannelKind::Chat));
    let service = make_service(&store, &channel);

    let reading = decoder::decode(
        "vilert",
        "vilert/dev-1/data",
        &payload("15/03/2024 10:30:00", 50.0, 20.0),
    )
    .expect("decode")
    .expect("data message");

    let report = service.handle_reading(reading).await;
    assert_eq!(report.stored, Some(InsertOutcome::Inserted));
    assert_eq!(report.breaches, 0);

    assert_eq!(store.reading_count(), 1);
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Online));
    assert_eq!(channel.sent(), 0);
}

#[tokio::test]
async fn breaching_message_alerts_with_aggregated_text() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(bounded_device("dev-1"));
    let channel = Arc::new(RecordingChannel::new(ChannelKind::Chat));
    let service = make_service(&store, &channel);

    let reading = decoder::decode(
        "vilert",
        "vilert/dev-1/data",
        &payload("15/03/2024 10:30:00", 20.0, 45.0),
    )
    .expect("decode")
    .expect("data message");

    let report = service.handle_reading(reading).await;
    assert_eq!(report.breaches, 2);
    assert_eq!(channel.sent(), 1);

    let message = channel.last_message().expect("one message");
    assert!(message.contains("dev-1"));
    assert!(message.contains("humidity"));
    assert!(message.contains("below minimum"));
    assert!(message.contains("temperature"));
    assert!(message.contains("above maximum"));
}

#[tokio::test]
async fn redelivered_message_stores_once() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(bounded_device("dev-1"));
    let channel = Arc::new(RecordingChannel::new(ChannelKind::Chat));
    let service = make_service(&store, &channel);

    let raw = payload("15/03/2024 10:30:00", 50.0, 20.0);
    for _ in 0..3 {
        let reading = decoder::decode("vilert", "vilert/dev-1/data", &raw)
            .expect("decode")
            .expect("data message");
        service.handle_reading(reading).await;
    }

    // At-least-once delivery: one row despite three deliveries
    assert_eq!(store.reading_count(), 1);
}

#[tokio::test]
async fn unregistered_device_stores_but_never_alerts() {
    let store = Arc::new(InMemoryStore::new());
    let channel = Arc::new(RecordingChannel::new(ChannelKind::Chat));
    let service = make_service(&store, &channel);

    let reading = decoder::decode(
        "vilert",
        "vilert/ghost/data",
        &payload("15/03/2024 10:30:00", 0.0, 100.0),
    )
    .expect("decode")
    .expect("data message");

    let report = service.handle_reading(reading).await;
    assert_eq!(report.stored, Some(InsertOutcome::Inserted));
    assert!(!report.evaluated);
    assert_eq!(store.reading_count(), 1);
    assert_eq!(channel.sent(), 0);
}

#[tokio::test]
async fn null_bounds_never_alert() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(DeviceThresholds::unbounded("dev-1"));
    let channel = Arc::new(RecordingChannel::new(ChannelKind::Chat));
    let service = make_service(&store, &channel);

    let reading = decoder::decode(
        "vilert",
        "vilert/dev-1/data",
        &payload("15/03/2024 10:30:00", -100.0, 1000.0),
    )
    .expect("decode")
    .expect("data message");

    let report = service.handle_reading(reading).await;
    assert_eq!(report.breaches, 0);
    assert_eq!(channel.sent(), 0);
}
