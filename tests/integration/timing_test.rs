#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use vilert::application::services::dispatch::AlertDispatcher;
use vilert::application::services::ingest::IngestService;
use vilert::domain::entities::breach::BreachDescriptor;
use vilert::domain::entities::device::DeviceThresholds;
use vilert::domain::entities::reading::Reading;
use vilert::domain::entities::recipient::Recipient;
use vilert::domain::ports::channel::{ChannelError, NotificationChannel};
use vilert::domain::ports::device_registry::DeviceRegistry;
use vilert::domain::ports::reading_store::ReadingStore;
use vilert::domain::rules::{default_rules, RuleEngine};
use vilert::domain::value_objects::{BreachDirection, ChannelKind, DeviceStatus, Metric};
use vilert::infrastructure::persistence::in_memory::InMemoryStore;

struct CountingChannel {
    count: AtomicUsize,
}

impl CountingChannel {
    fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    fn sent(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationChannel for CountingChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Chat
    }

    fn name(&self) -> &'static str {
        "counting"
    }

    async fn send(&self, _address: &str, _message: &str) -> Result<(), ChannelError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn breach() -> Vec<BreachDescriptor> {
    vec![BreachDescriptor {
        metric: Metric::Humidity,
        value: 20.0,
        bound: 30.0,
        direction: BreachDirection::BelowMin,
    }]
}

fn make_dispatcher(channel: &Arc<CountingChannel>) -> AlertDispatcher {
    AlertDispatcher::new(
        vec![Arc::clone(channel) as Arc<dyn NotificationChannel>],
        vec![Recipient {
            chat_id: Some("42".to_string()),
            ..Default::default()
        }],
        Duration::seconds(120),
    )
}

// Cooldown: with a 120s window, a breach at t=0 sends, an identical breach
// at t=10s is suppressed, and a breach at t=130s sends again.
#[tokio::test]
async fn cooldown_window_suppresses_then_reopens() {
    let channel = Arc::new(CountingChannel::new());
    let dispatcher = make_dispatcher(&channel);

    dispatcher.dispatch_at("dev-1", &breach(), at(0)).await;
    assert_eq!(channel.sent(), 1);

    dispatcher.dispatch_at("dev-1", &breach(), at(10)).await;
    assert_eq!(channel.sent(), 1);

    dispatcher.dispatch_at("dev-1", &breach(), at(130)).await;
    assert_eq!(channel.sent(), 2);
}

// Cooldown reset: a breach-free evaluation immediately followed by a breach
// alerts without waiting for any prior cooldown to elapse.
#[tokio::test]
async fn recovery_resets_cooldown_immediately() {
    let channel = Arc::new(CountingChannel::new());
    let dispatcher = make_dispatcher(&channel);

    dispatcher.dispatch_at("dev-1", &breach(), at(0)).await;
    assert_eq!(channel.sent(), 1);

    dispatcher.dispatch_at("dev-1", &[], at(5)).await;
    dispatcher.dispatch_at("dev-1", &breach(), at(6)).await;
    assert_eq!(channel.sent(), 2);
}

#[tokio::test]
async fn cooldowns_are_independent_across_devices() {
    let channel = Arc::new(CountingChannel::new());
    let dispatcher = make_dispatcher(&channel);

    dispatcher.dispatch_at("dev-1", &breach(), at(0)).await;
    dispatcher.dispatch_at("dev-2", &breach(), at(1)).await;
    assert_eq!(channel.sent(), 2);
}

fn make_service(store: &Arc<InMemoryStore>) -> IngestService {
    IngestService::new(
        Arc::clone(store) as Arc<dyn ReadingStore>,
        Arc::clone(store) as Arc<dyn DeviceRegistry>,
        RuleEngine::new(default_rules()),
        AlertDispatcher::new(vec![], vec![], Duration::seconds(120)),
        Duration::seconds(60),
    )
}

fn reading_at(device_id: &str, secs: i64) -> Reading {
    Reading {
        device_id: device_id.to_string(),
        humidity: 50.0,
        temperature: 20.0,
        event_timestamp: at(secs),
        received_at: at(secs),
    }
}

// Offline sweep: offline_threshold=60s, last reading at t=0; sweep ticks at
// t=30s (no change) and t=90s (offline exactly once); a further sweep at
// t=120s issues no redundant write.
#[tokio::test]
async fn sweep_timeline_marks_offline_exactly_once() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(DeviceThresholds::unbounded("dev-1"));
    let service = make_service(&store);

    service.handle_reading(reading_at("dev-1", 0)).await;
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Online));
    let baseline_writes = store.status_writes();

    assert_eq!(service.sweep_once(at(30)), 0);
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Online));
    assert_eq!(store.status_writes(), baseline_writes);

    assert_eq!(service.sweep_once(at(90)), 1);
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Offline));
    assert_eq!(store.status_writes(), baseline_writes + 1);

    assert_eq!(service.sweep_once(at(120)), 0);
    assert_eq!(store.status_writes(), baseline_writes + 1);
}

// Online transition: first reading after an offline period flips status to
// online exactly once; a second immediate reading does not re-issue the write.
#[tokio::test]
async fn online_transition_writes_exactly_once() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(DeviceThresholds::unbounded("dev-1"));
    let service = make_service(&store);

    service.handle_reading(reading_at("dev-1", 0)).await;
    service.sweep_once(at(90));
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Offline));
    let writes_before = store.status_writes();

    service.handle_reading(reading_at("dev-1", 100)).await;
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Online));
    assert_eq!(store.status_writes(), writes_before + 1);

    service.handle_reading(reading_at("dev-1", 101)).await;
    assert_eq!(store.status_writes(), writes_before + 1);
}

// A reading keeps a device online across sweeps as long as it stays fresh.
#[tokio::test]
async fn fresh_readings_prevent_offline_transition() {
    let store = Arc::new(InMemoryStore::new());
    store.upsert_device(DeviceThresholds::unbounded("dev-1"));
    let service = make_service(&store);

    service.handle_reading(reading_at("dev-1", 0)).await;
    service.handle_reading(reading_at("dev-1", 50)).await;

    assert_eq!(service.sweep_once(at(80)), 0);
    assert_eq!(store.status_of("dev-1"), Some(DeviceStatus::Online));
}
