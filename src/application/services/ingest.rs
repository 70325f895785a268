use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::dispatch::AlertDispatcher;
use super::liveness::LivenessTracker;
use crate::domain::entities::reading::Reading;
use crate::domain::ports::device_registry::{DeviceRegistry, RegistryError};
use crate::domain::ports::reading_store::{InsertOutcome, ReadingStore};
use crate::domain::rules::RuleEngine;
use crate::domain::value_objects::DeviceStatus;

/// What happened to a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// `None` when the store rejected the insert and the reading was dropped.
    pub stored: Option<InsertOutcome>,
    /// False when the device is unregistered or the reading was dropped
    /// before evaluation.
    pub evaluated: bool,
    /// Number of breach descriptors produced.
    pub breaches: usize,
}

/// Orchestrates one reading through the pipeline:
/// store → liveness → threshold evaluation → alert dispatch.
///
/// Owns the in-process liveness and cooldown state; a single instance is
/// shared (via `Arc`) between all message handlers and the sweep timer, so
/// every mutation of that state goes through its synchronized maps.
pub struct IngestService {
    store: Arc<dyn ReadingStore>,
    registry: Arc<dyn DeviceRegistry>,
    rule_engine: RuleEngine,
    liveness: LivenessTracker,
    dispatcher: AlertDispatcher,
    offline_after: Duration,
}

impl IngestService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ReadingStore>,
        registry: Arc<dyn DeviceRegistry>,
        rule_engine: RuleEngine,
        dispatcher: AlertDispatcher,
        offline_after: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            rule_engine,
            liveness: LivenessTracker::new(),
            dispatcher,
            offline_after,
        }
    }

    /// Process one decoded reading. Never fails: every per-unit error is
    /// logged and the unit dropped, so the consumer loop always survives.
    pub async fn handle_reading(&self, reading: Reading) -> IngestReport {
        let device_id = reading.device_id.clone();

        let outcome = match self.store.insert_if_absent(&reading) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Failed to store reading for {device_id}: {e}");
                return IngestReport {
                    stored: None,
                    evaluated: false,
                    breaches: 0,
                };
            }
        };

        if outcome == InsertOutcome::AlreadyPresent {
            tracing::debug!(
                "Duplicate reading {} absorbed by conditional insert",
                reading.storage_key()
            );
        }

        // Liveness is keyed by arrival wall clock, not the reading's own
        // timestamp; duplicates still prove the device is publishing.
        self.liveness.touch(&device_id, reading.received_at);

        let thresholds = match self.registry.get_thresholds(&device_id) {
            Ok(Some(thresholds)) => thresholds,
            Ok(None) => {
                tracing::warn!("Reading from unregistered device {device_id}; skipping evaluation");
                return IngestReport {
                    stored: Some(outcome),
                    evaluated: false,
                    breaches: 0,
                };
            }
            Err(e) => {
                tracing::warn!("Threshold lookup failed for {device_id}: {e}");
                return IngestReport {
                    stored: Some(outcome),
                    evaluated: false,
                    breaches: 0,
                };
            }
        };

        if thresholds.status != DeviceStatus::Online {
            match self.registry.set_status(&device_id, DeviceStatus::Online) {
                Ok(()) => tracing::info!("Device {device_id} is back online"),
                Err(e) => tracing::warn!("Failed to mark {device_id} online: {e}"),
            }
        }

        let breaches = self.rule_engine.evaluate(&reading, &thresholds);
        if !breaches.is_empty() {
            tracing::warn!(
                "Device {device_id}: {} threshold breach(es) detected",
                breaches.len()
            );
        }

        self.dispatcher.dispatch(&device_id, &breaches).await;

        IngestReport {
            stored: Some(outcome),
            evaluated: true,
            breaches: breaches.len(),
        }
    }

    /// One sweep tick: mark every stale device offline, exactly once.
    ///
    /// Returns the number of devices transitioned. Devices never seen since
    /// process start are left untouched; devices already stored as offline
    /// get no redundant write.
    pub fn sweep_once(&self, now: DateTime<Utc>) -> usize {
        let mut transitioned = 0;
        for device_id in self.liveness.stale_devices(now, self.offline_after) {
            match self.registry.get_thresholds(&device_id) {
                Ok(Some(thresholds)) if thresholds.status == DeviceStatus::Offline => {}
                Ok(Some(_)) => match self.registry.set_status(&device_id, DeviceStatus::Offline) {
                    Ok(()) => {
                        tracing::info!("Device {device_id} marked offline (no data since {:?})",
                            self.liveness.last_seen(&device_id));
                        transitioned += 1;
                    }
                    Err(RegistryError::DeviceNotFound(_)) => {
                        tracing::debug!("Device {device_id} vanished from registry during sweep");
                    }
                    Err(e) => tracing::warn!("Failed to mark {device_id} offline: {e}"),
                },
                Ok(None) => {
                    tracing::debug!("Stale device {device_id} is no longer registered");
                }
                Err(e) => tracing::warn!("Status lookup failed for {device_id}: {e}"),
            }
        }
        transitioned
    }

    /// The tracker backing liveness decisions (test introspection).
    #[must_use]
    pub fn liveness(&self) -> &LivenessTracker {
        &self.liveness
    }
}
