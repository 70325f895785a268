//! vilert — IoT telemetry ingestion and alerting.
//!
//! Consumes humidity/temperature readings over MQTT, persists them
//! idempotently, tracks device liveness, evaluates per-device threshold
//! breaches, and fans out cooldown-suppressed alerts across notification
//! channels.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
