pub mod dispatch;
pub mod ingest;
pub mod liveness;

pub use dispatch::{AlertDispatcher, CooldownStore};
pub use ingest::{IngestReport, IngestService};
pub use liveness::LivenessTracker;
