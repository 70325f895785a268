pub mod channel_kind;
pub mod device_status;
pub mod metric;

pub use channel_kind::ChannelKind;
pub use device_status::DeviceStatus;
pub use metric::{BreachDirection, Metric};
