pub mod channel;
pub mod device_registry;
pub mod reading_store;

pub use channel::{ChannelError, NotificationChannel};
pub use device_registry::{DeviceRegistry, RegistryError};
pub use reading_store::{InsertOutcome, ReadingStore, StoreError};
