pub mod breach;
pub mod device;
pub mod reading;
pub mod recipient;

pub use breach::BreachDescriptor;
pub use device::DeviceThresholds;
pub use reading::Reading;
pub use recipient::Recipient;
