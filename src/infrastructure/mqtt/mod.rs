pub mod decoder;
pub mod subscriber;

pub use decoder::{decode, DecodeError};
pub use subscriber::MqttSubscriber;
