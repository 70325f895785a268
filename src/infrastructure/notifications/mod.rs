pub mod email;
pub mod telegram;
pub mod whatsapp;

pub use email::EmailChannel;
pub use telegram::TelegramChannel;
pub use whatsapp::WhatsAppChannel;
