pub mod campaign;
pub mod chat;
pub mod recipient;

pub use self::campaign::{PersonalizationMode, PersonalizedEmail, SendResult};
pub use self::chat::{ChatLog, ChatMessage, ChatRole};
pub use self::recipient::{email::Email, Recipient};
