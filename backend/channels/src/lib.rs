pub mod telegram;

pub use telegram::{best_photo, PhotoSize, TelegramClient, TelegramMessage, TelegramUpdate};
