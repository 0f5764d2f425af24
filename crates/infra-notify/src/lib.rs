// Upkeep Infrastructure - Chat Notifiers
// Implements: Notifier (TelegramNotifier, LogNotifier)

mod log_sink;
mod telegram;

pub use log_sink::LogNotifier;
pub use telegram::{TelegramNotifier, DEFAULT_API_URL};
