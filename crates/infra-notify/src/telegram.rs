//! Telegram Bot API notifier
//!
//! `POST {api}/bot{token}/sendMessage` with `parse_mode=Markdown`. A delivery
//! counts as sent only when the HTTP status is 2xx and the body says `"ok": true`.
//! Texts over the API's length limit go out as several messages, split between
//! entries, and count as sent only when every part is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use upkeep_core::port::{NotifyError, Notifier};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const PARSE_MODE: &str = "Markdown";

/// sendMessage text limit, in characters
pub(crate) const MAX_MESSAGE_CHARS: usize = 4096;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Split `text` into parts of at most `limit` chars
///
/// Parts break between blank-line separated blocks. A block longer than
/// `limit` on its own is cut at char boundaries.
pub(crate) fn split_message(text: &str, limit: usize) -> Vec<String> {
    let separator_len = BLOCK_SEPARATOR.chars().count();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for block in text.split(BLOCK_SEPARATOR) {
        for piece in cut_block(block, limit) {
            let piece_len = piece.chars().count();
            if current_len > 0 && current_len + separator_len + piece_len > limit {
                parts.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push_str(BLOCK_SEPARATOR);
                current_len += separator_len;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }
    if current_len > 0 || parts.is_empty() {
        parts.push(current);
    }
    parts
}

fn cut_block(block: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = block.chars().collect();
    if chars.len() <= limit || limit == 0 {
        return vec![block.to_string()];
    }
    chars.chunks(limit).map(|chunk| chunk.iter().collect()).collect()
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl TelegramNotifier {
    /// Build a notifier for one bot; `timeout` bounds each delivery
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let parts = split_message(text, MAX_MESSAGE_CHARS);
        if parts.len() > 1 {
            debug!(chat_id = %chat_id, parts = parts.len(), "Long message split");
        }
        for part in &parts {
            self.send_part(chat_id, part).await?;
        }
        Ok(())
    }
}

impl TelegramNotifier {
    async fn send_part(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
        };

        // Errors never include the endpoint: it carries the bot token
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => {
                debug!(chat_id = %chat_id, "Message delivered");
                Ok(())
            }
            Some(api) => {
                let description = api
                    .description
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
                warn!(
                    chat_id = %chat_id,
                    status = status.as_u16(),
                    %description,
                    "Message rejected"
                );
                Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    description,
                })
            }
            None if status.is_success() => Err(NotifyError::Transport(
                "unreadable response from chat service".to_string(),
            )),
            None => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: status.canonical_reason().unwrap_or("").to_string(),
            }),
        }
    }
}
