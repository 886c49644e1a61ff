//! Chat history records and their backing document
//!
//! Messages live oldest-first in `chat.json`. The one ordering rule
//! that matters: an agent reply's timestamp is strictly greater than
//! the newest message at the time the reply is written, even when the
//! wall clock has not advanced past it.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::server::config;
use crate::server::models::store;

pub const SENDER_USER: &str = "user";
pub const SENDER_AGENT: &str = "agent";

/// One chat transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
  pub id: String,

  /// "user" or "agent"
  pub sender: String,

  pub text: String,

  pub created_at: DateTime<Utc>,

  /// Presentation hint, persisted verbatim
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,

  /// Attached GIF URL, persisted verbatim
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gif: Option<String>,
}

impl ChatMessage {
  pub fn new(sender: &str, text: &str, created_at: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      sender: sender.to_string(),
      text: text.to_string(),
      created_at,
      kind: None,
      gif: None,
    }
  }
}

/// Timestamp for a reply to the given history: now, pushed forward when
/// the newest message is at or past it.
pub fn reply_timestamp(history: &[ChatMessage]) -> DateTime<Utc> {
  let now = Utc::now();
  match history.last() {
    Some(last) if last.created_at >= now => last.created_at + Duration::milliseconds(1),
    _ => now,
  }
}

/// Render the last `limit` messages as a `User:`/`Agent:` transcript
/// for prompt context.
pub fn transcript_tail(history: &[ChatMessage], limit: usize) -> String {
  let start = history.len().saturating_sub(limit);
  history[start..]
    .iter()
    .map(|message| {
      let speaker = if message.sender == SENDER_USER { "User" } else { "Agent" };
      format!("{speaker}: {}", message.text)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

// Document operations
// ===================

// Serializes writers to chat.json within this process
static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Full chat history, oldest first.
pub async fn history() -> Result<Vec<ChatMessage>> {
  let _guard = LOCK.lock().await;
  store::read_array(&config::chat_path()?)
}

/// Append one message.
pub async fn append(message: ChatMessage) -> Result<ChatMessage> {
  let _guard = LOCK.lock().await;
  let path = config::chat_path()?;
  let mut history: Vec<ChatMessage> = store::read_array(&path)?;
  history.push(message.clone());
  store::write_array(&path, &history)?;
  Ok(message)
}

/// Append an agent reply, timestamped after the current newest message,
/// in a single read-modify-write.
pub async fn append_reply(text: &str) -> Result<ChatMessage> {
  let _guard = LOCK.lock().await;
  let path = config::chat_path()?;
  let mut history: Vec<ChatMessage> = store::read_array(&path)?;
  let message = ChatMessage::new(SENDER_AGENT, text, reply_timestamp(&history));
  history.push(message.clone());
  store::write_array(&path, &history)?;
  Ok(message)
}

/// Replace the body of an existing message.
pub async fn edit_text(id: &str, text: &str) -> Result<ChatMessage> {
  let _guard = LOCK.lock().await;
  let path = config::chat_path()?;
  let mut history: Vec<ChatMessage> = store::read_array(&path)?;
  let message = history
    .iter_mut()
    .find(|message| message.id == id)
    .ok_or_else(|| anyhow!("message {id} not found"))?;
  message.text = text.to_string();
  let updated = message.clone();
  store::write_array(&path, &history)?;
  Ok(updated)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reply_timestamp_moves_past_future_messages() {
    let ahead = Utc::now() + Duration::seconds(30);
    let history = vec![ChatMessage::new(SENDER_USER, "hi", ahead)];

    let reply_at = reply_timestamp(&history);
    assert!(reply_at > ahead);
    assert_eq!(reply_at, ahead + Duration::milliseconds(1));
  }

  #[test]
  fn reply_timestamp_uses_now_for_past_history() {
    let behind = Utc::now() - Duration::seconds(30);
    let history = vec![ChatMessage::new(SENDER_USER, "hi", behind)];

    let reply_at = reply_timestamp(&history);
    assert!(reply_at > behind + Duration::seconds(29));
  }

  #[test]
  fn transcript_tail_labels_speakers_and_limits() {
    let now = Utc::now();
    let history = vec![
      ChatMessage::new(SENDER_USER, "one", now),
      ChatMessage::new(SENDER_AGENT, "two", now),
      ChatMessage::new(SENDER_USER, "three", now),
    ];

    let tail = transcript_tail(&history, 2);
    assert_eq!(tail, "Agent: two\nUser: three");

    let all = transcript_tail(&history, 10);
    assert!(all.starts_with("User: one\n"));
  }
}
