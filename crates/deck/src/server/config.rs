//! Environment-driven configuration
//!
//! All knobs are plain environment variables so the server, the CLI,
//! and the tests can point at isolated roots without a config file.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

/// Root directory for persisted data (`DECK_ROOT`, default `~/.ideadeck`).
pub fn data_root() -> Result<PathBuf> {
  if let Ok(dir) = env::var("DECK_ROOT") {
    return Ok(PathBuf::from(dir));
  }
  let home = dirs::home_dir().ok_or_else(|| anyhow!("failed to determine home directory"))?;
  Ok(home.join(".ideadeck"))
}

/// Directory for uploaded images and transient capture files.
pub fn uploads_dir() -> Result<PathBuf> {
  Ok(data_root()?.join("uploads"))
}

/// Backing file for the server journal.
pub fn journal_path() -> Result<PathBuf> {
  Ok(data_root()?.join("server-logs.jsonl"))
}

pub fn ideas_path() -> Result<PathBuf> {
  Ok(data_root()?.join("ideas.json"))
}

pub fn chat_path() -> Result<PathBuf> {
  Ok(data_root()?.join("chat.json"))
}

pub fn tags_path() -> Result<PathBuf> {
  Ok(data_root()?.join("tags.json"))
}

/// API key for the LLM provider. Required for agent, transcription, and
/// analysis endpoints; everything else works without it.
pub fn openai_api_key() -> Result<String> {
  env::var("OPENAI_API_KEY").map_err(|_| anyhow!("OPENAI_API_KEY is not set"))
}

pub fn openai_base_url() -> String {
  env::var("DECK_OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

pub fn openai_model() -> String {
  env::var("DECK_OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string())
}

/// API key for the TextBelt SMS gateway.
pub fn textbelt_key() -> Result<String> {
  env::var("TEXTBELT_KEY").map_err(|_| anyhow!("TEXTBELT_KEY is not set"))
}

/// Public URL TextBelt should post SMS replies back to.
pub fn sms_webhook_url() -> Option<String> {
  env::var("DECK_SMS_WEBHOOK_URL").ok()
}

/// Sender name attached to outbound SMS.
pub fn sms_sender() -> Option<String> {
  env::var("DECK_SMS_SENDER").ok()
}

/// Phone number the `/test-sms` endpoint targets.
pub fn test_sms_to() -> Result<String> {
  env::var("DECK_TEST_SMS_TO").map_err(|_| anyhow!("DECK_TEST_SMS_TO is not set"))
}

/// Comma-separated CORS origin allowlist. Unset means permissive.
pub fn allowed_origins() -> Option<Vec<String>> {
  let raw = env::var("DECK_ALLOWED_ORIGINS").ok()?;
  let origins: Vec<String> =
    raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
  if origins.is_empty() {
    None
  } else {
    Some(origins)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn data_root_honors_env_override() {
    env::set_var("DECK_ROOT", "/tmp/deck-test-root");
    assert_eq!(data_root().unwrap(), PathBuf::from("/tmp/deck-test-root"));
    assert_eq!(ideas_path().unwrap(), PathBuf::from("/tmp/deck-test-root/ideas.json"));
    env::remove_var("DECK_ROOT");
  }

  #[test]
  #[serial]
  fn allowed_origins_splits_and_trims() {
    env::set_var("DECK_ALLOWED_ORIGINS", "https://a.example, https://b.example ,");
    let origins = allowed_origins().unwrap();
    assert_eq!(origins, vec!["https://a.example".to_string(), "https://b.example".to_string()]);

    env::set_var("DECK_ALLOWED_ORIGINS", "  ");
    assert!(allowed_origins().is_none());
    env::remove_var("DECK_ALLOWED_ORIGINS");
  }

  #[test]
  #[serial]
  fn llm_defaults_apply_without_env() {
    env::remove_var("DECK_OPENAI_BASE_URL");
    env::remove_var("DECK_OPENAI_MODEL");
    assert_eq!(openai_base_url(), "https://api.openai.com/v1");
    assert_eq!(openai_model(), "gpt-4o");
  }
}
