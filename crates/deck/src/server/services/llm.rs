//! Chat-completion client for OpenAI-compatible providers
//!
//! The provider sits behind a trait so the agent flow can be exercised
//! in tests with a scripted stand-in instead of network calls.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::server::config;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// One chat-completion round trip. Unset knobs fall through to the
/// provider's defaults.
#[derive(Debug, Clone)]
pub struct ChatRequest {
  pub system: Option<String>,
  pub user: String,
  pub temperature: Option<f32>,
  pub max_tokens: Option<u32>,
}

impl ChatRequest {
  pub fn new(system: &str, user: String, temperature: f32) -> Self {
    Self { system: Some(system.to_string()), user, temperature: Some(temperature), max_tokens: None }
  }

  /// A bare prompt with a response-size cap, as the analyze flow sends.
  pub fn capped(user: String, max_tokens: u32) -> Self {
    Self { system: None, user, temperature: None, max_tokens: Some(max_tokens) }
  }
}

/// A provider able to answer chat-completion requests.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
  async fn complete(&self, request: ChatRequest) -> Result<String>;
}

// Production provider
// ===================

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChat {
  client: Client,
  base_url: String,
  api_key: String,
  model: String,
}

impl OpenAiChat {
  /// Build a client from the environment (`OPENAI_API_KEY` required).
  pub fn from_env() -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()
      .map_err(|e| anyhow!("failed to create HTTP client: {e}"))?;

    Ok(Self {
      client,
      base_url: config::openai_base_url(),
      api_key: config::openai_api_key()?,
      model: config::openai_model(),
    })
  }

  fn payload(&self, request: &ChatRequest) -> Value {
    let mut messages = Vec::new();
    if let Some(system) = &request.system {
      messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": request.user }));

    let mut payload = json!({
      "model": self.model,
      "messages": messages,
    });
    if let Some(temperature) = request.temperature {
      payload["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = request.max_tokens {
      payload["max_tokens"] = json!(max_tokens);
    }
    payload
  }
}

#[async_trait]
impl ChatCompletion for OpenAiChat {
  async fn complete(&self, request: ChatRequest) -> Result<String> {
    let url = format!("{}/chat/completions", self.base_url);
    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(&self.payload(&request))
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(anyhow!("LLM API error: {}", api_error_message(&body, status.as_u16())));
    }

    let value: Value = serde_json::from_str(&body)
      .map_err(|e| anyhow!("invalid LLM response JSON: {e}"))?;
    if let Some(error) = value.get("error") {
      let message = error["message"].as_str().unwrap_or("unknown error");
      return Err(anyhow!("LLM API error: {message}"));
    }

    value["choices"][0]["message"]["content"]
      .as_str()
      .map(|content| content.trim().to_string())
      .ok_or_else(|| anyhow!("LLM response carried no message content"))
  }
}

/// Pull the provider's error message out of an error body, falling back
/// to the raw payload.
fn api_error_message(body: &str, status: u16) -> String {
  serde_json::from_str::<Value>(body)
    .ok()
    .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
    .unwrap_or_else(|| format!("HTTP {status}: {body}"))
}

// Speech-to-text
// ==============

/// Transcribe a WAV file through the provider's transcription endpoint.
pub async fn transcribe_wav(path: &Path) -> Result<String> {
  let api_key = config::openai_api_key()?;
  let url = format!("{}/audio/transcriptions", config::openai_base_url());

  let bytes = tokio::fs::read(path).await?;
  let file_name = path
    .file_name()
    .map(|name| name.to_string_lossy().to_string())
    .unwrap_or_else(|| "audio.wav".to_string());
  let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name).mime_str("audio/wav")?;
  let form = reqwest::multipart::Form::new()
    .part("file", part)
    .text("model", "whisper-1")
    .text("response_format", "text")
    .text("language", "en");

  let client = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS * 2)).build()?;
  let response = client.post(&url).bearer_auth(&api_key).multipart(form).send().await?;

  let status = response.status();
  let body = response.text().await?;
  if !status.is_success() {
    return Err(anyhow!("transcription failed: {}", api_error_message(&body, status.as_u16())));
  }

  Ok(body.trim().to_string())
}

// Shared provider instance
// ========================

static GLOBAL_CHAT: OnceCell<Arc<dyn ChatCompletion>> = OnceCell::new();

/// The process-wide chat provider, built from the environment on first
/// use so the server can start without credentials.
pub fn global() -> Result<Arc<dyn ChatCompletion>> {
  GLOBAL_CHAT
    .get_or_try_init(|| OpenAiChat::from_env().map(|chat| Arc::new(chat) as Arc<dyn ChatCompletion>))
    .cloned()
}

// Test double
// ===========

/// Scripted provider that replays canned replies in order.
pub struct ScriptedChat {
  replies: tokio::sync::Mutex<std::collections::VecDeque<String>>,
  calls: tokio::sync::Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
  pub fn new<I, S>(replies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      replies: tokio::sync::Mutex::new(replies.into_iter().map(Into::into).collect()),
      calls: tokio::sync::Mutex::new(Vec::new()),
    }
  }

  /// The requests the script has answered so far.
  pub async fn calls(&self) -> Vec<ChatRequest> {
    self.calls.lock().await.clone()
  }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
  async fn complete(&self, request: ChatRequest) -> Result<String> {
    self.calls.lock().await.push(request);
    self
      .replies
      .lock()
      .await
      .pop_front()
      .ok_or_else(|| anyhow!("scripted chat ran out of replies"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn payload_includes_system_and_max_tokens() {
    let chat = OpenAiChat {
      client: Client::new(),
      base_url: "https://api.example/v1".to_string(),
      api_key: "test-key".to_string(),
      model: "gpt-4o".to_string(),
    };

    let mut request = ChatRequest::new("be brief", "hello".to_string(), 0.3);
    request.max_tokens = Some(100);
    let payload = chat.payload(&request);

    let messages = payload["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "hello");
    assert_eq!(payload["max_tokens"], 100);
    assert_eq!(payload["model"], "gpt-4o");
  }

  #[test]
  fn capped_requests_leave_temperature_to_the_provider() {
    let chat = OpenAiChat {
      client: Client::new(),
      base_url: "https://api.example/v1".to_string(),
      api_key: "test-key".to_string(),
      model: "gpt-4o".to_string(),
    };

    let payload = chat.payload(&ChatRequest::capped("hello".to_string(), 400));
    assert!(payload.get("temperature").is_none());
    assert_eq!(payload["max_tokens"], 400);
    assert_eq!(payload["messages"].as_array().unwrap().len(), 1);
  }

  #[test]
  fn api_error_message_prefers_provider_detail() {
    let body = r#"{"error":{"message":"rate limited"}}"#;
    assert_eq!(api_error_message(body, 429), "rate limited");
    assert!(api_error_message("gateway exploded", 502).contains("HTTP 502"));
  }

  #[tokio::test]
  async fn scripted_chat_replays_in_order_then_errors() {
    let chat = ScriptedChat::new(["one", "two"]);
    let request = ChatRequest::new("sys", "user".to_string(), 0.5);

    assert_eq!(chat.complete(request.clone()).await.unwrap(), "one");
    assert_eq!(chat.complete(request.clone()).await.unwrap(), "two");
    assert!(chat.complete(request).await.is_err());
    assert_eq!(chat.calls().await.len(), 3);
  }
}
