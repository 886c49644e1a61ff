//! HTTP client for the deck REST API
//!
//! Thin wrapper that lets the CLI work with both local and remote deck
//! servers.

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;

use crate::server::models::idea::{Idea, IdeaPatch};
use crate::server::models::message::ChatMessage;
use crate::server::models::tags::Tags;
use crate::server::types::{
  AgentRequest, AgentResponse, AppendChatRequest, BaseResponse, ChatHistoryResponse,
  ClearIdeasResponse, CreateIdeaRequest, IdeaResponse, ListIdeasResponse, LogsResponse,
  MessageResponse, SaveTagsRequest,
};

/// Configuration for the deck HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the deck server (e.g., "http://localhost:3000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:3000".to_string(), timeout_secs: 30 }
  }
}

/// HTTP client for the deck REST API
pub struct DeckClient {
  client: Client,
  config: ClientConfig,
}

impl Default for DeckClient {
  fn default() -> Self {
    Self::new()
  }
}

impl DeckClient {
  /// Create a new client with default configuration
  pub fn new() -> Self {
    Self::with_config(ClientConfig::default())
  }

  /// Create a new client with custom configuration
  pub fn with_config(config: ClientConfig) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .expect("Failed to create HTTP client");

    Self { client, config }
  }

  async fn parse<T: serde::de::DeserializeOwned>(
    &self,
    response: reqwest::Response,
    action: &str,
  ) -> Result<T> {
    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Failed to {action}: {error_text}"));
    }
    let result: BaseResponse<T> = response.json().await?;
    Ok(result.data)
  }

  /// Check if the server is reachable
  pub async fn health_check(&self) -> Result<()> {
    let url = format!("{}/status", self.config.base_url);
    let response = timeout(
      Duration::from_secs(5), // Shorter timeout for health check
      self.client.get(&url).send(),
    )
    .await??;

    if response.status().is_success() {
      Ok(())
    } else {
      Err(anyhow!("Server health check failed: {}", response.status()))
    }
  }

  /// All ideas, newest first
  pub async fn list_ideas(&self) -> Result<Vec<Idea>> {
    let url = format!("{}/ideas", self.config.base_url);
    let response = self.client.get(&url).send().await?;
    let data: ListIdeasResponse = self.parse(response, "list ideas").await?;
    Ok(data.ideas)
  }

  /// Capture a new idea
  pub async fn add_idea(&self, text: &str) -> Result<Idea> {
    let url = format!("{}/ideas", self.config.base_url);
    let request = CreateIdeaRequest { text: text.to_string() };
    let response = self.client.post(&url).json(&request).send().await?;
    let data: IdeaResponse = self.parse(response, "add idea").await?;
    Ok(data.idea)
  }

  /// Mark an idea as used
  pub async fn mark_used(&self, id: &str) -> Result<Idea> {
    let url = format!("{}/ideas/{id}/used", self.config.base_url);
    let response = self.client.put(&url).send().await?;
    let data: IdeaResponse = self.parse(response, "mark idea used").await?;
    Ok(data.idea)
  }

  /// Patch an idea's classification fields
  pub async fn update_idea(&self, id: &str, patch: &IdeaPatch) -> Result<Idea> {
    let url = format!("{}/ideas/{id}", self.config.base_url);
    let response = self.client.patch(&url).json(patch).send().await?;
    let data: IdeaResponse = self.parse(response, "update idea").await?;
    Ok(data.idea)
  }

  /// Delete one idea
  pub async fn delete_idea(&self, id: &str) -> Result<Idea> {
    let url = format!("{}/ideas/{id}", self.config.base_url);
    let response = self.client.delete(&url).send().await?;
    let data: IdeaResponse = self.parse(response, "delete idea").await?;
    Ok(data.idea)
  }

  /// Clear the whole deck
  pub async fn clear_ideas(&self) -> Result<usize> {
    let url = format!("{}/ideas", self.config.base_url);
    let response = self.client.delete(&url).send().await?;
    let data: ClearIdeasResponse = self.parse(response, "clear ideas").await?;
    Ok(data.removed)
  }

  /// Full chat history
  pub async fn chat_history(&self) -> Result<Vec<ChatMessage>> {
    let url = format!("{}/chat", self.config.base_url);
    let response = self.client.get(&url).send().await?;
    let data: ChatHistoryResponse = self.parse(response, "read chat").await?;
    Ok(data.messages)
  }

  /// Append a chat message
  pub async fn append_chat(&self, sender: &str, text: &str) -> Result<ChatMessage> {
    let url = format!("{}/chat", self.config.base_url);
    let request = AppendChatRequest {
      sender: sender.to_string(),
      text: text.to_string(),
      kind: None,
      gif: None,
      created_at: None,
    };
    let response = self.client.post(&url).json(&request).send().await?;
    let data: MessageResponse = self.parse(response, "append chat message").await?;
    Ok(data.message)
  }

  /// Run the agent on a message and return its reply
  pub async fn agent(&self, message: &str) -> Result<String> {
    let url = format!("{}/agent", self.config.base_url);
    let request = AgentRequest { message: message.to_string() };
    let response = self.client.post(&url).json(&request).send().await?;
    let data: AgentResponse = self.parse(response, "run agent").await?;
    Ok(data.reply)
  }

  /// Current profile tags
  pub async fn get_tags(&self) -> Result<Tags> {
    let url = format!("{}/api/tags", self.config.base_url);
    let response = self.client.get(&url).send().await?;
    self.parse(response, "read tags").await
  }

  /// Replace profile tags
  pub async fn save_tags(&self, request: &SaveTagsRequest) -> Result<Tags> {
    let url = format!("{}/api/tags", self.config.base_url);
    let response = self.client.post(&url).json(request).send().await?;
    self.parse(response, "save tags").await
  }

  /// Recent server journal entries
  pub async fn get_logs(&self, limit: usize, level: &str) -> Result<Vec<scribe::Entry>> {
    let url = format!("{}/logs", self.config.base_url);
    let response = self
      .client
      .get(&url)
      .query(&[("limit", limit.to_string()), ("level", level.to_string())])
      .send()
      .await?;
    let data: LogsResponse = self.parse(response, "read logs").await?;
    Ok(data.logs)
  }
}

/// Get the configured client (checks environment variables)
pub fn get_client() -> DeckClient {
  let base_url =
    std::env::var("DECK_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

  let timeout_secs = std::env::var("DECK_TIMEOUT_SECS")
    .unwrap_or_else(|_| "30".to_string())
    .parse()
    .unwrap_or(30);

  let config = ClientConfig { base_url, timeout_secs };

  DeckClient::with_config(config)
}
