//! TextBelt SMS gateway client

use anyhow::{anyhow, Result};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::server::config;

const TEXTBELT_URL: &str = "https://textbelt.com/text";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct SendPayload {
  phone: String,
  message: String,
  key: String,

  #[serde(rename = "replyWebhookUrl", skip_serializing_if = "Option::is_none")]
  reply_webhook_url: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  sender: Option<String>,
}

/// TextBelt's response to a send request.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextbeltReply {
  pub success: bool,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub text_id: Option<i64>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub quota_remaining: Option<i64>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Client for outbound SMS.
pub struct TextbeltClient {
  client: Client,
  key: String,
  reply_webhook_url: Option<String>,
  sender: Option<String>,
}

impl TextbeltClient {
  /// Build a client from the environment (`TEXTBELT_KEY` required).
  pub fn from_env() -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()
      .map_err(|e| anyhow!("failed to create HTTP client: {e}"))?;

    Ok(Self {
      client,
      key: config::textbelt_key()?,
      reply_webhook_url: config::sms_webhook_url(),
      sender: config::sms_sender(),
    })
  }

  /// Send one SMS. A delivered-but-rejected send (quota, bad number)
  /// comes back as `success: false` rather than an error.
  pub async fn send(&self, phone: &str, message: &str) -> Result<TextbeltReply> {
    let payload = SendPayload {
      phone: phone.to_string(),
      message: message.to_string(),
      key: self.key.clone(),
      reply_webhook_url: self.reply_webhook_url.clone(),
      sender: self.sender.clone(),
    };

    let response = self.client.post(TEXTBELT_URL).json(&payload).send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(anyhow!("TextBelt request failed: HTTP {status}: {body}"));
    }

    response.json::<TextbeltReply>().await.map_err(|e| anyhow!("invalid TextBelt response: {e}"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn payload_omits_unset_optional_fields() {
    let payload = SendPayload {
      phone: "5550100".to_string(),
      message: "hi".to_string(),
      key: "k".to_string(),
      reply_webhook_url: None,
      sender: None,
    };

    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("replyWebhookUrl").is_none());
    assert!(json.get("sender").is_none());
  }

  #[test]
  fn reply_parses_textbelt_shapes() {
    let ok: TextbeltReply =
      serde_json::from_str(r#"{"success":true,"textId":123,"quotaRemaining":40}"#).unwrap();
    assert!(ok.success);
    assert_eq!(ok.text_id, Some(123));

    let rejected: TextbeltReply =
      serde_json::from_str(r#"{"success":false,"error":"Out of quota"}"#).unwrap();
    assert!(!rejected.success);
    assert_eq!(rejected.error.as_deref(), Some("Out of quota"));
  }
}
