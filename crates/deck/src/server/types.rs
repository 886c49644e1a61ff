//! REST API types with schemars annotations for OpenAPI generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::models::idea::Idea;
use crate::server::models::message::ChatMessage;
use crate::server::services::sms::TextbeltReply;

// Base Response Structure
// =======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  /// The latest version of the API
  pub latest: String,

  /// The version of the API requested by the client
  pub requested: String,

  /// The version of the API that was used in producing the response
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,

  /// Error stack trace (if available)
  #[serde(default)]
  pub stack: Vec<String>,

  /// Additional error context
  #[serde(default)]
  pub context: serde_json::Value,
}

impl<T> BaseResponse<T> {
  /// Create a successful response
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    let version = env!("CARGO_PKG_VERSION");
    Self {
      versioning: VersionInfo {
        latest: version.to_string(),
        requested: version.to_string(),
        resolved: version.to_string(),
      },
      transaction_id,
      errors: Vec::new(),
      data,
    }
  }

  /// Create an error response
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    let version = env!("CARGO_PKG_VERSION");
    BaseResponse {
      versioning: VersionInfo {
        latest: version.to_string(),
        requested: version.to_string(),
        resolved: version.to_string(),
      },
      transaction_id,
      errors,
      data: (),
    }
  }
}

impl ApiError {
  /// Create a new API error
  pub fn new(key: &str, message: &str) -> Self {
    Self {
      key: key.to_string(),
      message: message.to_string(),
      stack: Vec::new(),
      context: serde_json::Value::Null,
    }
  }
}

// Status/Version Endpoints
// ========================

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  /// Service health indicator
  pub status: String,

  /// Data root the server persists under
  pub data_root: String,

  /// Service version
  pub version: String,
}

/// Response for /version endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  /// Current API version
  pub version: String,
}

/// Response for /api endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiInfoResponse {
  /// Latest API version
  pub latest: String,

  /// Version information
  pub versions: ApiVersions,
}

/// API version details
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiVersions {
  /// Latest version
  pub latest: String,

  /// Currently active versions
  pub active: Vec<String>,
}

// Logs Endpoint
// =============

/// Query parameters for /logs
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LogsQuery {
  /// Maximum entries to return (capped server-side)
  pub limit: Option<usize>,

  /// Only entries at this level
  pub level: Option<String>,
}

/// Response for /logs endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  /// Journal entries, oldest first
  pub logs: Vec<scribe::Entry>,
}

// Idea Endpoints
// ==============

/// Request for POST /ideas
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateIdeaRequest {
  /// Raw idea text
  pub text: String,
}

/// Response carrying a single idea
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct IdeaResponse {
  pub idea: Idea,
}

/// Response for GET /ideas
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListIdeasResponse {
  /// All ideas, newest first
  pub ideas: Vec<Idea>,
}

/// Response for DELETE /ideas
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClearIdeasResponse {
  /// How many ideas were removed
  pub removed: usize,
}

// Chat Endpoints
// ==============

/// Request for POST /chat
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppendChatRequest {
  /// "user" or "agent"
  pub sender: String,

  /// Message body
  pub text: String,

  /// Presentation hint, stored verbatim
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,

  /// Attached GIF URL, stored verbatim
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gif: Option<String>,

  /// Client-supplied timestamp; server time when absent
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Request for PATCH /chat/{id}
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EditChatRequest {
  /// Replacement message body
  pub text: String,
}

/// Response carrying a single chat message
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MessageResponse {
  pub message: ChatMessage,
}

/// Response for GET /chat
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ChatHistoryResponse {
  /// Full history, oldest first
  pub messages: Vec<ChatMessage>,
}

// Agent Endpoint
// ==============

/// Request for POST /agent
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AgentRequest {
  /// The user's raw message
  pub message: String,
}

/// Response for POST /agent
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AgentResponse {
  /// The agent's reply text
  pub reply: String,
}

// Capture Endpoints
// =================

/// Response for POST /transcribe
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TranscribeResponse {
  /// Transcribed text
  pub text: String,
}

/// Request for POST /sms-webhook (TextBelt reply payload)
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmsWebhookRequest {
  /// Sender phone number
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from: Option<String>,

  /// Alternate field name some gateways use
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from_number: Option<String>,

  /// Message body
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

impl SmsWebhookRequest {
  /// The sender number, whichever field carried it.
  pub fn sender(&self) -> Option<&str> {
    self.from.as_deref().or(self.from_number.as_deref()).filter(|s| !s.trim().is_empty())
  }
}

/// Response for POST /sms-webhook
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SmsAckResponse {
  /// Whether the reply SMS was handed to the gateway
  pub delivered: bool,
}

/// Response for GET /test-sms
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TestSmsResponse {
  /// The gateway's verdict
  pub gateway: TextbeltReply,
}

// Analysis Endpoints
// ==================

/// Response for POST /api/analyze-linkedin
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysisResponse {
  pub discipline: String,
  pub market: String,
  pub customer_profile: String,
  pub topic_pillars: String,
}

/// Response for POST /api/analyze-discipline-market
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DisciplineMarketResponse {
  pub discipline: String,
  pub market: String,
}

/// Response for POST /api/analyze-discipline
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DisciplineResponse {
  pub discipline: String,
}

/// Response for POST /api/analyze-market
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MarketResponse {
  pub market: String,
}

/// Response for POST /api/analyze-icp
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfileResponse {
  pub customer_profile: String,
}

/// Response for POST /api/analyze-topic-pillars
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicPillarsResponse {
  pub topic_pillars: String,
}

// Tags Endpoints
// ==============

/// Request for POST /api/tags; omitted fields reset to empty
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTagsRequest {
  #[serde(default)]
  pub discipline: String,

  #[serde(default)]
  pub market: String,

  #[serde(default)]
  pub customer_profile: String,

  #[serde(default)]
  pub topic_pillars: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn success_envelope_omits_errors() {
    let response = BaseResponse::success(VersionResponse { version: "1.0".to_string() }, Uuid::new_v4());
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("errors").is_none());
    assert_eq!(json["version"], "1.0");
    assert!(json.get("transaction_id").is_some());
  }

  #[test]
  fn error_envelope_carries_keys() {
    let error = ApiError::new("text_required", "Text is required");
    let response = BaseResponse::<()>::error(vec![error], Uuid::new_v4());
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["errors"][0]["key"], "text_required");
  }

  #[test]
  fn sms_webhook_sender_tries_both_fields() {
    let from = SmsWebhookRequest {
      from: Some("5550100".to_string()),
      from_number: None,
      text: Some("hi".to_string()),
    };
    assert_eq!(from.sender(), Some("5550100"));

    let alt = SmsWebhookRequest {
      from: None,
      from_number: Some("5550199".to_string()),
      text: Some("hi".to_string()),
    };
    assert_eq!(alt.sender(), Some("5550199"));

    let neither = SmsWebhookRequest { from: Some("  ".to_string()), from_number: None, text: None };
    assert!(neither.sender().is_none());
  }
}
