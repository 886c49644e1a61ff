//! SMS webhook and test-send handlers

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::server::config;
use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::models::message::{self, ChatMessage, SENDER_USER};
use crate::server::services::sms::TextbeltClient;
use crate::server::services::{agent, llm};
use crate::server::types::{BaseResponse, SmsAckResponse, SmsWebhookRequest, TestSmsResponse};

const TEST_MESSAGE: &str =
  "This is a test from your deck server. Reply to this message to test SMS mirroring.";

/// POST /sms-webhook - Inbound SMS from the gateway
pub async fn sms_webhook(
  Extension(context): Extension<RequestContext>,
  Json(request): Json<SmsWebhookRequest>,
) -> Result<Json<BaseResponse<SmsAckResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let (Some(from), Some(text)) = (request.sender(), request.text.as_deref()) else {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "from_and_text_required",
      "from and text required",
      transaction_id,
    ));
  };
  if text.trim().is_empty() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "from_and_text_required",
      "from and text required",
      transaction_id,
    ));
  }

  context.log_info(&format!("Inbound SMS from {from}"), "sms-api").await;

  let result = async {
    // Mirror the inbound SMS into chat before generating the reply
    message::append(ChatMessage::new(SENDER_USER, text, Utc::now())).await?;

    let llm = llm::global()?;
    let reply = agent::respond(llm.as_ref(), text).await?;

    let gateway = TextbeltClient::from_env()?;
    gateway.send(from, &reply).await
  }
  .await;

  match result {
    Ok(verdict) => {
      if verdict.success {
        context.log_success(&format!("SMS reply sent to {from}"), "sms-api").await;
      } else {
        context
          .log_warn(
            &format!("Gateway rejected SMS reply: {}", verdict.error.as_deref().unwrap_or("unknown")),
            "sms-api",
          )
          .await;
      }
      Ok(Json(BaseResponse::success(SmsAckResponse { delivered: verdict.success }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("SMS webhook failed: {e}"), "sms-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "sms_webhook_failed",
        &format!("SMS webhook failed: {e}"),
        transaction_id,
      ))
    }
  }
}

/// GET /test-sms - Send a canned SMS to the configured test number
pub async fn test_sms(
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<TestSmsResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let result = async {
    let to = config::test_sms_to()?;
    let gateway = TextbeltClient::from_env()?;
    gateway.send(&to, TEST_MESSAGE).await
  }
  .await;

  match result {
    Ok(gateway) => {
      context.log_success("Test SMS handed to gateway", "sms-api").await;
      Ok(Json(BaseResponse::success(TestSmsResponse { gateway }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Test SMS failed: {e}"), "sms-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "test_sms_failed",
        &format!("Failed to send test SMS: {e}"),
        transaction_id,
      ))
    }
  }
}
