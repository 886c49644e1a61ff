//! Agent endpoint handler

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::services::{agent, llm};
use crate::server::types::{AgentRequest, AgentResponse, BaseResponse};

/// POST /agent - Classify a message into ideas or reply conversationally
pub async fn post_agent(
  Extension(context): Extension<RequestContext>,
  Json(request): Json<AgentRequest>,
) -> Result<Json<BaseResponse<AgentResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  if request.message.trim().is_empty() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "message_required",
      "Message is required",
      transaction_id,
    ));
  }

  let llm = match llm::global() {
    Ok(llm) => llm,
    Err(e) => {
      context.log_error(&format!("LLM provider unavailable: {e}"), "agent-api").await;
      return Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "agent_failed",
        &format!("LLM provider unavailable: {e}"),
        transaction_id,
      ));
    }
  };

  match agent::respond(llm.as_ref(), &request.message).await {
    Ok(reply) => {
      context.log_success("Agent reply generated", "agent-api").await;
      Ok(Json(BaseResponse::success(AgentResponse { reply }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Agent flow failed: {e}"), "agent-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "agent_failed",
        &format!("Agent flow failed: {e}"),
        transaction_id,
      ))
    }
  }
}
