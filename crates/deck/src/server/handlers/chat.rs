//! Chat history endpoint handlers

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::models::message::{self, ChatMessage};
use crate::server::types::{
  AppendChatRequest, BaseResponse, ChatHistoryResponse, EditChatRequest, MessageResponse,
};

/// GET /chat - Full chat history
pub async fn get_history(
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<ChatHistoryResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match message::history().await {
    Ok(messages) => {
      Ok(Json(BaseResponse::success(ChatHistoryResponse { messages }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to read chat: {e}"), "chat-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "chat_read_failed",
        &format!("Failed to read chat: {e}"),
        transaction_id,
      ))
    }
  }
}

/// POST /chat - Append a message
pub async fn append_message(
  Extension(context): Extension<RequestContext>,
  Json(request): Json<AppendChatRequest>,
) -> Result<Json<BaseResponse<MessageResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  if request.sender.trim().is_empty() || request.text.trim().is_empty() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "sender_and_text_required",
      "sender and text required",
      transaction_id,
    ));
  }

  let mut chat_message = ChatMessage::new(
    &request.sender,
    &request.text,
    request.created_at.unwrap_or_else(Utc::now),
  );
  chat_message.kind = request.kind;
  chat_message.gif = request.gif;

  match message::append(chat_message).await {
    Ok(saved) => {
      context.log_success(&format!("Appended chat message {}", saved.id), "chat-api").await;
      Ok(Json(BaseResponse::success(MessageResponse { message: saved }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to append chat message: {e}"), "chat-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "chat_append_failed",
        &format!("Failed to append chat message: {e}"),
        transaction_id,
      ))
    }
  }
}

/// PATCH /chat/{id} - Edit a message body
pub async fn edit_message(
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
  Json(request): Json<EditChatRequest>,
) -> Result<Json<BaseResponse<MessageResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  if request.text.trim().is_empty() {
    return Err(failure(StatusCode::BAD_REQUEST, "text_required", "text required", transaction_id));
  }

  match message::edit_text(&id, &request.text).await {
    Ok(updated) => {
      context.log_success(&format!("Edited chat message {id}"), "chat-api").await;
      Ok(Json(BaseResponse::success(MessageResponse { message: updated }, transaction_id)))
    }
    Err(e) => {
      context.log_warn(&format!("Message {id} not found: {e}"), "chat-api").await;
      Err(failure(StatusCode::NOT_FOUND, "message_not_found", &format!("{e}"), transaction_id))
    }
  }
}
