//! Endpoint handlers

pub mod agent;
pub mod analyze;
pub mod chat;
pub mod ideas;
pub mod logs;
pub mod sms;
pub mod status;
pub mod tags;
pub mod transcribe;

use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::types::{ApiError, BaseResponse};

/// Error shape shared by all handlers.
pub type HandlerError = (StatusCode, Json<BaseResponse<()>>);

/// Build a keyed error response.
pub fn failure(status: StatusCode, key: &str, message: &str, transaction_id: Uuid) -> HandlerError {
  let error = ApiError::new(key, message);
  (status, Json(BaseResponse::<()>::error(vec![error], transaction_id)))
}
