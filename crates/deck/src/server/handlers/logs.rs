//! Logs endpoint handler

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::types::{BaseResponse, LogsQuery, LogsResponse};

const MAX_ENTRIES: usize = 100;

/// GET /logs - Recent journal entries
pub async fn get_logs(
  Extension(context): Extension<RequestContext>,
  Query(query): Query<LogsQuery>,
) -> Result<Json<BaseResponse<LogsResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let limit = query.limit.unwrap_or(MAX_ENTRIES).min(MAX_ENTRIES);
  let level = match query.level.as_deref() {
    None | Some("all") => None,
    Some(raw) => match raw.parse::<scribe::Level>() {
      Ok(level) => Some(level),
      Err(e) => {
        return Err(failure(StatusCode::BAD_REQUEST, "invalid_level", &e, transaction_id));
      }
    },
  };

  match context.journal.recent(Some(limit), level).await {
    Ok(logs) => {
      context.log_success(&format!("Retrieved {} log entries", logs.len()), "logs-api").await;
      Ok(Json(BaseResponse::success(LogsResponse { logs }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to read logs: {e}"), "logs-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "logs_read_failed",
        &format!("Failed to read logs: {e}"),
        transaction_id,
      ))
    }
  }
}
