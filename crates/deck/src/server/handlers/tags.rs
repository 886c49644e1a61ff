//! Tags endpoint handlers

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::models::tags::{self, Tags};
use crate::server::types::{BaseResponse, SaveTagsRequest};

/// GET /api/tags - Current profile tags
pub async fn get_tags(
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<Tags>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match tags::load().await {
    Ok(tags) => Ok(Json(BaseResponse::success(tags, transaction_id))),
    Err(e) => {
      context.log_error(&format!("Failed to read tags: {e}"), "tags-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "tags_read_failed",
        &format!("Failed to read tags: {e}"),
        transaction_id,
      ))
    }
  }
}

/// POST /api/tags - Replace profile tags
pub async fn save_tags(
  Extension(context): Extension<RequestContext>,
  Json(request): Json<SaveTagsRequest>,
) -> Result<Json<BaseResponse<Tags>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let tags = Tags {
    discipline: request.discipline,
    market: request.market,
    customer_profile: request.customer_profile,
    topic_pillars: request.topic_pillars,
  };

  match tags::save(&tags).await {
    Ok(()) => {
      context.log_success("Saved profile tags", "tags-api").await;
      Ok(Json(BaseResponse::success(tags, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to save tags: {e}"), "tags-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "tags_save_failed",
        &format!("Failed to save tags: {e}"),
        transaction_id,
      ))
    }
  }
}
