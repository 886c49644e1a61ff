//! Idea CRUD endpoint handlers

use axum::extract::{Extension, Multipart, Path};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::config;
use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::models::idea::{self, IdeaPatch};
use crate::server::types::{
  BaseResponse, ClearIdeasResponse, CreateIdeaRequest, IdeaResponse, ListIdeasResponse,
};

/// GET /ideas - All ideas, newest first
pub async fn list_ideas(
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<ListIdeasResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match idea::all().await {
    Ok(ideas) => Ok(Json(BaseResponse::success(ListIdeasResponse { ideas }, transaction_id))),
    Err(e) => {
      context.log_error(&format!("Failed to list ideas: {e}"), "ideas-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "ideas_list_failed",
        &format!("Failed to list ideas: {e}"),
        transaction_id,
      ))
    }
  }
}

/// POST /ideas - Capture a new idea
pub async fn create_idea(
  Extension(context): Extension<RequestContext>,
  Json(request): Json<CreateIdeaRequest>,
) -> Result<Json<BaseResponse<IdeaResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  if request.text.trim().is_empty() {
    return Err(failure(StatusCode::BAD_REQUEST, "text_required", "Text is required", transaction_id));
  }

  match idea::create(&request.text).await {
    Ok(idea) => {
      context.log_success(&format!("Captured idea {}", idea.id), "ideas-api").await;
      Ok(Json(BaseResponse::success(IdeaResponse { idea }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to capture idea: {e}"), "ideas-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "idea_create_failed",
        &format!("Failed to capture idea: {e}"),
        transaction_id,
      ))
    }
  }
}

/// PUT /ideas/{id}/used - Mark an idea as used
pub async fn mark_used(
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
) -> Result<Json<BaseResponse<IdeaResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match idea::mark_used(&id).await {
    Ok(idea) => {
      context.log_success(&format!("Marked idea {id} used"), "ideas-api").await;
      Ok(Json(BaseResponse::success(IdeaResponse { idea }, transaction_id)))
    }
    Err(e) => {
      context.log_warn(&format!("Idea {id} not found: {e}"), "ideas-api").await;
      Err(failure(StatusCode::NOT_FOUND, "idea_not_found", &format!("{e}"), transaction_id))
    }
  }
}

/// PATCH /ideas/{id} - Update classification fields
pub async fn update_idea(
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
  Json(patch): Json<IdeaPatch>,
) -> Result<Json<BaseResponse<IdeaResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  if !patch.has_updates() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "no_valid_fields",
      "No valid fields to update",
      transaction_id,
    ));
  }

  match idea::update(&id, &patch).await {
    Ok(idea) => {
      context.log_success(&format!("Updated idea {id}"), "ideas-api").await;
      Ok(Json(BaseResponse::success(IdeaResponse { idea }, transaction_id)))
    }
    Err(e) => {
      context.log_warn(&format!("Idea {id} not found: {e}"), "ideas-api").await;
      Err(failure(StatusCode::NOT_FOUND, "idea_not_found", &format!("{e}"), transaction_id))
    }
  }
}

/// DELETE /ideas/{id} - Delete one idea
pub async fn delete_idea(
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
) -> Result<Json<BaseResponse<IdeaResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match idea::remove(&id).await {
    Ok(idea) => {
      context.log_success(&format!("Deleted idea {id}"), "ideas-api").await;
      Ok(Json(BaseResponse::success(IdeaResponse { idea }, transaction_id)))
    }
    Err(e) => {
      context.log_warn(&format!("Idea {id} not found: {e}"), "ideas-api").await;
      Err(failure(StatusCode::NOT_FOUND, "idea_not_found", &format!("{e}"), transaction_id))
    }
  }
}

/// DELETE /ideas - Clear the deck
pub async fn clear_ideas(
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<ClearIdeasResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match idea::clear().await {
    Ok(removed) => {
      context.log_success(&format!("Cleared {removed} ideas"), "ideas-api").await;
      Ok(Json(BaseResponse::success(ClearIdeasResponse { removed }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to clear ideas: {e}"), "ideas-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "ideas_clear_failed",
        &format!("Failed to clear ideas: {e}"),
        transaction_id,
      ))
    }
  }
}

/// POST /ideas/{id}/image - Attach an uploaded image
pub async fn upload_image(
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
  mut multipart: Multipart,
) -> Result<Json<BaseResponse<IdeaResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let mut stored: Option<String> = None;
  while let Ok(Some(field)) = multipart.next_field().await {
    if field.name() != Some("image") {
      continue;
    }
    let extension = field
      .file_name()
      .and_then(|name| std::path::Path::new(name).extension().map(|e| e.to_string_lossy().to_string()));
    let bytes = match field.bytes().await {
      Ok(bytes) => bytes,
      Err(e) => {
        return Err(failure(
          StatusCode::BAD_REQUEST,
          "image_read_failed",
          &format!("Failed to read upload: {e}"),
          transaction_id,
        ));
      }
    };

    let file_name = match extension {
      Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
      None => Uuid::new_v4().to_string(),
    };
    let uploads = config::uploads_dir().map_err(|e| {
      failure(StatusCode::INTERNAL_SERVER_ERROR, "uploads_unavailable", &format!("{e}"), transaction_id)
    })?;
    if let Err(e) = std::fs::create_dir_all(&uploads) {
      return Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "uploads_unavailable",
        &format!("Failed to create uploads dir: {e}"),
        transaction_id,
      ));
    }
    if let Err(e) = std::fs::write(uploads.join(&file_name), &bytes) {
      return Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "image_store_failed",
        &format!("Failed to store upload: {e}"),
        transaction_id,
      ));
    }
    stored = Some(format!("/uploads/{file_name}"));
    break;
  }

  let Some(image_url) = stored else {
    return Err(failure(StatusCode::BAD_REQUEST, "image_required", "No image uploaded", transaction_id));
  };

  match idea::set_image(&id, &image_url).await {
    Ok(idea) => {
      context.log_success(&format!("Attached image to idea {id}"), "ideas-api").await;
      Ok(Json(BaseResponse::success(IdeaResponse { idea }, transaction_id)))
    }
    Err(e) => {
      context.log_warn(&format!("Idea {id} not found: {e}"), "ideas-api").await;
      Err(failure(StatusCode::NOT_FOUND, "idea_not_found", &format!("{e}"), transaction_id))
    }
  }
}
