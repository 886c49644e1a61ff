//! Voice capture endpoint handler

use axum::extract::{Extension, Multipart};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::config;
use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::services::{llm, transcode};
use crate::server::types::{BaseResponse, TranscribeResponse};

/// POST /transcribe - Convert uploaded audio to WAV and transcribe it
pub async fn post_transcribe(
  Extension(context): Extension<RequestContext>,
  mut multipart: Multipart,
) -> Result<Json<BaseResponse<TranscribeResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let mut audio: Option<Vec<u8>> = None;
  while let Ok(Some(field)) = multipart.next_field().await {
    if field.name() == Some("audio") {
      audio = field.bytes().await.ok().map(|bytes| bytes.to_vec());
      break;
    }
  }

  let Some(audio) = audio else {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "audio_required",
      "No audio file uploaded",
      transaction_id,
    ));
  };

  context.log_info(&format!("Transcribing {} byte upload", audio.len()), "transcribe-api").await;

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

  let input = uploads.join(Uuid::new_v4().to_string());
  if let Err(e) = std::fs::write(&input, &audio) {
    return Err(failure(
      StatusCode::INTERNAL_SERVER_ERROR,
      "transcribe_failed",
      &format!("Failed to store upload: {e}"),
      transaction_id,
    ));
  }

  // Transcode then transcribe; temp files go away on every path
  let result = async {
    let wav = transcode::to_wav(&input).await?;
    let text = llm::transcribe_wav(&wav).await;
    transcode::cleanup(&[&input, &wav]);
    text
  }
  .await;

  match result {
    Ok(text) => {
      context.log_success("Transcription completed", "transcribe-api").await;
      Ok(Json(BaseResponse::success(TranscribeResponse { text }, transaction_id)))
    }
    Err(e) => {
      let wav = std::path::PathBuf::from(format!("{}.wav", input.display()));
      transcode::cleanup(&[&input, &wav]);
      context.log_error(&format!("Transcription failed: {e}"), "transcribe-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "transcribe_failed",
        &format!("Transcription failed: {e}"),
        transaction_id,
      ))
    }
  }
}
