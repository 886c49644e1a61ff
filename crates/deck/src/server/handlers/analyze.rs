//! Profile analysis endpoint handlers
//!
//! Each endpoint takes some subset of a LinkedIn profile export (PDF,
//! `profile` part) and posts export (CSV, `posts` part), reduces the
//! documents to text, and asks the LLM for short first-person facts.

use axum::extract::{Extension, Multipart};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::handlers::{failure, HandlerError};
use crate::server::middleware::RequestContext;
use crate::server::services::extract;
use crate::server::services::llm::{self, ChatRequest};
use crate::server::types::{
  BaseResponse, CustomerProfileResponse, DisciplineMarketResponse, DisciplineResponse,
  FullAnalysisResponse, MarketResponse, TopicPillarsResponse,
};

const FACTS_MAX_TOKENS: u32 = 400;
const PAIR_MAX_TOKENS: u32 = 200;
const KEYWORDS_MAX_TOKENS: u32 = 100;

struct Uploads {
  profile: Option<Vec<u8>>,
  posts: Option<String>,
}

async fn collect_uploads(mut multipart: Multipart) -> Uploads {
  let mut uploads = Uploads { profile: None, posts: None };
  while let Ok(Some(field)) = multipart.next_field().await {
    match field.name() {
      Some("profile") => {
        uploads.profile = field.bytes().await.ok().map(|bytes| bytes.to_vec());
      }
      Some("posts") => {
        uploads.posts = field
          .bytes()
          .await
          .ok()
          .map(|bytes| String::from_utf8_lossy(&bytes).to_string());
      }
      _ => {}
    }
  }
  uploads
}

fn profile_text(uploads: &Uploads, transaction_id: Uuid) -> Result<String, HandlerError> {
  let Some(bytes) = &uploads.profile else {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "profile_file_required",
      "No profile PDF uploaded. Please upload a PDF with the field name \"profile\".",
      transaction_id,
    ));
  };
  extract::pdf_text(bytes).map_err(|e| {
    failure(StatusCode::BAD_REQUEST, "invalid_pdf", &format!("{e}"), transaction_id)
  })
}

fn posts_text(uploads: &Uploads, transaction_id: Uuid) -> Result<String, HandlerError> {
  let Some(raw) = &uploads.posts else {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "posts_file_required",
      "No posts file uploaded. Please upload a CSV file with the field name \"posts\".",
      transaction_id,
    ));
  };
  if raw.trim().is_empty() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "posts_file_empty",
      "Uploaded posts file is empty.",
      transaction_id,
    ));
  }
  let text = extract::csv_posts_text(raw).map_err(|e| {
    failure(StatusCode::BAD_REQUEST, "invalid_csv", &format!("{e}"), transaction_id)
  })?;
  if text.trim().is_empty() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "no_post_content",
      "No post content found in CSV.",
      transaction_id,
    ));
  }
  Ok(text)
}

async fn run_prompt(
  context: &RequestContext,
  prompt: String,
  max_tokens: u32,
  transaction_id: Uuid,
) -> Result<String, HandlerError> {
  let llm = llm::global().map_err(|e| {
    failure(StatusCode::INTERNAL_SERVER_ERROR, "analysis_failed", &format!("{e}"), transaction_id)
  })?;

  match llm.complete(ChatRequest::capped(prompt, max_tokens)).await {
    Ok(reply) => Ok(reply),
    Err(e) => {
      context.log_error(&format!("Analysis prompt failed: {e}"), "analyze-api").await;
      Err(failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "analysis_failed",
        &format!("Failed to analyze files: {e}"),
        transaction_id,
      ))
    }
  }
}

/// POST /api/analyze-linkedin - All four profile facts at once
pub async fn analyze_linkedin(
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<Json<BaseResponse<FullAnalysisResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();
  let uploads = collect_uploads(multipart).await;

  let profile = profile_text(&uploads, transaction_id)?;
  let posts = posts_text(&uploads, transaction_id)?;

  let prompt = extract::full_analysis_prompt(&profile, &posts);
  let reply = run_prompt(&context, prompt, FACTS_MAX_TOKENS, transaction_id).await?;

  let response = FullAnalysisResponse {
    discipline: extract::labeled_field(&reply, "Discipline").unwrap_or_default(),
    market: extract::labeled_field(&reply, "Market").unwrap_or_default(),
    customer_profile: extract::labeled_field(&reply, "Ideal Customer Profile").unwrap_or_default(),
    topic_pillars: extract::labeled_field(&reply, "Topic Pillars").unwrap_or_default(),
  };

  context.log_success("Full profile analysis completed", "analyze-api").await;
  Ok(Json(BaseResponse::success(response, transaction_id)))
}

/// POST /api/analyze-discipline-market - Discipline and market together
pub async fn analyze_discipline_market(
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<Json<BaseResponse<DisciplineMarketResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();
  let uploads = collect_uploads(multipart).await;

  let profile = profile_text(&uploads, transaction_id)?;
  let posts = posts_text(&uploads, transaction_id)?;

  let prompt = extract::discipline_market_prompt(&profile, &posts);
  let reply = run_prompt(&context, prompt, PAIR_MAX_TOKENS, transaction_id).await?;

  let response = DisciplineMarketResponse {
    discipline: extract::labeled_field(&reply, "Discipline").unwrap_or_default(),
    market: extract::labeled_field(&reply, "Market").unwrap_or_default(),
  };

  context.log_success("Discipline/market analysis completed", "analyze-api").await;
  Ok(Json(BaseResponse::success(response, transaction_id)))
}

/// POST /api/analyze-discipline - Discipline keywords from the profile
pub async fn analyze_discipline(
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<Json<BaseResponse<DisciplineResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();
  let uploads = collect_uploads(multipart).await;

  let profile = profile_text(&uploads, transaction_id)?;
  let prompt = extract::discipline_prompt(&profile);
  let reply = run_prompt(&context, prompt, KEYWORDS_MAX_TOKENS, transaction_id).await?;

  context.log_success("Discipline analysis completed", "analyze-api").await;
  Ok(Json(BaseResponse::success(DisciplineResponse { discipline: reply }, transaction_id)))
}

/// POST /api/analyze-market - Market keywords from the profile
pub async fn analyze_market(
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<Json<BaseResponse<MarketResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();
  let uploads = collect_uploads(multipart).await;

  let profile = profile_text(&uploads, transaction_id)?;
  let prompt = extract::market_prompt(&profile);
  let reply = run_prompt(&context, prompt, KEYWORDS_MAX_TOKENS, transaction_id).await?;

  context.log_success("Market analysis completed", "analyze-api").await;
  Ok(Json(BaseResponse::success(MarketResponse { market: reply }, transaction_id)))
}

/// POST /api/analyze-icp - Ideal customer profile keywords
pub async fn analyze_icp(
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<Json<BaseResponse<CustomerProfileResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();
  let uploads = collect_uploads(multipart).await;

  let profile = profile_text(&uploads, transaction_id)?;
  let posts = posts_text(&uploads, transaction_id)?;

  let prompt = extract::customer_profile_prompt(&profile, &posts);
  let reply = run_prompt(&context, prompt, KEYWORDS_MAX_TOKENS, transaction_id).await?;

  context.log_success("ICP analysis completed", "analyze-api").await;
  Ok(Json(BaseResponse::success(CustomerProfileResponse { customer_profile: reply }, transaction_id)))
}

/// POST /api/analyze-topic-pillars - Topic pillar keywords from posts
pub async fn analyze_topic_pillars(
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<Json<BaseResponse<TopicPillarsResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();
  let uploads = collect_uploads(multipart).await;

  let posts = posts_text(&uploads, transaction_id)?;
  let prompt = extract::topic_pillars_prompt(&posts);
  let reply = run_prompt(&context, prompt, KEYWORDS_MAX_TOKENS, transaction_id).await?;

  context.log_success("Topic pillar analysis completed", "analyze-api").await;
  Ok(Json(BaseResponse::success(TopicPillarsResponse { topic_pillars: reply }, transaction_id)))
}
