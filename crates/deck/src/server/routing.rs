//! Axum router configuration for all endpoints

use axum::extract::DefaultBodyLimit;
use axum::{
  middleware::from_fn,
  routing::{get, patch, post, put},
  Router,
};

use crate::server::handlers::{agent, analyze, chat, ideas, logs, sms, status, tags, transcribe};
use crate::server::middleware::request_context_middleware;

// Room for a LinkedIn profile PDF plus a posts export
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the main application router
pub fn create_router() -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/api", get(status::api_info))
    // Logs endpoint
    .route("/logs", get(logs::get_logs))
    // Idea endpoints
    .route("/ideas", get(ideas::list_ideas).post(ideas::create_idea).delete(ideas::clear_ideas))
    .route("/ideas/{id}", patch(ideas::update_idea).delete(ideas::delete_idea))
    .route("/ideas/{id}/used", put(ideas::mark_used))
    .route("/ideas/{id}/image", post(ideas::upload_image))
    // Chat endpoints
    .route("/chat", get(chat::get_history).post(chat::append_message))
    .route("/chat/{id}", patch(chat::edit_message))
    // Agent and capture endpoints
    .route("/agent", post(agent::post_agent))
    .route("/transcribe", post(transcribe::post_transcribe))
    .route("/sms-webhook", post(sms::sms_webhook))
    .route("/test-sms", get(sms::test_sms))
    // Profile analysis endpoints
    .route("/api/analyze-linkedin", post(analyze::analyze_linkedin))
    .route("/api/analyze-discipline-market", post(analyze::analyze_discipline_market))
    .route("/api/analyze-discipline", post(analyze::analyze_discipline))
    .route("/api/analyze-market", post(analyze::analyze_market))
    .route("/api/analyze-icp", post(analyze::analyze_icp))
    .route("/api/analyze-topic-pillars", post(analyze::analyze_topic_pillars))
    // Tags endpoints
    .route("/api/tags", get(tags::get_tags).post(tags::save_tags))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .layer(from_fn(request_context_middleware))
}
