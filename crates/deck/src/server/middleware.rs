//! Request context and middleware
//!
//! Every request gets a `RequestContext` carrying a correlation id and
//! the shared journal, injected via extension so handlers can record
//! what they did under the request that did it.

use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use once_cell::sync::OnceCell;
use scribe::{Journal, Level, RequestInfo};
use uuid::Uuid;

/// Context injected into every request.
#[derive(Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub path: String,
  pub journal: Journal,
}

impl RequestContext {
  pub fn new(method: Method, path: String, journal: Journal) -> Self {
    Self { request_id: Uuid::new_v4(), method, path, journal }
  }

  fn request_info(&self, status: Option<u16>, duration_ms: Option<f64>) -> RequestInfo {
    RequestInfo {
      request_id: self.request_id.to_string(),
      method: self.method.to_string(),
      path: self.path.clone(),
      status,
      duration_ms,
    }
  }

  async fn record(&self, level: Level, message: &str, component: &str) {
    self
      .journal
      .record_request(level, message, component, self.request_info(None, None))
      .await;
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.record(Level::Info, message, component).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.record(Level::Success, message, component).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.record(Level::Warn, message, component).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.record(Level::Error, message, component).await;
  }

  /// Record request completion with status and timing.
  pub async fn log_complete(&self, status: u16, duration_ms: f64) {
    self
      .journal
      .record_request(
        Level::Info,
        "request completed",
        "http",
        self.request_info(Some(status), Some(duration_ms)),
      )
      .await;
  }
}

// Shared journal instance
// =======================

static GLOBAL_JOURNAL: OnceCell<Journal> = OnceCell::new();

/// Install the process-wide journal. Errors if already installed.
pub fn init_global_journal(journal: Journal) -> Result<(), Journal> {
  GLOBAL_JOURNAL.set(journal)
}

/// The process-wide journal.
pub fn global_journal() -> &'static Journal {
  GLOBAL_JOURNAL.get().expect("journal must be initialized before serving")
}

/// Middleware that wraps every request in a `RequestContext` and logs
/// its completion with timing.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let journal = global_journal().clone();
  let context =
    RequestContext::new(request.method().clone(), request.uri().path().to_string(), journal);

  let started = std::time::Instant::now();
  request.extensions_mut().insert(context.clone());

  let response = next.run(request).await;

  let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
  context.log_complete(response.status().as_u16(), duration_ms).await;

  response
}
