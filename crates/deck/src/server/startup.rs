//! REST server startup and configuration

use anyhow::Result;
use axum::http::HeaderValue;
use axum::serve;
use scribe::Journal;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::server::config;
use crate::server::middleware::init_global_journal;
use crate::server::routing::create_router;

/// Start the REST server
#[cfg(not(tarpaulin_include))] // Skip coverage - server lifecycle
pub async fn start_server(addr: SocketAddr) -> Result<()> {
  // Persistent journal backs both console output and the /logs endpoint
  let journal = Journal::open(config::journal_path()?)?;
  init_global_journal(journal.clone())
    .map_err(|_| anyhow::anyhow!("Failed to initialize global journal"))?;

  journal.info(&format!("Starting deck REST server on {addr}"), "deck-server").await;

  // Uploaded images are served straight off disk
  let uploads = config::uploads_dir()?;
  std::fs::create_dir_all(&uploads)?;

  let app = create_router()
    .nest_service("/uploads", ServeDir::new(uploads))
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors_layer()));

  let listener = TcpListener::bind(addr).await?;
  journal.info(&format!("Server listening on {addr}"), "deck-server").await;

  match serve(listener, app).await {
    Ok(_) => {
      journal.info("Server shutdown gracefully", "deck-server").await;
      Ok(())
    }
    Err(e) => {
      journal.error(&format!("Server error: {e}"), "deck-server").await;
      Err(anyhow::anyhow!("Server error: {}", e))
    }
  }
}

/// Restrict CORS to the configured origins; stay permissive for local
/// development when none are set.
fn cors_layer() -> CorsLayer {
  match config::allowed_origins() {
    Some(origins) => {
      let origins: Vec<HeaderValue> =
        origins.iter().filter_map(|origin| origin.parse().ok()).collect();
      CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
    }
    None => CorsLayer::permissive(),
  }
}
