//! Server management for automatic server startup and lifecycle
//!
//! Handles automatically starting a local deck server when needed and
//! waiting for it to come up before the CLI issues its request.

use anyhow::{anyhow, Result};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;

use crate::cli::client::{get_client, DeckClient};

// Server startup configuration
const SERVER_STARTUP_TIMEOUT_SECS: u64 = 30;
const SERVER_CHECK_INTERVAL_MS: u64 = 500;

/// Manages the local deck server lifecycle
pub struct ServerManager {
  client: DeckClient,
}

impl Default for ServerManager {
  fn default() -> Self {
    Self::new()
  }
}

impl ServerManager {
  /// Create a new server manager
  pub fn new() -> Self {
    Self { client: get_client() }
  }

  /// Ensure the server is running, starting it if necessary
  #[cfg(not(tarpaulin_include))] // Skip coverage - process management
  pub async fn ensure_server_running(&self) -> Result<()> {
    if self.client.health_check().await.is_ok() {
      return Ok(());
    }

    scribe::info("Starting local deck server...");
    self.start_server()?;
    self.wait_for_server().await?;
    scribe::info("Deck server is ready");
    Ok(())
  }

  /// Start the server in the background
  #[cfg(not(tarpaulin_include))] // Skip coverage - process spawning
  fn start_server(&self) -> Result<Child> {
    let server_binary = self.find_server_binary()?;

    let mut cmd = Command::new(server_binary);
    cmd
      .args(["--bind", "127.0.0.1:3000"])
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .stdin(Stdio::null())
      .envs(std::env::vars()); // Pass through DECK_ROOT, API keys, etc.

    let child = cmd.spawn().map_err(|e| anyhow!("Failed to start deck server: {}", e))?;

    Ok(child)
  }

  /// Wait for the server to become ready
  #[cfg(not(tarpaulin_include))] // Skip coverage - network calls and timing
  async fn wait_for_server(&self) -> Result<()> {
    let max_attempts = (SERVER_STARTUP_TIMEOUT_SECS * 1000) / SERVER_CHECK_INTERVAL_MS;
    let mut attempts = 0;

    while attempts < max_attempts {
      if self.client.health_check().await.is_ok() {
        return Ok(());
      }

      sleep(Duration::from_millis(SERVER_CHECK_INTERVAL_MS)).await;
      attempts += 1;
    }

    Err(anyhow!("Server failed to start within {} seconds", SERVER_STARTUP_TIMEOUT_SECS))
  }

  /// Find the deck_server binary
  #[cfg(not(tarpaulin_include))] // Skip coverage - filesystem operations
  fn find_server_binary(&self) -> Result<String> {
    // Prefer a sibling of the CLI binary itself (installed layout)
    if let Ok(current_exe) = std::env::current_exe() {
      if let Some(dir) = current_exe.parent() {
        let sibling = dir.join("deck_server");
        if sibling.exists() {
          return Ok(sibling.to_string_lossy().to_string());
        }
      }
    }

    // Check PATH
    if let Ok(output) = Command::new("which").arg("deck_server").output() {
      if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
          return Ok(path);
        }
      }
    }

    // Check local build locations as fallback
    let local_paths_to_try = [
      "target/release/deck_server", // Local release build (preferred)
      "target/debug/deck_server",   // Local debug build (fallback)
    ];

    for path in &local_paths_to_try {
      if std::fs::metadata(path).is_ok() {
        return Ok(path.to_string());
      }
    }

    Err(anyhow!("deck_server binary not found. Please ensure it's installed or build it locally."))
  }
}

/// Global function to ensure server is running
#[cfg(not(tarpaulin_include))] // Skip coverage - process management
pub async fn ensure_server_running() -> Result<()> {
  let manager = ServerManager::new();
  manager.ensure_server_running().await
}
