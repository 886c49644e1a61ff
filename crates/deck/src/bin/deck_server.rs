//! Deck REST Server
//!
//! HTTP API server for the deck idea-management system. Provides the
//! idea/chat CRUD surface, the classification agent, voice and SMS
//! capture, and the profile analysis endpoints.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use deck::server::startup::start_server;

#[derive(Parser)]
#[command(name = "deck_server")]
#[command(about = "Deck REST API Server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "127.0.0.1:3000")]
  bind: SocketAddr,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("debug,hyper=info,reqwest=info")
  } else {
    EnvFilter::new("deck=info,tower_http=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  scribe::info(&format!("Starting Deck REST Server v{}", env!("CARGO_PKG_VERSION")));
  scribe::info(&format!("Binding to address: {}", args.bind));

  start_server(args.bind).await?;

  Ok(())
}
