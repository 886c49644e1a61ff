use anyhow::Result;
use clap::{Parser, Subcommand};

use deck::cli::commands;
use deck::server::models::idea::IdeaPatch;

#[derive(Parser)]
#[command(name = "deck")]
#[command(
  about = "Deck - Idea Management\nCapture, classify, and browse post ideas from your terminal"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Capture a new idea
  Add {
    /// The idea text
    text: String,
  },
  /// Show the idea gallery, grouped by status
  List {
    /// Include ideas already marked used
    #[arg(short, long)]
    all: bool,
    /// Show classification details for each idea
    #[arg(short, long)]
    verbose: bool,
  },
  /// Mark an idea as used
  Used {
    /// Idea id
    id: String,
  },
  /// Update an idea's classification fields
  Edit {
    /// Idea id
    id: String,
    /// Post format (Story, How-to, ...)
    #[arg(long = "type")]
    post_type: Option<String>,
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    intent: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    audience: Option<String>,
  },
  /// Delete an idea
  Delete {
    /// Idea id
    id: String,
    /// Skip confirmation prompt
    #[arg(short, long)]
    force: bool,
  },
  /// Delete every idea
  Clear {
    /// Required; clearing is not undoable
    #[arg(short, long)]
    force: bool,
  },
  /// Show recent chat history
  Chat {
    /// Number of messages to show
    #[arg(short, long, default_value = "20")]
    limit: usize,
  },
  /// Send a message through the agent
  Send {
    /// The message text
    message: String,
  },
  /// Show or update profile tags
  Tags {
    #[arg(long)]
    discipline: Option<String>,
    #[arg(long)]
    market: Option<String>,
    #[arg(long)]
    customer_profile: Option<String>,
    #[arg(long)]
    topic_pillars: Option<String>,
  },
  /// Query server logs for debugging and monitoring
  Logs {
    /// Maximum number of log entries to return
    #[arg(short, long, default_value = "50")]
    limit: usize,
    /// Filter by log level (debug, info, success, warn, error, all)
    #[arg(long, default_value = "all")]
    level: String,
  },
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::Add { text } => commands::add_idea(&text).await,
    Command::List { all, verbose } => commands::list_ideas(all, verbose).await,
    Command::Used { id } => commands::mark_used(&id).await,
    Command::Edit { id, post_type, topic, intent, status, audience } => {
      let patch = IdeaPatch { post_type, topic, intent, status, audience };
      commands::edit_idea(&id, patch).await
    }
    Command::Delete { id, force } => commands::delete_idea(&id, force).await,
    Command::Clear { force } => commands::clear_ideas(force).await,
    Command::Chat { limit } => commands::show_chat(limit).await,
    Command::Send { message } => commands::send_message(&message).await,
    Command::Tags { discipline, market, customer_profile, topic_pillars } => {
      let updates =
        commands::TagUpdates { discipline, market, customer_profile, topic_pillars };
      commands::tags(updates).await
    }
    Command::Logs { limit, level } => commands::logs(limit, &level).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  handle(cli.command).await?;
  Ok(())
}
