//! CLI command implementations
//!
//! Each command is a thin client call against the REST server plus
//! terminal rendering; the business logic all lives server-side.

use anyhow::{anyhow, Result};
use colored::*;

use crate::cli::client::get_client;
use crate::cli::display::{display_chat, display_ideas, display_logs};
use crate::cli::server_manager::ensure_server_running;
use crate::server::models::idea::IdeaPatch;
use crate::server::models::message::SENDER_USER;
use crate::server::types::SaveTagsRequest;

/// Capture a new idea
pub async fn add_idea(text: &str) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();
  let idea = client.add_idea(text).await?;

  println!("{} Captured idea {}", "✓".green(), idea.id.cyan());
  Ok(())
}

/// Show the idea gallery
pub async fn list_ideas(all: bool, verbose: bool) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();
  let ideas = client.list_ideas().await?;

  let ideas: Vec<_> = if all { ideas } else { ideas.into_iter().filter(|idea| !idea.used).collect() };

  if ideas.is_empty() {
    println!("No ideas yet. Capture one with {}", "deck add <text>".cyan());
    return Ok(());
  }

  display_ideas(&ideas, verbose);
  Ok(())
}

/// Mark an idea as used
pub async fn mark_used(id: &str) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();
  let idea = client.mark_used(id).await?;

  println!("{} Marked idea {} used", "✓".green(), idea.id.cyan());
  Ok(())
}

/// Patch an idea's classification fields
pub async fn edit_idea(id: &str, patch: IdeaPatch) -> Result<()> {
  if !patch.has_updates() {
    return Err(anyhow!(
      "At least one of --type, --topic, --intent, --status, or --audience must be specified"
    ));
  }

  ensure_server_running().await?;
  let client = get_client();
  let idea = client.update_idea(id, &patch).await?;

  println!("{} Updated idea {}", "✓".green(), idea.id.cyan());
  Ok(())
}

/// Delete an idea, with confirmation unless forced
pub async fn delete_idea(id: &str, force: bool) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();

  if !force {
    print!("Are you sure you want to delete idea {}? (y/N): ", id.cyan());
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    if response != "y" && response != "yes" {
      println!("Delete operation cancelled.");
      return Ok(());
    }
  }

  let idea = client.delete_idea(id).await?;
  println!("{} Deleted idea {}", "✓".green(), idea.hook.yellow());
  Ok(())
}

/// Clear the whole deck
pub async fn clear_ideas(force: bool) -> Result<()> {
  if !force {
    return Err(anyhow!("Clearing every idea requires --force"));
  }

  ensure_server_running().await?;
  let client = get_client();
  let removed = client.clear_ideas().await?;

  println!("{} Cleared {} ideas", "✓".green(), removed.to_string().yellow());
  Ok(())
}

/// Show recent chat history
pub async fn show_chat(limit: usize) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();
  let messages = client.chat_history().await?;

  if messages.is_empty() {
    println!("No chat history yet. Say something with {}", "deck send <message>".cyan());
    return Ok(());
  }

  let start = messages.len().saturating_sub(limit);
  display_chat(&messages[start..]);
  Ok(())
}

/// Send a message through the agent and print its reply
pub async fn send_message(text: &str) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();

  // Mirror the SPA: persist the user message, then run the agent
  client.append_chat(SENDER_USER, text).await?;
  let reply = client.agent(text).await?;

  println!("{}", reply);
  Ok(())
}

/// Fields of `deck tags`; unset fields keep their stored value.
#[derive(Debug, Default)]
pub struct TagUpdates {
  pub discipline: Option<String>,
  pub market: Option<String>,
  pub customer_profile: Option<String>,
  pub topic_pillars: Option<String>,
}

impl TagUpdates {
  pub fn is_empty(&self) -> bool {
    self.discipline.is_none()
      && self.market.is_none()
      && self.customer_profile.is_none()
      && self.topic_pillars.is_none()
  }
}

/// Show or update profile tags
pub async fn tags(updates: TagUpdates) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();

  let current = client.get_tags().await?;
  let tags = if updates.is_empty() {
    current
  } else {
    let request = SaveTagsRequest {
      discipline: updates.discipline.unwrap_or(current.discipline),
      market: updates.market.unwrap_or(current.market),
      customer_profile: updates.customer_profile.unwrap_or(current.customer_profile),
      topic_pillars: updates.topic_pillars.unwrap_or(current.topic_pillars),
    };
    let saved = client.save_tags(&request).await?;
    println!("{} Saved profile tags", "✓".green());
    saved
  };

  println!("{} {}", "discipline:".blue().bold(), tags.discipline);
  println!("{} {}", "market:".blue().bold(), tags.market);
  println!("{} {}", "customer profile:".blue().bold(), tags.customer_profile);
  println!("{} {}", "topic pillars:".blue().bold(), tags.topic_pillars);
  Ok(())
}

/// Show recent server journal entries
pub async fn logs(limit: usize, level: &str) -> Result<()> {
  ensure_server_running().await?;
  let client = get_client();
  let entries = client.get_logs(limit, level).await?;

  if entries.is_empty() {
    println!("No logs found.");
    return Ok(());
  }

  display_logs(&entries);
  Ok(())
}
