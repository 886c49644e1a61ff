//! Terminal rendering for ideas, chat, and journal entries

use colored::*;
use std::collections::BTreeMap;

use crate::server::models::idea::Idea;
use crate::server::models::message::{ChatMessage, SENDER_USER};

/// Render the idea gallery grouped by status.
pub fn display_ideas(ideas: &[Idea], verbose: bool) {
  let mut by_status: BTreeMap<String, Vec<&Idea>> = BTreeMap::new();
  for idea in ideas {
    let status = if idea.status.is_empty() { "New".to_string() } else { idea.status.clone() };
    by_status.entry(status).or_default().push(idea);
  }

  for (status, ideas) in by_status {
    println!("{} {}", "▸".cyan(), status.blue().bold());

    for idea in ideas {
      let marker = if idea.used { "✓".green() } else { "·".normal() };
      println!("  {} {} {}", marker, idea.id.dimmed(), idea.hook.bold());

      if verbose {
        let mut meta = Vec::new();
        if !idea.post_type.is_empty() {
          meta.push(format!("type: {}", idea.post_type.cyan()));
        }
        if !idea.topic.is_empty() {
          meta.push(format!("topic: {}", idea.topic.cyan()));
        }
        if !idea.intent.is_empty() {
          meta.push(format!("intent: {}", idea.intent.cyan()));
        }
        if !idea.audience.is_empty() {
          meta.push(format!("audience: {}", idea.audience.cyan()));
        }
        meta.push(format!("captured: {}", idea.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()));

        for part in meta {
          println!("    {} {}", "└─".white().dimmed(), part);
        }
        if idea.original != idea.hook && !idea.original.is_empty() {
          println!("    {} original: {}", "└─".white().dimmed(), idea.original.dimmed());
        }
      }
    }
    println!();
  }
}

/// Render a chat transcript, newest at the bottom.
pub fn display_chat(messages: &[ChatMessage]) {
  for message in messages {
    let speaker = if message.sender == SENDER_USER {
      "you".green().bold()
    } else {
      "deck".magenta().bold()
    };
    let stamp = message.created_at.format("%H:%M:%S").to_string().dimmed();

    let mut lines = message.text.lines();
    if let Some(first) = lines.next() {
      println!("[{stamp}] {speaker} {first}");
    }
    for line in lines {
      println!("{:>10} {line}", "");
    }
  }
}

/// Render journal entries with their request context.
pub fn display_logs(entries: &[scribe::Entry]) {
  for entry in entries {
    let level = entry.level.tag();
    let level_colored = match entry.level {
      scribe::Level::Error => level.red().bold(),
      scribe::Level::Warn => level.yellow().bold(),
      scribe::Level::Info => level.blue().bold(),
      scribe::Level::Debug => level.magenta(),
      scribe::Level::Success => level.green().bold(),
    };

    println!(
      "{} [{}] [{}] {}",
      entry.timestamp.to_string().cyan(),
      level_colored,
      entry.component.green(),
      entry.message
    );

    if let Some(request) = &entry.request {
      let mut parts = vec![
        format!("request_id: {}", request.request_id.bright_blue()),
        format!("method: {}", request.method.magenta().bold()),
        format!("path: {}", request.path.cyan()),
      ];

      if let Some(status) = request.status {
        let status_colored = match status {
          200..=299 => status.to_string().green(),
          300..=399 => status.to_string().yellow(),
          400..=499 => status.to_string().red(),
          _ => status.to_string().bright_red().bold(),
        };
        parts.push(format!("status: {status_colored}"));
      }

      if let Some(duration) = request.duration_ms {
        let duration_colored = if duration < 10.0 {
          format!("{duration:.2}ms").green()
        } else if duration < 100.0 {
          format!("{duration:.2}ms").yellow()
        } else {
          format!("{duration:.2}ms").red()
        };
        parts.push(format!("duration: {duration_colored}"));
      }

      for part in parts {
        println!("  {} {}", "└─".white().dimmed(), part);
      }
      println!();
    }
  }
}
