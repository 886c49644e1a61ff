//! Document text extraction and profile-analysis prompts
//!
//! The analyze endpoints accept a LinkedIn profile export (PDF) and a
//! posts export (CSV), reduce both to plain text, and prompt the LLM
//! for short first-person profile facts.

use anyhow::{anyhow, Result};

/// CSV columns tried, in order, for each row's post text.
pub const CSV_TEXT_COLUMNS: [&str; 3] = ["ShareCommentary", "Text", "Content"];

/// Extract plain text from a PDF document.
pub fn pdf_text(bytes: &[u8]) -> Result<String> {
  pdf_extract::extract_text_from_mem(bytes).map_err(|e| anyhow!("failed to parse PDF: {e}"))
}

/// Concatenate the post text column of every CSV row.
pub fn csv_posts_text(raw: &str) -> Result<String> {
  let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(raw.as_bytes());
  let headers = reader.headers().map_err(|e| anyhow!("not a valid CSV: {e}"))?.clone();
  let columns: Vec<usize> = CSV_TEXT_COLUMNS
    .iter()
    .filter_map(|wanted| headers.iter().position(|header| header == *wanted))
    .collect();

  let mut lines = Vec::new();
  for record in reader.records() {
    let record = record.map_err(|e| anyhow!("not a valid CSV: {e}"))?;
    let text = columns
      .iter()
      .filter_map(|&index| record.get(index))
      .find(|value| !value.trim().is_empty())
      .unwrap_or("");
    lines.push(text.to_string());
  }

  Ok(lines.join("\n"))
}

// Labeled-field parsing
// =====================

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
  if needle.is_empty() || haystack.len() < needle.len() {
    return None;
  }
  haystack
    .as_bytes()
    .windows(needle.len())
    .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Pull the value following `Label:` out of LLM prose. The value runs
/// until the next line that opens a new capitalized heading, mirroring
/// how the model formats multi-field answers.
pub fn labeled_field(reply: &str, label: &str) -> Option<String> {
  let needle = format!("{label}:");
  let start = find_ignore_ascii_case(reply, &needle)? + needle.len();
  let rest = &reply[start..];

  let mut end = rest.len();
  let mut offset: usize = 0;
  for (index, line) in rest.split('\n').enumerate() {
    if index > 0 && line.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
      // Back up over the newline that opened this heading
      end = offset.saturating_sub(1);
      break;
    }
    offset += line.len() + 1;
  }

  Some(rest[..end].trim().to_string())
}

// Prompts
// =======

pub fn full_analysis_prompt(profile: &str, posts: &str) -> String {
  format!(
    "Given the following LinkedIn profile and posts, extract the following as short, clear, \
     first-person phrases (not about the user, but as if written by the user, no fluff):\n\
     - Discipline: What do you do? (e.g. 'web design and development, digital marketing')\n\
     - Market: Who do you do it for? (e.g. 'startups, nonprofits, beloved brands')\n\
     - Ideal Customer Profile: Who is your ideal customer?\n\
     - Topic Pillars: What themes do you post about?\n\n\
     Return only the facts, no extra explanation.\n\n\
     Profile:\n{profile}\n\nPosts:\n{posts}"
  )
}

pub fn discipline_market_prompt(profile: &str, posts: &str) -> String {
  format!(
    "Given the following LinkedIn profile and posts, extract:\n\
     1. The user's discipline.\n\
     2. The user's market.\n\n\
     Profile:\n{profile}\n\nPosts:\n{posts}"
  )
}

pub fn discipline_prompt(profile: &str) -> String {
  format!(
    "Given the following LinkedIn profile, extract 3-5 short, clear, first-person keywords \
     that best describe what you do (your discipline). No extra explanation.\n\n\
     Profile:\n{profile}"
  )
}

pub fn market_prompt(profile: &str) -> String {
  format!(
    "Given the following LinkedIn profile, extract 3-5 short, clear, first-person keywords \
     that best describe who you do it for (your core market). No extra explanation.\n\n\
     Profile:\n{profile}"
  )
}

pub fn customer_profile_prompt(profile: &str, posts: &str) -> String {
  format!(
    "Given the following LinkedIn profile and posts, extract 3-5 short, clear, first-person \
     keywords that best describe your ideal customer profile. No extra explanation.\n\n\
     Profile:\n{profile}\n\nPosts:\n{posts}"
  )
}

pub fn topic_pillars_prompt(posts: &str) -> String {
  format!(
    "Given the following LinkedIn posts, extract 3-5 short, clear, first-person keywords \
     that best describe your main topic pillars. No extra explanation.\n\n\
     Posts:\n{posts}"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn csv_prefers_share_commentary_then_falls_back() {
    let raw = "ShareCommentary,Text,Date\nfirst post,ignored,2026-01-01\n,fallback text,2026-01-02\n";
    let text = csv_posts_text(raw).unwrap();
    assert_eq!(text, "first post\nfallback text");
  }

  #[test]
  fn csv_without_known_columns_yields_blank_lines() {
    let raw = "Date,Likes\n2026-01-01,5\n";
    let text = csv_posts_text(raw).unwrap();
    assert!(text.trim().is_empty());
  }

  #[test]
  fn labeled_field_stops_at_next_heading() {
    let reply = "Discipline: web design\nand branding\nMarket: startups and nonprofits\n";
    assert_eq!(labeled_field(reply, "Discipline").unwrap(), "web design\nand branding");
    assert_eq!(labeled_field(reply, "Market").unwrap(), "startups and nonprofits");
  }

  #[test]
  fn labeled_field_is_case_insensitive_and_optional() {
    let reply = "discipline: consulting";
    assert_eq!(labeled_field(reply, "Discipline").unwrap(), "consulting");
    assert!(labeled_field(reply, "Market").is_none());
  }

  #[test]
  fn labeled_field_reads_to_end_without_following_heading() {
    let reply = "Topic Pillars: leadership, AI,\nremote work";
    assert_eq!(labeled_field(reply, "Topic Pillars").unwrap(), "leadership, AI,\nremote work");
  }
}
