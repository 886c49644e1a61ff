//! The classification agent
//!
//! One flow serves both `/agent` and `/sms-webhook`: ask the LLM
//! whether the message is a dump of post ideas, import whatever it
//! extracts, and otherwise answer conversationally with recent chat
//! history as context.

use anyhow::Result;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::server::models::idea::{
  self, Idea, AUDIENCES, DEFAULT_STATUS, INTENTS, POST_TYPES, STATUSES, TOPICS,
};
use crate::server::models::message;
use crate::server::services::llm::{ChatCompletion, ChatRequest};

const STRATEGIST_PERSONA: &str = "You are an expert LinkedIn content strategist.";

const ASSISTANT_PERSONA: &str =
  "You are LinkedList, a friendly, smart assistant for LinkedIn post ideas. You can chat \
   naturally, help brainstorm, and manage ideas. If you need to perform an action, reply with a \
   JSON object. Otherwise, just reply as yourself.";

const EXTRACTION_TEMPERATURE: f32 = 0.3;
const CONVERSATION_TEMPERATURE: f32 = 0.7;
const CONTEXT_MESSAGES: usize = 10;

/// An idea object as the model returns it; field names vary.
#[derive(Debug, Default, Deserialize)]
pub struct RawIdea {
  pub text: Option<String>,
  pub idea: Option<String>,
  pub hook: Option<String>,

  #[serde(rename = "type")]
  pub post_type: Option<String>,
  pub topic: Option<String>,
  pub intent: Option<String>,
  pub status: Option<String>,
  pub audience: Option<String>,
}

impl RawIdea {
  /// The captured text, whichever field the model put it in.
  pub fn source_text(&self) -> &str {
    [&self.text, &self.idea, &self.hook]
      .into_iter()
      .flatten()
      .map(String::as_str)
      .find(|value| !value.trim().is_empty())
      .unwrap_or("")
  }
}

// Prompts
// =======

pub fn extraction_prompt(text: &str) -> String {
  format!(
    "You are an expert LinkedIn content strategist. The user may send you a list of LinkedIn \
     post ideas, a brain dump, or a chat message.\n\n\
     If the message contains a list of post ideas (even if short, unpunctuated, or separated by \
     lines/dashes), extract all distinct LinkedIn post ideas and for each, return a JSON object \
     with these fields: text, type, topic, intent, status (default to 'New'), and audience.\n\n\
     For each field, ONLY choose from these allowed values:\n\
     - type: {}\n\
     - topic: {}\n\
     - intent: {}\n\
     - status: {}\n\
     - audience: {}\n\n\
     Return ONLY a JSON array of objects, one per idea. Use short, clear values for each field. \
     If it is not a list of ideas, reply conversationally as yourself. Do not include any \
     explanation or extra text outside the JSON array if extracting ideas.\n\n\
     Text:\n{text}",
    POST_TYPES.join(", "),
    TOPICS.join(", "),
    INTENTS.join(", "),
    STATUSES.join(", "),
    AUDIENCES.join(", "),
  )
}

fn rewrite_prompt(original: &str) -> String {
  format!(
    "If the following text is already a single, short, catchy sentence, return it unchanged. If \
     it is long, multi-line, a list, or a paragraph, rewrite it as a single, catchy sentence \
     suitable as a LinkedIn post idea title.\n\nText:\n{original}"
  )
}

fn conversation_prompt(context: &str, text: &str) -> String {
  format!(
    "You are LinkedList, a friendly, smart assistant who helps users brainstorm, organize, and \
     manage LinkedIn post ideas.\n\n\
     You can chat naturally, give encouragement, and help with content strategy.\n\n\
     If the user wants to add, list, mark, or delete an idea, you can do it. Otherwise, just \
     reply conversationally.\n\n\
     Here is the recent chat history for context:\n{context}\n\nUser: {text}"
  )
}

// Reply interpretation
// ====================

static ARRAY_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());

/// Best-effort parse of the model's reply as a JSON array of ideas:
/// direct parse first, then the first bracketed literal buried in prose.
pub fn parse_idea_array(reply: &str) -> Vec<RawIdea> {
  if let Ok(ideas) = serde_json::from_str::<Vec<RawIdea>>(reply.trim()) {
    return ideas;
  }
  ARRAY_LITERAL
    .find(reply)
    .and_then(|matched| serde_json::from_str(matched.as_str()).ok())
    .unwrap_or_default()
}

/// Whether a captured text already works as a hook. Anything long,
/// multi-line, bulleted, or multi-sentence gets rewritten.
pub fn is_short_single_sentence(text: &str) -> bool {
  text.len() < 100
    && !text.contains('\n')
    && !matches!(text.trim_start().chars().next(), Some('-' | '*' | '•'))
    && text.split('.').count() <= 2
}

// Flow
// ====

async fn hook_for(llm: &dyn ChatCompletion, original: &str) -> String {
  if is_short_single_sentence(original) {
    return original.to_string();
  }
  let request =
    ChatRequest::new(STRATEGIST_PERSONA, rewrite_prompt(original), EXTRACTION_TEMPERATURE);
  match llm.complete(request).await {
    Ok(hook) => hook.trim().to_string(),
    // A failed rewrite is not worth losing the idea over
    Err(_) => original.to_string(),
  }
}

async fn import_ideas(llm: &dyn ChatCompletion, extracted: Vec<RawIdea>) -> Result<String> {
  let now = Utc::now();
  let mut new_ideas = Vec::with_capacity(extracted.len());
  for raw in extracted {
    let original = raw.source_text().to_string();
    let hook = hook_for(llm, &original).await;
    new_ideas.push(Idea {
      id: Uuid::new_v4().to_string(),
      hook,
      original,
      created_at: now,
      used: false,
      post_type: raw.post_type.unwrap_or_default(),
      topic: raw.topic.unwrap_or_default(),
      intent: raw.intent.unwrap_or_default(),
      status: raw.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
      audience: raw.audience.unwrap_or_default(),
      image_url: None,
    });
  }

  let hooks = new_ideas
    .iter()
    .map(|idea| format!("• {}", idea.hook))
    .collect::<Vec<_>>()
    .join("\n");
  let reply = format!("Imported {} new ideas!\n\n{hooks}", new_ideas.len());

  idea::prepend(new_ideas).await?;
  message::append_reply(&reply).await?;
  Ok(reply)
}

async fn converse(llm: &dyn ChatCompletion, text: &str) -> Result<String> {
  let history = message::history().await?;
  let context = message::transcript_tail(&history, CONTEXT_MESSAGES);
  let request = ChatRequest::new(
    ASSISTANT_PERSONA,
    conversation_prompt(&context, text),
    CONVERSATION_TEMPERATURE,
  );
  let reply = llm.complete(request).await?.trim().to_string();
  message::append_reply(&reply).await?;
  Ok(reply)
}

/// Run the agent flow for one inbound message and return the reply
/// text. The reply is appended to chat history; imported ideas land at
/// the front of the deck.
pub async fn respond(llm: &dyn ChatCompletion, text: &str) -> Result<String> {
  let request =
    ChatRequest::new(STRATEGIST_PERSONA, extraction_prompt(text), EXTRACTION_TEMPERATURE);
  let reply = llm.complete(request).await?;

  let extracted = parse_idea_array(&reply);
  if extracted.is_empty() {
    converse(llm, text).await
  } else {
    import_ideas(llm, extracted).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_direct_json_array() {
    let reply = r#"[{"text":"Ship early","type":"Opinion"},{"idea":"Hiring is marketing"}]"#;
    let ideas = parse_idea_array(reply);
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].source_text(), "Ship early");
    assert_eq!(ideas[0].post_type.as_deref(), Some("Opinion"));
    assert_eq!(ideas[1].source_text(), "Hiring is marketing");
  }

  #[test]
  fn falls_back_to_an_array_buried_in_prose() {
    let reply = "Sure! Here are your ideas:\n[{\"text\":\"Lead with questions\"}]\nEnjoy!";
    let ideas = parse_idea_array(reply);
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].source_text(), "Lead with questions");
  }

  #[test]
  fn conversational_replies_parse_as_no_ideas() {
    assert!(parse_idea_array("Happy to help! What are you working on?").is_empty());
    assert!(parse_idea_array("[]").is_empty());
    assert!(parse_idea_array("I'd rate that [8/10] honestly").is_empty());
  }

  #[test]
  fn hook_fields_are_tried_in_order() {
    let raw = RawIdea { hook: Some("only hook".to_string()), ..Default::default() };
    assert_eq!(raw.source_text(), "only hook");

    let empty = RawIdea { text: Some("  ".to_string()), idea: Some("real".to_string()), ..Default::default() };
    assert_eq!(empty.source_text(), "real");

    assert_eq!(RawIdea::default().source_text(), "");
  }

  #[test]
  fn short_single_sentences_keep_their_hook() {
    assert!(is_short_single_sentence("Ship early, ship often."));
    assert!(is_short_single_sentence(""));
    assert!(!is_short_single_sentence("line one\nline two"));
    assert!(!is_short_single_sentence("- a bullet item"));
    assert!(!is_short_single_sentence("One. Two. Three."));
    assert!(!is_short_single_sentence(&"x".repeat(120)));
  }

  #[test]
  fn extraction_prompt_inlines_the_vocabularies() {
    let prompt = extraction_prompt("dump");
    assert!(prompt.contains("Story, How-to"));
    assert!(prompt.contains("Leadership, Career"));
    assert!(prompt.contains("New, Drafted, Scheduled, Posted, Archived"));
    assert!(prompt.ends_with("Text:\ndump"));
  }
}
