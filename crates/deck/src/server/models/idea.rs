//! Idea records and their backing document
//!
//! Ideas live newest-first in `ideas.json`. Wire names stay camelCase
//! (`createdAt`, `imageUrl`, `type`) for compatibility with existing
//! clients of the original service.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::server::config;
use crate::server::models::store;

// Classification vocabularies
// ===========================

pub const POST_TYPES: [&str; 8] =
  ["Story", "How-to", "List", "Question", "Announcement", "Opinion", "Inspire", "Collab"];

pub const TOPICS: [&str; 8] =
  ["Leadership", "Career", "Productivity", "Trends", "Culture", "AI", "Marketing", "Branding"];

pub const INTENTS: [&str; 6] = ["Inspire", "Educate", "Engage", "Promote", "Network", "Entertain"];

pub const STATUSES: [&str; 5] = ["New", "Drafted", "Scheduled", "Posted", "Archived"];

pub const AUDIENCES: [&str; 5] = ["Peers", "Leaders", "Clients", "Job Seekers", "Public"];

pub const DEFAULT_STATUS: &str = "New";

// Types
// =====

/// A stored post-idea record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
  /// Stable identifier
  pub id: String,

  /// Short display sentence for the idea
  pub hook: String,

  /// Raw text the idea was captured from
  pub original: String,

  /// Capture timestamp
  pub created_at: DateTime<Utc>,

  /// Whether the idea has been turned into a post
  #[serde(default)]
  pub used: bool,

  /// Post format (Story, How-to, ...)
  #[serde(rename = "type", default)]
  pub post_type: String,

  #[serde(default)]
  pub topic: String,

  #[serde(default)]
  pub intent: String,

  /// Lifecycle status, defaults to "New"
  #[serde(default = "default_status")]
  pub status: String,

  #[serde(default)]
  pub audience: String,

  /// Relative URL of an attached image, if one was uploaded
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

fn default_status() -> String {
  DEFAULT_STATUS.to_string()
}

/// Partial update of an idea's classification fields.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdeaPatch {
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub post_type: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub topic: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub intent: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub audience: Option<String>,
}

impl Idea {
  /// A manually captured idea: hook and original start as the raw text.
  pub fn new(text: &str) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      hook: text.to_string(),
      original: text.to_string(),
      created_at: Utc::now(),
      used: false,
      post_type: String::new(),
      topic: String::new(),
      intent: String::new(),
      status: DEFAULT_STATUS.to_string(),
      audience: String::new(),
      image_url: None,
    }
  }
}

impl IdeaPatch {
  /// Whether the patch carries at least one field.
  pub fn has_updates(&self) -> bool {
    self.post_type.is_some()
      || self.topic.is_some()
      || self.intent.is_some()
      || self.status.is_some()
      || self.audience.is_some()
  }

  fn apply(&self, idea: &mut Idea) {
    if let Some(post_type) = &self.post_type {
      idea.post_type = post_type.clone();
    }
    if let Some(topic) = &self.topic {
      idea.topic = topic.clone();
    }
    if let Some(intent) = &self.intent {
      idea.intent = intent.clone();
    }
    if let Some(status) = &self.status {
      idea.status = status.clone();
    }
    if let Some(audience) = &self.audience {
      idea.audience = audience.clone();
    }
  }
}

// Document operations
// ===================

// Serializes writers to ideas.json within this process
static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// All ideas, newest first.
pub async fn all() -> Result<Vec<Idea>> {
  let _guard = LOCK.lock().await;
  store::read_array(&config::ideas_path()?)
}

/// Capture a new idea from raw text.
pub async fn create(text: &str) -> Result<Idea> {
  let idea = Idea::new(text);
  prepend(vec![idea.clone()]).await?;
  Ok(idea)
}

/// Insert ideas at the front of the deck in a single write.
pub async fn prepend(new_ideas: Vec<Idea>) -> Result<()> {
  let _guard = LOCK.lock().await;
  let path = config::ideas_path()?;
  let mut ideas: Vec<Idea> = store::read_array(&path)?;
  for idea in new_ideas.into_iter().rev() {
    ideas.insert(0, idea);
  }
  store::write_array(&path, &ideas)
}

/// Mark an idea as used.
pub async fn mark_used(id: &str) -> Result<Idea> {
  let _guard = LOCK.lock().await;
  let path = config::ideas_path()?;
  let mut ideas: Vec<Idea> = store::read_array(&path)?;
  let idea = ideas
    .iter_mut()
    .find(|idea| idea.id == id)
    .ok_or_else(|| anyhow!("idea {id} not found"))?;
  idea.used = true;
  let updated = idea.clone();
  store::write_array(&path, &ideas)?;
  Ok(updated)
}

/// Apply a classification patch to an idea.
pub async fn update(id: &str, patch: &IdeaPatch) -> Result<Idea> {
  let _guard = LOCK.lock().await;
  let path = config::ideas_path()?;
  let mut ideas: Vec<Idea> = store::read_array(&path)?;
  let idea = ideas
    .iter_mut()
    .find(|idea| idea.id == id)
    .ok_or_else(|| anyhow!("idea {id} not found"))?;
  patch.apply(idea);
  let updated = idea.clone();
  store::write_array(&path, &ideas)?;
  Ok(updated)
}

/// Record an uploaded image for an idea.
pub async fn set_image(id: &str, image_url: &str) -> Result<Idea> {
  let _guard = LOCK.lock().await;
  let path = config::ideas_path()?;
  let mut ideas: Vec<Idea> = store::read_array(&path)?;
  let idea = ideas
    .iter_mut()
    .find(|idea| idea.id == id)
    .ok_or_else(|| anyhow!("idea {id} not found"))?;
  idea.image_url = Some(image_url.to_string());
  let updated = idea.clone();
  store::write_array(&path, &ideas)?;
  Ok(updated)
}

/// Delete one idea, returning the removed record.
pub async fn remove(id: &str) -> Result<Idea> {
  let _guard = LOCK.lock().await;
  let path = config::ideas_path()?;
  let mut ideas: Vec<Idea> = store::read_array(&path)?;
  let position = ideas
    .iter()
    .position(|idea| idea.id == id)
    .ok_or_else(|| anyhow!("idea {id} not found"))?;
  let removed = ideas.remove(position);
  store::write_array(&path, &ideas)?;
  Ok(removed)
}

/// Delete all ideas, returning how many were removed.
pub async fn clear() -> Result<usize> {
  let _guard = LOCK.lock().await;
  let path = config::ideas_path()?;
  let ideas: Vec<Idea> = store::read_array(&path)?;
  let removed = ideas.len();
  store::write_array::<Idea>(&path, &[])?;
  Ok(removed)
}
