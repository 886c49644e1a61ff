//! Profile tags produced by the analyze endpoints

use anyhow::Result;
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::server::config;
use crate::server::models::store;

/// The user's content-strategy profile, one object per deck.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tags {
  /// What the user does
  #[serde(default)]
  pub discipline: String,

  /// Who they do it for
  #[serde(default)]
  pub market: String,

  /// Ideal customer profile keywords
  #[serde(default)]
  pub customer_profile: String,

  /// Recurring content themes
  #[serde(default)]
  pub topic_pillars: String,
}

static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Current tags; all-empty defaults when never saved.
pub async fn load() -> Result<Tags> {
  let _guard = LOCK.lock().await;
  store::read_object(&config::tags_path()?)
}

/// Replace the stored tags.
pub async fn save(tags: &Tags) -> Result<()> {
  let _guard = LOCK.lock().await;
  store::write_json(&config::tags_path()?, tags)
}
