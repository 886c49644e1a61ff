//! Whole-document JSON persistence helpers
//!
//! The storage format is deliberately boring: one pretty-printed JSON
//! document per file, read and rewritten in full. Callers must hold the
//! owning model's lock across a read-modify-write.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a JSON array document. A missing file reads as empty.
pub fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
  if !path.exists() {
    return Ok(Vec::new());
  }
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {}", path.display()))?;
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }
  serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Write a JSON array document, creating parent directories as needed.
pub fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
  write_json(path, &items)
}

/// Read a JSON object document. A missing file reads as the default.
pub fn read_object<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
  if !path.exists() {
    return Ok(T::default());
  }
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {}", path.display()))?;
  if raw.trim().is_empty() {
    return Ok(T::default());
  }
  serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Write any serializable value as a pretty-printed document.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let body = serde_json::to_string_pretty(value)?;
  std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn missing_array_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let items: Vec<String> = read_array(&dir.path().join("none.json")).unwrap();
    assert!(items.is_empty());
  }

  #[test]
  fn array_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("items.json");

    write_array(&path, &["a".to_string(), "b".to_string()]).unwrap();
    let items: Vec<String> = read_array(&path).unwrap();
    assert_eq!(items, vec!["a", "b"]);
  }

  #[test]
  fn corrupt_document_is_an_error_not_a_reset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result: Result<Vec<String>> = read_array(&path);
    assert!(result.is_err());
  }
}
