//! Disk-backed JSONL journal for long-running services
//!
//! Every entry is one JSON line: timestamp, level, component, message,
//! and (for HTTP-serving processes) the request it belongs to. Writes
//! are serialized through an internal async mutex so concurrent tasks
//! never interleave partial lines.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;

// Types
// =====

/// Journal severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Debug,
  Info,
  Success,
  Warn,
  Error,
}

impl Level {
  /// Short console tag for the level.
  pub fn tag(self) -> &'static str {
    match self {
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "ok",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }
}

impl FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Level::Debug),
      "info" => Ok(Level::Info),
      "success" | "ok" => Ok(Level::Success),
      "warn" | "warning" => Ok(Level::Warn),
      "error" => Ok(Level::Error),
      other => Err(format!("unknown level: {other}")),
    }
  }
}

/// The HTTP request an entry was recorded under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct RequestInfo {
  /// Correlation id shared by all entries of one request
  pub request_id: String,

  /// HTTP method
  pub method: String,

  /// Request path
  pub path: String,

  /// Response status, once known
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<u16>,

  /// Wall-clock handling time, once known
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,
}

/// One journal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct Entry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub component: String,
  pub message: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub request: Option<RequestInfo>,
}

struct JournalInner {
  path: PathBuf,
  echo: bool,
}

/// Thread-safe JSONL journal. Cloning shares the underlying file.
#[derive(Clone)]
pub struct Journal {
  inner: Arc<Mutex<JournalInner>>,
}

// Implementation
// ==============

impl JournalInner {
  fn open(path: &Path, echo: bool) -> std::io::Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
      File::create(path)?;
    }
    Ok(Self { path: path.to_path_buf(), echo })
  }

  fn append(&self, entry: &Entry) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{line}")?;
    file.flush()
  }

  fn read_recent(&self, limit: Option<usize>, level: Option<Level>) -> std::io::Result<Vec<Entry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(&self.path)?);
    let mut entries = VecDeque::new();
    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }
      // Malformed lines are skipped rather than poisoning the whole read
      let Ok(entry) = serde_json::from_str::<Entry>(&line) else { continue };
      if level.is_some_and(|wanted| entry.level != wanted) {
        continue;
      }
      entries.push_back(entry);
      if let Some(limit) = limit {
        while entries.len() > limit {
          entries.pop_front();
        }
      }
    }

    Ok(entries.into())
  }
}

impl Journal {
  /// Open (creating if necessary) a journal at the given path.
  pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
    Self::open_with_echo(path, true)
  }

  /// Open a journal, optionally suppressing console echo.
  pub fn open_with_echo<P: AsRef<Path>>(path: P, echo: bool) -> std::io::Result<Self> {
    let inner = JournalInner::open(path.as_ref(), echo)?;
    Ok(Self { inner: Arc::new(Mutex::new(inner)) })
  }

  /// Record an entry. Errors are swallowed; journaling must never take
  /// the service down.
  pub async fn record(&self, level: Level, message: &str, component: &str) {
    self.record_inner(level, message, component, None).await;
  }

  /// Record an entry tied to an HTTP request.
  pub async fn record_request(
    &self,
    level: Level,
    message: &str,
    component: &str,
    request: RequestInfo,
  ) {
    self.record_inner(level, message, component, Some(request)).await;
  }

  async fn record_inner(
    &self,
    level: Level,
    message: &str,
    component: &str,
    request: Option<RequestInfo>,
  ) {
    let entry = Entry {
      timestamp: Utc::now(),
      level,
      component: component.to_string(),
      message: message.to_string(),
      request,
    };

    let guard = self.inner.lock().await;
    let _ = guard.append(&entry);
    if guard.echo {
      match level {
        Level::Debug => crate::debug(message),
        Level::Info => crate::info(message),
        Level::Success => crate::success(message),
        Level::Warn => crate::warn(message),
        Level::Error => crate::error(message),
      }
    }
  }

  /// The most recent entries, oldest first, optionally filtered by level.
  pub async fn recent(
    &self,
    limit: Option<usize>,
    level: Option<Level>,
  ) -> std::io::Result<Vec<Entry>> {
    let guard = self.inner.lock().await;
    guard.read_recent(limit, level)
  }

  /// Path of the backing file.
  pub async fn path(&self) -> PathBuf {
    self.inner.lock().await.path.clone()
  }

  pub async fn info(&self, message: &str, component: &str) {
    self.record(Level::Info, message, component).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.record(Level::Success, message, component).await;
  }

  pub async fn warn(&self, message: &str, component: &str) {
    self.record(Level::Warn, message, component).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.record(Level::Error, message, component).await;
  }

  pub async fn debug(&self, message: &str, component: &str) {
    self.record(Level::Debug, message, component).await;
  }
}

// Tests
// =====

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn temp_journal() -> (TempDir, Journal) {
    let dir = TempDir::new().unwrap();
    let journal = Journal::open_with_echo(dir.path().join("test.jsonl"), false).unwrap();
    (dir, journal)
  }

  #[tokio::test]
  async fn open_creates_file_and_parents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deep").join("j.jsonl");
    let journal = Journal::open_with_echo(&path, false).unwrap();
    assert!(path.exists());
    assert_eq!(journal.path().await, path);
  }

  #[tokio::test]
  async fn entries_round_trip_through_disk() {
    let (_dir, journal) = temp_journal();

    journal.info("first", "tests").await;
    journal.warn("second", "tests").await;

    let entries = journal.recent(None, None).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "first");
    assert_eq!(entries[0].level, Level::Info);
    assert_eq!(entries[1].message, "second");
    assert_eq!(entries[1].level, Level::Warn);
  }

  #[tokio::test]
  async fn request_context_is_preserved() {
    let (_dir, journal) = temp_journal();

    let request = RequestInfo {
      request_id: "req-1".to_string(),
      method: "POST".to_string(),
      path: "/ideas".to_string(),
      status: Some(200),
      duration_ms: Some(1.25),
    };
    journal.record_request(Level::Success, "done", "http", request).await;

    let entries = journal.recent(None, None).await.unwrap();
    let request = entries[0].request.as_ref().expect("request info");
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/ideas");
    assert_eq!(request.status, Some(200));
  }

  #[tokio::test]
  async fn level_filter_and_limit_apply() {
    let (_dir, journal) = temp_journal();

    for i in 0..5 {
      journal.info(&format!("info {i}"), "tests").await;
      journal.error(&format!("error {i}"), "tests").await;
    }

    let errors = journal.recent(None, Some(Level::Error)).await.unwrap();
    assert_eq!(errors.len(), 5);
    assert!(errors.iter().all(|e| e.level == Level::Error));

    // Limit keeps the most recent entries, oldest first
    let limited = journal.recent(Some(3), Some(Level::Error)).await.unwrap();
    assert_eq!(limited.len(), 3);
    assert_eq!(limited[0].message, "error 2");
    assert_eq!(limited[2].message, "error 4");
  }

  #[tokio::test]
  async fn malformed_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("j.jsonl");
    std::fs::write(
      &path,
      "{\"timestamp\":\"2026-01-01T00:00:00Z\",\"level\":\"info\",\"component\":\"t\",\"message\":\"good\"}\nnot json\n",
    )
    .unwrap();

    let journal = Journal::open_with_echo(&path, false).unwrap();
    let entries = journal.recent(None, None).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "good");
  }

  #[tokio::test]
  async fn concurrent_writers_all_land() {
    let (_dir, journal) = temp_journal();

    let mut handles = Vec::new();
    for i in 0..10 {
      let journal = journal.clone();
      handles.push(tokio::spawn(async move {
        journal.info(&format!("message {i}"), "concurrent").await;
      }));
    }
    for handle in handles {
      handle.await.unwrap();
    }

    let entries = journal.recent(None, None).await.unwrap();
    assert_eq!(entries.len(), 10);
  }

  #[test]
  fn level_parses_from_query_strings() {
    assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
    assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("ok".parse::<Level>().unwrap(), Level::Success);
    assert!("loud".parse::<Level>().is_err());
  }
}
