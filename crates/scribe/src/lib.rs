//! Scribe - console logging and persistent journaling
//!
//! Console functions write levelled, colored lines to stderr. The
//! [`journal`] module adds a disk-backed JSONL journal with per-request
//! context, so a service can answer "what happened" after the fact
//! without scraping its terminal output.

use colored::*;

pub mod journal;

pub use journal::{Entry, Journal, Level, RequestInfo};

/// Write a raw line to stderr, splitting multi-line messages.
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn prefix(level: Level) -> String {
  let tag = level.tag();
  let colored_tag = match level {
    Level::Debug => tag.magenta().bold(),
    Level::Info => tag.blue().bold(),
    Level::Success => tag.green().bold(),
    Level::Warn => tag.yellow().bold(),
    Level::Error => tag.red().bold(),
  };
  format!("[{colored_tag}]{:<pad$}", "", pad = 6 - tag.len())
}

fn emit(level: Level, message: &str) {
  let prefix = prefix(level);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Detailed diagnostic output.
pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

/// General information.
pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Something completed successfully.
pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Something needs attention.
pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

/// Something went wrong.
pub fn error(message: &str) {
  emit(Level::Error, message);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefixes_are_padded_to_equal_width() {
    colored::control::set_override(false);
    let widths: Vec<usize> = [Level::Debug, Level::Info, Level::Success, Level::Warn, Level::Error]
      .into_iter()
      .map(|level| prefix(level).len())
      .collect();
    assert!(widths.windows(2).all(|w| w[0] == w[1]), "uneven prefixes: {widths:?}");
    colored::control::unset_override();
  }
}
