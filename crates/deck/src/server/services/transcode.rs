//! Audio transcoding via the system ffmpeg binary

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Convert an uploaded audio file to WAV next to the input, returning
/// the output path. Requires `ffmpeg` on PATH.
pub async fn to_wav(input: &Path) -> Result<PathBuf> {
  let output = PathBuf::from(format!("{}.wav", input.display()));

  let status = Command::new("ffmpeg")
    .arg("-y")
    .arg("-i")
    .arg(input)
    .arg("-f")
    .arg("wav")
    .arg(&output)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .stdin(Stdio::null())
    .status()
    .await
    .map_err(|e| anyhow!("failed to run ffmpeg (is it installed?): {e}"))?;

  if !status.success() {
    return Err(anyhow!("ffmpeg exited with {status}"));
  }
  Ok(output)
}

/// Best-effort removal of transient capture files.
pub fn cleanup<P: AsRef<Path>>(paths: &[P]) {
  for path in paths {
    let path = path.as_ref();
    if path.exists() {
      let _ = std::fs::remove_file(path);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wav_path_appends_extension() {
    let output = PathBuf::from(format!("{}.wav", Path::new("/tmp/u/clip.webm").display()));
    assert_eq!(output, PathBuf::from("/tmp/u/clip.webm.wav"));
  }

  #[test]
  fn cleanup_ignores_missing_files() {
    cleanup(&[Path::new("/tmp/definitely-not-here-12345")]);
  }
}
