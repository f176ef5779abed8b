//! External tool resolution
//!
//! Binaries come from explicit config paths first, then PATH discovery via
//! the `which` crate when `search_path` is enabled. yt-dlp and ffmpeg are
//! required; aria2c is a pure performance substitution and its absence is
//! never an error.

use crate::config::ToolsConfig;
use crate::error::ProcessError;
use std::path::PathBuf;

/// The set of binaries one invocation runs with
#[derive(Debug, Clone)]
pub struct ResolvedTools {
    /// Extraction tool
    pub ytdlp: PathBuf,
    /// Remux/transcode tool, passed to the extractor via `--ffmpeg-location`
    pub ffmpeg: PathBuf,
    /// Parallel-fragment downloader, delegated to when present
    pub aria2c: Option<PathBuf>,
}

impl ResolvedTools {
    /// Resolve all tool paths from config
    ///
    /// Fails with [`ProcessError::Launch`] when a required binary has no
    /// explicit path and cannot be found on PATH.
    pub fn resolve(config: &ToolsConfig) -> Result<Self, ProcessError> {
        Ok(Self {
            ytdlp: require("yt-dlp", config.ytdlp_path.as_ref(), config.search_path)?,
            ffmpeg: require("ffmpeg", config.ffmpeg_path.as_ref(), config.search_path)?,
            aria2c: optional("aria2c", config.aria2c_path.as_ref(), config.search_path),
        })
    }
}

fn require(
    name: &str,
    explicit: Option<&PathBuf>,
    search_path: bool,
) -> Result<PathBuf, ProcessError> {
    if let Some(path) = explicit {
        return Ok(path.clone());
    }
    if search_path && let Ok(path) = which::which(name) {
        return Ok(path);
    }
    Err(ProcessError::Launch(format!(
        "{name} not found (set an explicit path or install it on PATH)"
    )))
}

fn optional(name: &str, explicit: Option<&PathBuf>, search_path: bool) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.clone());
    }
    if search_path {
        return which::which(name).ok();
    }
    None
}
