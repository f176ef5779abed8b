//! Scoped cookie-jar materialization
//!
//! The environment supplies cookie credentials as a raw blob (the contents
//! of a Netscape-format cookies file). The extraction tool wants a file
//! path, so the blob is written to a named temp file whose lifetime spans a
//! single invocation. The jar is independent of the per-request workspace:
//! it is removed when dropped, whatever happens to the request.

use crate::error::{ResourceError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A cookie blob materialized to a temp file for one tool invocation
#[derive(Debug)]
pub struct CookieJar {
    file: NamedTempFile,
}

impl CookieJar {
    /// Write the blob to a fresh temp file
    pub fn materialize(blob: &str) -> Result<Self> {
        let mut file =
            NamedTempFile::new().map_err(|source| ResourceError::CookieJar { source })?;
        file.write_all(blob.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| ResourceError::CookieJar { source })?;
        Ok(Self { file })
    }

    /// Path handed to the tool via `--cookies`
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
