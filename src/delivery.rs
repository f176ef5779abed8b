//! Artifact delivery streaming
//!
//! Turns the produced file into a lazy, single-pass chunk stream and carries
//! the response metadata alongside it. The stream owns the request's
//! [`Workspace`], which makes the teardown guarantee structural: whichever
//! way the stream ends (fully consumed, read error, or dropped by the
//! transport when the client disconnects), dropping it closes the file
//! handle and then removes the workspace directory.

use crate::error::{Error, Result};
use crate::workspace::Workspace;
use axum::body::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::io::ReaderStream;

/// Filename used when sanitization strips a name down to nothing
pub const FALLBACK_FILENAME: &str = "ripwave_download";

/// Upper bound on sanitized filename length, in bytes
const MAX_FILENAME_BYTES: usize = 100;

/// Characters unsafe in filesystems or `Content-Disposition` headers
const UNSAFE_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// A single-pass chunk stream over the output artifact
///
/// Non-restartable by design: one request, one read of the file.
#[derive(Debug)]
pub struct ArtifactStream {
    // Field order is load-bearing: `inner` drops before `workspace`, so the
    // artifact file handle is closed before the directory is removed.
    inner: ReaderStream<tokio::fs::File>,
    workspace: Workspace,
}

impl Stream for ArtifactStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(Some(Err(e))) = &poll {
            // Headers are already on the wire; the transport aborts the
            // connection and dropping this stream still tears down
            tracing::warn!(workspace = %self.workspace.id(), error = %e, "Artifact read failed mid-stream");
        }
        poll
    }
}

/// Everything the transport needs to deliver one artifact
#[derive(Debug)]
pub struct MediaDelivery {
    /// The artifact bytes, chunked
    pub stream: ArtifactStream,
    /// Content type resolved from the format plan
    pub mime_type: &'static str,
    /// Sanitized attachment filename
    pub filename: String,
    /// Exact artifact size from a stat call
    pub content_length: u64,
}

impl MediaDelivery {
    /// Open the artifact for streaming, taking ownership of the workspace
    ///
    /// The workspace is moved into the stream here; from this point on its
    /// teardown is tied to the stream's drop. An open or stat failure drops
    /// the workspace immediately, so even the error path tears down.
    pub async fn open(
        workspace: Workspace,
        artifact: &Path,
        mime_type: &'static str,
        chunk_bytes: usize,
    ) -> Result<Self> {
        let file = tokio::fs::File::open(artifact)
            .await
            .map_err(|e| Error::Stream(format!("failed to open artifact: {e}")))?;
        let content_length = file
            .metadata()
            .await
            .map_err(|e| Error::Stream(format!("failed to stat artifact: {e}")))?
            .len();

        let filename = sanitize_filename(
            artifact
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default(),
        );

        tracing::debug!(
            workspace = %workspace.id(),
            filename = %filename,
            content_length,
            "Opening artifact for delivery"
        );

        Ok(Self {
            stream: ArtifactStream {
                inner: ReaderStream::with_capacity(file, chunk_bytes),
                workspace,
            },
            mime_type,
            filename,
            content_length,
        })
    }
}

/// Sanitize an artifact base name for filesystem and header use
///
/// ASCII-only output: every non-printable or unsafe character and every
/// whitespace character becomes `_`, runs of `_` collapse to one, and the
/// result is capped at 100 bytes. Idempotent: sanitizing a sanitized name
/// returns it unchanged. Degenerate input falls back to
/// [`FALLBACK_FILENAME`].
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_FILENAME_BYTES));

    for c in name.chars() {
        let mapped = if !(' '..='~').contains(&c) || UNSAFE_CHARS.contains(&c) || c == ' ' {
            '_'
        } else {
            c
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
        if out.len() >= MAX_FILENAME_BYTES {
            break;
        }
    }

    out.truncate(MAX_FILENAME_BYTES);
    if out.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    out
}
