//! Per-request workspace management
//!
//! Every download request gets its own directory under the configured temp
//! root, named by a fresh UUID. The directory is the root resource of the
//! request: the tool writes into it, the delivery stream reads out of it,
//! and it is removed on every exit path. Removal is structural (the
//! [`Workspace`] carries a `Drop` impl), so early returns, panics, and
//! client cancellation all reclaim the directory without cooperation from
//! the error path.

use crate::error::{ResourceError, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory-name prefix for all workspaces
///
/// Also the marker tests use to assert that no workspace survives a request.
pub const WORKSPACE_PREFIX: &str = "ripwave_";

/// Factory for per-request workspaces under a fixed temp root
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    temp_root: PathBuf,
}

impl WorkspaceManager {
    /// Create a manager rooted at `temp_root`
    ///
    /// The root itself is expected to exist (it is the system temp dir or a
    /// configured spool directory); only the per-request subdirectories are
    /// managed here.
    pub fn new(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
        }
    }

    /// The temp root this manager allocates under
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Allocate a fresh, uniquely named workspace directory
    ///
    /// The UUID in the name is the isolation mechanism: two concurrent
    /// requests can never share a directory, so no locking is needed
    /// anywhere in the pipeline.
    pub fn create(&self) -> Result<Workspace> {
        let id = Uuid::new_v4();
        let path = self.temp_root.join(format!("{WORKSPACE_PREFIX}{id}"));

        std::fs::create_dir_all(&path).map_err(|source| ResourceError::WorkspaceCreate {
            root: self.temp_root.clone(),
            source,
        })?;

        tracing::debug!(workspace = %path.display(), "Created workspace");
        Ok(Workspace { id, path })
    }
}

/// An exclusively owned temporary directory for one request
///
/// Destroyed exactly once: either explicitly via [`Workspace::destroy`] or
/// implicitly on drop. Both paths go through the same best-effort removal,
/// which swallows not-found so repeated teardown is harmless.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    path: PathBuf,
}

impl Workspace {
    /// The unique identifier embedded in the directory name
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The workspace directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursively remove the workspace directory
    ///
    /// Idempotent and infallible by contract: a missing directory is a
    /// no-op, and any other filesystem error is logged rather than raised;
    /// teardown must never mask the error that caused it.
    pub fn destroy(&self) {
        remove_tree(&self.path);
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        remove_tree(&self.path);
    }
}

fn remove_tree(path: &Path) {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!(workspace = %path.display(), "Removed workspace");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(workspace = %path.display(), error = %e, "Failed to remove workspace");
        }
    }
}
