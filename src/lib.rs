//! # ripwave
//!
//! Backend library for a media download service: submit a media URL plus a
//! resolved format selection, receive the transcoded artifact as a stream.
//!
//! ## Design Philosophy
//!
//! ripwave is designed to be:
//! - **Resource-safe** - Every request's temporary state is reclaimed on
//!   every exit path: success, tool failure, timeout, client disconnect
//! - **Bounded** - The external toolchain runs under a wall-clock timeout
//!   and a diagnostic capture cap, and artifacts are streamed, never
//!   buffered whole
//! - **Lock-free** - Concurrent requests are isolated purely by
//!   UUID-per-request temp directories; there is no shared mutable state
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use ripwave::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads RIPWAVE_PROXY / YOUTUBE_COOKIES once, here
//!     let config = Arc::new(Config::from_env());
//!
//!     // Serve POST /download until shutdown
//!     ripwave::api::start_api_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! The pipeline can also be driven directly, without the HTTP layer:
//!
//! ```no_run
//! use ripwave::{Config, DownloadRequest};
//! use ripwave::types::DownloadParams;
//!
//! # async fn example() -> ripwave::Result<()> {
//! let config = Config::from_env();
//! let request = DownloadRequest::from_params(DownloadParams {
//!     url: Some("https://youtu.be/abc".into()),
//!     format_id: Some("22".into()),
//!     ext: Some("mp4".into()),
//! })?;
//!
//! let delivery = ripwave::pipeline::run(&config, request).await?;
//! println!("{} ({} bytes)", delivery.filename, delivery.content_length);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Artifact delivery streaming
pub mod delivery;
/// Error types
pub mod error;
/// Process orchestration for the extraction toolchain
pub mod fetch;
/// Format plan resolution
pub mod format;
/// Request sequencing
pub mod pipeline;
/// Core request types
pub mod types;
/// Per-request workspace management
pub mod workspace;

pub use config::Config;
pub use delivery::MediaDelivery;
pub use error::{Error, ProcessError, ResourceError, Result};
pub use format::FormatPlan;
pub use types::{DownloadRequest, TargetExt};
pub use workspace::{Workspace, WorkspaceManager};
