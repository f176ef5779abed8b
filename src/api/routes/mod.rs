//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`download`] - The acquisition and delivery pipeline
//! - [`system`] - Health and the OpenAPI spec

mod download;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use download::*;
pub use system::*;
