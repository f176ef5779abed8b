//! Request sequencing for the acquisition and delivery pipeline
//!
//! One call runs a validated request through the whole pipeline: allocate a
//! workspace, resolve the format plan, execute the extraction tool, select
//! the output artifact, and open it for streaming. The workspace is created
//! here and moved into the delivery stream at the end; any error in between
//! drops it, which tears the directory down before the error surfaces.

use crate::config::Config;
use crate::delivery::MediaDelivery;
use crate::error::{ProcessError, Result};
use crate::types::DownloadRequest;
use crate::workspace::WorkspaceManager;
use crate::{fetch, format};

/// Run one download request to the point where streaming can begin
///
/// The request has already passed validation, so this always allocates a
/// workspace. The subprocess wait inside [`fetch::execute`] is the only
/// long-blocking step and it is fully async; the caller's accept loop is
/// never starved.
pub async fn run(config: &Config, request: DownloadRequest) -> Result<MediaDelivery> {
    let workspace = WorkspaceManager::new(config.temp_root()).create()?;

    tracing::info!(
        workspace = %workspace.id(),
        url = %request.url,
        format_id = %request.format_id,
        "Starting download"
    );

    let plan = format::resolve(&request.format_id, request.ext);

    let result = fetch::execute(&workspace, &plan, &request.url, config).await?;

    // execute() guarantees a non-empty listing; the guard is for the type,
    // not the runtime
    let artifact = result
        .produced_files
        .first()
        .cloned()
        .ok_or(ProcessError::NoOutput)?;

    MediaDelivery::open(
        workspace,
        &artifact,
        plan.mime_type,
        config.pipeline.stream_chunk_bytes,
    )
    .await
}
