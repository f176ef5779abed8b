//! Download handler: the transport face of the acquisition pipeline.

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::pipeline;
use crate::types::{DownloadParams, DownloadRequest};
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};

/// POST /download - Run the acquisition pipeline and stream the artifact
///
/// Validation happens before any resource allocation: a missing or empty
/// `url`/`formatId` is rejected with 400 and no workspace is created. From
/// there the request is sequenced through the pipeline and the artifact is
/// streamed back; workspace teardown rides on the response body's drop, so
/// it runs whether the client reads to the end or disconnects mid-stream.
#[utoipa::path(
    post,
    path = "/download",
    tag = "download",
    request_body = DownloadParams,
    responses(
        (status = 200, description = "Artifact bytes (Content-Disposition attachment, exact Content-Length, caching disabled)", content_type = "application/octet-stream"),
        (status = 400, description = "Missing url or formatId", body = crate::error::ApiError),
        (status = 403, description = "Source content is private or age-restricted", body = crate::error::ApiError),
        (status = 404, description = "Source content is unavailable", body = crate::error::ApiError),
        (status = 502, description = "Extraction tool failed or produced no output", body = crate::error::ApiError),
        (status = 503, description = "Extraction tool is not available on this host", body = crate::error::ApiError),
        (status = 504, description = "Extraction exceeded the configured timeout", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Json(params): Json<DownloadParams>,
) -> Result<Response> {
    let request = DownloadRequest::from_params(params)?;

    let delivery = pipeline::run(&state.config, request).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, delivery.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", delivery.filename),
        )
        .header(header::CONTENT_LENGTH, delivery.content_length)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(delivery.stream))
        .map_err(|e| Error::ApiServer(format!("failed to build response: {e}")))
}
