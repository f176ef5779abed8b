//! Core request types shared across the pipeline and the API

use crate::error::{Error, Result};
use serde::Deserialize;
use utoipa::ToSchema;

/// Target container/codec family requested by the caller
///
/// Parsed from the opaque `ext` string supplied by the metadata-lookup
/// collaborator. Anything that is not literally `mp3` or `mp4` is carried
/// as [`TargetExt::Other`] and treated like a video request downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetExt {
    /// MP4 video container
    Mp4,
    /// MP3 audio
    Mp3,
    /// Any other extension string
    Other,
}

impl TargetExt {
    /// Parse the wire `ext` string
    pub fn parse(ext: &str) -> Self {
        match ext {
            "mp4" => TargetExt::Mp4,
            "mp3" => TargetExt::Mp3,
            _ => TargetExt::Other,
        }
    }
}

/// Wire shape of the inbound download request body
///
/// All fields are optional at the deserialization layer so that presence
/// checking is a validation concern (with a proper 400 response) rather than
/// a JSON parse failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DownloadParams {
    /// Source media URL
    #[serde(default)]
    pub url: Option<String>,

    /// Format selector produced by the metadata-lookup collaborator
    #[serde(default, rename = "formatId")]
    pub format_id: Option<String>,

    /// Requested target extension (opaque; only "mp3"/"mp4" are meaningful)
    #[serde(default)]
    pub ext: Option<String>,
}

/// A validated download request
///
/// Immutable once constructed. `url` and `format_id` are guaranteed
/// non-empty; no further validation is applied, since both values are opaque
/// strings owned by the metadata-lookup collaborator.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Source media URL
    pub url: String,
    /// Format selector
    pub format_id: String,
    /// Target extension
    pub ext: TargetExt,
}

impl DownloadRequest {
    /// Validate wire parameters into a request
    ///
    /// Fails with [`Error::Validation`] when `url` or `formatId` is missing
    /// or empty. No resource is allocated before this check passes.
    pub fn from_params(params: DownloadParams) -> Result<Self> {
        let url = params.url.unwrap_or_default();
        let format_id = params.format_id.unwrap_or_default();

        if url.is_empty() || format_id.is_empty() {
            return Err(Error::Validation("URL and format are required".to_string()));
        }

        Ok(Self {
            url,
            format_id,
            ext: TargetExt::parse(params.ext.as_deref().unwrap_or("")),
        })
    }
}
