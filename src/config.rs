//! Configuration types for ripwave

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Environment variable holding an optional proxy endpoint for the extraction tool
pub const ENV_PROXY: &str = "RIPWAVE_PROXY";

/// Environment variable holding an optional raw cookie-file blob
///
/// The blob is the full contents of a Netscape-format cookies file; it is
/// materialized to a scoped temp file for each tool invocation that needs it.
pub const ENV_COOKIES: &str = "YOUTUBE_COOKIES";

/// External tool paths (yt-dlp, ffmpeg, aria2c)
///
/// Groups settings for the external binaries the pipeline invokes.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected from PATH if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Path to the ffmpeg executable (auto-detected from PATH if None)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Path to the aria2c executable (auto-detected from PATH if None)
    ///
    /// aria2c is optional: when present it is handed the raw byte transfer
    /// as a parallel-fragment downloader. Its absence never fails a request.
    #[serde(default)]
    pub aria2c_path: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_path: None,
            aria2c_path: None,
            search_path: true,
        }
    }
}

/// Acquisition pipeline bounds and tuning
///
/// Groups the resource limits applied to each tool invocation and the
/// delivery chunking. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PipelineConfig {
    /// Root directory for per-request workspaces (default: the system temp dir)
    #[serde(default)]
    pub temp_root: Option<PathBuf>,

    /// Hard wall-clock timeout for a tool invocation, in seconds (default: 240)
    #[serde(default = "default_process_timeout_secs")]
    pub process_timeout_secs: u64,

    /// Socket-level timeout passed to the tool, in seconds (default: 30)
    ///
    /// Distinct from the wall-clock timeout: this bounds individual network
    /// reads inside the tool, not the whole invocation.
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,

    /// Extractor retry count passed to the tool (default: 3)
    ///
    /// Retries live inside the tool; this core never re-invokes it.
    #[serde(default = "default_extractor_retries")]
    pub extractor_retries: u32,

    /// Cap on captured stdout/stderr diagnostic text, in bytes (default: 100 MiB)
    ///
    /// Exceeding the cap terminates the subprocess the same way the
    /// wall-clock timeout does.
    #[serde(default = "default_max_capture_bytes")]
    pub max_capture_bytes: usize,

    /// Chunk size for streaming the artifact to the client, in bytes (default: 64 KiB)
    #[serde(default = "default_stream_chunk_bytes")]
    pub stream_chunk_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_root: None,
            process_timeout_secs: default_process_timeout_secs(),
            socket_timeout_secs: default_socket_timeout_secs(),
            extractor_retries: default_extractor_retries(),
            max_capture_bytes: default_max_capture_bytes(),
            stream_chunk_bytes: default_stream_chunk_bytes(),
        }
    }
}

impl PipelineConfig {
    /// Wall-clock timeout as a [`Duration`]
    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }
}

/// Cross-cutting network configuration injected into tool invocations
///
/// Both fields are optional and typically sourced from the environment via
/// [`Config::from_env`]; they are threaded through explicitly so the
/// orchestrator stays testable with injected values.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NetworkConfig {
    /// Proxy endpoint for all tool network traffic (e.g. "socks5://127.0.0.1:9050")
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Raw cookie-file contents, materialized to a temp file per invocation
    #[serde(default)]
    pub cookies_blob: Option<String>,
}

impl NetworkConfig {
    /// Read proxy and cookie settings from the process environment
    ///
    /// An unparseable proxy URL is dropped with a warning rather than
    /// failing startup; a bad proxy should not take the service down.
    pub fn from_env() -> Self {
        let proxy_url = std::env::var(ENV_PROXY).ok().filter(|raw| {
            match url::Url::parse(raw) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(proxy = %raw, error = %e, "Ignoring unparseable proxy URL");
                    false
                }
            }
        });

        let cookies_blob = std::env::var(ENV_COOKIES).ok().filter(|b| !b.is_empty());

        Self {
            proxy_url,
            cookies_blob,
        }
    }
}

/// API server configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Bind address for the REST API (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS middleware (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" allows any (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve the interactive Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
        }
    }
}

/// Main configuration for ripwave
///
/// Fields are organized into logical sub-configs:
/// - [`tools`](ToolsConfig) - external binary paths and PATH discovery
/// - [`pipeline`](PipelineConfig) - timeouts, capture cap, chunking, temp root
/// - [`network`](NetworkConfig) - proxy and cookie injection
/// - [`server`](ApiConfig) - REST API settings
///
/// All sub-config fields are flattened so the JSON/TOML file format stays
/// flat (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// External tool paths and PATH discovery
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Pipeline bounds and tuning
    #[serde(flatten)]
    pub pipeline: PipelineConfig,

    /// Proxy and cookie injection
    #[serde(flatten)]
    pub network: NetworkConfig,

    /// REST API settings
    #[serde(flatten)]
    pub server: ApiConfig,
}

impl Config {
    /// Default configuration with network settings read from the environment
    ///
    /// This is the single point where `RIPWAVE_PROXY` and `YOUTUBE_COOKIES`
    /// are consulted; everything downstream receives them as plain config
    /// values.
    pub fn from_env() -> Self {
        Self {
            network: NetworkConfig::from_env(),
            ..Self::default()
        }
    }

    /// Workspace root directory, falling back to the system temp dir
    pub fn temp_root(&self) -> PathBuf {
        self.pipeline
            .temp_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

fn default_true() -> bool {
    true
}

fn default_process_timeout_secs() -> u64 {
    240
}

fn default_socket_timeout_secs() -> u64 {
    30
}

fn default_extractor_retries() -> u32 {
    3
}

fn default_max_capture_bytes() -> usize {
    100 * 1024 * 1024
}

fn default_stream_chunk_bytes() -> usize {
    64 * 1024
}

#[allow(clippy::expect_used)]
fn default_bind_address() -> SocketAddr {
    "127.0.0.1:8080"
        .parse()
        .expect("default bind address is valid")
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
