//! Shared fixtures for end-to-end pipeline tests.
//!
//! The extraction tool is stubbed with small shell scripts that honor the
//! contract the pipeline relies on: they receive the full argv, recover the
//! workspace directory from the `-o` output template, and leave (or refuse
//! to leave) files there.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use ripwave::Config;
use ripwave::api::create_router;
use ripwave::workspace::WORKSPACE_PREFIX;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shell preamble that recovers the workspace dir from the -o template
const PARSE_OUTPUT_DIR: &str = r#"
tpl=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then tpl="$a"; fi
  prev="$a"
done
dir=$(dirname "$tpl")
"#;

/// Write an executable stub extraction tool into `dir`
pub fn write_stub(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("yt-dlp-stub");
    fs::write(&path, format!("#!/bin/sh\n{PARSE_OUTPUT_DIR}\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Config pointing the pipeline at the stub and a private temp root
pub fn stub_config(root: &Path, stub: PathBuf) -> Config {
    let mut config = Config::default();
    config.tools.ytdlp_path = Some(stub);
    // Forwarded as a flag only; the stub never runs it
    config.tools.ffmpeg_path = Some(PathBuf::from("/usr/bin/ffmpeg"));
    config.tools.search_path = false;
    config.pipeline.temp_root = Some(root.to_path_buf());
    config
}

/// Router serving the pipeline with the given stub body
pub fn stub_router(root: &Path, stub_body: &str) -> Router {
    let stub = write_stub(root, stub_body);
    create_router(Arc::new(stub_config(root, stub)))
}

/// A POST /download request with the standard test body
pub fn download_request(url: &str, format_id: &str, ext: &str) -> Request<Body> {
    let body = serde_json::json!({
        "url": url,
        "formatId": format_id,
        "ext": ext,
    });
    Request::builder()
        .method("POST")
        .uri("/download")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Count surviving workspace directories under the temp root
pub fn workspace_count(root: &Path) -> usize {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|n| n.starts_with(WORKSPACE_PREFIX))
        })
        .count()
}

/// True when a process with the given pid is still alive
pub fn pid_alive(pid: &str) -> bool {
    std::process::Command::new("kill")
        .args(["-0", pid])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
