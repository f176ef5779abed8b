//! Process orchestration for the extraction toolchain
//!
//! Builds and runs one yt-dlp invocation per request against the request's
//! workspace, bounded by a wall-clock timeout and a diagnostic capture cap.
//! The child is held as an owned handle spawned with `kill_on_drop`, so the
//! terminate-on-timeout and terminate-on-cancellation contracts are
//! structural: abandoning the in-flight future can never orphan the tool
//! with the workspace open.

pub mod cookies;
pub mod tools;

use crate::config::Config;
use crate::error::{ProcessError, Result};
use crate::format::FormatPlan;
use crate::workspace::Workspace;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

/// Output-path template handed to the tool, scoped to the workspace
///
/// `%(title)s`/`%(ext)s` are substituted by the tool itself.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Downloader arguments used when delegating transport to aria2c
const ARIA2C_ARGS: &str = "aria2c:-x16 -s16 -k1M";

/// How much diagnostic text is kept for error reporting
///
/// The full capture is bounded by the configured cap; errors carry only the
/// tail, which is where the tool prints its final ERROR line.
const DIAGNOSTIC_TAIL_BYTES: usize = 2048;

/// Outcome of a completed tool invocation
///
/// Valid only while the owning [`Workspace`] is alive; the paths point into
/// it.
#[derive(Debug)]
pub struct ProcessResult {
    /// Subprocess exit code
    pub exit_code: i32,
    /// Files present in the workspace after the run, sorted by file name
    pub produced_files: Vec<PathBuf>,
}

/// Run the extraction tool for one request
///
/// On success the workspace contains at least one produced file. Every
/// failure mode maps to a [`ProcessError`]: spawn problems to `Launch`,
/// bound violations to `Timeout`, non-zero exits to `ToolFailure` with the
/// captured diagnostic tail, and a clean exit with an empty workspace to
/// `NoOutput`.
pub async fn execute(
    workspace: &Workspace,
    plan: &FormatPlan,
    url: &str,
    config: &Config,
) -> Result<ProcessResult> {
    let tools = tools::ResolvedTools::resolve(&config.tools)?;

    // The jar outlives the child but not this call; it is scoped to the
    // invocation, independent of the workspace.
    let cookie_jar = match &config.network.cookies_blob {
        Some(blob) => Some(cookies::CookieJar::materialize(blob)?),
        None => None,
    };

    let output_template = workspace.path().join(OUTPUT_TEMPLATE);

    let mut cmd = Command::new(&tools.ytdlp);
    cmd.args(&plan.tool_args)
        .arg("--ffmpeg-location")
        .arg(&tools.ffmpeg)
        .arg("--no-playlist")
        .arg("--no-check-certificates")
        .arg("--extractor-retries")
        .arg(config.pipeline.extractor_retries.to_string())
        .arg("--socket-timeout")
        .arg(config.pipeline.socket_timeout_secs.to_string());

    if let Some(jar) = &cookie_jar {
        cmd.arg("--cookies").arg(jar.path());
    }
    if let Some(proxy) = &config.network.proxy_url {
        cmd.arg("--proxy").arg(proxy);
    }
    if let Some(aria2c) = &tools.aria2c {
        cmd.arg("--downloader")
            .arg(aria2c)
            .arg("--downloader-args")
            .arg(ARIA2C_ARGS);
    }

    cmd.arg("-o").arg(&output_template).arg(url);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(command = ?cmd.as_std(), "Running extraction tool");

    let mut child = cmd.spawn().map_err(|e| {
        ProcessError::Launch(format!("failed to spawn {}: {e}", tools.ytdlp.display()))
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let cap = config.pipeline.max_capture_bytes;
    let timeout = config.pipeline.process_timeout();
    let timeout_secs = config.pipeline.process_timeout_secs;

    let capture = async {
        match drain_pipes(stdout, stderr, cap).await? {
            Pipes::Overflow => Ok(CaptureOutcome::Overflow),
            Pipes::Complete { stdout, stderr } => {
                let status = child.wait().await?;
                Ok::<_, std::io::Error>(CaptureOutcome::Exited {
                    status,
                    stdout,
                    stderr,
                })
            }
        }
    };

    let (status, stdout, stderr) = match tokio::time::timeout(timeout, capture).await {
        Err(_elapsed) => {
            tracing::warn!(
                workspace = %workspace.id(),
                timeout_secs,
                "Extraction tool exceeded wall-clock timeout, terminating"
            );
            terminate(&mut child).await;
            return Err(ProcessError::Timeout { timeout_secs }.into());
        }
        Ok(Err(e)) => {
            terminate(&mut child).await;
            return Err(e.into());
        }
        Ok(Ok(CaptureOutcome::Overflow)) => {
            tracing::warn!(
                workspace = %workspace.id(),
                cap_bytes = cap,
                "Extraction tool exceeded diagnostic capture cap, terminating"
            );
            terminate(&mut child).await;
            return Err(ProcessError::Timeout { timeout_secs }.into());
        }
        Ok(Ok(CaptureOutcome::Exited {
            status,
            stdout,
            stderr,
        })) => (status, stdout, stderr),
    };

    let exit_code = status.code().unwrap_or(-1);
    if !status.success() {
        let diagnostic = diagnostic_tail(&stderr, &stdout);
        tracing::warn!(
            workspace = %workspace.id(),
            exit_code,
            diagnostic = %diagnostic,
            "Extraction tool failed"
        );
        return Err(ProcessError::ToolFailure {
            exit_code,
            diagnostic,
        }
        .into());
    }

    let produced_files = list_produced(workspace)?;
    if produced_files.is_empty() {
        return Err(ProcessError::NoOutput.into());
    }

    tracing::info!(
        workspace = %workspace.id(),
        files = produced_files.len(),
        "Extraction complete"
    );

    Ok(ProcessResult {
        exit_code,
        produced_files,
    })
}

enum CaptureOutcome {
    Overflow,
    Exited {
        status: std::process::ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
}

/// Drained child output, or proof that it exceeded the cap
enum Pipes {
    Overflow,
    Complete { stdout: Vec<u8>, stderr: Vec<u8> },
}

/// Drain both child pipes concurrently into capped buffers
///
/// Returns [`Pipes::Overflow`] as soon as either buffer would exceed the
/// cap, without waiting for the other pipe, so the caller can terminate the
/// child instead of buffering unboundedly.
async fn drain_pipes<O, E>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    cap: usize,
) -> std::io::Result<Pipes>
where
    O: tokio::io::AsyncRead + Unpin,
    E: tokio::io::AsyncRead + Unpin,
{
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut out_open = stdout.is_some();
    let mut err_open = stderr.is_some();
    let mut out_buf = [0u8; 8192];
    let mut err_buf = [0u8; 8192];

    while out_open || err_open {
        tokio::select! {
            n = read_some(&mut stdout, &mut out_buf), if out_open => {
                let n = n?;
                if n == 0 {
                    out_open = false;
                } else if out.len() + n > cap {
                    return Ok(Pipes::Overflow);
                } else {
                    out.extend_from_slice(&out_buf[..n]);
                }
            }
            n = read_some(&mut stderr, &mut err_buf), if err_open => {
                let n = n?;
                if n == 0 {
                    err_open = false;
                } else if err.len() + n > cap {
                    return Ok(Pipes::Overflow);
                } else {
                    err.extend_from_slice(&err_buf[..n]);
                }
            }
        }
    }

    Ok(Pipes::Complete {
        stdout: out,
        stderr: err,
    })
}

async fn read_some<R>(reader: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: tokio::io::AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read(buf).await,
        None => Ok(0),
    }
}

/// Kill and reap the child
///
/// Reaping matters: an unreaped child holds its workspace open as a zombie,
/// and the timeout contract requires the process to be gone, not merely
/// unwaited-on.
async fn terminate(child: &mut Child) {
    let _ = child.start_kill();
    let _ = child.wait().await;
}

/// Keep the useful tail of the tool's output for error reporting
///
/// stderr wins when non-empty; the tool prints progress to stdout and
/// errors to stderr.
fn diagnostic_tail(stderr: &[u8], stdout: &[u8]) -> String {
    let source = if stderr.is_empty() { stdout } else { stderr };
    let text = String::from_utf8_lossy(source);
    let text = text.trim();
    if text.len() <= DIAGNOSTIC_TAIL_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - DIAGNOSTIC_TAIL_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

/// List the files the tool left in the workspace, sorted by file name
///
/// Sorting pins the "first produced file" selection to first-by-name, which
/// is deterministic across platforms; raw readdir order is not.
fn list_produced(workspace: &Workspace) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(workspace.path())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    Ok(files)
}
