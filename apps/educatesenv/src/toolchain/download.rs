//! HTTP download of release binaries.
//!
//! The body is streamed to a hidden sibling file (`.<name>.download`) and
//! renamed onto the destination only after the last chunk is flushed, so an
//! interrupted transfer never looks like an installed version. There is no
//! retry and no explicit timeout; a failed download is reported and the
//! user re-runs the command.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

/// User-Agent header for HTTP requests.
pub(crate) const USER_AGENT: &str = "educatesenv";

/// Minimum interval between progress updates in milliseconds.
const CLI_PROGRESS_INTERVAL_MS: u128 = 250;

/// Downloads `url` to `dest`, printing a progress line to stdout.
///
/// # Errors
///
/// Returns an error if:
/// - The request fails or the server answers with a non-success status
/// - The temporary file cannot be created or written
/// - The finished file cannot be moved onto `dest`
pub async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let temp_path = temp_path_for(dest);

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if let Err(e) = download_with_progress(url, &temp_path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, dest).await.with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            dest.display()
        )
    })?;
    tracing::debug!(dest = %dest.display(), "download complete");
    Ok(())
}

/// Returns the hidden sibling used while a download is in flight.
fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map_or_else(|| "download".into(), |n| n.to_string_lossy().into_owned());
    dest.with_file_name(format!(".{name}.download"))
}

async fn download_with_progress(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;

    if !response.status().is_success() {
        bail!("HTTP error {}: {url}", response.status());
    }

    let total_size = response.content_length().unwrap_or(0);

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create file: {}", dest.display()))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let start_time = Instant::now();
    let mut last_update = Instant::now();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Failed to read chunk from {url}"))?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write to {}", dest.display()))?;
        downloaded += chunk.len() as u64;

        let now = Instant::now();
        if now.duration_since(last_update).as_millis() >= CLI_PROGRESS_INTERVAL_MS {
            print_progress(downloaded, total_size, start_time.elapsed().as_secs_f64());
            last_update = now;
        }
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", dest.display()))?;

    print_progress(downloaded, total_size, start_time.elapsed().as_secs_f64());
    println!();

    Ok(())
}

/// Prints a simple text-based progress line.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn print_progress(downloaded: u64, total: u64, elapsed_secs: f64) {
    let percent = if total > 0 {
        (downloaded as f64 / total as f64 * 100.0) as u8
    } else {
        0
    };
    let speed = if elapsed_secs > 0.0 {
        downloaded as f64 / elapsed_secs
    } else {
        0.0
    };

    print!(
        "\r{}/{} ({percent}%) {}     ",
        format_bytes(downloaded),
        format_bytes(total),
        format_speed(speed)
    );
    let _ = std::io::stdout().flush();
}

/// Formats bytes into a human-readable string (KB, MB, GB).
fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;

    if bytes_f >= GB {
        format!("{:.2} GB", bytes_f / GB)
    } else if bytes_f >= MB {
        format!("{:.2} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.2} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

fn format_speed(speed: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    if speed >= MB {
        format!("{:.2} MB/s", speed / MB)
    } else if speed >= KB {
        format!("{:.2} KB/s", speed / KB)
    } else {
        format!("{speed:.0} B/s")
    }
}
