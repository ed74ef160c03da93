//! Startup fetch of missing surface files.
//!
//! Each required FreeSurfer file absent from the surface directory is
//! downloaded from a configured base URL with exponential backoff retries.
//! Bytes are staged to a `.partial` file and renamed into place so an
//! interrupted fetch never leaves a truncated surface where the loader
//! would find it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use reqwest::Client;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use surface::REQUIRED_SURFACE_FILES;

const MAX_RETRIES: u32 = 4;
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(2);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct SurfaceFetcher {
    client: Client,
    base_url: String,
    surface_dir: PathBuf,
}

impl SurfaceFetcher {
    pub fn new(base_url: String, surface_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            surface_dir,
        })
    }

    /// Download every required surface file not already on disk.
    pub async fn fetch_missing(&self) -> Result<()> {
        fs::create_dir_all(&self.surface_dir)
            .await
            .context("Failed to create surface directory")?;
        for name in REQUIRED_SURFACE_FILES {
            let target = self.surface_dir.join(name);
            if target.is_file() {
                continue;
            }
            let url = format!("{}/{}", self.base_url, name);
            self.fetch_with_retry(&url, &target).await?;
        }
        Ok(())
    }

    async fn fetch_with_retry(&self, url: &str, target: &Path) -> Result<()> {
        let mut delay = INITIAL_RETRY_DELAY;
        let mut attempt = 0;
        loop {
            match self.fetch_one(url, target).await {
                Ok(bytes) => {
                    info!(url, bytes, path = %target.display(), "Fetched surface file");
                    return Ok(());
                }
                Err(e) => {
                    attempt += 1;
                    if attempt > MAX_RETRIES {
                        return Err(anyhow!(
                            "fetch of {} failed after {} attempts: {}",
                            url,
                            attempt,
                            e
                        ));
                    }
                    warn!(
                        url,
                        error = %e,
                        attempt,
                        delay_secs = delay.as_secs(),
                        "Surface fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, MAX_RETRY_DELAY);
                }
            }
        }
    }

    /// One attempt: stream to the staging file, verify the length against
    /// Content-Length when the server sends one, rename into place.
    async fn fetch_one(&self, url: &str, target: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }
        let expected = response.content_length();

        let staging = staging_path(target);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&staging)
            .await
            .context("Failed to open staging file")?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Error reading response chunk")?;
            file.write_all(&chunk)
                .await
                .context("Error writing staging file")?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Some(expected) = expected {
            if written != expected {
                fs::remove_file(&staging).await.ok();
                return Err(anyhow!(
                    "size mismatch: expected {} bytes, got {}",
                    expected,
                    written
                ));
            }
        }

        fs::rename(&staging, target)
            .await
            .context("Failed to move fetched file into place")?;
        Ok(written)
    }
}

/// Staging file next to the target, keeping the full file name so
/// `lh.inflated` and `lh.curv` never share one.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");
    target.with_file_name(format!("{}.partial", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_keeps_the_full_file_name() {
        assert_eq!(
            staging_path(Path::new("/data/fsaverage/lh.inflated")),
            Path::new("/data/fsaverage/lh.inflated.partial")
        );
        assert_eq!(
            staging_path(Path::new("/data/fsaverage/lh.curv")),
            Path::new("/data/fsaverage/lh.curv.partial")
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let fetcher = SurfaceFetcher::new(
            "https://surfaces.example.com/fsaverage/".to_string(),
            PathBuf::from("/tmp/surfaces"),
        )
        .unwrap();
        assert_eq!(fetcher.base_url, "https://surfaces.example.com/fsaverage");
    }
}
