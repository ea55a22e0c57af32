//! HTTP archive downloads.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use depforge_core::{ArchiveDownloader, PipelineError, PipelineResult};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("depforge/", env!("CARGO_PKG_VERSION"));

/// Streams archives over HTTP(S) into a `.part` file, renamed on success.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    show_progress: bool,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            show_progress: true,
        }
    }

    /// Disable the terminal progress bar.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_bar(&self, total: u64) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        Some(pb)
    }

    async fn fetch_to(&self, url: &str, partial: &Path) -> PipelineResult<()> {
        let download_err = |reason: String| PipelineError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| download_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_err(format!("HTTP {}", response.status())));
        }

        let total_size = response.content_length().unwrap_or(0);
        let pb = self.progress_bar(total_size);

        let mut file = File::create(partial).map_err(|e| {
            PipelineError::io(format!("Failed to create {}", partial.display()), e)
        })?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_err(e.to_string()))?;
            file.write_all(&chunk).map_err(|e| {
                PipelineError::io(format!("Failed to write {}", partial.display()), e)
            })?;
            downloaded += chunk.len() as u64;
            if let Some(pb) = &pb {
                pb.set_position(downloaded);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("Download complete");
        }
        debug!(url, bytes = downloaded, "Download finished");
        Ok(())
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[async_trait]
impl ArchiveDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> PipelineResult<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        info!(url, dest = %dest.display(), "Downloading");
        let partial = partial_path(dest);
        if let Err(e) = self.fetch_to(url, &partial).await {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        fs::rename(&partial, dest).map_err(|e| {
            PipelineError::io(format!("Failed to move download to {}", dest.display()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/w/CACHE/boost_1_72_0.7z")),
            PathBuf::from("/w/CACHE/boost_1_72_0.7z.part")
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_download_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("CACHE").join("x.zip");
        let err = HttpDownloader::new()
            .quiet()
            .download("http://127.0.0.1:9/x.zip", &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Download { .. }));
        assert_eq!(err.exit_code(), 69);
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }
}
