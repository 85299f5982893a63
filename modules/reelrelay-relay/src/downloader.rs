use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::traits::VideoDownloader;

/// Download capability backed by the `yt-dlp` binary.
pub struct YtDlpDownloader {
    binary: String,
}

impl YtDlpDownloader {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoDownloader for YtDlpDownloader {
    async fn download(&self, url: &str, dest_dir: &Path, file_stem: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let template = dest_dir.join(format!("{file_stem}.%(ext)s"));
        debug!(url, template = %template.display(), "Invoking yt-dlp");

        let output = Command::new(&self.binary)
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("-f")
            .arg("mp4")
            .arg("-o")
            .arg(&template)
            .arg("--no-simulate")
            .arg("--print")
            .arg("after_move:filepath")
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        // yt-dlp prints the final path of the moved artifact.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .map(|l| PathBuf::from(l.trim()))
            .ok_or_else(|| anyhow!("yt-dlp produced no artifact path for {url}"))?;

        if !path.exists() {
            return Err(anyhow!(
                "yt-dlp reported {} but no file exists there",
                path.display()
            ));
        }

        Ok(path)
    }
}

/// Make a provider title safe as a file stem. Path separators and other
/// characters filesystems reject become underscores.
pub fn sanitize_file_stem(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        "clip".to_string()
    } else {
        cleaned
    }
}
