// Project Gutenberg client: plain-text book downloads over HTTP.
//
// Books are fetched from the public cache path
// `{base}/cache/epub/{id}/pg{id}.txt`, which serves the UTF-8 plain-text
// edition without scraping the HTML catalog. The title is read from the
// `Title:` line of the book's own header.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::delay::PolitenessDelay;

/// Default Project Gutenberg endpoint.
pub const DEFAULT_GUTENBERG_URL: &str = "https://www.gutenberg.org";

/// Longest file name `clean_filename` produces, extension included.
const MAX_FILENAME_CHARS: usize = 200;

/// A book saved to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedBook {
    pub id: u32,
    pub title: String,
    pub path: PathBuf,
}

/// Thin reqwest wrapper for Project Gutenberg.
pub struct GutenbergClient {
    client: reqwest::Client,
    base_url: String,
    delay: PolitenessDelay,
}

impl GutenbergClient {
    /// Create a client for the given base URL.
    ///
    /// Pass a different URL to use a mirror.
    pub fn new(base_url: &str, delay: PolitenessDelay) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("novelscope/0.1 (text-analysis)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            delay,
        })
    }

    /// URL of the plain-text edition of a book.
    pub fn book_url(&self, id: u32) -> String {
        format!("{}/cache/epub/{id}/pg{id}.txt", self.base_url)
    }

    /// Fetch the plain text of a book.
    pub async fn fetch_text(&self, id: u32) -> Result<String> {
        let url = self.book_url(id);
        debug!(book_id = id, url = %url, "Fetching book");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request for book {id} failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Project Gutenberg returned {status} for book {id}");
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of book {id}"))
    }

    /// Download one book into `dir` as `{id}_{title}.txt`.
    ///
    /// Creates `dir` if needed. Does not wait; see `download_books`.
    pub async fn download_book(&self, id: u32, dir: &Path) -> Result<DownloadedBook> {
        let text = self.fetch_text(id).await?;
        let title = extract_title(&text).unwrap_or_else(|| format!("book_{id}"));

        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(clean_filename(&format!("{id}_{title}.txt")));
        std::fs::write(&path, text.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(book_id = id, title = %title, path = %path.display(), "Downloaded book");
        Ok(DownloadedBook { id, title, path })
    }

    /// Download several books in order, waiting a politeness delay before each.
    ///
    /// A book that fails is logged and skipped; the rest still download.
    pub async fn download_books(&self, ids: &[u32], dir: &Path) -> Vec<DownloadedBook> {
        let mut downloaded = Vec::with_capacity(ids.len());
        for &id in ids {
            self.delay.wait().await;
            match self.download_book(id, dir).await {
                Ok(book) => downloaded.push(book),
                Err(e) => warn!(book_id = id, error = %e, "Skipping book"),
            }
        }
        downloaded
    }
}

/// Title from the `Title:` header line, if the book has one.
pub fn extract_title(text: &str) -> Option<String> {
    text.lines()
        .take_while(|line| !line.contains("*** START OF"))
        .find_map(|line| line.trim().strip_prefix("Title:"))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Make a string safe to use as a file name.
///
/// Replaces `\ / * ? : " < > |` with `_` and caps the name at 200
/// characters, keeping the extension.
pub fn clean_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();

    if cleaned.chars().count() <= MAX_FILENAME_CHARS {
        return cleaned;
    }

    let (base, ext) = match cleaned.rfind('.') {
        Some(dot) if dot > 0 => cleaned.split_at(dot),
        _ => (cleaned.as_str(), ""),
    };
    let keep = MAX_FILENAME_CHARS.saturating_sub(ext.chars().count());
    let base: String = base.chars().take(keep).collect();
    format!("{base}{ext}")
}
