// Download stage: fetch books from Project Gutenberg into raw/.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::gutenberg::{DownloadedBook, GutenbergClient};

/// Download `book_ids` into the raw directory, skipping books that fail.
pub async fn run(config: &Config, book_ids: &[u32]) -> Result<Vec<DownloadedBook>> {
    if book_ids.is_empty() {
        anyhow::bail!("No book IDs given. Pass them with --book-ids, e.g. --book-ids 1342 2701");
    }

    let client = GutenbergClient::new(&config.gutenberg_url, config.politeness_delay())?;
    let raw_dir = config.raw_dir();

    info!(books = book_ids.len(), dir = %raw_dir.display(), "Downloading books");
    let downloaded = client.download_books(book_ids, &raw_dir).await;

    info!(
        downloaded = downloaded.len(),
        failed = book_ids.len() - downloaded.len(),
        "Download complete"
    );
    Ok(downloaded)
}
