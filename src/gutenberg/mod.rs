// Project Gutenberg source texts.

pub mod client;
pub mod delay;

pub use client::{clean_filename, DownloadedBook, GutenbergClient};
pub use delay::PolitenessDelay;
