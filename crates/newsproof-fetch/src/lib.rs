//! HTTP article fetcher for newsproof.
//!
//! Downloads a page with `reqwest` and extracts title, authors, publication
//! date and body text with `scraper`.

pub mod error;
pub mod extract;
pub mod fetcher;

pub use error::{Error, Result};
pub use fetcher::{FetcherConfig, HttpFetcher};
