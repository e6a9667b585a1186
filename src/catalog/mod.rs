//! Remote book catalog: the contract the game relies on, a Google Books
//! implementation of it, and a worker that runs lookups off the event loop.

pub mod google;
pub mod worker;

use async_trait::async_trait;
use thiserror::Error;

pub use google::{GoogleBooksClient, DEFAULT_GOOGLE_BOOKS_URL};
pub use worker::{CatalogWorker, Completed, FetchedBook, Ticket, lookup};

/// Text shown in place of a book whenever a lookup fails, whatever the reason.
pub const NO_BOOK_MESSAGE: &str = "No book could be found right now.";

/// Metadata of one book pulled off a shelf. Lives as long as its popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

impl BookRecord {
    /// `"A, B and C"`, or `None` when the catalog lists no author.
    pub fn byline(&self) -> Option<String> {
        match self.authors.as_slice() {
            [] => None,
            [one] => Some(one.clone()),
            [init @ .., last] => Some(format!("{} and {last}", init.join(", "))),
        }
    }
}

/// Why a lookup failed. All variants end up as [`NO_BOOK_MESSAGE`] on screen;
/// the distinction only matters for the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("catalog rejected the credentials (HTTP {0})")]
    Auth(u16),
    #[error("catalog rate limit exceeded")]
    RateLimited,
    #[error("catalog returned HTTP {0}")]
    Http(u16),
    #[error("malformed catalog response: {0}")]
    Malformed(String),
    #[error("catalog returned no books")]
    Empty,
}

impl CatalogError {
    /// Short stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Network(_) => "network",
            CatalogError::Auth(_) => "auth",
            CatalogError::RateLimited => "rate_limited",
            CatalogError::Http(_) => "http",
            CatalogError::Malformed(_) => "malformed",
            CatalogError::Empty => "empty",
        }
    }
}

/// A source of random books.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Pick one book at random.
    async fn fetch_random_book(&self) -> Result<BookRecord, CatalogError>;

    /// Download the raw bytes of a cover image.
    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}
