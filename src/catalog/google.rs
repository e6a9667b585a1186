//! Google Books volumes API client.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{BookRecord, CatalogClient, CatalogError};

/// Default Google Books API root.
pub const DEFAULT_GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1";

/// Subjects a random lookup draws from.
pub const SUBJECTS: &[&str] = &[
    "fiction", "poetry", "history", "horror", "mystery", "philosophy", "science",
    "biography", "travel", "fantasy", "drama", "architecture", "libraries", "ghosts",
];

/// Highest `startIndex` a random lookup asks for. Deeper pages are often empty.
pub const MAX_START_INDEX: u32 = 40;

/// Volumes requested per lookup.
pub const PAGE_SIZE: u32 = 20;

// ── Query ────────────────────────────────────────────────────────────────────

/// One randomised volumes search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeQuery {
    pub subject: &'static str,
    pub start_index: u32,
}

impl VolumeQuery {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let subject = SUBJECTS.choose(rng).copied().unwrap_or("fiction");
        Self { subject, start_index: rng.gen_range(0..=MAX_START_INDEX) }
    }

    /// Query-string parameters, credential last when present.
    pub fn params(&self, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", format!("subject:{}", self.subject)),
            ("startIndex", self.start_index.to_string()),
            ("maxResults", PAGE_SIZE.to_string()),
            ("printType", "books".to_string()),
        ];
        if let Some(key) = api_key {
            params.push(("key", key.to_string()));
        }
        params
    }
}

// ── Response parsing (pure) ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Map an HTTP status to the error it stands for, `None` on success.
pub fn classify_status(status: u16) -> Option<CatalogError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(CatalogError::Auth(status)),
        429 => Some(CatalogError::RateLimited),
        other => Some(CatalogError::Http(other)),
    }
}

/// Decode a volumes search body into book records. Volumes without a title
/// are dropped; a search with nothing usable is `CatalogError::Empty`.
pub fn parse_volumes(body: &str) -> Result<Vec<BookRecord>, CatalogError> {
    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let books: Vec<BookRecord> = response
        .items
        .into_iter()
        .filter_map(|v| to_record(v.volume_info))
        .collect();

    if books.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(books)
}

fn to_record(info: VolumeInfo) -> Option<BookRecord> {
    let title = info.title.filter(|t| !t.trim().is_empty())?;
    let title = match info.subtitle {
        Some(sub) if !sub.trim().is_empty() => format!("{title}: {sub}"),
        _ => title,
    };
    let cover_url = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .map(|url| secure_url(&url));

    Some(BookRecord {
        title,
        authors: info.authors,
        description: info.description.filter(|d| !d.trim().is_empty()),
        cover_url,
    })
}

/// Google hands out `http://` thumbnail links; the same paths serve over TLS.
fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Choose one of `books` uniformly.
pub fn pick<R: Rng>(mut books: Vec<BookRecord>, rng: &mut R) -> Result<BookRecord, CatalogError> {
    if books.is_empty() {
        return Err(CatalogError::Empty);
    }
    let i = rng.gen_range(0..books.len());
    Ok(books.swap_remove(i))
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Client for the Google Books volumes endpoint.
#[derive(Clone)]
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, ?timeout, "catalog client setup failed, lookups run without a timeout");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn volumes_url(&self) -> String {
        format!("{}/volumes", self.base_url)
    }
}

#[async_trait]
impl CatalogClient for GoogleBooksClient {
    async fn fetch_random_book(&self) -> Result<BookRecord, CatalogError> {
        let query = VolumeQuery::random(&mut rand::thread_rng());
        debug!(subject = query.subject, start = query.start_index, "querying catalog");

        let response = self
            .client
            .get(self.volumes_url())
            .query(&query.params(self.api_key.as_deref()))
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if let Some(err) = classify_status(response.status().as_u16()) {
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let books = parse_volumes(&body)?;
        pick(books, &mut rand::thread_rng())
    }

    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if let Some(err) = classify_status(response.status().as_u16()) {
            return Err(err);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
