//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::warn;

use crate::catalog::{DEFAULT_GOOGLE_BOOKS_URL, GoogleBooksClient};
use crate::scene::{SCENE_HEIGHT, SCENE_WIDTH};
use crate::window::{WindowConfig, WindowMode};

/// Optional Google Books credential. Without it lookups use anonymous quota.
pub const API_KEY_VAR: &str = "GOOGLE_BOOKS_API_KEY";
/// Overrides the catalog endpoint, e.g. to point at a local stub.
pub const BASE_URL_VAR: &str = "CATALOG_BASE_URL";

/// Client-level timeout for every catalog request.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("CATALOG_BASE_URL must be an http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),
}

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Parser)]
#[command(name = "where-is-everybody", version, about = "Explore an abandoned library.")]
pub struct Cli {
    /// Directory holding room backgrounds, the scare image and sounds.
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets: PathBuf,

    /// Scene definition file (JSON). Defaults to the built-in library.
    #[arg(long, value_name = "FILE")]
    pub scenes: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = WindowMode::Windowed)]
    pub window_mode: WindowMode,

    /// Requested window width in pixels. The scene itself is always 800x600.
    #[arg(long, default_value_t = SCENE_WIDTH as u32)]
    pub width: u32,

    /// Requested window height in pixels.
    #[arg(long, default_value_t = SCENE_HEIGHT as u32)]
    pub height: u32,

    /// Enable the hotspot overlay (toggle with F1).
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn window_config(&self) -> Result<WindowConfig, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize { width: self.width, height: self.height });
        }
        Ok(WindowConfig::new(SCENE_WIDTH as u32, SCENE_HEIGHT as u32, self.window_mode)
            .with_physical(self.width, self.height))
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Read the catalog settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the catalog settings through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_blank(API_KEY_VAR);
        if api_key.is_none() {
            warn!("{API_KEY_VAR} is not set; catalog lookups use anonymous quota");
        }

        let base_url = match non_blank(BASE_URL_VAR) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
            Some(url) => return Err(ConfigError::InvalidBaseUrl(url)),
            None => DEFAULT_GOOGLE_BOOKS_URL.to_string(),
        };

        Ok(Self { base_url, api_key, timeout: CATALOG_TIMEOUT })
    }

    pub fn client(&self) -> GoogleBooksClient {
        GoogleBooksClient::new(&self.base_url, self.api_key.clone(), self.timeout)
    }
}
