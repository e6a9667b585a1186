// ── AssetCatalog ──────────────────────────────────────────────────────────────
//
// Index of the image and sound files under the assets directory. Assets are
// named by their path relative to the root, `/`-separated and without the
// extension: `assets/rooms/entrance.png` is the image `rooms/entrance`.
// Nothing is decoded while scanning; scene definitions refer to assets by
// name and `require` checks them all up front.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
pub const SOUND_EXTENSIONS: &[&str] = &["ogg", "wav"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("assets directory {} does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to scan assets: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("missing {kind}: {}", names.join(", "))]
    Missing { kind: &'static str, names: Vec<String> },
    #[error("failed to decode image '{name}' ({}): {source}", path.display())]
    Decode {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Image,
    Sound,
}

fn kind_of(path: &Path) -> Option<Kind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(Kind::Image)
    } else if SOUND_EXTENSIONS.contains(&ext.as_str()) {
        Some(Kind::Sound)
    } else {
        None
    }
}

/// `rooms/entrance` for `<root>/rooms/entrance.png`.
fn asset_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<&str> = rel.components().filter_map(|c| c.as_os_str().to_str()).collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    root: PathBuf,
    images: BTreeMap<String, PathBuf>,
    sounds: BTreeMap<String, PathBuf>,
}

impl AssetCatalog {
    /// Index every image and sound under `root`, recursively. Files with
    /// other extensions are ignored. When two files share a name
    /// (`scare.png` and `scare.jpg`) the first in file-name order wins.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(AssetError::NotADirectory(root.to_path_buf()));
        }

        let mut catalog = Self { root: root.to_path_buf(), ..Self::default() };

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(kind) = kind_of(path) else { continue };
            let Some(name) = asset_name(root, path) else { continue };

            let index = match kind {
                Kind::Image => &mut catalog.images,
                Kind::Sound => &mut catalog.sounds,
            };
            if let Some(existing) = index.get(&name) {
                warn!(name, kept = %existing.display(), skipped = %path.display(), "duplicate asset name");
                continue;
            }
            index.insert(name, path.to_path_buf());
        }

        debug!(
            root = %root.display(),
            images = catalog.images.len(),
            sounds = catalog.sounds.len(),
            "assets indexed"
        );
        Ok(catalog)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub fn sound_names(&self) -> impl Iterator<Item = &str> {
        self.sounds.keys().map(String::as_str)
    }

    pub fn image_path(&self, name: &str) -> Option<&Path> {
        self.images.get(name).map(PathBuf::as_path)
    }

    pub fn sound_path(&self, name: &str) -> Option<&Path> {
        self.sounds.get(name).map(PathBuf::as_path)
    }

    /// Decode image `name` to RGBA8.
    pub fn load_image(&self, name: &str) -> Result<RgbaImage, AssetError> {
        let path = self.image_path(name).ok_or_else(|| AssetError::Missing {
            kind: "images",
            names: vec![name.to_string()],
        })?;
        let img = image::open(path).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        Ok(img.to_rgba8())
    }

    /// Check that every named image and sound exists. Missing images are
    /// reported before missing sounds, all names of a kind at once.
    pub fn require<'a>(
        &self,
        images: impl IntoIterator<Item = &'a str>,
        sounds: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), AssetError> {
        let missing_images: Vec<String> = images
            .into_iter()
            .filter(|n| !self.images.contains_key(*n))
            .map(str::to_owned)
            .collect();
        if !missing_images.is_empty() {
            return Err(AssetError::Missing { kind: "images", names: missing_images });
        }

        let missing_sounds: Vec<String> = sounds
            .into_iter()
            .filter(|n| !self.sounds.contains_key(*n))
            .map(str::to_owned)
            .collect();
        if !missing_sounds.is_empty() {
            return Err(AssetError::Missing { kind: "sounds", names: missing_sounds });
        }

        Ok(())
    }
}
