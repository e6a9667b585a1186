pub mod app;
pub mod assets;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod ui;
pub mod window;

/// Built-in 12×24 bitmap font atlas embedded at compile time.
pub const DEFAULT_FONT_ATLAS: &[u8] = include_bytes!("../resources/font_atlas_12x24.png");

/// Glyph map for the built-in font atlas (char-keyed JSON, see `Font::from_atlas_json`).
pub const DEFAULT_FONT_GLYPHS: &str = include_str!("../resources/font_glyph_map.json");
