use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use super::pipeline::QuadVertex;

// ── generate_text_mesh ────────────────────────────────────────────────────────

/// Convert `text` into a triangle list of [`QuadVertex`]es tinted `color`.
///
/// # Layout
/// Each renderable character produces **6 vertices**, two triangles with the
/// Y axis pointing down:
///
/// ```text
/// 0──1
/// │ /│
/// 2──3
/// triangles: (0,1,2) and (1,3,2)
/// ```
///
/// - `origin` is the top-left of the first line in scene pixels.
/// - `size` is the desired line height; glyphs scale by
///   `size / font.line_height`.
/// - `'\n'` returns the cursor to `origin.x` and moves down one line.
/// - Characters absent from the font are skipped without advancing.
pub fn generate_text_mesh(
    text: &str,
    font: &Font,
    origin: Vec2,
    size: f32,
    color: [f32; 4],
) -> Vec<QuadVertex> {
    if font.line_height == 0 {
        return Vec::new();
    }

    let scale = size / font.line_height as f32;
    let tw = font.texture_width as f32;
    let th = font.texture_height as f32;

    let mut vertices = Vec::with_capacity(text.len() * 6);
    let mut cursor = origin;

    for ch in text.chars() {
        if ch == '\n' {
            cursor.x = origin.x;
            cursor.y += font.line_height as f32 * scale;
            continue;
        }

        let Some(glyph) = font.glyphs.get(&ch) else {
            continue;
        };

        let x0 = cursor.x + glyph.x_offset as f32 * scale;
        let y0 = cursor.y + glyph.y_offset as f32 * scale;
        let x1 = x0 + glyph.width as f32 * scale;
        let y1 = y0 + glyph.height as f32 * scale;

        let u0 = glyph.x as f32 / tw;
        let v0 = glyph.y as f32 / th;
        let u1 = (glyph.x + glyph.width) as f32 / tw;
        let v1 = (glyph.y + glyph.height) as f32 / th;

        let tl = QuadVertex { position: [x0, y0], uv: [u0, v0], color };
        let tr = QuadVertex { position: [x1, y0], uv: [u1, v0], color };
        let bl = QuadVertex { position: [x0, y1], uv: [u0, v1], color };
        let br = QuadVertex { position: [x1, y1], uv: [u1, v1], color };
        vertices.extend_from_slice(&[tl, tr, bl, tr, br, bl]);

        cursor.x += glyph.x_advance as f32 * scale;
    }

    vertices
}

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Where one character lives in the font atlas.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: u32,
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// Bitmap font backed by one atlas texture.
pub struct Font {
    pub glyphs: HashMap<char, Glyph>,
    pub line_height: u32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Font {
    /// Parse the atlas glyph map, where each key is a single character and
    /// the value its pixel rectangle:
    ///
    /// ```json
    /// { "A": { "x": 0, "y": 0, "w": 12, "h": 24, "index": 0 }, ... }
    /// ```
    ///
    /// `x_advance` is the glyph width and both offsets are zero, which suits
    /// uniform-grid fonts. Multi-character keys are ignored.
    pub fn from_atlas_json(
        json: &str,
        texture_width: u32,
        texture_height: u32,
    ) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct AtlasEntry { x: u32, y: u32, w: u32, h: u32 }

        let raw: HashMap<String, AtlasEntry> = serde_json::from_str(json)?;

        let line_height = raw.values().map(|e| e.h).max().unwrap_or(0);

        let glyphs = raw
            .into_iter()
            .filter_map(|(key, entry)| {
                let mut chars = key.chars();
                let ch = chars.next()?;
                if chars.next().is_some() { return None; }

                Some((ch, Glyph {
                    x: entry.x,
                    y: entry.y,
                    width: entry.w,
                    height: entry.h,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: entry.w,
                }))
            })
            .collect();

        Ok(Self { glyphs, line_height, texture_width, texture_height })
    }

    /// Width in pixels of the longest line of `text` drawn at line height
    /// `size`. Unknown characters count as zero, matching the mesh.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        if self.line_height == 0 {
            return 0.0;
        }
        let scale = size / self.line_height as f32;
        text.split('\n')
            .map(|line| {
                line.chars()
                    .filter_map(|c| self.glyphs.get(&c))
                    .map(|g| g.x_advance as f32 * scale)
                    .sum::<f32>()
            })
            .fold(0.0, f32::max)
    }

    /// Width of one glyph cell at `size`, assuming a monospaced atlas.
    pub fn advance(&self, size: f32) -> f32 {
        self.text_width(" ", size)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }
}
