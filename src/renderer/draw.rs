// ── DrawList ──────────────────────────────────────────────────────────────────
//
// Per-frame list of textured triangles, recorded in painter's order and
// grouped into batches that share a texture. Consecutive draws with the same
// texture extend the current batch, so a frame of solid fills and text costs
// a handful of draw calls. Pure CPU data: no GPU state, fully testable.

use glam::Vec2;

use super::pipeline::QuadVertex;
use super::text::{Font, generate_text_mesh};
use crate::engine::Color;

/// Which texture a batch samples from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// 1×1 white texel for solid fills.
    White,
    /// The bitmap font atlas.
    Font,
    /// A named image uploaded at runtime (room backgrounds, covers, ...).
    Image(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub texture: TextureKey,
    pub vertices: Vec<QuadVertex>,
}

#[derive(Debug, Default)]
pub struct DrawList {
    batches: Vec<DrawBatch>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Append raw triangles sampling `texture`.
    pub fn push(&mut self, texture: TextureKey, vertices: &[QuadVertex]) {
        if vertices.is_empty() {
            return;
        }
        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.vertices.extend_from_slice(vertices),
            _ => self.batches.push(DrawBatch { texture, vertices: vertices.to_vec() }),
        }
    }

    /// Whole texture stretched over `pos..pos + size`.
    pub fn image(&mut self, name: &str, pos: Vec2, size: Vec2, tint: Color) {
        let quad = quad(pos, size, [0.0, 0.0], [1.0, 1.0], tint.0);
        self.push(TextureKey::Image(name.to_string()), &quad);
    }

    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let quad = quad(pos, size, [0.0, 0.0], [1.0, 1.0], color.0);
        self.push(TextureKey::White, &quad);
    }

    /// Border of `thickness` drawn inside `pos..pos + size`.
    pub fn rect_outline(&mut self, pos: Vec2, size: Vec2, thickness: f32, color: Color) {
        let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
        if t <= 0.0 {
            return;
        }
        self.rect(pos, Vec2::new(size.x, t), color);
        self.rect(Vec2::new(pos.x, pos.y + size.y - t), Vec2::new(size.x, t), color);
        self.rect(Vec2::new(pos.x, pos.y + t), Vec2::new(t, size.y - 2.0 * t), color);
        self.rect(Vec2::new(pos.x + size.x - t, pos.y + t), Vec2::new(t, size.y - 2.0 * t), color);
    }

    pub fn triangle(&mut self, points: [Vec2; 3], color: Color) {
        let verts = points.map(|p| QuadVertex { position: p.to_array(), uv: [0.5, 0.5], color: color.0 });
        self.push(TextureKey::White, &verts);
    }

    /// Outline of an arbitrary polygon, one thin quad per edge.
    pub fn polyline_closed(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let dir = b - a;
            if dir.length_squared() == 0.0 {
                continue;
            }
            let n = dir.perp().normalize() * (thickness / 2.0);
            let c = color.0;
            let v = |p: Vec2| QuadVertex { position: p.to_array(), uv: [0.5, 0.5], color: c };
            self.push(TextureKey::White, &[v(a - n), v(b - n), v(a + n), v(b - n), v(b + n), v(a + n)]);
        }
    }

    pub fn text(&mut self, font: &Font, text: &str, pos: Vec2, size: f32, color: Color) {
        let verts = generate_text_mesh(text, font, pos, size, color.0);
        self.push(TextureKey::Font, &verts);
    }
}

fn quad(pos: Vec2, size: Vec2, uv0: [f32; 2], uv1: [f32; 2], color: [f32; 4]) -> [QuadVertex; 6] {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    let tl = QuadVertex { position: [x0, y0], uv: [uv0[0], uv0[1]], color };
    let tr = QuadVertex { position: [x1, y0], uv: [uv1[0], uv0[1]], color };
    let bl = QuadVertex { position: [x0, y1], uv: [uv0[0], uv1[1]], color };
    let br = QuadVertex { position: [x1, y1], uv: [uv1[0], uv1[1]], color };
    [tl, tr, bl, tr, br, bl]
}
