use glam::Vec2;
use where_is_everybody::DEFAULT_FONT_GLYPHS;
use where_is_everybody::renderer::text::*;

// ── helpers ──────────────────────────────────────────────────────────────────

/// 'A' at (0,0) 10×20, 'B' at (10,0) 8×20 in a 64×32 atlas.
fn make_font() -> Font {
    Font::from_atlas_json(sample_json(), 64, 32).unwrap()
}

fn sample_json() -> &'static str {
    r#"{
        "A":  { "x": 0,  "y": 0, "w": 10, "h": 20, "index": 0 },
        "B":  { "x": 10, "y": 0, "w": 8,  "h": 20, "index": 1 },
        "AB": { "x": 20, "y": 0, "w": 8,  "h": 20, "index": 2 }
    }"#
}

const WHITE: [f32; 4] = [1.0; 4];

// ── Font ─────────────────────────────────────────────────────────────────────

#[test]
fn atlas_json_populates_single_char_glyphs() {
    let font = make_font();
    assert_eq!(font.glyphs.len(), 2);
    assert!(font.has_glyph('A'));
    assert!(font.has_glyph('B'));
    assert_eq!(font.line_height, 20);
    assert_eq!((font.texture_width, font.texture_height), (64, 32));

    let b = &font.glyphs[&'B'];
    assert_eq!((b.x, b.y, b.width, b.height, b.x_advance), (10, 0, 8, 20, 8));
    assert_eq!((b.x_offset, b.y_offset), (0, 0));
}

#[test]
fn atlas_json_rejects_garbage() {
    assert!(Font::from_atlas_json("[1, 2, 3]", 64, 32).is_err());
}

#[test]
fn bundled_font_covers_printable_ascii() {
    let font = Font::from_atlas_json(DEFAULT_FONT_GLYPHS, 192, 144).unwrap();
    for ch in ' '..='~' {
        assert!(font.has_glyph(ch), "missing glyph {ch:?}");
    }
    assert_eq!(font.line_height, 24);
    assert_eq!(font.advance(24.0), 12.0);
    assert_eq!(font.advance(16.0), 8.0);
}

#[test]
fn text_width_scales_with_size() {
    let font = make_font();
    assert_eq!(font.text_width("AB", 20.0), 18.0);
    assert_eq!(font.text_width("AB", 40.0), 36.0);
}

#[test]
fn text_width_is_the_widest_line() {
    let font = make_font();
    assert_eq!(font.text_width("A\nABB", 20.0), 26.0);
}

#[test]
fn text_width_ignores_unknown_chars() {
    let font = make_font();
    assert_eq!(font.text_width("A?A", 20.0), 20.0);
    assert_eq!(font.text_width("", 20.0), 0.0);
}

// ── generate_text_mesh ───────────────────────────────────────────────────────

#[test]
fn six_vertices_per_known_glyph() {
    let font = make_font();
    assert_eq!(generate_text_mesh("AB", &font, Vec2::ZERO, 20.0, WHITE).len(), 12);
    assert_eq!(generate_text_mesh("A?B", &font, Vec2::ZERO, 20.0, WHITE).len(), 12);
    assert!(generate_text_mesh("", &font, Vec2::ZERO, 20.0, WHITE).is_empty());
}

#[test]
fn first_quad_covers_the_glyph_at_origin() {
    let font = make_font();
    let verts = generate_text_mesh("A", &font, Vec2::new(5.0, 7.0), 20.0, WHITE);
    // tl, tr, bl, tr, br, bl
    assert_eq!(verts[0].position, [5.0, 7.0]);
    assert_eq!(verts[4].position, [15.0, 27.0]);
    assert_eq!(verts[0].uv, [0.0, 0.0]);
    assert_eq!(verts[4].uv, [10.0 / 64.0, 20.0 / 32.0]);
    assert!(verts.iter().all(|v| v.color == WHITE));
}

#[test]
fn cursor_advances_by_scaled_glyph_width() {
    let font = make_font();
    let verts = generate_text_mesh("AB", &font, Vec2::ZERO, 40.0, WHITE);
    // 'B' starts after 'A' advanced 10 px at scale 2.
    assert_eq!(verts[6].position, [20.0, 0.0]);
    assert_eq!(verts[10].position, [36.0, 40.0]);
}

#[test]
fn newline_returns_to_the_origin_column() {
    let font = make_font();
    let verts = generate_text_mesh("A\nB", &font, Vec2::new(3.0, 0.0), 20.0, WHITE);
    assert_eq!(verts.len(), 12);
    assert_eq!(verts[6].position, [3.0, 20.0]);
}

#[test]
fn color_is_passed_through() {
    let font = make_font();
    let red = [1.0, 0.0, 0.0, 0.5];
    let verts = generate_text_mesh("B", &font, Vec2::ZERO, 20.0, red);
    assert!(verts.iter().all(|v| v.color == red));
}
