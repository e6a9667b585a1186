// ── UI layout & pure text helpers ────────────────────────────────────────────
//
// Everything here is plain data: the game feeds the results to the engine's
// draw calls. No GPU state, fully testable.

use glam::Vec2;

use crate::catalog::BookRecord;
use crate::scene::Rect;

pub const TITLE_SIZE: f32 = 24.0;
pub const BYLINE_SIZE: f32 = 18.0;
pub const BODY_SIZE: f32 = 16.0;
pub const FOOTER_SIZE: f32 = 14.0;

pub const POPUP_FOOTER: &str = "click or press Esc to close";
pub const LOADING_TEXT: &str = "Searching the shelves...";

const ELLIPSIS: &str = "...";

/// Word-wrap `text` so no line holds more than `max_cols` characters.
/// Words are split on whitespace; a single word longer than `max_cols` is
/// split across lines. Counts characters, not bytes.
pub fn word_wrap(text: &str, max_cols: usize) -> Vec<String> {
    if max_cols == 0 { return vec![]; }
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<char> = Vec::new();
    for word in text.split_whitespace() {
        let word: Vec<char> = word.chars().collect();
        let space = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.len() + space + word.len() > max_cols {
            lines.push(current.drain(..).collect());
        }
        if !current.is_empty() { current.push(' '); }
        current.extend(word);
        while current.len() > max_cols {
            lines.push(current.drain(..max_cols).collect());
        }
    }
    if !current.is_empty() { lines.push(current.into_iter().collect()); }
    lines
}

/// Keep at most `max_lines` of `lines`. When something was cut, the last kept
/// line ends in `...` and still fits `max_cols`.
pub fn truncate_lines(mut lines: Vec<String>, max_lines: usize, max_cols: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = with_ellipsis(last, max_cols);
    }
    lines
}

/// `line` cut to `max_cols` characters, ending in `...` when anything was cut.
pub fn clip(line: &str, max_cols: usize) -> String {
    if line.chars().count() <= max_cols {
        return line.to_string();
    }
    with_ellipsis(line, max_cols)
}

fn with_ellipsis(line: &str, max_cols: usize) -> String {
    let keep = max_cols.saturating_sub(ELLIPSIS.len());
    let cut: String = line.chars().take(keep).collect();
    format!("{}{ELLIPSIS}", cut.trim_end())
}

/// Fold typographic punctuation the bitmap font lacks into ASCII, and drop
/// anything else outside printable ASCII. Catalog text is full of both.
pub fn plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201F}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\t' | '\n' | '\r' => out.push(' '),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            c => {
                if let Some(base) = latin_base(c) {
                    out.push(base);
                }
            }
        }
    }
    out
}

/// Unaccented letter for the common Latin-1 accented ones.
fn latin_base(c: char) -> Option<char> {
    Some(match c {
        'À'..='Å' => 'A',
        'à'..='å' => 'a',
        'Ç' => 'C',
        'ç' => 'c',
        'È'..='Ë' => 'E',
        'è'..='ë' => 'e',
        'Ì'..='Ï' => 'I',
        'ì'..='ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò'..='Ö' | 'Ø' => 'O',
        'ò'..='ö' | 'ø' => 'o',
        'Ù'..='Ü' => 'U',
        'ù'..='ü' => 'u',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    })
}

/// Returns `true` if pixel point `(px, py)` falls inside the rectangle
/// defined by origin `(rx, ry)` and size `(rw, rh)` using half-open intervals.
pub fn rect_contains(rx: f32, ry: f32, rw: f32, rh: f32, px: f32, py: f32) -> bool {
    px >= rx && px < rx + rw && py >= ry && py < ry + rh
}

// ── Popup layout ─────────────────────────────────────────────────────────────

/// Where each part of the book popup goes, in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupLayout {
    pub panel: Rect,
    /// Box the cover is fitted into, when there is one.
    pub cover: Option<Rect>,
    /// Left edge and width of the text column.
    pub text: Rect,
    /// Baseline-free top of the footer hint, centred horizontally.
    pub footer: Vec2,
}

impl PopupLayout {
    pub const PADDING: f32 = 20.0;
    pub const COVER_W: f32 = 128.0;
    pub const COVER_H: f32 = 192.0;

    /// Centred panel covering three quarters of `scene` in each direction.
    pub fn new(scene: Vec2, has_cover: bool) -> Self {
        let size = scene * 0.75;
        let pos = (scene - size) / 2.0;
        let panel = Rect::new(pos.x, pos.y, size.x, size.y);
        let pad = Self::PADDING;

        let cover = has_cover.then(|| {
            Rect::new(panel.x + pad, panel.y + pad, Self::COVER_W, Self::COVER_H)
        });

        let text_x = match &cover {
            Some(c) => c.x + c.w + pad,
            None => panel.x + pad,
        };
        let footer_h = FOOTER_SIZE + pad;
        let text = Rect::new(
            text_x,
            panel.y + pad,
            panel.x + panel.w - pad - text_x,
            panel.h - 2.0 * pad - footer_h,
        );

        let footer = Vec2::new(panel.x + panel.w / 2.0, panel.y + panel.h - pad - FOOTER_SIZE);

        Self { panel, cover, text, footer }
    }

    /// Characters per line of the text column for glyphs that advance
    /// `advance` pixels each.
    pub fn columns(&self, advance: f32) -> usize {
        if advance <= 0.0 { return 0; }
        (self.text.w / advance).floor().max(0.0) as usize
    }
}

/// Largest rect with the aspect of `image_w × image_h` that fits `bounds`,
/// centred in it.
pub fn fit_image(bounds: &Rect, image_w: u32, image_h: u32) -> Rect {
    if image_w == 0 || image_h == 0 {
        return Rect::new(bounds.x, bounds.y, 0.0, 0.0);
    }
    let scale = (bounds.w / image_w as f32).min(bounds.h / image_h as f32);
    let w = image_w as f32 * scale;
    let h = image_h as f32 * scale;
    Rect::new(bounds.x + (bounds.w - w) / 2.0, bounds.y + (bounds.h - h) / 2.0, w, h)
}

// ── Book text ────────────────────────────────────────────────────────────────

/// Wrapped, truncated text for one book popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookText {
    pub title: Vec<String>,
    pub byline: Option<String>,
    pub description: Vec<String>,
}

/// Lay out `book` for a text column `title_cols` wide at title size and
/// `body_cols` wide at body size, with room for `body_lines` body lines
/// below the title and byline.
pub fn book_text(book: &BookRecord, title_cols: usize, body_cols: usize, body_lines: usize) -> BookText {
    let title = truncate_lines(word_wrap(&plain_text(&book.title), title_cols), 2, title_cols);

    let byline = book
        .byline()
        .map(|names| clip(&format!("by {}", plain_text(&names)), body_cols));

    let description = match &book.description {
        Some(d) => truncate_lines(word_wrap(&plain_text(d), body_cols), body_lines, body_cols),
        None => vec!["No description.".to_string()],
    };

    BookText { title, byline, description }
}
