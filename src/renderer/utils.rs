// ── Letterbox viewport math ───────────────────────────────────────────────────
//
// The scene is laid out at a fixed logical resolution and scaled uniformly
// into whatever the window's physical size is, centred, with black bars on
// the leftover axis. The same rectangle maps clicks back into scene space.

use glam::Vec2;

use crate::window::WindowConfig;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Rectangle in physical pixels the scene is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Intersection with a `width × height` target starting at the origin.
    pub fn clamped(&self, width: f32, height: f32) -> Self {
        let x = self.x.clamp(0.0, width);
        let y = self.y.clamp(0.0, height);
        Self {
            x,
            y,
            width: (self.x + self.width).min(width) - x,
            height: (self.y + self.height).min(height) - y,
        }
    }
}

// ── letterbox_viewport ────────────────────────────────────────────────────────

/// Largest uniformly scaled rectangle of the logical resolution that fits the
/// physical one, centred on both axes:
///
/// ```text
/// scale = min(physical_width / logical_width, physical_height / logical_height)
/// x     = (physical_width  - logical_width  * scale) / 2
/// y     = (physical_height - logical_height * scale) / 2
/// ```
///
/// [`Viewport::ZERO`] when either logical dimension is zero.
pub fn letterbox_viewport(config: &WindowConfig) -> Viewport {
    if config.logical_width == 0 || config.logical_height == 0 {
        return Viewport::ZERO;
    }

    let pw = config.physical_width as f32;
    let ph = config.physical_height as f32;
    let lw = config.logical_width as f32;
    let lh = config.logical_height as f32;

    let scale = (pw / lw).min(ph / lh);

    let width = lw * scale;
    let height = lh * scale;

    Viewport { x: (pw - width) / 2.0, y: (ph - height) / 2.0, width, height }
}

// ── screen_to_logical ─────────────────────────────────────────────────────────

/// Map a physical cursor position into logical scene coordinates.
///
/// `None` when the position lies in a letterbox bar (or the viewport is
/// empty). The viewport is half-open, so the right and bottom edges belong
/// to the bars.
pub fn screen_to_logical(config: &WindowConfig, screen: Vec2) -> Option<Vec2> {
    let vp = letterbox_viewport(config);
    if vp.is_empty() {
        return None;
    }

    let local = screen - Vec2::new(vp.x, vp.y);
    if local.x < 0.0 || local.y < 0.0 || local.x >= vp.width || local.y >= vp.height {
        return None;
    }

    let scale = vp.width / config.logical_width as f32;
    Some(local / scale)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
