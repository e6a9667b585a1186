// ── WindowMode ────────────────────────────────────────────────────────────────

/// How the OS window is presented. Selectable with `--window-mode`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WindowMode {
    /// Decorated window at the requested size.
    #[default]
    Windowed,
    /// Exclusive fullscreen at the video mode closest to the requested size.
    Fullscreen,
    /// Borderless window covering the current monitor.
    Borderless,
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window configuration snapshot.
///
/// - **physical** dimensions are the pixel size of the OS window and change
///   on every resize or mode switch.
/// - **logical** dimensions are the fixed scene resolution everything is laid
///   out in; the scene is letterboxed into the physical area.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub physical_width: u32,
    pub physical_height: u32,
    pub logical_width: u32,
    pub logical_height: u32,
    pub mode: WindowMode,
}

impl WindowConfig {
    /// A window whose physical size starts out equal to the logical size.
    pub fn new(logical_width: u32, logical_height: u32, mode: WindowMode) -> Self {
        Self {
            physical_width: logical_width,
            physical_height: logical_height,
            logical_width,
            logical_height,
            mode,
        }
    }

    /// Same logical resolution, different requested window size.
    pub fn with_physical(mut self, width: u32, height: u32) -> Self {
        self.physical_width = width;
        self.physical_height = height;
        self
    }

    /// Aspect ratio of the **logical** resolution. `0.0` when the logical
    /// height is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.logical_height == 0 {
            return 0.0;
        }
        self.logical_width as f32 / self.logical_height as f32
    }
}

impl Default for WindowConfig {
    /// 800 × 600 windowed, the scene resolution.
    fn default() -> Self {
        Self::new(800, 600, WindowMode::Windowed)
    }
}
