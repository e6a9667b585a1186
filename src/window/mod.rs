pub mod config;

pub use config::{WindowConfig, WindowMode};

use tracing::debug;
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

/// Apply `config` to `window`.
///
/// # Windowed
/// Leaves fullscreen, restores decorations and requests
/// `physical_width × physical_height`.
///
/// # Fullscreen
/// Exclusive fullscreen at the current monitor's video mode closest (by
/// area) to the requested size. Falls back to borderless when the monitor
/// reports no modes or no monitor handle is available.
///
/// # Borderless
/// Borderless fullscreen on the current monitor at its native resolution.
///
/// The logical resolution is never touched: whatever physical size results
/// arrives later as a resize and only changes the letterbox.
pub fn apply_window_settings(window: &Window, config: &WindowConfig) {
    debug!(mode = ?config.mode, width = config.physical_width, height = config.physical_height, "applying window settings");

    match config.mode {
        WindowMode::Windowed => {
            window.set_fullscreen(None);
            window.set_decorations(true);
            window.set_resizable(true);

            // `None` means the resize arrives later as `WindowEvent::Resized`.
            let _ = window.request_inner_size(PhysicalSize::new(
                config.physical_width,
                config.physical_height,
            ));
        }

        WindowMode::Fullscreen => {
            let fullscreen = match window.current_monitor() {
                Some(monitor) => {
                    let target_area =
                        config.physical_width as u64 * config.physical_height as u64;

                    let best = monitor.video_modes().min_by_key(|vm| {
                        let s = vm.size();
                        (s.width as u64 * s.height as u64).abs_diff(target_area)
                    });

                    match best {
                        Some(vm) => Fullscreen::Exclusive(vm),
                        None => Fullscreen::Borderless(Some(monitor)),
                    }
                }
                None => Fullscreen::Borderless(None),
            };

            window.set_fullscreen(Some(fullscreen));
        }

        WindowMode::Borderless => {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
}
