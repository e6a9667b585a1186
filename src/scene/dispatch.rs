// ── Interaction dispatch ─────────────────────────────────────────────────────
//
// Maps a click in scene coordinates to at most one action. Hotspots are
// tested in declaration order and the first one containing the point wins,
// so overlapping regions resolve the same way on every click. Exit arrows are
// generated ahead of declared hotspots and therefore win their overlaps.

use glam::Vec2;

use super::{Action, Hotspot, Room};

/// The hotspot a click at `point` lands on, if any.
pub fn hit_test(room: &Room, point: Vec2) -> Option<&Hotspot> {
    room.hotspots.iter().find(|h| h.region.contains(point))
}

/// Action triggered by a click at `point`; `Action::NoOp` when the click
/// misses every hotspot. Pure: no state is read or written besides `room`.
pub fn dispatch(room: &Room, point: Vec2) -> Action {
    hit_test(room, point).map_or(Action::NoOp, |h| h.action.clone())
}
