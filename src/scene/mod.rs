// =============================================================================
// SCENE: rooms, clickable regions, and the actions they trigger
//
// Everything here is static data: built once from a scene definition at
// startup and never mutated afterwards. The dispatcher reads it, the game
// state machine refers to rooms by `RoomId` only.
// =============================================================================

pub mod dispatch;
pub mod graph;

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ui::rect_contains;

pub use dispatch::{dispatch, hit_test};
pub use graph::{
    ARROW_MARGIN, ARROW_SIZE, DEFAULT_LIBRARY, MAX_SCARE_SECS, SCENE_HEIGHT, SCENE_WIDTH,
    ScareConfig, SceneDef, SceneError, SceneGraph,
};

// ── RoomId ───────────────────────────────────────────────────────────────────

/// Name of a room, unique within a scene graph (e.g. `"MainHall"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

// ── Direction ────────────────────────────────────────────────────────────────

/// Compass direction of a room exit. Each exit is shown as an arrow at the
/// matching edge of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Arrow hotspots are generated in this order.
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    /// Fixed arrow rectangle for this direction inside a `scene_w × scene_h` scene.
    pub fn arrow_rect(self, scene_w: f32, scene_h: f32) -> Rect {
        let s = ARROW_SIZE;
        let m = ARROW_MARGIN;
        match self {
            Direction::North => Rect::new(scene_w / 2.0 - s / 2.0, m, s, s),
            Direction::South => Rect::new(scene_w / 2.0 - s / 2.0, scene_h - s - m, s, s),
            Direction::West => Rect::new(m, scene_h / 2.0 - s / 2.0, s, s),
            Direction::East => Rect::new(scene_w - s - m, scene_h / 2.0 - s / 2.0, s, s),
        }
    }

    /// Triangle pointing in this direction, inscribed in `rect`.
    pub fn arrow_triangle(self, rect: &Rect) -> [Vec2; 3] {
        let (l, t, r, b) = (rect.x, rect.y, rect.x + rect.w, rect.y + rect.h);
        let (cx, cy) = (rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
        match self {
            Direction::North => [Vec2::new(cx, t), Vec2::new(l, b), Vec2::new(r, b)],
            Direction::South => [Vec2::new(cx, b), Vec2::new(l, t), Vec2::new(r, t)],
            Direction::West => [Vec2::new(l, cy), Vec2::new(r, t), Vec2::new(r, b)],
            Direction::East => [Vec2::new(r, cy), Vec2::new(l, t), Vec2::new(l, b)],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        })
    }
}

// ── Regions ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in scene coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Vec2) -> bool {
        rect_contains(self.x, self.y, self.w, self.h, p.x, p.y)
    }
}

/// Clickable shape of a hotspot.
///
/// In JSON: `{"rect": {"x": 0, "y": 0, "w": 10, "h": 10}}` or
/// `{"polygon": [[0, 0], [10, 0], [5, 8]]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Rect(Rect),
    Polygon(Vec<[f32; 2]>),
}

impl Region {
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Region::Rect(r) => r.contains(p),
            Region::Polygon(points) => polygon_contains(points, p),
        }
    }

    /// Smallest rectangle enclosing the region (used for outlines and labels).
    pub fn bounds(&self) -> Rect {
        match self {
            Region::Rect(r) => *r,
            Region::Polygon(points) if points.is_empty() => Rect::new(0.0, 0.0, 0.0, 0.0),
            Region::Polygon(points) => {
                let mut min = Vec2::splat(f32::MAX);
                let mut max = Vec2::splat(f32::MIN);
                for &[x, y] in points {
                    min = min.min(Vec2::new(x, y));
                    max = max.max(Vec2::new(x, y));
                }
                Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
            }
        }
    }
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[[f32; 2]], p: Vec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let [xi, yi] = points[i];
        let [xj, yj] = points[j];
        if (yi > p.y) != (yj > p.y) && p.x < (xj - xi) * (p.y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ── Actions & hotspots ───────────────────────────────────────────────────────

/// What a click resolves to. Closed set, matched exhaustively by the state
/// machine.
///
/// In JSON a hotspot action is `{"navigate": "MainHall"}`,
/// `{"inspect_shelf": 2}` or `"trigger_scare"`. `NoOp` is never written in a
/// scene file; it is what the dispatcher returns when nothing was hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Navigate(RoomId),
    InspectShelf(u32),
    TriggerScare,
    #[serde(skip)]
    NoOp,
}

/// A clickable region of a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub name: String,
    pub region: Region,
    pub action: Action,
    /// `Some` for the generated exit arrows, which the presentation layer draws.
    pub arrow: Option<Direction>,
}

/// One static location: a background image plus its hotspots, in dispatch order.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// Asset name of the background image (e.g. `"rooms/main_hall"`).
    pub background: String,
    pub exits: BTreeMap<Direction, RoomId>,
    pub hotspots: Vec<Hotspot>,
}

impl Room {
    /// The generated arrow hotspots, one per exit.
    pub fn arrows(&self) -> impl Iterator<Item = (Direction, &Hotspot)> {
        self.hotspots.iter().filter_map(|h| h.arrow.map(|d| (d, h)))
    }
}
