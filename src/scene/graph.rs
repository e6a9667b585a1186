use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::{Action, Direction, Hotspot, Region, Room, RoomId};

/// Fixed scene coordinate space. Backgrounds are stretched to fill it and
/// every hotspot region is expressed in it, whatever the window size.
pub const SCENE_WIDTH: f32 = 800.0;
pub const SCENE_HEIGHT: f32 = 600.0;

/// Side length of an exit arrow, in scene pixels.
pub const ARROW_SIZE: f32 = 50.0;
/// Distance between an exit arrow and the scene edge.
pub const ARROW_MARGIN: f32 = 10.0;

/// Longest scare a scene file may ask for. The scare cannot be dismissed,
/// so it has to end on its own.
pub const MAX_SCARE_SECS: f32 = 10.0;

/// The abandoned library shipped with the game.
pub const DEFAULT_LIBRARY: &str = include_str!("../../resources/library.json");

// ── Errors ───────────────────────────────────────────────────────────────────

/// A scene definition that cannot be turned into a playable graph. Always a
/// configuration bug, reported at startup.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scene graph has no rooms")]
    Empty,
    #[error("room '{0}' is defined more than once")]
    DuplicateRoom(RoomId),
    #[error("start room '{0}' does not exist")]
    UnknownStart(RoomId),
    #[error("room '{room}': {direction} exit leads to unknown room '{target}'")]
    UnknownExit { room: RoomId, direction: Direction, target: RoomId },
    #[error("room '{room}': hotspot '{hotspot}' navigates to unknown room '{target}'")]
    UnknownTarget { room: RoomId, hotspot: String, target: RoomId },
    #[error("room '{room}': hotspot '{hotspot}' has an invalid region ({reason})")]
    InvalidRegion { room: RoomId, hotspot: String, reason: &'static str },
    #[error("scare duration must be in (0, {max}] seconds, got {0}", max = MAX_SCARE_SECS)]
    InvalidScareDuration(f32),
}

// ── Definitions (JSON-facing) ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDef {
    pub start: RoomId,
    #[serde(default)]
    pub scare: ScareConfig,
    pub rooms: Vec<RoomDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomDef {
    pub id: RoomId,
    pub background: String,
    #[serde(default)]
    pub exits: BTreeMap<Direction, RoomId>,
    #[serde(default)]
    pub hotspots: Vec<HotspotDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotspotDef {
    pub name: String,
    pub region: Region,
    pub action: Action,
}

/// How the one-shot scare is presented.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScareConfig {
    /// Image asset shown full-scene while the scare lasts.
    pub image: String,
    /// Sound asset played once when the scare starts.
    pub sound: String,
    pub duration_secs: f32,
}

impl Default for ScareConfig {
    fn default() -> Self {
        Self {
            image: "scare".into(),
            sound: "sounds/scare".into(),
            duration_secs: 1.5,
        }
    }
}

// ── SceneGraph ───────────────────────────────────────────────────────────────

/// Validated, immutable set of rooms.
///
/// Every exit and every `Navigate` target resolves to a room of the graph;
/// construction fails otherwise.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    rooms: HashMap<RoomId, Room>,
    start: RoomId,
    scare: ScareConfig,
}

impl SceneGraph {
    /// The bundled library.
    pub fn library() -> Result<Self, SceneError> {
        Self::from_json(DEFAULT_LIBRARY)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)
            .map_err(|source| SceneError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let def: SceneDef = serde_json::from_str(json)?;
        Self::from_def(def)
    }

    pub fn from_def(def: SceneDef) -> Result<Self, SceneError> {
        if def.rooms.is_empty() {
            return Err(SceneError::Empty);
        }
        let duration = def.scare.duration_secs;
        if !(duration > 0.0 && duration <= MAX_SCARE_SECS) {
            return Err(SceneError::InvalidScareDuration(def.scare.duration_secs));
        }

        let ids: BTreeSet<&RoomId> = def.rooms.iter().map(|r| &r.id).collect();
        if !ids.contains(&def.start) {
            return Err(SceneError::UnknownStart(def.start));
        }

        let mut rooms = HashMap::with_capacity(def.rooms.len());
        for room_def in &def.rooms {
            let room = build_room(room_def, &ids)?;
            if rooms.insert(room.id.clone(), room).is_some() {
                return Err(SceneError::DuplicateRoom(room_def.id.clone()));
            }
        }

        Ok(Self { rooms, start: def.start, scare: def.scare })
    }

    pub fn start(&self) -> &RoomId {
        &self.start
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn scare(&self) -> &ScareConfig {
        &self.scare
    }

    /// Every image asset the graph refers to: backgrounds plus the scare image.
    pub fn required_images(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.rooms.values().map(|r| r.background.clone()).collect();
        names.insert(self.scare.image.clone());
        names
    }

    pub fn required_sounds(&self) -> BTreeSet<String> {
        BTreeSet::from([self.scare.sound.clone()])
    }
}

/// Turn one room definition into a `Room`: exit arrows first (north, east,
/// south, west), then the declared hotspots in file order.
fn build_room(def: &RoomDef, ids: &BTreeSet<&RoomId>) -> Result<Room, SceneError> {
    let mut hotspots = Vec::with_capacity(def.exits.len() + def.hotspots.len());

    for direction in Direction::ALL {
        let Some(target) = def.exits.get(&direction) else { continue };
        if !ids.contains(target) {
            return Err(SceneError::UnknownExit {
                room: def.id.clone(),
                direction,
                target: target.clone(),
            });
        }
        hotspots.push(Hotspot {
            name: format!("{direction} arrow"),
            region: Region::Rect(direction.arrow_rect(SCENE_WIDTH, SCENE_HEIGHT)),
            action: Action::Navigate(target.clone()),
            arrow: Some(direction),
        });
    }

    for h in &def.hotspots {
        validate_region(&def.id, &h.name, &h.region)?;
        if let Action::Navigate(target) = &h.action {
            if !ids.contains(target) {
                return Err(SceneError::UnknownTarget {
                    room: def.id.clone(),
                    hotspot: h.name.clone(),
                    target: target.clone(),
                });
            }
        }
        hotspots.push(Hotspot {
            name: h.name.clone(),
            region: h.region.clone(),
            action: h.action.clone(),
            arrow: None,
        });
    }

    Ok(Room {
        id: def.id.clone(),
        background: def.background.clone(),
        exits: def.exits.clone(),
        hotspots,
    })
}

fn validate_region(room: &RoomId, hotspot: &str, region: &Region) -> Result<(), SceneError> {
    let reason = match region {
        Region::Rect(r) if !(r.w > 0.0 && r.h > 0.0) => Some("rectangle must have positive size"),
        Region::Polygon(points) if points.len() < 3 => Some("polygon needs at least 3 points"),
        _ => None,
    };
    match reason {
        Some(reason) => Err(SceneError::InvalidRegion {
            room: room.clone(),
            hotspot: hotspot.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}
