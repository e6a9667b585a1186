use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use glam::Vec2;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// A raw input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Raw hardware state. `*_pressed`, `*_released` and the press positions
/// only hold edges seen since the last update tick.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,

    /// Cursor position in physical window pixels.
    pub mouse_pos: Vec2,
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,
    /// Where each button went down, in physical window pixels.
    pub press_positions: HashMap<MouseButton, Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Duplicate press events only register one edge. The first press in a
    /// tick keeps its position even if the cursor moves on.
    pub fn press_mouse(&mut self, button: MouseButton) {
        if self.mouse_held.insert(button) {
            self.mouse_pressed.insert(button);
            self.press_positions.entry(button).or_insert(self.mouse_pos);
        }
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_held.remove(&button);
        self.mouse_released.insert(button);
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.press_positions.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }
    pub fn is_mouse_released(&self, button: MouseButton) -> bool { self.mouse_released.contains(&button) }

    /// Window position `button` went down at this tick, if it did.
    pub fn pressed_at(&self, button: MouseButton) -> Option<Vec2> {
        self.press_positions.get(&button).copied()
    }

    fn source_pressed(&self, source: InputSource) -> bool {
        match source {
            InputSource::Key(k) => self.is_key_pressed(k),
            InputSource::Mouse(b) => self.is_mouse_pressed(b),
        }
    }

    fn source_held(&self, source: InputSource) -> bool {
        match source {
            InputSource::Key(k) => self.is_key_held(k),
            InputSource::Mouse(b) => self.is_mouse_held(b),
        }
    }
}

/// Maps game commands to one or more physical inputs.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<InputSource>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, source: InputSource) {
        self.bindings.entry(action).or_default().push(source);
    }

    pub fn bind_all(&mut self, action: A, sources: impl IntoIterator<Item = InputSource>) {
        for source in sources {
            self.bind(action, source);
        }
    }

    /// True if any bound source went down since the last tick.
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|sources| sources.iter().any(|s| input.source_pressed(*s)))
    }

    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|sources| sources.iter().any(|s| input.source_held(*s)))
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}
