// =============================================================================
// STATE: the game state machine
//
// Owned by the event loop and only touched from its update step, so no
// locking. Transitions never perform I/O themselves: they return an `Effect`
// and the caller carries it out (start a lookup, play a sound, ...).
// =============================================================================

use std::collections::HashSet;

use tracing::{info, warn};

use crate::catalog::{BookRecord, CatalogError, Ticket};
use crate::scene::{Action, RoomId};

/// One-shot flags: set once, never cleared for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    ScareShown,
}

/// What the book popup currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    /// The lookup has not come back yet.
    Loading,
    Book(BookRecord),
    /// The lookup failed; shown as the fallback message.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// Lookup this popup is waiting for (or was filled by).
    pub ticket: Ticket,
    pub shelf: u32,
    pub content: PopupContent,
}

/// Sub-state on top of the current room.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Clicks are dispatched to the room's hotspots.
    Exploring,
    /// A book popup is open; navigation is suspended until it is dismissed.
    Popup(Popup),
    /// The scare image is on screen for `remaining` more seconds.
    Scare { remaining: f32 },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchBook(Ticket),
    CancelFetch(Ticket),
    Scare,
}

#[derive(Debug, Clone)]
pub struct GameState {
    current_room: RoomId,
    mode: Mode,
    flags: HashSet<Flag>,
    next_ticket: u64,
    scare_duration: f32,
}

impl GameState {
    pub fn new(start: RoomId, scare_duration: f32) -> Self {
        Self {
            current_room: start,
            mode: Mode::Exploring,
            flags: HashSet::new(),
            next_ticket: 1,
            scare_duration,
        }
    }

    pub fn current_room(&self) -> &RoomId {
        &self.current_room
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn popup(&self) -> Option<&Popup> {
        match &self.mode {
            Mode::Popup(p) => Some(p),
            _ => None,
        }
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// Carry out a dispatched action. Only acts while exploring: an open
    /// popup or a running scare swallows room input.
    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        if self.mode != Mode::Exploring {
            return None;
        }

        match action {
            Action::Navigate(target) => {
                info!(from = %self.current_room, to = %target, "moving");
                self.current_room = target;
                None
            }
            Action::InspectShelf(shelf) => {
                let ticket = Ticket(self.next_ticket);
                self.next_ticket += 1;
                info!(room = %self.current_room, shelf, %ticket, "inspecting shelf");
                self.mode = Mode::Popup(Popup { ticket, shelf, content: PopupContent::Loading });
                Some(Effect::FetchBook(ticket))
            }
            Action::TriggerScare => {
                if !self.flags.insert(Flag::ScareShown) {
                    return None;
                }
                info!(room = %self.current_room, "scare triggered");
                self.mode = Mode::Scare { remaining: self.scare_duration };
                Some(Effect::Scare)
            }
            Action::NoOp => None,
        }
    }

    /// Close the popup and return to the room. A lookup still in flight is
    /// reported so the caller can cancel it.
    pub fn dismiss(&mut self) -> Option<Effect> {
        let Mode::Popup(popup) = &self.mode else { return None };
        let effect = match popup.content {
            PopupContent::Loading => Some(Effect::CancelFetch(popup.ticket)),
            _ => None,
        };
        self.mode = Mode::Exploring;
        effect
    }

    /// Apply the outcome of lookup `ticket`. Returns `false` and leaves the
    /// state untouched when that popup is no longer open and waiting.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<BookRecord, CatalogError>) -> bool {
        let Mode::Popup(popup) = &mut self.mode else {
            info!(%ticket, "discarding lookup result: no popup open");
            return false;
        };
        if popup.ticket != ticket || popup.content != PopupContent::Loading {
            info!(%ticket, open = %popup.ticket, "discarding stale lookup result");
            return false;
        }

        popup.content = match result {
            Ok(book) => {
                info!(%ticket, title = %book.title, "book found");
                PopupContent::Book(book)
            }
            Err(e) => {
                warn!(%ticket, kind = e.kind(), error = %e, "catalog lookup failed");
                PopupContent::Unavailable
            }
        };
        true
    }

    /// Advance timers by `dt` seconds. The scare ends on its own.
    pub fn tick(&mut self, dt: f32) {
        if let Mode::Scare { remaining } = &mut self.mode {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.mode = Mode::Exploring;
            }
        }
    }
}
