//! The library game: its state machine and the engine-facing front end.

pub mod library;
pub mod state;

pub use library::{
    COVER_IMAGE, Command, CoverChange, LibraryGame, TickInput, route_input, settle_lookup,
};
pub use state::{Effect, Flag, GameState, Mode, Popup, PopupContent};

pub use crate::catalog::Ticket;
