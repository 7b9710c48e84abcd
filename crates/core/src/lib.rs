//! Room Map Core Library
//!
//! Map model, grid addressing, JSON codec and slot storage for the room map
//! editor.

pub mod codec;
pub mod error;
pub mod grid;
pub mod invariants;
pub mod models;
pub mod selection;
pub mod session;
pub mod storage;

pub use codec::{deserialize, export_filename, normalize_room, serialize, RoomRecord};
pub use error::{Error, Result};
pub use grid::{hall_at, room_at, HallSlot};
pub use models::*;
pub use selection::{select_cell, select_hall, CellSelection, HallDraft, HallSelection, RoomDraft};
pub use session::{Export, LoadOutcome, MapSession};
pub use storage::{Database, MemoryStore, SlotRepository, MAP_SLOT};
