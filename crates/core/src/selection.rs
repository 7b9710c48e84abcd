//! Selection and edit drafts
//!
//! What the user clicked, and the form they are filling in, are plain values
//! owned by the caller. The core never stores them.

use crate::error::Result;
use crate::grid::HallSlot;
use crate::models::{derive_key_letter, Doors, Hall, HallColor, Position, Room, RoomColorSet, RoomMap};

/// A clicked room cell and the room in it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSelection {
    pub position: Position,
    pub room: Option<Room>,
}

/// A clicked hall slot and the hall in it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallSelection {
    pub slot: HallSlot,
    pub hall: Option<Hall>,
}

/// Resolve a cell click against the map
pub fn select_cell(map: &RoomMap, position: Position) -> Result<CellSelection> {
    let room = map.room_at(position)?.cloned();
    Ok(CellSelection { position, room })
}

/// Resolve a hall click against the map
pub fn select_hall(map: &RoomMap, slot: HallSlot) -> Result<HallSelection> {
    let hall = map.hall_at(slot.position, slot.direction)?.cloned();
    Ok(HallSelection { slot, hall })
}

/// Room form contents
///
/// `key_letter_input` is the raw text typed by the user; only its first
/// character survives, uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    pub id: Option<String>,
    pub position: Position,
    pub name: String,
    pub key_word: String,
    pub key_letter_input: String,
    pub colors: RoomColorSet,
    pub doors: Doors,
}

impl RoomDraft {
    /// Blank draft for an empty cell
    pub fn blank(position: Position) -> Self {
        Self {
            id: None,
            position,
            name: String::new(),
            key_word: String::new(),
            key_letter_input: String::new(),
            colors: RoomColorSet::new(),
            doors: Doors::none(),
        }
    }

    /// Prefill from the selected room, or blank if the cell is empty
    pub fn from_selection(selection: &CellSelection) -> Self {
        match &selection.room {
            Some(room) => Self {
                id: Some(room.id.clone()),
                position: selection.position,
                name: room.name.clone(),
                key_word: room.key_word.clone(),
                key_letter_input: room.key_letter.clone(),
                colors: room.colors.clone(),
                doors: room.doors,
            },
            None => Self::blank(selection.position),
        }
    }

    /// Complete the draft, reusing its id or minting a fresh one
    pub fn into_room(self) -> Room {
        Room {
            id: self.id.unwrap_or_else(Room::fresh_id),
            name: self.name,
            key_word: self.key_word,
            key_letter: derive_key_letter(&self.key_letter_input),
            position: self.position,
            colors: self.colors,
            doors: self.doors,
        }
    }
}

/// Hall form contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallDraft {
    pub id: Option<String>,
    pub slot: HallSlot,
    pub start_is_wall: bool,
    pub end_is_wall: bool,
    pub color: HallColor,
}

impl HallDraft {
    /// Open hall with no lamp
    pub fn blank(slot: HallSlot) -> Self {
        Self {
            id: None,
            slot,
            start_is_wall: false,
            end_is_wall: false,
            color: HallColor::NONE,
        }
    }

    pub fn from_selection(selection: &HallSelection) -> Self {
        match &selection.hall {
            Some(hall) => Self {
                id: Some(hall.id.clone()),
                slot: selection.slot,
                start_is_wall: hall.start_is_wall,
                end_is_wall: hall.end_is_wall,
                color: hall.color,
            },
            None => Self::blank(selection.slot),
        }
    }

    pub fn into_hall(self) -> Hall {
        Hall {
            id: self.id.unwrap_or_else(Hall::fresh_id),
            position: self.slot.position,
            direction: self.slot.direction,
            start_is_wall: self.start_is_wall,
            end_is_wall: self.end_is_wall,
            color: self.color,
        }
    }
}
