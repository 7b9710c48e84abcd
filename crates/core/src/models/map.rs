//! Map aggregate - rooms, halls and grid metadata

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use super::{GridSize, Hall, HallDirection, Position, Room};
use crate::codec::timestamp;
use crate::error::{Error, Result};
use crate::grid::{self, HallSlot};
use crate::invariants;

/// Name given to a fresh map
pub const DEFAULT_MAP_NAME: &str = "My Room Map";

/// Current time at the millisecond precision used on the wire
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Whether an upsert added a new entity or replaced one with the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// A room map: the aggregate that owns every room and hall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMap {
    pub rooms: Vec<Room>,
    pub halls: Vec<Hall>,
    pub grid_size: GridSize,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl RoomMap {
    pub fn new(name: String, grid_size: GridSize) -> Self {
        let now = now();
        Self {
            rooms: Vec::new(),
            halls: Vec::new(),
            grid_size,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Room at a cell, or `None` if the cell is empty
    pub fn room_at(&self, position: Position) -> Result<Option<&Room>> {
        grid::check_cell(self.grid_size, position)?;
        Ok(grid::room_at(&self.rooms, position))
    }

    /// Hall at a slot, or `None` if no hall is configured there
    pub fn hall_at(&self, position: Position, direction: HallDirection) -> Result<Option<&Hall>> {
        grid::check_hall_slot(self.grid_size, HallSlot::new(position, direction))?;
        Ok(grid::hall_at(&self.halls, position, direction))
    }

    pub fn find_room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn find_hall(&self, id: &str) -> Option<&Hall> {
        self.halls.iter().find(|h| h.id == id)
    }

    /// Insert a room, replacing any room with the same id
    ///
    /// Fails with `SlotOccupied` if a room with a different id already sits at
    /// the target position. A room saved back to the position it already holds
    /// is never rejected, even when a loaded map has another room there too.
    pub fn upsert_room(&mut self, room: Room) -> Result<Upsert> {
        grid::check_cell(self.grid_size, room.position)?;

        let stays_put = self
            .find_room(&room.id)
            .is_some_and(|existing| existing.position == room.position);
        let occupant = self
            .rooms
            .iter()
            .find(|r| r.position == room.position && r.id != room.id);
        if let Some(occupant) = occupant.filter(|_| !stays_put) {
            return Err(Error::SlotOccupied {
                occupant: format!("room {} at {}", occupant.id, occupant.position),
            });
        }

        invariants::assert_room_invariants(&room, self.grid_size);

        let before = self.rooms.len();
        self.rooms.retain(|r| r.id != room.id);
        let outcome = if self.rooms.len() < before {
            Upsert::Replaced
        } else {
            Upsert::Inserted
        };
        self.rooms.push(room);
        Ok(outcome)
    }

    /// Insert a hall, replacing any hall with the same id
    ///
    /// Fails with `SlotOccupied` if a hall with a different id already sits in
    /// the target slot, unless the hall already holds that slot itself.
    pub fn upsert_hall(&mut self, hall: Hall) -> Result<Upsert> {
        let slot = HallSlot::of(&hall);
        grid::check_hall_slot(self.grid_size, slot)?;

        let stays_put = self
            .find_hall(&hall.id)
            .is_some_and(|existing| HallSlot::of(existing) == slot);
        let occupant = self
            .halls
            .iter()
            .find(|h| HallSlot::of(h) == slot && h.id != hall.id);
        if let Some(occupant) = occupant.filter(|_| !stays_put) {
            return Err(Error::SlotOccupied {
                occupant: format!("hall {} ({})", occupant.id, slot),
            });
        }

        invariants::assert_hall_invariants(&hall, self.grid_size);

        let before = self.halls.len();
        self.halls.retain(|h| h.id != hall.id);
        let outcome = if self.halls.len() < before {
            Upsert::Replaced
        } else {
            Upsert::Inserted
        };
        self.halls.push(hall);
        Ok(outcome)
    }

    /// Drop every room and hall, keeping grid size and name
    pub fn clear(&mut self) {
        self.rooms.clear();
        self.halls.clear();
    }

    /// Stamp `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = now();
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.halls.is_empty()
    }

    /// Rooms sharing a position with an earlier room, in scan order
    pub fn room_collisions(&self) -> Vec<&Room> {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(i, room)| self.rooms[..*i].iter().any(|r| r.position == room.position))
            .map(|(_, room)| room)
            .collect()
    }

    /// Halls sharing a slot with an earlier hall, in scan order
    pub fn hall_collisions(&self) -> Vec<&Hall> {
        self.halls
            .iter()
            .enumerate()
            .filter(|(i, hall)| {
                self.halls[..*i]
                    .iter()
                    .any(|h| HallSlot::of(h) == HallSlot::of(hall))
            })
            .map(|(_, hall)| hall)
            .collect()
    }
}

impl Default for RoomMap {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_NAME.to_string(), GridSize::default())
    }
}
