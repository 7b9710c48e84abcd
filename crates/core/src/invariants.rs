//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::grid::{self, HallSlot};
use crate::models::{GridSize, Hall, Room, RoomMap};

/// Validate that a room built by the editor is internally consistent
pub fn assert_room_invariants(room: &Room, grid: GridSize) {
    debug_assert!(!room.id.is_empty(), "Room at {} has empty id", room.position);

    debug_assert!(
        grid.contains(room.position),
        "Room {} at {} is outside a {}x{} grid",
        room.id,
        room.position,
        grid.rows,
        grid.cols
    );

    // Key letters are stored uppercased
    debug_assert!(
        !room.key_letter.chars().any(char::is_lowercase),
        "Room {} has lowercase key letter {:?}",
        room.id,
        room.key_letter
    );
}

/// Validate that a hall built by the editor sits in a real slot
pub fn assert_hall_invariants(hall: &Hall, grid: GridSize) {
    debug_assert!(!hall.id.is_empty(), "Hall at {} has empty id", hall.position);

    debug_assert!(
        grid::is_valid_hall_slot(grid, HallSlot::of(hall)),
        "Hall {} ({}) is outside a {}x{} grid",
        hall.id,
        HallSlot::of(hall),
        grid.rows,
        grid.cols
    );
}

/// First aggregate-wide uniqueness violation, if any
///
/// Imported maps may already contain collisions; this reports them without
/// panicking.
pub fn find_map_violation(map: &RoomMap) -> Option<String> {
    let mut room_ids = HashSet::new();
    let mut positions = HashSet::new();
    for room in &map.rooms {
        if !room_ids.insert(room.id.as_str()) {
            return Some(format!("Map {:?} has duplicate room id {}", map.name, room.id));
        }
        if !positions.insert(room.position) {
            return Some(format!("Map {:?} has two rooms at {}", map.name, room.position));
        }
    }

    let mut hall_ids = HashSet::new();
    let mut slots = HashSet::new();
    for hall in &map.halls {
        if !hall_ids.insert(hall.id.as_str()) {
            return Some(format!("Map {:?} has duplicate hall id {}", map.name, hall.id));
        }
        let slot = HallSlot::of(hall);
        if !slots.insert(slot) {
            return Some(format!("Map {:?} has two halls in {}", map.name, slot));
        }
    }

    None
}

/// Validate aggregate-wide uniqueness
///
/// Only holds for maps built through upserts.
pub fn assert_map_invariants(map: &RoomMap) {
    let violation = find_map_violation(map);
    debug_assert!(
        violation.is_none(),
        "{}",
        violation.as_deref().unwrap_or_default()
    );
}
