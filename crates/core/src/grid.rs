//! Grid addressing
//!
//! A `rows x cols` map has one horizontal hall slot above every room row plus
//! one below the last row, and one vertical hall slot left of every room column
//! plus one right of the last column:
//!
//! - horizontal slots: `row` in `0..=rows`, `col` in `0..cols`
//! - vertical slots: `row` in `0..rows`, `col` in `0..=cols`
//!
//! A horizontal hall at row `r` sits between room rows `r - 1` and `r`; a
//! vertical hall at col `c` sits between room columns `c - 1` and `c`. Edge
//! slots border a room on one side only but are addressable like any other.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{GridSize, Hall, HallDirection, Position, Room};

/// A hall slot: anchor position plus orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HallSlot {
    pub position: Position,
    pub direction: HallDirection,
}

impl HallSlot {
    pub fn new(position: Position, direction: HallDirection) -> Self {
        Self {
            position,
            direction,
        }
    }

    pub fn horizontal(row: u32, col: u32) -> Self {
        Self::new(Position::new(row, col), HallDirection::Horizontal)
    }

    pub fn vertical(row: u32, col: u32) -> Self {
        Self::new(Position::new(row, col), HallDirection::Vertical)
    }

    pub fn of(hall: &Hall) -> Self {
        Self::new(hall.position, hall.direction)
    }
}

impl std::fmt::Display for HallSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hall at {}", self.direction, self.position)
    }
}

/// The four hall slots surrounding a room cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHalls {
    pub north: HallSlot,
    pub east: HallSlot,
    pub south: HallSlot,
    pub west: HallSlot,
}

/// Find the room occupying a position (first match in scan order)
pub fn room_at(rooms: &[Room], position: Position) -> Option<&Room> {
    rooms.iter().find(|room| room.position == position)
}

/// Find the hall occupying a slot (first match in scan order)
pub fn hall_at(halls: &[Hall], position: Position, direction: HallDirection) -> Option<&Hall> {
    halls
        .iter()
        .find(|hall| hall.position == position && hall.direction == direction)
}

/// Whether a hall slot exists on this grid
pub fn is_valid_hall_slot(grid: GridSize, slot: HallSlot) -> bool {
    let Position { row, col } = slot.position;
    match slot.direction {
        HallDirection::Horizontal => row <= grid.rows && col < grid.cols,
        HallDirection::Vertical => row < grid.rows && col <= grid.cols,
    }
}

/// Fail with an out-of-range error unless the cell is inside the grid
pub fn check_cell(grid: GridSize, position: Position) -> Result<()> {
    if grid.contains(position) {
        Ok(())
    } else {
        Err(Error::CellOutOfRange {
            position,
            rows: grid.rows,
            cols: grid.cols,
        })
    }
}

/// Fail with an out-of-range error unless the hall slot exists on the grid
pub fn check_hall_slot(grid: GridSize, slot: HallSlot) -> Result<()> {
    if is_valid_hall_slot(grid, slot) {
        Ok(())
    } else {
        Err(Error::HallOutOfRange {
            position: slot.position,
            direction: slot.direction,
            rows: grid.rows,
            cols: grid.cols,
        })
    }
}

pub fn horizontal_slot_count(grid: GridSize) -> usize {
    (grid.rows as usize + 1) * grid.cols as usize
}

pub fn vertical_slot_count(grid: GridSize) -> usize {
    grid.rows as usize * (grid.cols as usize + 1)
}

/// Every hall slot on the grid, horizontal slots first, each row-major
pub fn hall_slots(grid: GridSize) -> impl Iterator<Item = HallSlot> {
    let GridSize { rows, cols } = grid;
    let horizontal =
        (0..=rows).flat_map(move |row| (0..cols).map(move |col| HallSlot::horizontal(row, col)));
    let vertical =
        (0..rows).flat_map(move |row| (0..=cols).map(move |col| HallSlot::vertical(row, col)));
    horizontal.chain(vertical)
}

/// Room cells on either side of a hall slot as `(before, after)`
///
/// `before` is the cell above (horizontal) or to the left (vertical); `after`
/// is the cell below or to the right. Edge slots have one side absent.
pub fn bordering_cells(
    grid: GridSize,
    slot: HallSlot,
) -> Result<(Option<Position>, Option<Position>)> {
    check_hall_slot(grid, slot)?;

    let Position { row, col } = slot.position;
    let (before, after) = match slot.direction {
        HallDirection::Horizontal => (
            row.checked_sub(1).map(|r| Position::new(r, col)),
            Position::new(row, col),
        ),
        HallDirection::Vertical => (
            col.checked_sub(1).map(|c| Position::new(row, c)),
            Position::new(row, col),
        ),
    };

    let after = grid.contains(after).then_some(after);
    Ok((before, after))
}

/// The hall slots on each side of a room cell
pub fn cell_halls(grid: GridSize, position: Position) -> Result<CellHalls> {
    check_cell(grid, position)?;

    let Position { row, col } = position;
    Ok(CellHalls {
        north: HallSlot::horizontal(row, col),
        east: HallSlot::vertical(row, col + 1),
        south: HallSlot::horizontal(row + 1, col),
        west: HallSlot::vertical(row, col),
    })
}
