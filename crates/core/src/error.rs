//! Error types for the room map core

use thiserror::Error;

use crate::models::{HallDirection, Position};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed map input: {0}")]
    MalformedInput(String),

    #[error("Cell {position} is outside a {rows}x{cols} grid")]
    CellOutOfRange {
        position: Position,
        rows: u32,
        cols: u32,
    },

    #[error("{direction} hall slot {position} is outside a {rows}x{cols} grid")]
    HallOutOfRange {
        position: Position,
        direction: HallDirection,
        rows: u32,
        cols: u32,
    },

    #[error("Slot is already occupied by {occupant}")]
    SlotOccupied { occupant: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for grid-addressing failures (caller bugs, not user input)
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Error::CellOutOfRange { .. } | Error::HallOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
