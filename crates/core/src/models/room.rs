//! Room model - one annotated grid cell

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Position, RoomColorSet};

/// Door flags on each side of a room
///
/// Purely descriptive; not tied to whether a hall exists on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doors {
    #[serde(default)]
    pub north: bool,
    #[serde(default)]
    pub east: bool,
    #[serde(default)]
    pub south: bool,
    #[serde(default)]
    pub west: bool,
}

impl Doors {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        [self.north, self.east, self.south, self.west]
            .iter()
            .filter(|d| **d)
            .count()
    }
}

/// A room placed on the grid
///
/// Deserialization goes through [`crate::codec`] so legacy records are
/// normalized first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub key_word: String,
    /// Uppercased first character of the user's input, or empty
    pub key_letter: String,
    pub position: Position,
    pub colors: RoomColorSet,
    pub doors: Doors,
}

impl Room {
    pub fn new(name: String, position: Position) -> Self {
        Self {
            id: Self::fresh_id(),
            name,
            key_word: String::new(),
            key_letter: String::new(),
            position,
            colors: RoomColorSet::new(),
            doors: Doors::none(),
        }
    }

    pub fn fresh_id() -> String {
        format!("room-{}", Uuid::new_v4())
    }

    pub fn with_key(mut self, key_word: String, key_letter_input: &str) -> Self {
        self.key_word = key_word;
        self.key_letter = derive_key_letter(key_letter_input);
        self
    }

    pub fn with_colors(mut self, colors: RoomColorSet) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_doors(mut self, doors: Doors) -> Self {
        self.doors = doors;
        self
    }
}

/// Uppercase the first character of `input`; empty input stays empty
pub fn derive_key_letter(input: &str) -> String {
    input
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
