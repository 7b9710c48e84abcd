//! Lamp color models
//!
//! Rooms carry an ordered list of lamp colors, halls carry a single optional
//! lamp. The two are kept as separate types so a hall color can never be
//! mistaken for a room color set.

use serde::{Deserialize, Serialize};

/// A lamp color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Prismatic,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Red => "red",
            ColorTag::Orange => "orange",
            ColorTag::Yellow => "yellow",
            ColorTag::Green => "green",
            ColorTag::Blue => "blue",
            ColorTag::Purple => "purple",
            ColorTag::Pink => "pink",
            ColorTag::Prismatic => "prismatic",
        }
    }

    /// All tags in palette order
    pub fn all() -> &'static [ColorTag] {
        &[
            ColorTag::Red,
            ColorTag::Orange,
            ColorTag::Yellow,
            ColorTag::Green,
            ColorTag::Blue,
            ColorTag::Purple,
            ColorTag::Pink,
            ColorTag::Prismatic,
        ]
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ColorTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorTag::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown color '{}'", s))
    }
}

/// Ordered lamp colors of a room
///
/// Entries may be null and may repeat; order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomColorSet(Vec<Option<ColorTag>>);

impl RoomColorSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, color: Option<ColorTag>) {
        self.0.push(color);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Option<ColorTag>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Option<ColorTag>] {
        &self.0
    }
}

impl From<Vec<Option<ColorTag>>> for RoomColorSet {
    fn from(colors: Vec<Option<ColorTag>>) -> Self {
        Self(colors)
    }
}

impl FromIterator<Option<ColorTag>> for RoomColorSet {
    fn from_iter<I: IntoIterator<Item = Option<ColorTag>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The single lamp on a hall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HallColor(Option<ColorTag>);

impl HallColor {
    pub const NONE: HallColor = HallColor(None);

    pub fn new(color: Option<ColorTag>) -> Self {
        Self(color)
    }

    pub fn get(&self) -> Option<ColorTag> {
        self.0
    }

    pub fn is_lit(&self) -> bool {
        self.0.is_some()
    }
}

impl From<ColorTag> for HallColor {
    fn from(color: ColorTag) -> Self {
        Self(Some(color))
    }
}
