//! Hall model - an edge between grid cells

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HallColor, Position};

/// Orientation of a hall slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HallDirection {
    /// Runs left-to-right between two room rows
    Horizontal,
    /// Runs top-to-bottom between two room columns
    Vertical,
}

impl HallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            HallDirection::Horizontal => "horizontal",
            HallDirection::Vertical => "vertical",
        }
    }

    /// Labels for the (start, end) ends of a hall in this direction
    pub fn end_labels(&self) -> (&'static str, &'static str) {
        match self {
            HallDirection::Horizontal => ("Left", "Right"),
            HallDirection::Vertical => ("Top", "Bottom"),
        }
    }
}

impl std::fmt::Display for HallDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HallDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(HallDirection::Horizontal),
            "vertical" => Ok(HallDirection::Vertical),
            other => Err(format!("unknown hall direction '{}'", other)),
        }
    }
}

/// A hall between grid cells
///
/// `position` anchors the hall slot and is not necessarily a room cell: edge
/// halls sit at row/col index equal to the grid dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    pub id: String,
    pub position: Position,
    pub direction: HallDirection,
    /// Start end (left or top) is a wall rather than a passage
    #[serde(default)]
    pub start_is_wall: bool,
    /// End end (right or bottom) is a wall rather than a passage
    #[serde(default)]
    pub end_is_wall: bool,
    #[serde(default)]
    pub color: HallColor,
}

impl Hall {
    /// New fully open hall with no lamp
    pub fn new(position: Position, direction: HallDirection) -> Self {
        Self {
            id: Self::fresh_id(),
            position,
            direction,
            start_is_wall: false,
            end_is_wall: false,
            color: HallColor::NONE,
        }
    }

    pub fn fresh_id() -> String {
        format!("hall-{}", Uuid::new_v4())
    }

    pub fn with_walls(mut self, start_is_wall: bool, end_is_wall: bool) -> Self {
        self.start_is_wall = start_is_wall;
        self.end_is_wall = end_is_wall;
        self
    }

    pub fn with_color(mut self, color: HallColor) -> Self {
        self.color = color;
        self
    }

    /// Both ends walled off
    pub fn is_blocked(&self) -> bool {
        self.start_is_wall && self.end_is_wall
    }

    /// Both ends are passages
    pub fn is_open(&self) -> bool {
        !self.start_is_wall && !self.end_is_wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorTag;

    #[test]
    fn test_hall_json_shape() {
        let hall = Hall {
            id: "hall-1".to_string(),
            position: Position::new(0, 0),
            direction: HallDirection::Horizontal,
            start_is_wall: true,
            end_is_wall: false,
            color: ColorTag::Red.into(),
        };

        let value = serde_json::to_value(&hall).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "hall-1",
                "position": {"row": 0, "col": 0},
                "direction": "horizontal",
                "startIsWall": true,
                "endIsWall": false,
                "color": "red",
            })
        );
    }

    #[test]
    fn test_hall_defaults_when_fields_missing() {
        let hall: Hall = serde_json::from_str(
            r#"{"id": "h", "position": {"row": 3, "col": 5}, "direction": "vertical"}"#,
        )
        .unwrap();
        assert!(hall.is_open());
        assert!(!hall.color.is_lit());
    }

    #[test]
    fn test_ends_are_independent() {
        let hall = Hall::new(Position::new(1, 1), HallDirection::Vertical);
        assert!(hall.is_open());

        let half = hall.clone().with_walls(true, false);
        assert!(!half.is_open());
        assert!(!half.is_blocked());

        let blocked = hall.with_walls(true, true);
        assert!(blocked.is_blocked());
    }

    #[test]
    fn test_end_labels() {
        assert_eq!(HallDirection::Horizontal.end_labels(), ("Left", "Right"));
        assert_eq!(HallDirection::Vertical.end_labels(), ("Top", "Bottom"));
    }
}
