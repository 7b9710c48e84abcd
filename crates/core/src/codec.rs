//! JSON encoding of room maps
//!
//! Writing always emits the canonical shape. Reading accepts older shapes:
//! rooms saved before multi-color support carry a scalar `color` instead of a
//! `colors` list, and some records have no `doors`. Each room record is first
//! classified as [`RoomRecord::Current`] or [`RoomRecord::Legacy`], then
//! [`normalize_room`] turns either variant into a [`Room`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{now, ColorTag, Doors, GridSize, Hall, Position, Room, RoomColorSet, RoomMap};

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse an RFC 3339 stamp, dropping anything finer than a millisecond
    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Room record as found on the wire, before classification
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoom {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    key_word: String,
    #[serde(default)]
    key_letter: String,
    position: Position,
    #[serde(default)]
    colors: Option<Vec<Option<ColorTag>>>,
    /// Only read when `colors` is absent
    #[serde(default)]
    color: Option<serde_json::Value>,
    #[serde(default)]
    doors: Option<Doors>,
}

/// Fields every room record shares regardless of color shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomFields {
    pub id: String,
    pub name: String,
    pub key_word: String,
    pub key_letter: String,
    pub position: Position,
    pub doors: Option<Doors>,
}

/// A room record classified by its color representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRecord {
    /// Carries the `colors` list
    Current {
        fields: RoomFields,
        colors: Vec<Option<ColorTag>>,
    },
    /// Predates `colors`; carries at most a scalar `color`
    Legacy {
        fields: RoomFields,
        color: Option<ColorTag>,
    },
}

/// A present `colors` list marks a current record, even alongside `color`
///
/// The scalar `color` is only parsed for legacy records; next to a `colors`
/// list it is ignored whatever it holds.
fn classify(raw: RawRoom) -> Result<RoomRecord> {
    let fields = RoomFields {
        id: raw.id,
        name: raw.name,
        key_word: raw.key_word,
        key_letter: raw.key_letter,
        position: raw.position,
        doors: raw.doors,
    };
    match raw.colors {
        Some(colors) => Ok(RoomRecord::Current { fields, colors }),
        None => {
            let color = match raw.color {
                Some(value) => serde_json::from_value::<Option<ColorTag>>(value).map_err(|e| {
                    Error::MalformedInput(format!("room {}: invalid color: {}", fields.id, e))
                })?,
                None => None,
            };
            Ok(RoomRecord::Legacy { fields, color })
        }
    }
}

/// Turn a classified room record into a canonical room
///
/// Legacy scalar colors become a one-element list (or an empty list when
/// null); missing doors default to all closed.
pub fn normalize_room(record: RoomRecord) -> Room {
    let (fields, colors) = match record {
        RoomRecord::Current { fields, colors } => (fields, RoomColorSet::from(colors)),
        RoomRecord::Legacy { fields, color } => {
            debug!(room_id = %fields.id, "Converting legacy room color");
            (fields, color.map(Some).into_iter().collect())
        }
    };

    Room {
        id: fields.id,
        name: fields.name,
        key_word: fields.key_word,
        key_letter: fields.key_letter,
        position: fields.position,
        colors,
        doors: fields.doors.unwrap_or_default(),
    }
}

/// Map record as found on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMap {
    rooms: Vec<RawRoom>,
    #[serde(default)]
    halls: Option<Vec<Hall>>,
    grid_size: GridSize,
    name: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

fn parse_stamp(field: &str, value: Option<String>, fallback: DateTime<Utc>) -> Result<DateTime<Utc>> {
    match value {
        Some(s) => timestamp::parse(&s)
            .map_err(|e| Error::MalformedInput(format!("invalid {}: {}", field, e))),
        None => Ok(fallback),
    }
}

/// Encode a map as compact JSON
pub fn serialize(map: &RoomMap) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(map)?)
}

/// Encode a map as indented JSON for export files
pub fn serialize_pretty(map: &RoomMap) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(map)?)
}

/// Decode and normalize a map
///
/// Fails with `MalformedInput` if the bytes are not JSON or lack `rooms`,
/// `gridSize` or `name`. Absent `halls` reads as empty.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn deserialize(bytes: &[u8]) -> Result<RoomMap> {
    let raw: RawMap =
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedInput(e.to_string()))?;

    let loaded_at = now();
    let created_at = parse_stamp("createdAt", raw.created_at, loaded_at)?;
    let updated_at = parse_stamp("updatedAt", raw.updated_at, loaded_at)?;

    let rooms = raw
        .rooms
        .into_iter()
        .map(|r| classify(r).map(normalize_room))
        .collect::<Result<Vec<_>>>()?;

    let map = RoomMap {
        rooms,
        halls: raw.halls.unwrap_or_default(),
        grid_size: raw.grid_size,
        name: raw.name,
        created_at,
        updated_at,
    };

    let room_collisions = map.room_collisions().len();
    let hall_collisions = map.hall_collisions().len();
    if room_collisions > 0 || hall_collisions > 0 {
        warn!(
            room_collisions,
            hall_collisions, "Loaded map has entities sharing a slot; first match wins"
        );
    }

    Ok(map)
}

/// Suggested export filename: lowercased name, whitespace runs as `-`
pub fn export_filename(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    format!("{}.json", slug)
}
