//! Editor session
//!
//! Owns the working map and writes it through to the storage slot after
//! every change. There is no dirty tracking: each mutation is persisted
//! before the call returns.

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::codec;
use crate::error::Result;
use crate::invariants;
use crate::models::{RoomMap, Upsert};
use crate::selection::{HallDraft, RoomDraft};
use crate::storage::SlotRepository;

/// What `open` found in the storage slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A saved map was restored
    Restored,
    /// The slot was empty; the fallback map is in use
    Empty,
    /// The slot held something unreadable; the fallback map is in use
    Malformed(String),
}

/// Bytes and a suggested filename for an exported map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A working map bound to a storage slot
pub struct MapSession<S: SlotRepository> {
    store: S,
    slot: String,
    map: RoomMap,
}

impl<S: SlotRepository> MapSession<S> {
    /// Restore the map saved in `slot`, or start from `fallback`
    ///
    /// A malformed slot is logged and left as-is; it is only overwritten by
    /// the next save.
    #[instrument(skip(store, fallback))]
    pub fn open(store: S, slot: &str, fallback: RoomMap) -> Result<(Self, LoadOutcome)> {
        let (map, outcome) = match store.get(slot)? {
            Some(bytes) => match codec::deserialize(&bytes) {
                Ok(map) => {
                    info!(
                        name = %map.name,
                        rooms = map.rooms.len(),
                        halls = map.halls.len(),
                        "Map loaded from storage"
                    );
                    (map, LoadOutcome::Restored)
                }
                Err(e) => {
                    error!(error = %e, "Error loading map");
                    (fallback, LoadOutcome::Malformed(e.to_string()))
                }
            },
            None => (fallback, LoadOutcome::Empty),
        };

        let session = Self {
            store,
            slot: slot.to_string(),
            map,
        };
        Ok((session, outcome))
    }

    pub fn map(&self) -> &RoomMap {
        &self.map
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// When the slot was last written, `None` if nothing is persisted
    pub fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        self.store.last_written(&self.slot)
    }

    /// Complete a room draft, upsert it and persist
    #[instrument(skip(self, draft), fields(position = %draft.position))]
    pub fn save_room(&mut self, draft: RoomDraft) -> Result<Upsert> {
        let room = draft.into_room();
        let room_id = room.id.clone();
        let outcome = self.upsert_checked(|map| map.upsert_room(room))?;
        info!(room_id = %room_id, ?outcome, "Room saved");
        self.commit()?;
        Ok(outcome)
    }

    /// Complete a hall draft, upsert it and persist
    #[instrument(skip(self, draft), fields(slot = %draft.slot))]
    pub fn save_hall(&mut self, draft: HallDraft) -> Result<Upsert> {
        let hall = draft.into_hall();
        let hall_id = hall.id.clone();
        let outcome = self.upsert_checked(|map| map.upsert_hall(hall))?;
        info!(hall_id = %hall_id, ?outcome, "Hall saved");
        self.commit()?;
        Ok(outcome)
    }

    /// Persist the current map unchanged
    pub fn save(&mut self) -> Result<()> {
        self.commit()?;
        info!(name = %self.map.name, "Map saved");
        Ok(())
    }

    /// Stamp and encode the map for download
    pub fn export(&mut self) -> Result<Export> {
        self.map.touch();
        let export = Export {
            filename: codec::export_filename(&self.map.name),
            bytes: codec::serialize_pretty(&self.map)?,
        };
        info!(filename = %export.filename, len = export.bytes.len(), "Map exported");
        Ok(export)
    }

    /// Replace the working map with an imported one and persist it
    ///
    /// On `MalformedInput` the session is left exactly as it was.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn import(&mut self, bytes: &[u8]) -> Result<()> {
        let imported = match codec::deserialize(bytes) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "Error importing map");
                return Err(e);
            }
        };

        self.map = imported;
        self.commit()?;
        info!(
            name = %self.map.name,
            rooms = self.map.rooms.len(),
            halls = self.map.halls.len(),
            "Map imported"
        );
        Ok(())
    }

    /// Drop all rooms and halls and remove the storage slot
    pub fn clear(&mut self) -> Result<()> {
        self.map.clear();
        self.store.remove(&self.slot)?;
        info!("Map cleared");
        Ok(())
    }

    /// Run an upsert; in debug builds, a map that was consistent before must
    /// still be consistent after
    fn upsert_checked(
        &mut self,
        upsert: impl FnOnce(&mut RoomMap) -> Result<Upsert>,
    ) -> Result<Upsert> {
        let was_consistent =
            cfg!(debug_assertions) && invariants::find_map_violation(&self.map).is_none();
        let outcome = upsert(&mut self.map)?;
        if was_consistent {
            invariants::assert_map_invariants(&self.map);
        }
        Ok(outcome)
    }

    fn commit(&mut self) -> Result<()> {
        self.map.touch();
        let bytes = codec::serialize(&self.map)?;
        self.store.set(&self.slot, &bytes)
    }
}

impl<S: SlotRepository> std::fmt::Debug for MapSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("slot", &self.slot)
            .field("name", &self.map.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::grid::HallSlot;
    use crate::models::{ColorTag, GridSize, HallDirection, Position};
    use crate::selection::{select_cell, select_hall};
    use crate::storage::{Database, MemoryStore, MAP_SLOT};

    fn open_empty() -> MapSession<MemoryStore> {
        let (session, outcome) =
            MapSession::open(MemoryStore::new(), MAP_SLOT, RoomMap::default()).unwrap();
        assert_eq!(outcome, LoadOutcome::Empty);
        session
    }

    #[test]
    fn test_end_to_end_default_grid() {
        let mut session = open_empty();
        assert_eq!(session.map().grid_size, GridSize::new(9, 5));

        let selection = select_cell(session.map(), Position::new(0, 0)).unwrap();
        let mut draft = RoomDraft::from_selection(&selection);
        draft.name = "Den".to_string();
        draft.key_letter_input = "fox".to_string();
        session.save_room(draft).unwrap();

        let room = session.map().room_at(Position::new(0, 0)).unwrap().unwrap();
        assert_eq!(room.key_letter, "F");

        let selection = select_hall(session.map(), HallSlot::horizontal(0, 0)).unwrap();
        let mut draft = HallDraft::from_selection(&selection);
        draft.start_is_wall = true;
        draft.end_is_wall = false;
        draft.color = ColorTag::Red.into();
        session.save_hall(draft).unwrap();

        let hall = session
            .map()
            .hall_at(Position::new(0, 0), HallDirection::Horizontal)
            .unwrap()
            .unwrap();
        assert!(hall.start_is_wall);
        assert!(!hall.end_is_wall);
        assert_eq!(hall.color.get(), Some(ColorTag::Red));
        assert!(session
            .map()
            .hall_at(Position::new(1, 0), HallDirection::Horizontal)
            .unwrap()
            .is_none());

        assert!(invariants::find_map_violation(session.map()).is_none());
    }

    #[test]
    fn test_every_save_writes_through() {
        let mut session = open_empty();
        assert!(session.store().get(MAP_SLOT).unwrap().is_none());

        session
            .save_room(RoomDraft::blank(Position::new(2, 2)))
            .unwrap();

        let stored = codec::deserialize(&session.store().get(MAP_SLOT).unwrap().unwrap()).unwrap();
        assert_eq!(&stored, session.map());
    }

    #[test]
    fn test_reopen_restores_map() {
        let db = Database::open_in_memory().unwrap();
        {
            let (mut session, _) = MapSession::open(&db, MAP_SLOT, RoomMap::default()).unwrap();
            session
                .save_hall(HallDraft::blank(HallSlot::vertical(8, 5)))
                .unwrap();
        }

        let (session, outcome) = MapSession::open(&db, MAP_SLOT, RoomMap::default()).unwrap();
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(session.map().halls.len(), 1);
    }

    #[test]
    fn test_malformed_slot_falls_back() {
        let store = MemoryStore::new();
        store.set(MAP_SLOT, b"{\"rooms\": [").unwrap();

        let fallback = RoomMap::new("Fallback".to_string(), GridSize::new(3, 3));
        let (session, outcome) = MapSession::open(&store, MAP_SLOT, fallback).unwrap();

        assert!(matches!(outcome, LoadOutcome::Malformed(_)));
        assert_eq!(session.map().name, "Fallback");
        // Slot left untouched until the next save
        assert_eq!(store.get(MAP_SLOT).unwrap().unwrap(), b"{\"rooms\": [");
    }

    #[test]
    fn test_slot_collision_leaves_session_untouched() {
        let mut session = open_empty();
        session
            .save_room(RoomDraft::blank(Position::new(1, 1)))
            .unwrap();
        let before = session.map().clone();

        let err = session
            .save_room(RoomDraft::blank(Position::new(1, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::SlotOccupied { .. }));
        assert_eq!(session.map(), &before);
    }

    #[test]
    fn test_out_of_range_hall_rejected() {
        let mut session = open_empty();
        let err = session
            .save_hall(HallDraft::blank(HallSlot::horizontal(10, 0)))
            .unwrap_err();
        assert!(err.is_out_of_range());
        assert!(session.store().get(MAP_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_created_at_preserved_across_saves() {
        let mut session = open_empty();
        let created = session.map().created_at;

        session.save().unwrap();
        session
            .save_room(RoomDraft::blank(Position::new(0, 0)))
            .unwrap();
        let export = session.export().unwrap();

        assert_eq!(session.map().created_at, created);
        assert!(session.map().updated_at >= created);

        let exported = codec::deserialize(&export.bytes).unwrap();
        assert_eq!(exported.created_at, created);
    }

    #[test]
    fn test_export_filename_and_content() {
        let mut session = open_empty();
        session
            .save_room(RoomDraft::blank(Position::new(3, 1)))
            .unwrap();

        let export = session.export().unwrap();
        assert_eq!(export.filename, "my-room-map.json");
        assert_eq!(&codec::deserialize(&export.bytes).unwrap(), session.map());
    }

    #[test]
    fn test_import_replaces_and_persists() {
        let mut session = open_empty();
        let json = br#"{
            "rooms": [{"id": "r1", "name": "Old", "keyWord": "", "keyLetter": "O",
                       "position": {"row": 0, "col": 0}, "color": "blue"}],
            "gridSize": {"rows": 4, "cols": 4},
            "name": "Imported",
            "createdAt": "2023-01-01T00:00:00.000Z",
            "updatedAt": "2023-01-01T00:00:00.000Z"
        }"#;

        session.import(json).unwrap();
        assert_eq!(session.map().name, "Imported");
        assert_eq!(session.map().grid_size, GridSize::new(4, 4));
        assert_eq!(
            session.map().rooms[0].colors.as_slice(),
            &[Some(ColorTag::Blue)]
        );
        assert!(session.map().halls.is_empty());

        let stored = codec::deserialize(&session.store().get(MAP_SLOT).unwrap().unwrap()).unwrap();
        assert_eq!(stored.name, "Imported");
    }

    #[test]
    fn test_failed_import_leaves_state() {
        let mut session = open_empty();
        session
            .save_room(RoomDraft::blank(Position::new(5, 0)))
            .unwrap();
        let before = session.map().clone();
        let stored_before = session.store().get(MAP_SLOT).unwrap();

        let err = session.import(br#"{"rooms": [], "name": "Trunc"#).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert_eq!(session.map(), &before);
        assert_eq!(session.store().get(MAP_SLOT).unwrap(), stored_before);
    }

    #[test]
    fn test_edit_shown_room_after_importing_collisions() {
        let mut session = open_empty();
        let json = br#"{
            "rooms": [
                {"id": "a", "name": "Shown", "keyWord": "", "keyLetter": "S",
                 "position": {"row": 0, "col": 0}, "colors": []},
                {"id": "b", "name": "Hidden", "keyWord": "", "keyLetter": "H",
                 "position": {"row": 0, "col": 0}, "colors": []}
            ],
            "halls": [],
            "gridSize": {"rows": 9, "cols": 5},
            "name": "Crowded"
        }"#;
        session.import(json).unwrap();

        let selection = select_cell(session.map(), Position::new(0, 0)).unwrap();
        assert_eq!(selection.room.as_ref().unwrap().id, "a");

        let mut draft = RoomDraft::from_selection(&selection);
        draft.name = "Renamed".to_string();
        assert_eq!(session.save_room(draft).unwrap(), Upsert::Replaced);

        assert_eq!(session.map().rooms.len(), 2);
        assert_eq!(session.map().find_room("a").unwrap().name, "Renamed");
        let stored = codec::deserialize(&session.store().get(MAP_SLOT).unwrap().unwrap()).unwrap();
        assert_eq!(stored.find_room("a").unwrap().name, "Renamed");

        // A new room still cannot be placed there
        let err = session
            .save_room(RoomDraft::blank(Position::new(0, 0)))
            .unwrap_err();
        assert!(matches!(err, Error::SlotOccupied { .. }));
    }

    #[test]
    fn test_clear_removes_slot_and_keeps_metadata() {
        let mut session = open_empty();
        session
            .save_room(RoomDraft::blank(Position::new(0, 0)))
            .unwrap();
        session
            .save_hall(HallDraft::blank(HallSlot::vertical(0, 0)))
            .unwrap();

        assert!(session.last_saved().unwrap().is_some());
        session.clear().unwrap();
        assert!(session.last_saved().unwrap().is_none());
        assert!(session.map().is_empty());
        assert_eq!(session.map().grid_size, GridSize::default());
        assert!(session.store().get(MAP_SLOT).unwrap().is_none());
    }
}
