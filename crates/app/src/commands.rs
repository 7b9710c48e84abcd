//! Command execution against an editor session
//!
//! Each command returns the text to print; nothing here writes to stdout.

use std::path::PathBuf;

use roommap_core::codec::timestamp;
use roommap_core::grid::{bordering_cells, cell_halls};
use roommap_core::{
    select_cell, select_hall, Doors, Hall, HallColor, HallDraft, HallSlot, MapSession, Position, Room,
    RoomColorSet, RoomDraft, RoomMap, SlotRepository, Upsert,
};

use crate::cli::{Command, DoorSide, RoomArgs};
use crate::error::{AppError, Result};

pub async fn execute<S: SlotRepository>(
    session: &mut MapSession<S>,
    command: Command,
) -> Result<String> {
    match command {
        Command::Show => {
            let mut out = render_map(session.map());
            let last_saved = match session.last_saved()? {
                Some(stamp) => timestamp::format(&stamp),
                None => "never".to_string(),
            };
            out.push_str(&format!("\nLast saved: {}\n", last_saved));
            Ok(out)
        }
        Command::SelectCell { row, col } => describe_cell(session.map(), Position::new(row, col)),
        Command::SelectHall {
            row,
            col,
            direction,
        } => describe_hall(
            session.map(),
            HallSlot::new(Position::new(row, col), direction),
        ),
        Command::Room(RoomArgs {
            row,
            col,
            name,
            key_word,
            key_letter,
            colors,
            no_colors,
            doors,
            no_doors,
        }) => {
            let selection = select_cell(session.map(), Position::new(row, col))?;
            let mut draft = RoomDraft::from_selection(&selection);

            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(key_word) = key_word {
                draft.key_word = key_word;
            }
            if let Some(key_letter) = key_letter {
                draft.key_letter_input = key_letter;
            }
            if no_colors {
                draft.colors = RoomColorSet::new();
            } else if !colors.is_empty() {
                draft.colors = colors.into_iter().map(|c| c.0).collect();
            }
            if no_doors {
                draft.doors = Doors::none();
            } else if let Some(sides) = doors {
                draft.doors = DoorSide::collect(&sides);
            }

            let position = draft.position;
            let outcome = session.save_room(draft)?;
            Ok(format!("Room {} at {}", upsert_verb(outcome), position))
        }
        Command::Hall {
            row,
            col,
            direction,
            start,
            end,
            color,
        } => {
            let slot = HallSlot::new(Position::new(row, col), direction);
            let selection = select_hall(session.map(), slot)?;
            let mut draft = HallDraft::from_selection(&selection);

            if let Some(start) = start {
                draft.start_is_wall = start.is_wall();
            }
            if let Some(end) = end {
                draft.end_is_wall = end.is_wall();
            }
            if let Some(color) = color {
                draft.color = HallColor::new(color.0);
            }

            let outcome = session.save_hall(draft)?;
            Ok(format!("Hall {}: {}", upsert_verb(outcome), slot))
        }
        Command::Save => {
            session.save()?;
            Ok(format!("Saved '{}'", session.map().name))
        }
        Command::Export { out } => {
            let export = session.export()?;
            let path = out.unwrap_or_else(|| PathBuf::from(&export.filename));
            tokio::fs::write(&path, &export.bytes).await?;
            Ok(format!("Exported to {}", path.display()))
        }
        Command::Import { path } => {
            let bytes = tokio::fs::read(&path).await?;
            session.import(&bytes)?;
            let map = session.map();
            Ok(format!(
                "Imported '{}' ({} rooms, {} halls)",
                map.name,
                map.rooms.len(),
                map.halls.len()
            ))
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(AppError::Refused(
                    "clearing removes every room and hall; pass --yes to confirm".to_string(),
                ));
            }
            session.clear()?;
            Ok("Map cleared".to_string())
        }
    }
}

fn upsert_verb(outcome: Upsert) -> &'static str {
    match outcome {
        Upsert::Inserted => "created",
        Upsert::Replaced => "updated",
    }
}

/// Draw the grid with hall slots between cells, then list the contents
///
/// Rooms show their key letter (`*` if none). Horizontal halls are `---`
/// and vertical halls `|`; a walled end is drawn as `#`. Each room row takes
/// two lines so a vertical hall shows its top end above its bottom end.
pub fn render_map(map: &RoomMap) -> String {
    let grid = map.grid_size;
    let mut out = format!(
        "{} ({}x{}, updated {})\n",
        map.name,
        grid.rows,
        grid.cols,
        timestamp::format(&map.updated_at)
    );

    for row in 0..=grid.rows {
        for col in 0..grid.cols {
            out.push('+');
            out.push_str(&horizontal_glyph(first_hall(map, HallSlot::horizontal(row, col))));
        }
        out.push_str("+\n");

        if row < grid.rows {
            for end in [VerticalEnd::Top, VerticalEnd::Bottom] {
                for col in 0..=grid.cols {
                    let hall = first_hall(map, HallSlot::vertical(row, col));
                    out.push(vertical_glyph(hall, end));
                    if col < grid.cols {
                        let cell = match end {
                            VerticalEnd::Top => cell_glyph(first_room(map, Position::new(row, col))),
                            VerticalEnd::Bottom => "   ".to_string(),
                        };
                        out.push_str(&cell);
                    }
                }
                out.push('\n');
            }
        }
    }

    let mut rooms: Vec<&Room> = map.rooms.iter().collect();
    rooms.sort_by_key(|r| r.position);
    if !rooms.is_empty() {
        out.push_str("\nRooms:\n");
        for room in rooms {
            out.push_str(&format!("  {}\n", room_line(room)));
        }
    }

    let mut halls: Vec<&Hall> = map.halls.iter().collect();
    halls.sort_by_key(|h| (h.direction.as_str(), h.position));
    if !halls.is_empty() {
        out.push_str("\nHalls:\n");
        for hall in halls {
            out.push_str(&format!("  {}\n", hall_line(hall)));
        }
    }

    out
}

fn first_room(map: &RoomMap, position: Position) -> Option<&Room> {
    map.room_at(position).ok().flatten()
}

fn first_hall(map: &RoomMap, slot: HallSlot) -> Option<&Hall> {
    map.hall_at(slot.position, slot.direction).ok().flatten()
}

fn cell_glyph(room: Option<&Room>) -> String {
    match room {
        Some(room) => {
            let letter = room.key_letter.chars().next().unwrap_or('*');
            format!(" {} ", letter)
        }
        None => "   ".to_string(),
    }
}

fn horizontal_glyph(hall: Option<&Hall>) -> String {
    match hall {
        Some(hall) => {
            let start = if hall.start_is_wall { '#' } else { '-' };
            let end = if hall.end_is_wall { '#' } else { '-' };
            format!("{}-{}", start, end)
        }
        None => "   ".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalEnd {
    Top,
    Bottom,
}

fn vertical_glyph(hall: Option<&Hall>, end: VerticalEnd) -> char {
    let Some(hall) = hall else {
        return ' ';
    };
    let walled = match end {
        VerticalEnd::Top => hall.start_is_wall,
        VerticalEnd::Bottom => hall.end_is_wall,
    };
    if walled {
        '#'
    } else {
        '|'
    }
}

fn colors_text(colors: &RoomColorSet) -> String {
    if colors.is_empty() {
        return "none".to_string();
    }
    colors
        .iter()
        .map(|c| c.map_or("-", |tag| tag.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn doors_text(doors: &Doors) -> String {
    let sides: Vec<&str> = [
        (doors.north, "N"),
        (doors.east, "E"),
        (doors.south, "S"),
        (doors.west, "W"),
    ]
    .iter()
    .filter(|(open, _)| *open)
    .map(|(_, label)| *label)
    .collect();

    if sides.is_empty() {
        "none".to_string()
    } else {
        sides.join(" ")
    }
}

fn room_line(room: &Room) -> String {
    let name = if room.name.is_empty() {
        "(unnamed)"
    } else {
        room.name.as_str()
    };
    format!(
        "{} {} [{}] key word: '{}', colors: {}, doors: {}",
        room.position,
        name,
        room.key_letter,
        room.key_word,
        colors_text(&room.colors),
        doors_text(&room.doors)
    )
}

fn hall_line(hall: &Hall) -> String {
    let (start_label, end_label) = hall.direction.end_labels();
    let end_text = |wall: bool| if wall { "wall" } else { "passage" };
    format!(
        "{}: {} {}, {} {}, lamp: {}",
        HallSlot::of(hall),
        start_label,
        end_text(hall.start_is_wall),
        end_label,
        end_text(hall.end_is_wall),
        hall.color.get().map_or("none", |tag| tag.as_str())
    )
}

fn describe_cell(map: &RoomMap, position: Position) -> Result<String> {
    let selection = select_cell(map, position)?;
    let mut out = match &selection.room {
        Some(room) => format!("Room {}\n", room_line(room)),
        None => format!("Empty cell {}\n", position),
    };

    let halls = cell_halls(map.grid_size, position)?;
    for (side, slot) in [
        ("north", halls.north),
        ("east", halls.east),
        ("south", halls.south),
        ("west", halls.west),
    ] {
        let state = match first_hall(map, slot) {
            Some(hall) => hall_line(hall),
            None => format!("{}: no hall", slot),
        };
        out.push_str(&format!("  {}: {}\n", side, state));
    }
    Ok(out)
}

fn describe_hall(map: &RoomMap, slot: HallSlot) -> Result<String> {
    let selection = select_hall(map, slot)?;
    let mut out = match &selection.hall {
        Some(hall) => format!("Hall {}\n", hall_line(hall)),
        None => format!("Empty {}\n", slot),
    };

    let (before, after) = bordering_cells(map.grid_size, slot)?;
    for (label, cell) in [("before", before), ("after", after)] {
        let state = match cell {
            Some(position) => match first_room(map, position) {
                Some(room) => room_line(room),
                None => format!("{} empty", position),
            },
            None => "grid edge".to_string(),
        };
        out.push_str(&format!("  {}: {}\n", label, state));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ColorArg, HallEnd};
    use roommap_core::{ColorTag, HallDirection, MemoryStore, MAP_SLOT};
    use tempfile::TempDir;

    fn open_session() -> MapSession<MemoryStore> {
        MapSession::open(MemoryStore::new(), MAP_SLOT, RoomMap::default())
            .unwrap()
            .0
    }

    fn room_args(row: u32, col: u32) -> RoomArgs {
        RoomArgs {
            row,
            col,
            ..RoomArgs::default()
        }
    }

    fn room_command(row: u32, col: u32) -> Command {
        Command::Room(room_args(row, col))
    }

    #[tokio::test]
    async fn test_room_create_then_edit() {
        let mut session = open_session();

        let msg = execute(
            &mut session,
            Command::Room(RoomArgs {
                name: Some("Den".to_string()),
                key_letter: Some("fox".to_string()),
                colors: vec![ColorArg(Some(ColorTag::Red)), ColorArg(None)],
                doors: Some(vec![DoorSide::North]),
                ..room_args(0, 0)
            }),
        )
        .await
        .unwrap();
        assert_eq!(msg, "Room created at (0, 0)");

        let msg = execute(
            &mut session,
            Command::Room(RoomArgs {
                key_word: Some("burrow".to_string()),
                ..room_args(0, 0)
            }),
        )
        .await
        .unwrap();
        assert_eq!(msg, "Room updated at (0, 0)");

        let map = session.map();
        assert_eq!(map.rooms.len(), 1);
        let room = &map.rooms[0];
        assert_eq!(room.name, "Den");
        assert_eq!(room.key_word, "burrow");
        assert_eq!(room.key_letter, "F");
        assert_eq!(room.colors.as_slice(), &[Some(ColorTag::Red), None]);
        assert!(room.doors.north);
    }

    #[tokio::test]
    async fn test_room_outside_grid_fails() {
        let mut session = open_session();
        let err = execute(&mut session, room_command(9, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::Core(e) if e.is_out_of_range()));
        assert!(session.map().rooms.is_empty());
    }

    #[tokio::test]
    async fn test_hall_edges_and_color() {
        let mut session = open_session();
        execute(
            &mut session,
            Command::Hall {
                row: 9,
                col: 4,
                direction: HallDirection::Horizontal,
                start: Some(HallEnd::Wall),
                end: None,
                color: Some(ColorArg(Some(ColorTag::Blue))),
            },
        )
        .await
        .unwrap();

        let hall = session
            .map()
            .hall_at(Position::new(9, 4), HallDirection::Horizontal)
            .unwrap()
            .unwrap();
        assert!(hall.start_is_wall);
        assert!(!hall.end_is_wall);
        assert_eq!(hall.color.get(), Some(ColorTag::Blue));

        let described = describe_hall(session.map(), HallSlot::horizontal(9, 4)).unwrap();
        assert!(described.contains("Left wall"));
        assert!(described.contains("after: grid edge"));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let mut session = open_session();
        execute(&mut session, room_command(1, 1)).await.unwrap();

        let err = execute(&mut session, Command::Clear { yes: false })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Refused(_)));
        assert_eq!(session.map().rooms.len(), 1);

        execute(&mut session, Command::Clear { yes: true })
            .await
            .unwrap();
        assert!(session.map().is_empty());
    }

    #[tokio::test]
    async fn test_export_import_through_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("map.json");

        let mut session = open_session();
        execute(&mut session, room_command(2, 3)).await.unwrap();
        execute(
            &mut session,
            Command::Export {
                out: Some(path.clone()),
            },
        )
        .await
        .unwrap();

        let mut other = open_session();
        let msg = execute(&mut other, Command::Import { path })
            .await
            .unwrap();
        assert_eq!(msg, "Imported 'My Room Map' (1 rooms, 0 halls)");
        assert_eq!(other.map().rooms, session.map().rooms);
        assert_eq!(other.map().created_at, session.map().created_at);
    }

    #[tokio::test]
    async fn test_import_malformed_file_keeps_map() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, b"{\"rooms\": [").unwrap();

        let mut session = open_session();
        execute(&mut session, room_command(0, 0)).await.unwrap();
        let before = session.map().clone();

        let err = execute(&mut session, Command::Import { path })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(roommap_core::Error::MalformedInput(_))
        ));
        assert_eq!(session.map(), &before);
    }

    #[test]
    fn test_render_small_grid() {
        let mut map = RoomMap::new("Tiny".to_string(), roommap_core::GridSize::new(1, 2));
        map.upsert_room(Room::new("A".to_string(), Position::new(0, 0)).with_key(String::new(), "a"))
            .unwrap();
        map.upsert_hall(Hall::new(Position::new(0, 1), HallDirection::Vertical))
            .unwrap();
        map.upsert_hall(
            Hall::new(Position::new(0, 1), HallDirection::Horizontal).with_walls(true, false),
        )
        .unwrap();

        let rendered = render_map(&map);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "+   +#--+");
        assert_eq!(lines[2], "  A |    ");
        assert_eq!(lines[3], "    |    ");
        assert_eq!(lines[4], "+   +   +");
        assert!(rendered.contains("Rooms:"));
        assert!(rendered.contains("Halls:"));
    }

    #[test]
    fn test_render_vertical_hall_ends_separately() {
        let mut map = RoomMap::new("Tiny".to_string(), roommap_core::GridSize::new(1, 1));
        map.upsert_hall(Hall::new(Position::new(0, 0), HallDirection::Vertical).with_walls(true, false))
            .unwrap();
        map.upsert_hall(Hall::new(Position::new(0, 1), HallDirection::Vertical).with_walls(false, true))
            .unwrap();

        let rendered = render_map(&map);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "#   |");
        assert_eq!(lines[3], "|   #");
    }

    #[tokio::test]
    async fn test_show_reports_last_save() {
        let mut session = open_session();
        let shown = execute(&mut session, Command::Show).await.unwrap();
        assert!(shown.ends_with("Last saved: never\n"));

        execute(&mut session, Command::Save).await.unwrap();
        let shown = execute(&mut session, Command::Show).await.unwrap();
        assert!(!shown.contains("Last saved: never"));
        assert!(shown.contains("Last saved: 20"));
    }

    #[test]
    fn test_describe_cell_lists_sides() {
        let map = RoomMap::default();
        let described = describe_cell(&map, Position::new(0, 0)).unwrap();
        assert!(described.starts_with("Empty cell (0, 0)"));
        assert!(described.contains("north: horizontal hall at (0, 0): no hall"));
        assert!(described.contains("east: vertical hall at (0, 1): no hall"));
    }
}
