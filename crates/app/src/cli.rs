//! Command-line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use roommap_core::{ColorTag, Doors, HallDirection};

#[derive(Parser, Debug)]
#[command(name = "roommap")]
#[command(about = "Room map editor - annotate a grid of rooms and the halls between them")]
pub struct Cli {
    /// Config file (defaults to roommap.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the map as a grid with its rooms and halls
    Show,

    /// Show the room cell at a position
    SelectCell { row: u32, col: u32 },

    /// Show the hall slot at a position
    SelectHall {
        row: u32,
        col: u32,
        direction: HallDirection,
    },

    /// Create or edit the room at a cell
    Room(RoomArgs),

    /// Create or edit the hall at a slot
    Hall {
        #[arg(long)]
        row: u32,
        #[arg(long)]
        col: u32,
        #[arg(long)]
        direction: HallDirection,

        /// Left end for horizontal halls, top end for vertical halls
        #[arg(long)]
        start: Option<HallEnd>,

        /// Right end for horizontal halls, bottom end for vertical halls
        #[arg(long)]
        end: Option<HallEnd>,

        /// Lamp color, or `none`
        #[arg(long)]
        color: Option<ColorArg>,
    },

    /// Persist the map as it is
    Save,

    /// Write the map to a JSON file
    Export {
        /// Output file (defaults to a name derived from the map name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace the map with one read from a JSON file
    Import { path: PathBuf },

    /// Remove every room and hall
    Clear {
        /// Confirm the clear
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct RoomArgs {
    #[arg(long)]
    pub row: u32,
    #[arg(long)]
    pub col: u32,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub key_word: Option<String>,

    /// Only the first character is kept, uppercased
    #[arg(long)]
    pub key_letter: Option<String>,

    /// Lamp color; repeat for several, `none` for an empty entry
    #[arg(long = "color")]
    pub colors: Vec<ColorArg>,

    /// Remove all lamp colors
    #[arg(long, conflicts_with = "colors")]
    pub no_colors: bool,

    /// Sides with a door, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub doors: Option<Vec<DoorSide>>,

    /// Remove all doors
    #[arg(long, conflicts_with = "doors")]
    pub no_doors: bool,
}

/// A color argument where `none` stands for an unlit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorArg(pub Option<ColorTag>);

impl std::str::FromStr for ColorArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self(None)),
            other => other.parse().map(|tag| Self(Some(tag))),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSide {
    North,
    East,
    South,
    West,
}

impl DoorSide {
    pub fn collect(sides: &[DoorSide]) -> Doors {
        let mut doors = Doors::none();
        for side in sides {
            match side {
                DoorSide::North => doors.north = true,
                DoorSide::East => doors.east = true,
                DoorSide::South => doors.south = true,
                DoorSide::West => doors.west = true,
            }
        }
        doors
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HallEnd {
    Wall,
    Passage,
}

impl HallEnd {
    pub fn is_wall(self) -> bool {
        self == HallEnd::Wall
    }
}
