//! Data models for the room map

mod color;
mod position;
mod hall;
mod map;
mod room;

pub use color::*;
pub use position::*;
pub use hall::*;
pub use map::*;
pub use room::*;
