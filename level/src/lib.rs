//! Static level geometry as the renderer consumes it: sectors, sides, lines,
//! segs, subsectors and the BSP nodes over them.
//!
//! Everything lives in index arenas owned by `MapData`. References between
//! records are plain indices, resolved through the accessors.

mod builder;
pub mod flags;
pub mod map_data;
pub mod map_defs;
mod node;
pub mod samples;

#[cfg(test)]
mod tests;

pub use builder::{Child, MapBuilder, MapError};
pub use flags::LineDefFlags;
pub use map_data::{IS_SSECTOR_MASK, MapData};
pub use map_defs::{BBox, LineDef, Sector, Segment, SideDef, SubSector, Node, Vertex};
