use serde::{Deserialize, Serialize};

/// The cell kinds a generated map is built from.
///
/// Every generator starts from a Wall-filled grid and carves open cells into
/// it; a cell no pass ever touches stays `Wall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Solid rock, the default state of every cell.
    Wall,
    /// A corridor cell carved between rooms.
    Hall,
    /// Open floor: the interior of a placed room, or ground carved by the
    /// agent and cellular generators.
    Room,
    /// A cell on a room boundary that a corridor passes through.
    Door,
}

impl TileType {
    /// Whether map traversal can pass through this cell.
    pub fn is_walkable(&self) -> bool {
        !matches!(self, TileType::Wall)
    }

    /// Conventional single-character rendering, as used by the demos.
    pub fn glyph(&self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Hall => '*',
            TileType::Room => '.',
            TileType::Door => 'D',
        }
    }
}

impl Default for TileType {
    fn default() -> Self {
        TileType::Wall
    }
}
