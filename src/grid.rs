use crate::tile::TileType;

/// Read access to a generated map: dimensions plus per-cell tiles.
///
/// Renderers and exporters depend on this trait alone, so every generator
/// can feed the same consumers.
pub trait MapSource {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// The tile at (x, y). Out-of-range queries answer `Wall`.
    fn tile(&self, x: i32, y: i32) -> TileType;
}

/// A row-major buffer of tiles, Wall-filled on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<TileType>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let len = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            tiles: vec![TileType::Wall; len],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// The tile at (x, y); anything outside the grid reads as Wall.
    pub fn get(&self, x: i32, y: i32) -> TileType {
        match self.index(x, y) {
            Some(idx) => self.tiles[idx],
            None => TileType::Wall,
        }
    }

    /// Write a tile. Writes outside the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// The raw row-major cell storage.
    pub fn cells(&self) -> &[TileType] {
        &self.tiles
    }
}

impl MapSource for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn tile(&self, x: i32, y: i32) -> TileType {
        self.get(x, y)
    }
}
