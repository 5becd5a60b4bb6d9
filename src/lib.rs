//! Procedural tile-map generation.
//!
//! Three generators produce flat grids of [`TileType`] cells behind the one
//! [`MapSource`] read contract: [`Bsp`] partitions the region into a tree of
//! rooms joined by single-width corridors, [`Agent`] releases wandering
//! diggers into solid rock, and [`CellularAutomata`] smooths random noise
//! into caves. The [`export`] module renders any of them as text.
//!
//! ```
//! use grid_mapgen::{Bsp, MapSource, TileType};
//!
//! let mut map = Bsp::new(50, 50);
//! map.create_map()?;
//! assert_eq!(map.tile(-1, -1), TileType::Wall);
//! # Ok::<(), grid_mapgen::BspError>(())
//! ```

pub mod agent;
pub mod bsp;
pub mod cellular;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod room;
pub mod tile;

pub use agent::Agent;
pub use bsp::{Bsp, BspError};
pub use cellular::CellularAutomata;
pub use geometry::{Point, Rect};
pub use grid::{MapSource, TileGrid};
pub use room::{Room, RoomId};
pub use tile::TileType;
