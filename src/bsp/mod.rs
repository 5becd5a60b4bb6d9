//! Binary-space-partition map generation.
//!
//! The map region is recursively cut into a tree of partitions, one room is
//! placed per terminal partition, sibling partitions are then connected
//! bottom-up with single-width corridors, and the result is rasterized into
//! a [`TileGrid`].

mod connect;
mod leaf;

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::geometry::Rect;
use crate::grid::{MapSource, TileGrid};
use crate::room::{Room, RoomArena};
use crate::tile::TileType;

use self::connect::Connector;
use self::leaf::Leaf;

/// Smallest extent a partition may have on either axis.
pub const LEAF_MIN: i32 = 10;

/// Smallest extent a room may have on either axis, where its partition
/// allows it.
pub const ROOM_MIN: i32 = 5;

/// Failure modes of map generation.
#[derive(Debug, Error)]
pub enum BspError {
    /// No usable door pair and corridor was found between two sibling
    /// partitions within the attempt budget.
    #[error("no corridor found between sibling partitions after {attempts} attempts")]
    CorridorSearchExhausted { attempts: usize },
}

/// Dungeon generator: rooms in a partition tree, joined by corridors.
///
/// Configure, call [`create_map`](Bsp::create_map), then read tiles through
/// [`MapSource`]. Changing any setting blanks the map until the next
/// `create_map` call.
pub struct Bsp {
    width: i32,
    height: i32,
    split_num: u32,
    split_range: f32,
    size_mid: f32,
    size_range: f32,
    complexity: u32,
    root: Leaf,
    rooms: RoomArena,
    grid: TileGrid,
}

impl Bsp {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            split_num: 4,
            split_range: 0.2,
            size_mid: 0.6,
            size_range: 0.2,
            complexity: 1,
            root: Leaf::new(Rect::new(0, 0, width, height)),
            rooms: RoomArena::new(),
            grid: TileGrid::new(width, height),
        }
    }

    /// Map width in cells. Values under 1 are ignored.
    pub fn set_width(&mut self, width: i32) {
        if width < 1 {
            return;
        }
        self.width = width;
        self.invalidate();
    }

    /// Map height in cells. Values under 1 are ignored.
    pub fn set_height(&mut self, height: i32) {
        if height < 1 {
            return;
        }
        self.height = height;
        self.invalidate();
    }

    /// How many partition rounds to run. Splitting stops early on nodes too
    /// small to cut, so large values are safe.
    pub fn set_split_num(&mut self, split_num: u32) {
        self.split_num = split_num;
        self.invalidate();
    }

    /// Spread of the cut point around the partition midpoint. Accepted in
    /// `0.1..=0.4`; anything else is ignored.
    pub fn set_split_range(&mut self, split_range: f32) {
        if !(0.1..=0.4).contains(&split_range) {
            return;
        }
        self.split_range = split_range;
        self.invalidate();
    }

    /// Midpoint of the room extent as a fraction of the partition extent.
    /// Ignored when `mid ± range` would leave `0.0..=1.0`.
    pub fn set_size_mid(&mut self, mid: f32) {
        if !size_interval_valid(mid, self.size_range) {
            return;
        }
        self.size_mid = mid;
        self.invalidate();
    }

    /// Spread of the room extent around its midpoint. Ignored when
    /// `mid ± range` would leave `0.0..=1.0`.
    pub fn set_size_range(&mut self, range: f32) {
        if !size_interval_valid(self.size_mid, range) {
            return;
        }
        self.size_range = range;
        self.invalidate();
    }

    /// How much corridors may wander off the direct line. Zero gives the
    /// straightest paths.
    pub fn set_complexity(&mut self, complexity: u32) {
        self.complexity = complexity;
        self.invalidate();
    }

    /// The rooms of the last generated map.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Generate a fresh map from entropy. Fails only when the corridor
    /// search between two partitions exhausts its attempt budget.
    pub fn create_map(&mut self) -> Result<(), BspError> {
        self.create_map_with(&mut rand::thread_rng())
    }

    /// Generate a fresh map from the given generator. The same generator
    /// state always produces the same map.
    pub fn create_map_with(&mut self, rng: &mut impl Rng) -> Result<(), BspError> {
        self.invalidate();
        self.split_tree(rng);
        self.root.place_rooms(self.size_mid, self.size_range, &mut self.rooms, rng);
        debug!("placed {} rooms after {} split rounds", self.rooms.len(), self.split_num);

        let mut connector = Connector::new(&mut self.rooms, self.complexity);
        connector.merge(&mut self.root, rng)?;

        self.root.fill(&self.rooms, &mut self.grid);
        debug!("rasterized {}x{} map", self.width, self.height);
        Ok(())
    }

    /// Breadth-first split pass: every node of the current frontier gets one
    /// split attempt per round, failed nodes stay terminal for good. Rounds
    /// end early once no node produced children.
    fn split_tree(&mut self, rng: &mut impl Rng) {
        let mut frontier = vec![&mut self.root];
        for _ in 0..self.split_num {
            if frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for node in frontier {
                node.split(self.split_range, rng);
                if let Some((left, right)) = node.children_mut() {
                    next.push(left);
                    next.push(right);
                }
            }
            frontier = next;
        }
    }

    fn invalidate(&mut self) {
        self.root = Leaf::new(Rect::new(0, 0, self.width, self.height));
        self.rooms.clear();
        self.grid = TileGrid::new(self.width, self.height);
    }
}

impl Default for Bsp {
    fn default() -> Self {
        Self::new(50, 50)
    }
}

impl MapSource for Bsp {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn tile(&self, x: i32, y: i32) -> TileType {
        self.grid.get(x, y)
    }
}

fn size_interval_valid(mid: f32, range: f32) -> bool {
    range >= 0.0 && mid - range >= 0.0 && mid + range <= 1.0
}
