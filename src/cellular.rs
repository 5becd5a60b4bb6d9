//! Cave generation by cellular-automata smoothing of a random field.

use log::debug;
use rand::Rng;

use crate::grid::{MapSource, TileGrid};
use crate::tile::TileType;

/// Cave generator running a wall-count automaton over random noise.
///
/// Every cell starts as `Wall` with probability `initial_wall_rate`, then
/// each iteration rewrites every cell: `Wall` when the number of wall cells
/// in its 9-cell neighborhood (itself included, off-map counted as wall)
/// reaches `wall_criterion`, `Room` otherwise.
pub struct CellularAutomata {
    width: i32,
    height: i32,
    iterations: u32,
    initial_wall_rate: f64,
    wall_criterion: u32,
    grid: TileGrid,
}

impl CellularAutomata {
    pub fn new(
        width: i32,
        height: i32,
        iterations: u32,
        initial_wall_rate: f64,
        wall_criterion: u32,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        // clamp handles infinities; a NaN rate would panic inside gen_bool
        let initial_wall_rate = if initial_wall_rate.is_nan() {
            0.0
        } else {
            initial_wall_rate.clamp(0.0, 1.0)
        };
        Self {
            width,
            height,
            iterations,
            initial_wall_rate,
            wall_criterion,
            grid: TileGrid::new(width, height),
        }
    }

    /// Generate a fresh map from entropy.
    pub fn create_map(&mut self) {
        self.create_map_with(&mut rand::thread_rng());
    }

    /// Generate a fresh map from the given generator. The same generator
    /// state always produces the same map.
    pub fn create_map_with(&mut self, rng: &mut impl Rng) {
        let mut current = TileGrid::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let tile = if rng.gen_bool(self.initial_wall_rate) {
                    TileType::Wall
                } else {
                    TileType::Room
                };
                current.set(x, y, tile);
            }
        }

        let mut next = TileGrid::new(self.width, self.height);
        for _ in 0..self.iterations {
            for y in 0..self.height {
                for x in 0..self.width {
                    let tile = if wall_neighbors(&current, x, y) >= self.wall_criterion {
                        TileType::Wall
                    } else {
                        TileType::Room
                    };
                    next.set(x, y, tile);
                }
            }
            std::mem::swap(&mut current, &mut next);
        }

        let open = current.cells().iter().filter(|t| **t == TileType::Room).count();
        debug!(
            "automaton left {open} open cells after {} iterations",
            self.iterations
        );
        self.grid = current;
    }
}

impl MapSource for CellularAutomata {
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

/// Wall cells in the 9-cell neighborhood of (x, y), the cell itself
/// included. Off-map reads come back as `Wall` and count too.
fn wall_neighbors(grid: &TileGrid, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if grid.get(x + dx, y + dy) == TileType::Wall {
                count += 1;
            }
        }
    }
    count
}
