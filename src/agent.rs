//! Drunkard's-walk carving by a population of digging agents.

use log::debug;
use rand::Rng;

use crate::geometry::{Direction, Point};
use crate::grid::{MapSource, TileGrid};
use crate::tile::TileType;

/// One wandering digger.
struct Digger {
    pos: Point,
    heading: Direction,
    energy: i32,
    rotate: f32,
    dig: f32,
}

/// Cave generator releasing digging agents into solid rock.
///
/// Agents spawn at random cells and wander until their energy is spent.
/// Every tick an agent may turn 90 degrees and may advance one cell along
/// its heading; breaking a wall cell open costs one energy, as does turning.
/// Carved floor is [`TileType::Room`], untouched cells stay `Wall`.
pub struct Agent {
    width: i32,
    height: i32,
    agent_num: u32,
    energy: i32,
    rotate_delta: f32,
    dig_delta: f32,
    grid: TileGrid,
}

impl Agent {
    pub fn new(
        width: i32,
        height: i32,
        agent_num: u32,
        energy: i32,
        rotate_delta: f32,
        dig_delta: f32,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        // a NaN urge would never fire and leave its digger walking forever
        let rotate_delta = if rotate_delta.is_nan() { 0.0 } else { rotate_delta };
        let dig_delta = if dig_delta.is_nan() { 0.0 } else { dig_delta };
        Self {
            width,
            height,
            agent_num,
            energy,
            rotate_delta,
            dig_delta,
            grid: TileGrid::new(width, height),
        }
    }

    /// Carve a fresh map from entropy.
    pub fn create_map(&mut self) {
        self.create_map_with(&mut rand::thread_rng());
    }

    /// Carve a fresh map from the given generator. The same generator state
    /// always produces the same map.
    pub fn create_map_with(&mut self, rng: &mut impl Rng) {
        self.grid = TileGrid::new(self.width, self.height);

        // an agent whose urge to turn or dig never grows can wander forever
        // without spending energy
        if self.rotate_delta <= 0.0 || self.dig_delta <= 0.0 {
            return;
        }

        let mut diggers = Vec::new();
        for _ in 0..self.agent_num {
            diggers.push(self.spawn(rng));
        }

        while !diggers.is_empty() {
            let mut index = 0;
            while index < diggers.len() {
                if diggers[index].energy <= 0 {
                    diggers.remove(index);
                    continue;
                }
                self.step(&mut diggers[index], rng);
                index += 1;
            }
        }

        let carved = self.grid.cells().iter().filter(|t| **t == TileType::Room).count();
        debug!("{} agents carved {carved} floor cells", self.agent_num);
    }

    fn spawn(&self, rng: &mut impl Rng) -> Digger {
        Digger {
            pos: Point::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height)),
            heading: Direction::ALL[rng.gen_range(0..4)],
            energy: self.energy,
            rotate: 0.0,
            dig: 0.0,
        }
    }

    /// One tick: a rotation roll, then a dig roll. Each urge accumulates by
    /// its delta until it fires, and resets only when it acts.
    fn step(&mut self, digger: &mut Digger, rng: &mut impl Rng) {
        if rng.gen::<f32>() < digger.rotate {
            digger.heading = if rng.gen_bool(0.5) {
                digger.heading.clockwise()
            } else {
                digger.heading.counterclockwise()
            };
            digger.energy -= 1;
            digger.rotate = 0.0;
        } else {
            digger.rotate += self.rotate_delta;
        }

        if rng.gen::<f32>() < digger.dig {
            let next = digger.pos.step(digger.heading);
            // walking off the map is ignored for this tick
            if next.x >= 0 && next.x < self.width && next.y >= 0 && next.y < self.height {
                if self.grid.get(next.x, next.y) == TileType::Wall {
                    self.grid.set(next.x, next.y, TileType::Room);
                    digger.energy -= 1;
                    digger.dig = 0.0;
                }
                digger.pos = next;
            }
        } else {
            digger.dig += self.dig_delta;
        }
    }
}

impl MapSource for Agent {
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
