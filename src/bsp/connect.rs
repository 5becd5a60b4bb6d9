use std::collections::{HashSet, VecDeque};

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Axis, Direction, Point, Rect};
use crate::room::{RoomArena, RoomId};

use super::leaf::{Leaf, LeafKind};
use super::BspError;

/// How many door-pair and corridor-search attempts one merge step may burn
/// before generation fails.
pub(crate) const CONNECT_ATTEMPT_LIMIT: usize = 1000;

/// Cells of slack around the exit pair's bounding box that the corridor
/// search may use.
const SEARCH_MARGIN: i32 = 2;

/// Shared state for one map's connection phase.
///
/// `carved` and `doors` accumulate across the whole tree, so later merges
/// see the corridors and doors committed by earlier ones.
pub(crate) struct Connector<'a> {
    rooms: &'a mut RoomArena,
    complexity: u32,
    carved: HashSet<Point>,
    doors: HashSet<Point>,
}

/// The fixed parameters of one corridor search.
struct Search {
    goal: Point,
    bounds: Rect,
    /// Interior of the merging node; corridors may not touch its border.
    region: Rect,
}

impl<'a> Connector<'a> {
    pub(crate) fn new(rooms: &'a mut RoomArena, complexity: u32) -> Self {
        Self {
            rooms,
            complexity,
            carved: HashSet::new(),
            doors: HashSet::new(),
        }
    }

    /// Bottom-up connection pass over one subtree: both children are merged
    /// first, then their facing rooms join across the cut line.
    pub(crate) fn merge(&mut self, leaf: &mut Leaf, rng: &mut impl Rng) -> Result<(), BspError> {
        let info = leaf.info;
        let (axis, left, right) = match &mut leaf.kind {
            LeafKind::Terminal { .. } => return Ok(()),
            LeafKind::Internal { axis, left, right } => (*axis, &mut **left, &mut **right),
        };
        self.merge(left, rng)?;
        self.merge(right, rng)?;

        let (left_side, right_side) = axis.facing();
        let mut left_rooms = Vec::new();
        let mut right_rooms = Vec::new();
        left.side_rooms(left_side, &mut left_rooms);
        right.side_rooms(right_side, &mut right_rooms);

        // rooms already touching across the cut line connect for free
        let mut touching = false;
        for &l in &left_rooms {
            for &r in &right_rooms {
                if self.rooms.get(l).bounds().edge_adjacent(&self.rooms.get(r).bounds()) {
                    self.rooms.link(l, r);
                    touching = true;
                }
            }
        }
        if touching {
            return Ok(());
        }

        let halls = self.carve_between(info, &left_rooms, &right_rooms, rng)?;
        leaf.halls.extend(halls);
        Ok(())
    }

    /// Try random door pairs and corridor searches until one sticks, up to
    /// the attempt limit.
    fn carve_between(
        &mut self,
        info: Rect,
        left_rooms: &[RoomId],
        right_rooms: &[RoomId],
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, BspError> {
        if left_rooms.is_empty() || right_rooms.is_empty() {
            return Ok(Vec::new());
        }

        for attempt in 0..CONNECT_ATTEMPT_LIMIT {
            let l = left_rooms[rng.gen_range(0..left_rooms.len())];
            let r = right_rooms[rng.gen_range(0..right_rooms.len())];

            let Some((ldoor, lexit)) = self.sample_door(l, info, rng) else {
                continue;
            };
            let Some((rdoor, rexit)) = self.sample_door(r, info, rng) else {
                continue;
            };

            // both exits may already sit on the corridor network
            if self.carved.contains(&lexit)
                && self.carved.contains(&rexit)
                && self.halls_linked(lexit, rexit)
            {
                trace!("exits already joined by earlier corridors, nothing to carve");
                self.commit(l, ldoor, r, rdoor);
                return Ok(Vec::new());
            }

            let search = Search {
                goal: rexit,
                bounds: search_bounds(lexit, rexit, info),
                region: info.interior(),
            };
            if let Some(path) = self.carve_path(lexit, &search, rng) {
                trace!(
                    "carved {} corridor cells between rooms (attempt {})",
                    path.len(),
                    attempt
                );
                for cell in &path {
                    self.carved.insert(*cell);
                }
                self.commit(l, ldoor, r, rdoor);
                return Ok(path);
            }
        }

        Err(BspError::CorridorSearchExhausted {
            attempts: CONNECT_ATTEMPT_LIMIT,
        })
    }

    /// Pick a random usable door cell on the room, with the cell just
    /// outside it. Boundary corners are skipped, as is any cell orthogonally
    /// adjacent to a door already placed anywhere on the map.
    fn sample_door(&self, room: RoomId, info: Rect, rng: &mut impl Rng) -> Option<(Point, Point)> {
        let bounds = self.rooms.get(room).bounds();
        let mut candidates: Vec<(Point, Point)> = Vec::new();

        for side in Direction::ALL {
            match side.axis() {
                Axis::Y => {
                    let y = if side == Direction::Top { bounds.y } else { bounds.bottom() };
                    for x in bounds.x + 1..bounds.right() {
                        let door = Point::new(x, y);
                        candidates.push((door, door.step(side)));
                    }
                }
                Axis::X => {
                    let x = if side == Direction::Left { bounds.x } else { bounds.right() };
                    for y in bounds.y + 1..bounds.bottom() {
                        let door = Point::new(x, y);
                        candidates.push((door, door.step(side)));
                    }
                }
            }
        }

        candidates.shuffle(rng);
        candidates
            .into_iter()
            .find(|&(door, exit)| self.door_usable(door, exit, info))
    }

    fn door_usable(&self, door: Point, exit: Point, info: Rect) -> bool {
        if self.doors.contains(&door) {
            return false;
        }
        if Direction::ALL.into_iter().any(|d| self.doors.contains(&door.step(d))) {
            return false;
        }
        self.exit_usable(exit, info)
    }

    /// An exit must sit strictly inside the merging region, outside every
    /// room, and must not fatten the corridor network into a block. An exit
    /// already on a carved cell is fine, the door then opens onto an
    /// existing corridor.
    fn exit_usable(&self, exit: Point, info: Rect) -> bool {
        info.interior().contains(exit)
            && !self.rooms.contains_cell(exit)
            && (self.carved.contains(&exit) || !self.completes_block(exit, &[]))
    }

    /// Whether claiming this cell would close a 2x2 block of corridor
    /// cells, counting both carved cells and the path being built.
    fn completes_block(&self, p: Point, path: &[Point]) -> bool {
        let corridor = |q: Point| self.carved.contains(&q) || path.contains(&q);
        for (dx, dy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            if corridor(Point::new(p.x + dx, p.y))
                && corridor(Point::new(p.x, p.y + dy))
                && corridor(Point::new(p.x + dx, p.y + dy))
            {
                return true;
            }
        }
        false
    }

    /// Whether two cells are joined through the already-carved corridor
    /// network, by 4-neighbor flood fill over carved cells.
    fn halls_linked(&self, from: Point, to: Point) -> bool {
        if from == to {
            return true;
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        while let Some(cell) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = cell.step(dir);
                if next == to {
                    return true;
                }
                if self.carved.contains(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Randomized depth-first corridor search from `start` to the goal.
    /// Returns the full cell path, start and goal included.
    fn carve_path(&self, start: Point, search: &Search, rng: &mut impl Rng) -> Option<Vec<Point>> {
        let mut path = vec![start];
        let mut visited = HashSet::new();
        visited.insert(start);
        if self.dfs(start, search, &mut path, &mut visited, rng) {
            Some(path)
        } else {
            None
        }
    }

    fn dfs(
        &self,
        cell: Point,
        search: &Search,
        path: &mut Vec<Point>,
        visited: &mut HashSet<Point>,
        rng: &mut impl Rng,
    ) -> bool {
        if cell == search.goal {
            return true;
        }

        let mut steps = Vec::new();
        for dir in Direction::ALL {
            let next = cell.step(dir);
            if !visited.contains(&next) && self.step_allowed(next, dir, search, path) {
                steps.push(next);
            }
        }

        // nearest first; everything past the keep window is shuffled, so a
        // higher complexity wanders further off the direct line
        steps.sort_by_key(|s| s.distance_sq(search.goal));
        let keep = (self.complexity as usize + 1).min(steps.len());
        steps[keep..].shuffle(rng);

        for next in steps {
            visited.insert(next);
            path.push(next);
            if self.dfs(next, search, path, visited, rng) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// A corridor may claim `next`, stepping in `dir`, when it stays inside
    /// the search window and the region interior, avoids every room, does
    /// not run laterally against its own cells, and does not close a 2x2
    /// block with corridor cells already carved. Crossing a corridor from
    /// an earlier merge, or riding along it, stays legal.
    fn step_allowed(&self, next: Point, dir: Direction, search: &Search, path: &[Point]) -> bool {
        if !search.bounds.contains(next) || !search.region.contains(next) {
            return false;
        }
        if self.rooms.contains_cell(next) {
            return false;
        }
        for side in dir.perpendicular() {
            if path.contains(&next.step(side)) {
                return false;
            }
        }
        !self.completes_block(next, path)
    }

    fn commit(&mut self, left: RoomId, ldoor: Point, right: RoomId, rdoor: Point) {
        self.rooms.add_door(left, ldoor);
        self.rooms.add_door(right, rdoor);
        self.doors.insert(ldoor);
        self.doors.insert(rdoor);
        self.rooms.link(left, right);
    }
}

/// Bounding box of the two exit cells grown by the search margin, clamped
/// to the merging region.
fn search_bounds(a: Point, b: Point, info: Rect) -> Rect {
    let x0 = (a.x.min(b.x) - SEARCH_MARGIN).max(info.x);
    let y0 = (a.y.min(b.y) - SEARCH_MARGIN).max(info.y);
    let x1 = (a.x.max(b.x) + SEARCH_MARGIN).min(info.right());
    let y1 = (a.y.max(b.y) + SEARCH_MARGIN).min(info.bottom());
    Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
}
