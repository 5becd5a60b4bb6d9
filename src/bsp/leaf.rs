use log::trace;
use rand::Rng;

use crate::geometry::{Axis, Direction, Point, Rect};
use crate::grid::TileGrid;
use crate::room::{RoomArena, RoomId};
use crate::tile::TileType;

use super::{LEAF_MIN, ROOM_MIN};

/// A node of the partition tree.
///
/// `info` is the region this node covers and never changes once the node
/// exists. `halls` holds the corridor cells carved by this node's own merge
/// step, so rasterization can replay them without a shared buffer.
pub(crate) struct Leaf {
    pub(crate) info: Rect,
    pub(crate) halls: Vec<Point>,
    pub(crate) kind: LeafKind,
}

/// Node state. A node has either both children or neither, and a room can
/// only sit on a terminal node.
pub(crate) enum LeafKind {
    Internal {
        axis: Axis,
        left: Box<Leaf>,
        right: Box<Leaf>,
    },
    Terminal {
        /// Absent until room placement has run.
        room: Option<RoomId>,
    },
}

impl Leaf {
    pub(crate) fn new(info: Rect) -> Self {
        Self {
            info,
            halls: Vec::new(),
            kind: LeafKind::Terminal { room: None },
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self.kind, LeafKind::Terminal { .. })
    }

    /// Both children of an internal node, for frontier traversal.
    pub(crate) fn children_mut(&mut self) -> Option<(&mut Leaf, &mut Leaf)> {
        match &mut self.kind {
            LeafKind::Internal { left, right, .. } => Some((left, right)),
            LeafKind::Terminal { .. } => None,
        }
    }

    /// Attempt to split this terminal node in two.
    ///
    /// A random axis is tried first with a cut ratio drawn from
    /// `0.5 ± split_range`; if either child would measure under `LEAF_MIN`
    /// on the cut axis the other axis is tried once. When both axes fail the
    /// node stays terminal.
    pub(crate) fn split(&mut self, split_range: f32, rng: &mut impl Rng) -> bool {
        if !self.is_terminal() {
            return false;
        }

        let first = if rng.gen_bool(0.5) { Axis::X } else { Axis::Y };
        for axis in [first, first.cross()] {
            let ratio = rng.gen_range(0.5 - split_range..0.5 + split_range);
            let cut = (self.info.extent(axis) as f32 * ratio) as i32;
            if cut < LEAF_MIN || self.info.extent(axis) - cut < LEAF_MIN {
                continue;
            }
            let (a, b) = self.info.split_at(axis, cut);
            trace!("split {:?} on {:?} into {:?} | {:?}", self.info, axis, a, b);
            self.kind = LeafKind::Internal {
                axis,
                left: Box::new(Leaf::new(a)),
                right: Box::new(Leaf::new(b)),
            };
            return true;
        }
        false
    }

    /// Place one room on every terminal node of this subtree.
    ///
    /// Each room dimension is drawn as a fraction of the node extent from
    /// `size_mid ± size_range`, raised to `ROOM_MIN` where the node allows
    /// it, then positioned uniformly inside the node.
    pub(crate) fn place_rooms(
        &mut self,
        size_mid: f32,
        size_range: f32,
        rooms: &mut RoomArena,
        rng: &mut impl Rng,
    ) {
        match &mut self.kind {
            LeafKind::Internal { left, right, .. } => {
                left.place_rooms(size_mid, size_range, rooms, rng);
                right.place_rooms(size_mid, size_range, rooms, rng);
            }
            LeafKind::Terminal { room } => {
                let width = room_extent(self.info.width, size_mid, size_range, rng);
                let height = room_extent(self.info.height, size_mid, size_range, rng);
                let x = rng.gen_range(self.info.x..=self.info.x + self.info.width - width);
                let y = rng.gen_range(self.info.y..=self.info.y + self.info.height - height);
                *room = Some(rooms.insert(Rect::new(x, y, width, height)));
            }
        }
    }

    /// Collect the rooms of this subtree that lie on the given side of its
    /// region. A node split orthogonally to `side` exposes both children,
    /// while a node split along it exposes only the child on that side.
    pub(crate) fn side_rooms(&self, side: Direction, out: &mut Vec<RoomId>) {
        match &self.kind {
            LeafKind::Terminal { room } => {
                if let Some(id) = *room {
                    out.push(id);
                }
            }
            LeafKind::Internal { axis, left, right } => {
                if side.axis() != *axis {
                    left.side_rooms(side, out);
                    right.side_rooms(side, out);
                } else if side == Direction::Left || side == Direction::Top {
                    left.side_rooms(side, out);
                } else {
                    right.side_rooms(side, out);
                }
            }
        }
    }

    /// Stamp this subtree into the grid: children first, then this node's
    /// corridor cells, then terminal rooms with their doors on top.
    pub(crate) fn fill(&self, rooms: &RoomArena, grid: &mut TileGrid) {
        if let LeafKind::Internal { left, right, .. } = &self.kind {
            left.fill(rooms, grid);
            right.fill(rooms, grid);
        }

        for hall in &self.halls {
            grid.set(hall.x, hall.y, TileType::Hall);
        }

        if let LeafKind::Terminal { room: Some(id) } = &self.kind {
            let room = rooms.get(*id);
            let bounds = room.bounds();
            for y in bounds.y..bounds.y + bounds.height {
                for x in bounds.x..bounds.x + bounds.width {
                    grid.set(x, y, TileType::Room);
                }
            }
            for door in room.doors() {
                grid.set(door.x, door.y, TileType::Door);
            }
        }
    }
}

/// One room dimension: a sampled fraction of the node extent, clamped to
/// `[ROOM_MIN, extent]` (or to the whole extent when the node is thinner
/// than `ROOM_MIN`).
fn room_extent(extent: i32, size_mid: f32, size_range: f32, rng: &mut impl Rng) -> i32 {
    let ratio = if size_range > 0.0 {
        rng.gen_range(size_mid - size_range..size_mid + size_range)
    } else {
        size_mid
    };
    ((extent as f32 * ratio) as i32).clamp(ROOM_MIN.min(extent), extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_new_leaf_is_terminal() {
        let leaf = Leaf::new(Rect::new(0, 0, 40, 40));
        assert!(leaf.is_terminal());
        assert!(leaf.halls.is_empty());
    }

    #[test]
    fn test_split_partitions_region_exactly() {
        for seed in 0..20 {
            let mut leaf = Leaf::new(Rect::new(0, 0, 50, 50));
            assert!(leaf.split(0.2, &mut seeded(seed)));

            let LeafKind::Internal { axis, left, right } = &leaf.kind else {
                panic!("split leaf should be internal");
            };
            assert!(left.info.extent(*axis) >= LEAF_MIN);
            assert!(right.info.extent(*axis) >= LEAF_MIN);
            assert_eq!(
                left.info.extent(*axis) + right.info.extent(*axis),
                leaf.info.extent(*axis)
            );
            assert_eq!(left.info.extent(axis.cross()), leaf.info.extent(axis.cross()));
        }
    }

    #[test]
    fn test_small_leaf_never_splits() {
        // 15 cannot be cut into two parts of at least 10, on either axis
        for seed in 0..50 {
            let mut leaf = Leaf::new(Rect::new(0, 0, 15, 15));
            assert!(!leaf.split(0.2, &mut seeded(seed)));
            assert!(leaf.is_terminal());
        }
    }

    #[test]
    fn test_split_falls_back_to_viable_axis() {
        // only the width is large enough to cut
        for seed in 0..50 {
            let mut leaf = Leaf::new(Rect::new(0, 0, 30, 12));
            assert!(leaf.split(0.2, &mut seeded(seed)));
            let LeafKind::Internal { axis, left, right } = &leaf.kind else {
                panic!("split leaf should be internal");
            };
            assert_eq!(*axis, Axis::X);
            assert!(left.info.width >= LEAF_MIN);
            assert!(right.info.width >= LEAF_MIN);
        }
    }

    #[test]
    fn test_place_rooms_stay_inside_leaves() {
        for seed in 0..20 {
            let mut rng = seeded(seed);
            let mut leaf = Leaf::new(Rect::new(0, 0, 60, 60));
            leaf.split(0.2, &mut rng);
            if let Some((l, r)) = leaf.children_mut() {
                l.split(0.2, &mut rng);
                r.split(0.2, &mut rng);
            }

            let mut rooms = RoomArena::new();
            leaf.place_rooms(0.6, 0.2, &mut rooms, &mut rng);
            assert!(!rooms.is_empty());

            check_rooms_contained(&leaf, &rooms);
        }
    }

    fn check_rooms_contained(leaf: &Leaf, rooms: &RoomArena) {
        match &leaf.kind {
            LeafKind::Internal { left, right, .. } => {
                check_rooms_contained(left, rooms);
                check_rooms_contained(right, rooms);
            }
            LeafKind::Terminal { room } => {
                let id = room.expect("terminal leaf should hold a room");
                let bounds = rooms.get(id).bounds();
                assert!(bounds.width >= ROOM_MIN);
                assert!(bounds.height >= ROOM_MIN);
                assert!(bounds.x >= leaf.info.x);
                assert!(bounds.y >= leaf.info.y);
                assert!(bounds.right() <= leaf.info.right());
                assert!(bounds.bottom() <= leaf.info.bottom());
            }
        }
    }

    #[test]
    fn test_small_room_is_raised_to_minimum() {
        // a 0.1..0.3 fraction of 10 is 1..3, well under the room minimum
        for seed in 0..20 {
            let mut rooms = RoomArena::new();
            let mut leaf = Leaf::new(Rect::new(0, 0, 10, 10));
            leaf.place_rooms(0.2, 0.1, &mut rooms, &mut seeded(seed));
            let bounds = rooms.iter().next().expect("one room").bounds();
            assert!(bounds.width >= ROOM_MIN);
            assert!(bounds.height >= ROOM_MIN);
            assert!(bounds.right() <= 9);
            assert!(bounds.bottom() <= 9);
        }
    }

    #[test]
    fn test_side_rooms_respect_split_axis() {
        // root split on X: left child further split on Y
        let mut rooms = RoomArena::new();
        let top = rooms.insert(Rect::new(2, 2, 5, 5));
        let bottom = rooms.insert(Rect::new(2, 22, 5, 5));
        let east = rooms.insert(Rect::new(22, 2, 5, 5));

        let mut top_leaf = Leaf::new(Rect::new(0, 0, 20, 20));
        top_leaf.kind = LeafKind::Terminal { room: Some(top) };
        let mut bottom_leaf = Leaf::new(Rect::new(0, 20, 20, 20));
        bottom_leaf.kind = LeafKind::Terminal { room: Some(bottom) };

        let mut west_leaf = Leaf::new(Rect::new(0, 0, 20, 40));
        west_leaf.kind = LeafKind::Internal {
            axis: Axis::Y,
            left: Box::new(top_leaf),
            right: Box::new(bottom_leaf),
        };
        let mut east_leaf = Leaf::new(Rect::new(20, 0, 20, 40));
        east_leaf.kind = LeafKind::Terminal { room: Some(east) };

        // the west subtree is split on Y, so both of its rooms face east
        let mut out = Vec::new();
        west_leaf.side_rooms(Direction::Right, &mut out);
        assert_eq!(out, vec![top, bottom]);

        // but only its top child faces the top side
        out.clear();
        west_leaf.side_rooms(Direction::Top, &mut out);
        assert_eq!(out, vec![top]);

        let mut root = Leaf::new(Rect::new(0, 0, 40, 40));
        root.kind = LeafKind::Internal {
            axis: Axis::X,
            left: Box::new(west_leaf),
            right: Box::new(east_leaf),
        };

        // a side parallel to the split axis exposes one child only
        out.clear();
        root.side_rooms(Direction::Right, &mut out);
        assert_eq!(out, vec![east]);

        out.clear();
        root.side_rooms(Direction::Left, &mut out);
        assert_eq!(out, vec![top, bottom]);

        // an orthogonal side exposes both children
        out.clear();
        root.side_rooms(Direction::Top, &mut out);
        assert_eq!(out, vec![top, east]);

        out.clear();
        root.side_rooms(Direction::Bottom, &mut out);
        assert_eq!(out, vec![bottom, east]);
    }

    #[test]
    fn test_fill_stamps_rooms_doors_and_halls() {
        let mut rooms = RoomArena::new();
        let id = rooms.insert(Rect::new(1, 1, 3, 3));
        rooms.add_door(id, Point::new(3, 1));

        let mut child = Leaf::new(Rect::new(0, 0, 10, 10));
        child.kind = LeafKind::Terminal { room: Some(id) };
        let mut other = Leaf::new(Rect::new(0, 10, 10, 10));
        other.kind = LeafKind::Terminal { room: None };

        let mut root = Leaf::new(Rect::new(0, 0, 10, 20));
        root.kind = LeafKind::Internal {
            axis: Axis::Y,
            left: Box::new(child),
            right: Box::new(other),
        };
        root.halls = vec![Point::new(3, 0), Point::new(4, 0)];

        let mut grid = TileGrid::new(10, 20);
        root.fill(&rooms, &mut grid);

        assert_eq!(grid.get(1, 1), TileType::Room);
        assert_eq!(grid.get(2, 2), TileType::Room);
        // the door overwrites its room cell
        assert_eq!(grid.get(3, 1), TileType::Door);
        assert_eq!(grid.get(3, 0), TileType::Hall);
        assert_eq!(grid.get(4, 0), TileType::Hall);
        assert_eq!(grid.get(9, 19), TileType::Wall);
    }
}
