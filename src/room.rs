use std::collections::VecDeque;

use crate::geometry::{Point, Rect};

/// Handle to a room in a [`RoomArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(usize);

/// A placed room: its bounds, the door cells punched through its boundary,
/// and the rooms it connects to (by touching, or by a carved corridor).
#[derive(Debug, Clone)]
pub struct Room {
    bounds: Rect,
    doors: Vec<Point>,
    links: Vec<RoomId>,
}

impl Room {
    fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            doors: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn doors(&self) -> &[Point] {
        &self.doors
    }

    pub fn links(&self) -> &[RoomId] {
        &self.links
    }
}

/// Flat storage for the rooms of one generated map.
///
/// The partition tree refers to rooms by [`RoomId`]; links between rooms
/// form an undirected graph over those ids.
#[derive(Debug, Default)]
pub struct RoomArena {
    rooms: Vec<Room>,
}

impl RoomArena {
    pub fn new() -> Self {
        Self { rooms: Vec::new() }
    }

    pub fn insert(&mut self, bounds: Rect) -> RoomId {
        let id = RoomId(self.rooms.len());
        self.rooms.push(Room::new(bounds));
        id
    }

    pub fn get(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = RoomId> {
        (0..self.rooms.len()).map(RoomId)
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }

    pub fn add_door(&mut self, id: RoomId, door: Point) {
        self.rooms[id.0].doors.push(door);
    }

    /// Register an undirected link between two rooms. Duplicates and
    /// self-links are dropped.
    pub fn link(&mut self, a: RoomId, b: RoomId) {
        if a == b {
            return;
        }
        if !self.rooms[a.0].links.contains(&b) {
            self.rooms[a.0].links.push(b);
        }
        if !self.rooms[b.0].links.contains(&a) {
            self.rooms[b.0].links.push(a);
        }
    }

    /// Whether two rooms are joined through the link graph, directly or
    /// transitively. Breadth-first over ids; the visited set lives only for
    /// this call.
    pub fn connected(&self, a: RoomId, b: RoomId) -> bool {
        if a == b {
            return true;
        }
        let mut visited = vec![false; self.rooms.len()];
        let mut queue = VecDeque::new();
        visited[a.0] = true;
        queue.push_back(a);
        while let Some(id) = queue.pop_front() {
            for &next in &self.rooms[id.0].links {
                if next == b {
                    return true;
                }
                if !visited[next.0] {
                    visited[next.0] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Whether any room's rectangle contains the cell.
    pub fn contains_cell(&self, p: Point) -> bool {
        self.rooms.iter().any(|room| room.bounds.contains(p))
    }
}
