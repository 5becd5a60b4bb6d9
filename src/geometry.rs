use serde::{Deserialize, Serialize};

/// An integer cell coordinate on the map grid. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring cell one step in the given direction.
    pub fn step(&self, dir: Direction) -> Point {
        let (dx, dy) = dir.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_sq(&self, other: Point) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// One of the four cardinal directions. Doubles as the name of the matching
/// rectangle edge, so a door on the `Top` side exits upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Unit step for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The axis this direction travels along.
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Top | Direction::Bottom => Axis::Y,
        }
    }

    /// The two directions at right angles to this one.
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self.axis() {
            Axis::X => [Direction::Top, Direction::Bottom],
            Axis::Y => [Direction::Left, Direction::Right],
        }
    }

    pub fn clockwise(&self) -> Direction {
        match self {
            Direction::Top => Direction::Right,
            Direction::Right => Direction::Bottom,
            Direction::Bottom => Direction::Left,
            Direction::Left => Direction::Top,
        }
    }

    pub fn counterclockwise(&self) -> Direction {
        match self {
            Direction::Top => Direction::Left,
            Direction::Left => Direction::Bottom,
            Direction::Bottom => Direction::Right,
            Direction::Right => Direction::Top,
        }
    }
}

/// A partition axis. `X` cuts across the width, `Y` across the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn cross(&self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// The sides of two children cut on this axis that face each other:
    /// (first child's facing side, second child's facing side).
    pub fn facing(&self) -> (Direction, Direction) {
        match self {
            Axis::X => (Direction::Right, Direction::Left),
            Axis::Y => (Direction::Bottom, Direction::Top),
        }
    }
}

/// An axis-aligned rectangle of cells, addressed by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// X coordinate of the rightmost column.
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Y coordinate of the bottommost row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Extent measured along the given axis.
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Whether the two rectangles share at least one cell.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Whether two rectangles touch along an edge, sharing at least one
    /// aligned row or column. Corner-to-corner contact does not count.
    pub fn edge_adjacent(&self, other: &Rect) -> bool {
        let touch_x = self.x + self.width == other.x || other.x + other.width == self.x;
        let touch_y = self.y + self.height == other.y || other.y + other.height == self.y;
        let span_x = self.x <= other.right() && other.x <= self.right();
        let span_y = self.y <= other.bottom() && other.y <= self.bottom();
        (touch_x && span_y) || (touch_y && span_x)
    }

    /// The rectangle shrunk by one cell on every side.
    pub fn interior(&self) -> Rect {
        Rect::new(self.x + 1, self.y + 1, self.width - 2, self.height - 2)
    }

    /// Split into two rectangles `cut` cells along `axis` from the origin.
    pub fn split_at(&self, axis: Axis, cut: i32) -> (Rect, Rect) {
        match axis {
            Axis::X => (
                Rect::new(self.x, self.y, cut, self.height),
                Rect::new(self.x + cut, self.y, self.width - cut, self.height),
            ),
            Axis::Y => (
                Rect::new(self.x, self.y, self.width, cut),
                Rect::new(self.x, self.y + cut, self.width, self.height - cut),
            ),
        }
    }
}
