//! Geometry primitives over points and rectangles in virtual-desktop space.
//!
//! Every function here is pure.  Rectangles follow the Win32 `RECT`
//! convention: `right` and `bottom` are one past the last valid pixel, so a
//! 1920-pixel-wide monitor at the origin spans `0..1920` and its last column
//! is `x = 1919`.
//!
//! # Why half-open rectangles? (for beginners)
//!
//! With exclusive right/bottom edges two monitors placed side by side share a
//! boundary value (`left.right == right.left`) without sharing a pixel.  The
//! adjacency and containment tests below rely on that: a point is inside
//! exactly one of two touching monitors, never both.

use std::fmt;

/// An integer point in virtual-desktop coordinates.
///
/// Coordinates may be negative (monitors left of or above the primary) and
/// may lie outside every monitor (raw pointer samples are not clamped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A per-axis compass direction.
///
/// Each component is always one of `-1`, `0` or `+1`; the constructor clamps
/// whatever it is given to its sign.  `(0, 0)` means "no direction".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Direction {
    x: i32,
    y: i32,
}

impl Direction {
    pub const NONE: Direction = Direction { x: 0, y: 0 };
    pub const LEFT: Direction = Direction { x: -1, y: 0 };
    pub const RIGHT: Direction = Direction { x: 1, y: 0 };
    pub const UP: Direction = Direction { x: 0, y: -1 };
    pub const DOWN: Direction = Direction { x: 0, y: 1 };

    /// Builds a direction from arbitrary components, keeping only their signs.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    /// Horizontal component: `-1` (left), `0` or `+1` (right).
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component: `-1` (up), `0` or `+1` (down).
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns `true` for `(0, 0)`.
    pub fn is_none(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Componentwise sign of `p`.
pub fn sign(p: Point) -> Direction {
    Direction::new(p.x, p.y)
}

/// Direction vector from `from` to `to`: `sign(to - from)`.
pub fn direction(from: Point, to: Point) -> Direction {
    Direction::new(
        to.x.saturating_sub(from.x),
        to.y.saturating_sub(from.y),
    )
}

/// An axis-aligned rectangle with exclusive `right` and `bottom` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    /// One past the last valid column.
    pub right: i32,
    /// One past the last valid row.
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from its top-left corner and size.
    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x.saturating_add(i32::try_from(width).unwrap_or(i32::MAX)),
            bottom: y.saturating_add(i32::try_from(height).unwrap_or(i32::MAX)),
        }
    }

    /// Horizontal extent.  Widened so any pair of `i32` edges fits.
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Returns `true` when the rectangle covers at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.right > self.left && self.bottom > self.top
    }

    /// Half-open membership of `p.x` in `[left, right)`.
    pub fn contains_x(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right
    }

    /// Half-open membership of `p.y` in `[top, bottom)`.
    pub fn contains_y(&self, p: Point) -> bool {
        p.y >= self.top && p.y < self.bottom
    }

    /// Returns `true` if `p` lies inside the rectangle on both axes.
    pub fn contains(&self, p: Point) -> bool {
        self.contains_x(p) && self.contains_y(p)
    }

    /// Signed per-axis distance from the rectangle to `p`.
    ///
    /// Zero on an axis where `p` lies within the rectangle's interval,
    /// otherwise the distance to the nearest edge pixel, negative when `p` is
    /// left of / above the rectangle.  `(0, 0)` exactly when [`Rect::contains`]
    /// holds.
    pub fn outside_distance(&self, p: Point) -> Point {
        Point {
            x: outside_axis_distance(self.left, self.right, p.x),
            y: outside_axis_distance(self.top, self.bottom, p.y),
        }
    }

    /// Direction(s) in which `p` lies outside the rectangle; `NONE` when inside.
    pub fn outside_direction(&self, p: Point) -> Direction {
        sign(self.outside_distance(p))
    }

    /// Clamps `p` into the rectangle: the nearest point that lies inside it.
    ///
    /// Returns `p` unchanged when it is already inside.
    pub fn closest_boundary_point(&self, p: Point) -> Point {
        Point {
            x: p.x.min(self.right - 1).max(self.left),
            y: p.y.min(self.bottom - 1).max(self.top),
        }
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{})-[{},{}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// `max(min(0, v - low), v - high + 1)` for one axis.
fn outside_axis_distance(low: i32, high: i32, v: i32) -> i32 {
    let below = v.saturating_sub(low).min(0);
    let above = v.saturating_sub(high).saturating_add(1);
    below.max(above)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
