//! Plain geometry types shared by the grid builder and the cycling engine.
//!
//! Everything the engine stores is in *screen coordinates*: origin at the
//! top-left of the primary screen, Y growing downward.  Backends that report
//! geometry with a bottom-left origin are converted with [`flip_y`].

use serde::{Deserialize, Serialize};

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.mid_x(),
            y: self.mid_y(),
        }
    }

    /// Half-open containment: the left/top edges are inside, the right/bottom
    /// edges belong to the neighbouring rect.  This keeps side-by-side
    /// screens from both claiming a point on their shared edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Convert a rect from a bottom-left-origin (Y-up) space into screen
/// coordinates.
///
/// `primary_height` is the full height of the primary screen, which anchors
/// every screen to the same vertical reference.
pub fn flip_y(rect: Rect, primary_height: f64) -> Rect {
    Rect {
        y: primary_height - rect.y - rect.height,
        ..rect
    }
}

/// Two-tolerance rectangle comparison.
///
/// Window managers do not always honour the exact geometry they are asked
/// for (minimum sizes, decorations, rounding), so "is this window in that
/// slot" is answered with slack: a tight bound on the origin and a looser
/// one on the size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Maximum per-axis origin drift.
    pub position: f64,
    /// Maximum per-axis size drift.
    pub size: f64,
}

impl Tolerance {
    pub const DEFAULT_POSITION: f64 = 20.0;
    pub const DEFAULT_SIZE: f64 = 100.0;

    pub fn new(position: f64, size: f64) -> Self {
        Self { position, size }
    }

    /// Whether `a` and `b` describe the same slot within this tolerance.
    pub fn matches(&self, a: &Rect, b: &Rect) -> bool {
        (a.x - b.x).abs() <= self.position
            && (a.y - b.y).abs() <= self.position
            && (a.width - b.width).abs() <= self.size
            && (a.height - b.height).abs() <= self.size
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POSITION, Self::DEFAULT_SIZE)
    }
}

//  Tests
