//! Geometric primitives for pointer hit testing
//!
//! Coordinates are pointer pixels (origin at top-left, y grows downward).
//! Rectangles are measured by the rendering layer; the engine never lays
//! anything out itself.

use serde::{Deserialize, Serialize};

/// A pointer position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle used for hit testing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Top edge
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero (or negative) area
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Point lies strictly inside: points on an edge do not count
    pub fn contains_strict(&self, p: Point) -> bool {
        !self.is_empty()
            && p.x > self.left()
            && p.x < self.right()
            && p.y > self.top()
            && p.y < self.bottom()
    }

    /// Point lies inside the rectangle grown by `margin` on all four sides
    ///
    /// Edges of the grown rectangle are inclusive.
    pub fn contains_with_margin(&self, p: Point, margin: f64) -> bool {
        !self.is_empty()
            && p.x >= self.left() - margin
            && p.x <= self.right() + margin
            && p.y >= self.top() - margin
            && p.y <= self.bottom() + margin
    }

    /// The rectangle grown by `margin` on every side
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }
}
