//! Geometry primitives shared by the zone index, the scene and the engine.
//!
//! Positions are in surface coordinates (the host's client space). The
//! engine never converts between coordinate spaces; the host is expected to
//! feed pointer positions and bounds in the same space.

use serde::{Deserialize, Serialize};

/// A position on the drag surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Width and height of a visual.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, stored as origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle of `size` centered on `center`.
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Edges are inclusive.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.origin.x - margin,
            self.origin.y - margin,
            self.size.width + margin * 2.0,
            self.size.height + margin * 2.0,
        )
    }

    /// Euclidean distance from `p` to the closest point of the rectangle.
    /// Zero when the point lies inside.
    pub fn distance_to(&self, p: Point) -> f32 {
        let dx = (self.min_x() - p.x).max(0.0).max(p.x - self.max_x());
        let dy = (self.min_y() - p.y).max(0.0).max(p.y - self.max_y());
        (dx * dx + dy * dy).sqrt()
    }

    /// CSS-style translate for a fixed-position preview at this rectangle.
    pub fn translate_css(&self) -> String {
        format!("translate({}px, {}px)", self.origin.x, self.origin.y)
    }
}

/// Layout axis of an ordered zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The coordinate of `p` along this axis.
    #[inline]
    pub fn of(&self, p: Point) -> f32 {
        match self {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        }
    }
}
