//! Axis-aligned quad geometry for every entity
//!
//! A quad stores its four corners in a fixed winding order:
//! - 0: top-left
//! - 1: top-right
//! - 2: bottom-right
//! - 3: bottom-left
//!
//! Screen coordinates grow rightward in x and downward in y, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle expressed as four vertices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub vertices: [Vec2; 4],
}

impl Quad {
    /// Build a quad from its top-left corner and size
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            vertices: [
                Vec2::new(x, y),
                Vec2::new(x + width, y),
                Vec2::new(x + width, y + height),
                Vec2::new(x, y + height),
            ],
        }
    }

    /// Build a quad centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::from_rect(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.vertices[0].x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.vertices[1].x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.vertices[0].y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.vertices[2].y
    }

    pub fn width(&self) -> f32 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left() + self.width() / 2.0,
            self.top() + self.height() / 2.0,
        )
    }

    /// Copy of this quad moved by `offset` (used for look-ahead projection)
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            vertices: self.vertices.map(|v| v + offset),
        }
    }

    /// Move every vertex by `offset` in place
    pub fn translate(&mut self, offset: Vec2) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    pub fn extents(&self) -> Extents {
        Extents {
            left: self.left(),
            right: self.right(),
            top: self.top(),
            bottom: self.bottom(),
        }
    }
}

/// Left/right/top/bottom bounds of a quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Extents {
    pub fn center_x(&self) -> f32 {
        self.left + (self.right - self.left) / 2.0
    }

    /// Overlap on both axes, each tested with the three inclusive disjuncts
    pub fn overlaps(&self, other: &Extents) -> bool {
        ranges_touch(self.left, self.right, other.left, other.right)
            && ranges_touch(self.top, self.bottom, other.top, other.bottom)
    }

    /// `self` lies fully inside `other` horizontally
    pub fn inside_horizontally(&self, other: &Extents) -> bool {
        self.left >= other.left && self.right <= other.right
    }

    /// `self` lies fully inside `other` vertically
    pub fn inside_vertically(&self, other: &Extents) -> bool {
        self.top >= other.top && self.bottom <= other.bottom
    }
}

/// Range `[a_lo, a_hi]` touches `[b_lo, b_hi]`:
/// b's high end inside a, b's low end inside a, or a's low end inside b.
#[inline]
fn ranges_touch(a_lo: f32, a_hi: f32, b_lo: f32, b_hi: f32) -> bool {
    (b_hi <= a_hi && b_hi >= a_lo) || (b_lo <= a_hi && b_lo >= a_lo) || (a_lo >= b_lo && a_lo <= b_hi)
}
