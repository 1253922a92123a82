//! Rectangle geometry and overlap tests
//!
//! Everything in the playfield is an axis-aligned box in integer pixels, with
//! y growing downward. Overlap is strict: boxes that only share an edge do
//! not collide.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.pos.x + self.size.x / 2
    }

    pub fn set_center_x(&mut self, cx: i32) {
        self.pos.x = cx - self.size.x / 2;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.pos.y = bottom - self.size.y;
    }

    /// Shift horizontally so the rect lies inside `[0, width]`
    pub fn clamp_x(&mut self, width: i32) {
        if self.left() < 0 {
            self.pos.x = 0;
        }
        if self.right() > width {
            self.pos.x = width - self.size.x;
        }
    }

    /// Strict overlap (positive intersection area)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Width of the horizontal intersection (0 when disjoint)
    pub fn horizontal_overlap(&self, other: &Rect) -> i32 {
        (self.right().min(other.right()) - self.left().max(other.left())).max(0)
    }

    /// Point containment (half-open on the right/bottom edges)
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
