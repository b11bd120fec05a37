//! Axis-aligned bounding box collision
//!
//! Every gameplay entity is a rectangle in canvas space (y grows downward).
//! Overlap uses strict inequalities, so boxes that only share an edge do
//! not collide.

use glam::Vec2;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// True when the interiors of the two boxes intersect
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Index of the first box in `others` overlapping `target`
pub fn first_overlap<I>(target: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = Rect>,
{
    others.into_iter().position(|r| target.overlaps(&r))
}
