//! Axis-aligned rectangle geometry
//!
//! Every entity in the game (ball, paddle, bricks, the playfield itself) is an
//! integer rectangle with the origin at the top-left corner.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    /// Width, fixed at construction
    w: i32,
    /// Height, fixed at construction
    h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        debug_assert!(w > 0 && h > 0, "rect size must be positive: {w}x{h}");
        Self { x, y, w, h }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.h
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn set_position(&mut self, pos: IVec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Move by an offset
    #[inline]
    pub fn translate(&mut self, delta: IVec2) {
        self.set_position(self.position() + delta);
    }

    /// Overlap test on half-open intervals: boxes that only share an edge
    /// do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Intersection of two rectangles, if they overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.left().max(other.left());
        let y = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Free-function form of [`Rect::intersects`]
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 20, 20);
        let b = Rect::new(10, 10, 20, 20);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
        assert_eq!(a.intersection(&b), Some(Rect::new(10, 10, 10, 10)));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 20, 20);
        // Shares a's right edge
        assert!(!a.intersects(&Rect::new(20, 0, 10, 10)));
        // Shares a's bottom edge
        assert!(!a.intersects(&Rect::new(0, 20, 10, 10)));
        // One pixel of overlap does count
        assert!(a.intersects(&Rect::new(19, 19, 10, 10)));
    }

    #[test]
    fn test_containment_intersects() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 5, 5);
        assert!(outer.intersects(&inner));
        assert_eq!(outer.intersection(&inner), Some(inner));
    }

    #[test]
    fn test_edges_and_translate() {
        let mut r = Rect::new(5, -5, 10, 10);
        assert_eq!((r.left(), r.right(), r.top(), r.bottom()), (5, 15, -5, 5));
        r.translate(IVec2::new(0, 4));
        assert_eq!(r.position(), IVec2::new(5, -1));
        assert_eq!(r.width(), 10);
        assert_eq!(r.center_x(), 10);
    }
}
