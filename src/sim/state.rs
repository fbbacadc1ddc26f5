//! Game entities and core simulation types
//!
//! Bricks, the brick field, the paddle and the score tracker. The ball lives
//! in its own module since it owns the collision logic.

use serde::{Deserialize, Serialize};

use super::layout::LayoutStrategy;
use super::rect::Rect;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// A single destructible brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    rect: Rect,
    visible: bool,
    points: u32,
    color: Rgba,
}

impl Brick {
    /// New bricks start visible
    pub fn new(rect: Rect, points: u32, color: Rgba) -> Self {
        Self {
            rect,
            visible: true,
            points,
            color,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }
}

/// Ordered collection of bricks with a cached count of visible ones.
///
/// Bricks are only ever mutated through the field so that `remaining()`
/// always equals the number of visible bricks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickField {
    bricks: Vec<Brick>,
    remaining: usize,
}

impl BrickField {
    pub fn new(bricks: Vec<Brick>) -> Self {
        let remaining = bricks.iter().filter(|b| b.visible).count();
        Self { bricks, remaining }
    }

    /// Build the field from a layout strategy
    pub fn from_layout(layout: &dyn LayoutStrategy) -> Self {
        Self::new(layout.create_bricks())
    }

    /// Number of visible bricks
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Total number of bricks, visible or not
    #[inline]
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// True once every brick has been knocked out
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    /// Visible bricks in layout order
    pub fn visible(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.visible)
    }

    /// Index of the first visible brick (in layout order) overlapping `rect`
    pub fn first_hit(&self, rect: &Rect) -> Option<usize> {
        self.bricks
            .iter()
            .position(|b| b.visible && b.rect.intersects(rect))
    }

    /// Hide a brick and decrement the remaining count.
    ///
    /// Returns the brick as it was before being hidden, or `None` if the
    /// index is out of range or the brick was already gone.
    pub fn knock_out(&mut self, index: usize) -> Option<Brick> {
        let brick = self.bricks.get_mut(index)?;
        if !brick.visible {
            return None;
        }
        let before = *brick;
        brick.visible = false;
        self.remaining -= 1;
        Some(before)
    }

    /// Re-reveal every brick
    pub fn reset(&mut self) {
        for brick in &mut self.bricks {
            brick.visible = true;
        }
        self.remaining = self.bricks.len();
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    rect: Rect,
    /// Pixels moved per tick
    speed: i32,
    /// Position restored on restart
    original_rect: Rect,
}

impl Paddle {
    pub fn new(x: i32, y: i32, width: i32, height: i32, speed: i32) -> Self {
        let rect = Rect::new(x, y, width, height);
        Self {
            rect,
            speed,
            original_rect: rect,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.rect.left()
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.rect.right()
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.rect.top()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.rect.width()
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.rect.center_x()
    }

    /// Slide left by `speed`, stopping at the boundary's left edge
    pub fn move_left(&mut self, boundary: &Rect) {
        if self.rect.x > boundary.left() {
            self.rect.x = (self.rect.x - self.speed).max(boundary.left());
        }
    }

    /// Slide right by `speed`, stopping at the boundary's right edge
    pub fn move_right(&mut self, boundary: &Rect) {
        if self.rect.right() < boundary.right() {
            self.rect.x = (self.rect.x + self.speed).min(boundary.right() - self.rect.width());
        }
    }

    /// Back to the constructed position
    pub fn reset(&mut self) {
        self.rect = self.original_rect;
    }
}

/// Points and lives for the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    points: u32,
    lives_remaining: i32,
    initial_lives: i32,
}

impl Score {
    pub fn new(initial_lives: i32) -> Self {
        Self {
            points: 0,
            lives_remaining: initial_lives,
            initial_lives,
        }
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[inline]
    pub fn lives_remaining(&self) -> i32 {
        self.lives_remaining
    }

    #[inline]
    pub fn initial_lives(&self) -> i32 {
        self.initial_lives
    }

    pub fn add_points(&mut self, points: u32) {
        self.points = self.points.saturating_add(points);
    }

    pub fn lose_life(&mut self) {
        self.lives_remaining -= 1;
    }

    pub fn reset(&mut self) {
        self.points = 0;
        self.lives_remaining = self.initial_lives;
    }

    /// Won once the field has no visible bricks, regardless of lives
    pub fn is_won(&self, field: &BrickField) -> bool {
        field.is_cleared()
    }

    /// Lost only once lives drop below zero: the last ball at zero lives is
    /// still in play.
    pub fn is_lost(&self) -> bool {
        self.lives_remaining < 0
    }
}
