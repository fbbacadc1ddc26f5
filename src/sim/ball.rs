//! Ball motion and bounce resolution
//!
//! The ball moves one velocity step per tick and resolves at most one
//! bounce source per tick: walls first, then the paddle, and only if the
//! paddle was missed, a single brick. Bounces only ever flip the sign of a
//! velocity component, so speed is constant for the whole session.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Brick, BrickField, Paddle, Score};

/// Axis to reflect after a brick hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    X,
    Y,
}

/// Pick the bounce axis from the four penetration depths of `ball` into `brick`.
///
/// The side with the strictly smallest depth wins. Ties, and the bottom side
/// being smallest, fall through to a vertical bounce, so diagonal corner hits
/// resolve vertically.
pub fn brick_bounce_axis(ball: &Rect, brick: &Rect) -> BounceAxis {
    let left = ball.right() - brick.left();
    let right = brick.right() - ball.left();
    let top = ball.bottom() - brick.top();
    let bottom = brick.bottom() - ball.top();

    let left_smallest = left < right && left < top && left < bottom;
    let right_smallest = right < left && right < top && right < bottom;
    if left_smallest || right_smallest {
        BounceAxis::X
    } else {
        BounceAxis::Y
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    rect: Rect,
    vel: IVec2,
    moving: bool,
    /// Velocity restored whenever the ball goes back to the paddle
    original_vel: IVec2,
}

impl Ball {
    /// Square ball of `size` at the origin, resting
    pub fn new(size: i32, vx: i32, vy: i32) -> Self {
        let vel = IVec2::new(vx, vy);
        Self {
            rect: Rect::new(0, 0, size, size),
            vel,
            moving: false,
            original_vel: vel,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn velocity(&self) -> IVec2 {
        self.vel
    }

    #[inline]
    pub fn original_velocity(&self) -> IVec2 {
        self.original_vel
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    /// Place the ball directly, e.g. for scripted scenarios
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.set_position(IVec2::new(x, y));
    }

    /// Override the current direction. Magnitudes must match the original
    /// velocity, only signs may differ.
    pub fn set_direction(&mut self, x_positive: bool, y_positive: bool) {
        let abs = self.original_vel.abs();
        self.vel = IVec2::new(
            if x_positive { abs.x } else { -abs.x },
            if y_positive { abs.y } else { -abs.y },
        );
    }

    #[inline]
    fn bounce_x(&mut self) {
        self.vel.x = -self.vel.x;
    }

    #[inline]
    fn bounce_y(&mut self) {
        self.vel.y = -self.vel.y;
    }

    /// One velocity step, only while moving
    pub fn advance(&mut self) {
        if self.moving {
            self.rect.translate(self.vel);
        }
    }

    /// Bounce off the left, right and top walls. The bottom is open.
    ///
    /// Returns true if any wall was touched.
    pub fn resolve_boundary(&mut self, boundary: &Rect) -> bool {
        let mut bounced = false;
        if self.rect.left() <= boundary.left() {
            self.rect.x = boundary.left();
            self.bounce_x();
            bounced = true;
        }
        if self.rect.right() >= boundary.right() {
            self.rect.x = boundary.right() - self.rect.width();
            self.bounce_x();
            bounced = true;
        }
        if self.rect.top() <= boundary.top() {
            self.rect.y = boundary.top();
            self.bounce_y();
            bounced = true;
        }
        bounced
    }

    /// Bounce off the paddle top. Returns true on contact.
    pub fn resolve_paddle(&mut self, paddle: &Paddle) -> bool {
        if !self.rect.intersects(paddle.rect()) {
            return false;
        }
        self.rect.y = paddle.top() - 1 - self.rect.height();
        self.bounce_y();
        true
    }

    /// Knock out the first visible brick the ball overlaps, in field order,
    /// and bounce off it. Returns the brick's points.
    pub fn resolve_bricks(&mut self, field: &mut BrickField) -> Option<u32> {
        let index = field.first_hit(&self.rect)?;
        let brick = field.knock_out(index)?;
        self.bounce_from_brick(&brick);
        Some(brick.points())
    }

    fn bounce_from_brick(&mut self, brick: &Brick) {
        match brick_bounce_axis(&self.rect, brick.rect()) {
            BounceAxis::X => self.bounce_x(),
            BounceAxis::Y => self.bounce_y(),
        }
    }

    /// True once the ball's top edge has dropped past the bottom of the boundary
    pub fn miss_check(&self, boundary: &Rect) -> bool {
        self.rect.top() > boundary.bottom()
    }

    /// Rest centered on top of the paddle with the original velocity
    pub fn reset_to_paddle(&mut self, paddle: &Paddle) {
        self.rect.x = paddle.left() + paddle.width() / 2 - self.rect.width() / 2;
        self.rect.y = paddle.top() - 1 - self.rect.height();
        self.vel = self.original_vel;
        self.moving = false;
    }

    /// Run one moving tick against the playfield.
    ///
    /// Order: advance, walls, paddle (a paddle hit ends the tick), bricks
    /// (a brick hit ends the tick), miss. Returns true when the score changed,
    /// either points gained or a life lost.
    pub fn interact(
        &mut self,
        boundary: &Rect,
        paddle: &Paddle,
        field: &mut BrickField,
        score: &mut Score,
    ) -> bool {
        self.advance();
        self.resolve_boundary(boundary);

        if self.resolve_paddle(paddle) {
            return false;
        }

        if let Some(points) = self.resolve_bricks(field) {
            score.add_points(points);
            log::debug!(
                "Brick hit for {} points ({} left)",
                points,
                field.remaining()
            );
            return true;
        }

        if self.miss_check(boundary) {
            self.reset_to_paddle(paddle);
            score.lose_life();
            log::debug!("Ball lost, {} lives remaining", score.lives_remaining());
            return true;
        }

        false
    }
}
