//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, integer pixel physics
//! - Stable iteration order (brick layout order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod layout;
pub mod rect;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use layout::{LayoutStrategy, RowLayout};
pub use rect::Rect;
pub use state::{Brick, BrickField, Paddle, Rgba, Score};
pub use tick::{GamePhase, Outcome, Session, TickInput};
