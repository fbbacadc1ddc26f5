//! Brick Breaker - A single-screen Arkanoid-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, bricks, session state machine)
//! - `renderer`: Display surface, scene drawing and bitmap text
//! - `platform`: Terminal backend, keyboard input and frame pacing
//! - `settings`: Immutable game configuration
//! - `game`: Frame loop wiring the session to its collaborators

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::Game;
pub use settings::{GameSettings, RowLayoutSettings, Tier};

/// Game configuration constants
pub mod consts {
    use crate::sim::Rgba;

    /// Logical playfield resolution
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 600;
    /// Largest accepted screen width or height
    pub const MAX_SCREEN_SIDE: i32 = 8192;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 100;
    pub const PADDLE_HEIGHT: i32 = 10;
    pub const PADDLE_SPEED: i32 = 6;
    /// Distance from the bottom edge to the paddle top
    pub const PADDLE_OFFSET: i32 = 80;

    /// Ball defaults (square, same speed on both axes)
    pub const BALL_SIZE: i32 = 10;
    pub const BALL_SPEED: i32 = 4;
    pub const NUM_OF_BALLS: i32 = 3;

    /// Target frame rate
    pub const FPS_LIMIT: u32 = 60;

    /// Palette
    pub const BACKGROUND: Rgba = Rgba::rgb(0, 0, 0);
    pub const PADDLE_COLOR: Rgba = Rgba::rgb(255, 255, 255);
    pub const BALL_COLOR: Rgba = Rgba::rgb(0, 255, 0);
    pub const HUD_COLOR: Rgba = Rgba::rgb(255, 255, 255);
    pub const WIN_COLOR: Rgba = Rgba::rgb(0, 255, 0);
    pub const LOSE_COLOR: Rgba = Rgba::rgb(255, 0, 0);
    pub const LOW_TIER_COLOR: Rgba = Rgba::rgb(255, 0, 0);
    pub const HIGH_TIER_COLOR: Rgba = Rgba::rgb(255, 255, 0);

    /// Text scale (logical pixels per font pixel)
    pub const HUD_TEXT_SCALE: i32 = 4;
    pub const STATUS_TEXT_SCALE: i32 = 7;
}
