//! Game settings
//!
//! One immutable value built at startup (defaults, optionally overridden by
//! a JSON file and command line flags) and passed by reference into the
//! session and the brick layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::sim::{Rect, Rgba};

/// Points and color shared by a row of bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub points: u32,
    pub color: Rgba,
}

/// Grid layout of the brick field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayoutSettings {
    /// Grid rows left empty above the first brick row
    pub starting_row: u32,
    pub brick_rows: u32,
    pub brick_cols: u32,
    /// Gap subtracted from each cell to get the brick size
    pub brick_spacing: i32,
    /// Cell width including spacing
    pub brick_width: i32,
    /// Cell height including spacing
    pub brick_height: i32,
    /// Even rows
    pub low_tier: Tier,
    /// Odd rows
    pub high_tier: Tier,
}

impl Default for RowLayoutSettings {
    fn default() -> Self {
        Self {
            starting_row: 2,
            brick_rows: 4,
            brick_cols: 10,
            brick_spacing: 10,
            brick_width: SCREEN_WIDTH / 10,
            brick_height: 30,
            low_tier: Tier {
                points: 10,
                color: LOW_TIER_COLOR,
            },
            high_tier: Tier {
                points: 20,
                color: HIGH_TIER_COLOR,
            },
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub screen_width: i32,
    pub screen_height: i32,

    pub paddle_width: i32,
    pub paddle_height: i32,
    /// Pixels per tick
    pub paddle_speed: i32,
    /// Distance from the bottom of the screen to the paddle top
    pub paddle_offset: i32,

    pub ball_size: i32,
    /// Speed on each axis, pixels per tick
    pub ball_speed: i32,
    /// Lives at the start of a session
    pub num_of_balls: i32,

    pub fps_limit: u32,

    pub layout: RowLayoutSettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_offset: PADDLE_OFFSET,
            ball_size: BALL_SIZE,
            ball_speed: BALL_SPEED,
            num_of_balls: NUM_OF_BALLS,
            fps_limit: FPS_LIMIT,
            layout: RowLayoutSettings::default(),
        }
    }
}

impl GameSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// The playable area
    pub fn boundary(&self) -> Rect {
        Rect::new(0, 0, self.screen_width, self.screen_height)
    }

    /// Check every size the simulation relies on
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_speed", self.ball_speed),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(GameError::Config(format!("{name} must be positive, got {value}")));
            }
        }

        for (name, value) in [("screen_width", self.screen_width), ("screen_height", self.screen_height)] {
            if value > MAX_SCREEN_SIDE {
                return Err(GameError::Config(format!(
                    "{name} must be at most {MAX_SCREEN_SIDE}, got {value}"
                )));
            }
        }

        if self.fps_limit == 0 {
            return Err(GameError::Config("fps_limit must be positive".into()));
        }
        if self.num_of_balls < 0 {
            return Err(GameError::Config(format!(
                "num_of_balls must not be negative, got {}",
                self.num_of_balls
            )));
        }
        if self.paddle_width > self.screen_width {
            return Err(GameError::Config("paddle is wider than the screen".into()));
        }
        if self.paddle_offset <= 0 || self.paddle_offset >= self.screen_height {
            return Err(GameError::Config(format!(
                "paddle_offset must be inside the screen, got {}",
                self.paddle_offset
            )));
        }

        self.validate_layout()
    }

    /// The brick grid must fit inside the screen
    fn validate_layout(&self) -> Result<(), GameError> {
        let layout = &self.layout;
        if layout.brick_spacing < 0 {
            return Err(GameError::Config(format!(
                "brick_spacing must not be negative, got {}",
                layout.brick_spacing
            )));
        }
        if layout.brick_width - layout.brick_spacing <= 0
            || layout.brick_height - layout.brick_spacing <= 0
        {
            return Err(GameError::Config(
                "brick spacing leaves no room for the bricks".into(),
            ));
        }

        let grid_width = i32::try_from(layout.brick_cols)
            .ok()
            .and_then(|cols| cols.checked_mul(layout.brick_width));
        if !grid_width.is_some_and(|w| w <= self.screen_width) {
            return Err(GameError::Config(format!(
                "{} columns of {} px do not fit in a {} px wide screen",
                layout.brick_cols, layout.brick_width, self.screen_width
            )));
        }

        let grid_bottom = layout
            .starting_row
            .checked_add(layout.brick_rows)
            .and_then(|rows| i32::try_from(rows).ok())
            .and_then(|rows| rows.checked_mul(layout.brick_height));
        if !grid_bottom.is_some_and(|h| h <= self.screen_height) {
            return Err(GameError::Config(format!(
                "{} rows starting at row {} of {} px do not fit in a {} px tall screen",
                layout.brick_rows, layout.starting_row, layout.brick_height, self.screen_height
            )));
        }
        Ok(())
    }
}
