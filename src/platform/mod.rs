//! Platform abstraction layer
//!
//! Handles everything outside the simulation:
//! - Input events (polled once per frame, held-key semantics)
//! - Frame pacing
//! - The terminal graphics subsystem

pub mod input;
pub mod pacer;
pub mod terminal;

pub use input::{Action, KeyTracker, ScriptedInput};
pub use pacer::{FrameLimiter, Unpaced};
pub use terminal::{Terminal, TerminalKeys};

use crate::error::GameError;
use crate::sim::TickInput;

/// Source of per-frame input, sampled once at the start of each frame
pub trait InputSource {
    fn poll(&mut self) -> Result<TickInput, GameError>;
}

/// Caps the frame rate by blocking at the end of each frame
pub trait FramePacer {
    fn start_frame(&mut self);
    fn wait_until_next_frame(&mut self);
}
