//! Keyboard input
//!
//! Terminal key events arrive as presses, repeats and (when the terminal
//! supports it) releases. [`KeyTracker`] turns them into held-key state that
//! is sampled once per frame.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::InputSource;
use crate::error::GameError;
use crate::sim::TickInput;

/// Frames a fresh press stays held when releases are not reported. A tap
/// moves the paddle this many steps.
pub const DEFAULT_TAP_FRAMES: u32 = 6;
/// Frames each further press or repeat extends the hold. Covers the gap
/// between two auto-repeat events.
pub const DEFAULT_REPEAT_FRAMES: u32 = 5;

/// Logical game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Launch,
    Quit,
    Restart,
}

impl Action {
    const ALL: [Action; 5] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Launch,
        Action::Quit,
        Action::Restart,
    ];

    /// Key binding for a terminal key event
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
                _ => None,
            };
        }
        match event.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
            KeyCode::Char(' ') => Some(Action::Launch),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    /// Down until a release event
    down: bool,
    /// Pressed since the last sample, so a tap shorter than a frame still counts
    tapped: bool,
    /// Remaining held frames without release reporting
    frames_left: u32,
}

/// Held-key tracker
#[derive(Debug, Clone)]
pub struct KeyTracker {
    keys: [KeyState; 5],
    release_events: bool,
    tap_frames: u32,
    repeat_frames: u32,
}

impl KeyTracker {
    /// `release_events`: whether the terminal reports key releases
    pub fn new(release_events: bool) -> Self {
        Self {
            keys: [KeyState::default(); 5],
            release_events,
            tap_frames: DEFAULT_TAP_FRAMES,
            repeat_frames: DEFAULT_REPEAT_FRAMES,
        }
    }

    /// Hold windows used when releases are not reported: `tap` for a fresh
    /// press, `repeat` for presses arriving while the key is still held
    pub fn with_hold_frames(mut self, tap: u32, repeat: u32) -> Self {
        self.tap_frames = tap;
        self.repeat_frames = repeat;
        self
    }

    pub fn release_events(&self) -> bool {
        self.release_events
    }

    /// Feed one key event
    pub fn handle_key(&mut self, event: &KeyEvent) {
        let Some(action) = Action::from_key(event) else {
            return;
        };
        let (tap_frames, repeat_frames) = (self.tap_frames, self.repeat_frames);
        let release_events = self.release_events;
        let key = &mut self.keys[action.index()];
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                key.tapped = true;
                if release_events {
                    key.down = true;
                } else if key.frames_left > 0 || event.kind == KeyEventKind::Repeat {
                    key.frames_left = key.frames_left.max(repeat_frames);
                } else {
                    key.frames_left = tap_frames;
                }
            }
            KeyEventKind::Release => {
                key.down = false;
                key.frames_left = 0;
            }
        }
    }

    /// Whether an action is currently held, without consuming taps
    pub fn is_held(&self, action: Action) -> bool {
        let key = &self.keys[action.index()];
        key.down || key.tapped || key.frames_left > 0
    }

    /// Held state for this frame. Clears taps and ages hold timers.
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.is_held(Action::MoveLeft),
            move_right: self.is_held(Action::MoveRight),
            launch: self.is_held(Action::Launch),
            quit: self.is_held(Action::Quit),
            restart: self.is_held(Action::Restart),
            autopilot: false,
        };
        for action in Action::ALL {
            let key = &mut self.keys[action.index()];
            key.tapped = false;
            key.frames_left = key.frames_left.saturating_sub(1);
        }
        input
    }
}

/// Replays a fixed list of inputs, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
    idle: TickInput,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            idle: TickInput::default(),
        }
    }

    /// Input repeated once the script runs out
    pub fn then(mut self, idle: TickInput) -> Self {
        self.idle = idle;
        self
    }

    /// Append `count` frames of the same input
    pub fn hold(mut self, input: TickInput, count: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(input, count));
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<TickInput, GameError> {
        Ok(self.frames.pop_front().unwrap_or(self.idle))
    }
}
