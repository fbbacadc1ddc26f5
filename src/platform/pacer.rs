//! Frame pacing

use std::time::{Duration, Instant};

use super::FramePacer;

/// Sleeps away whatever is left of a fixed per-frame budget
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    budget: Duration,
    started: Instant,
}

impl FrameLimiter {
    /// Budget is `1000 / fps` whole milliseconds
    pub fn new(fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            budget: Duration::from_millis(1000 / fps as u64),
            started: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl FramePacer for FrameLimiter {
    fn start_frame(&mut self) {
        self.started = Instant::now();
    }

    fn wait_until_next_frame(&mut self) {
        let elapsed = self.started.elapsed();
        if elapsed < self.budget {
            std::thread::sleep(self.budget - elapsed);
        }
    }
}

/// No pacing at all, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl FramePacer for Unpaced {
    fn start_frame(&mut self) {}

    fn wait_until_next_frame(&mut self) {}
}
