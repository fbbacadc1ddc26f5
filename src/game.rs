//! Frame loop
//!
//! Each frame: start pacing, poll input once, tick the session, render,
//! then block for the rest of the frame budget. Quit is only observed at
//! frame boundaries.

use crate::error::GameError;
use crate::platform::{FramePacer, InputSource};
use crate::renderer::{Display, SceneRenderer};
use crate::sim::Session;

/// A session wired to its display, input and pacer
pub struct Game<D, I, P> {
    session: Session,
    display: D,
    input: I,
    pacer: P,
    scene: SceneRenderer,
    frames: u64,
    max_frames: Option<u64>,
    autopilot: bool,
}

impl<D: Display, I: InputSource, P: FramePacer> Game<D, I, P> {
    pub fn new(session: Session, display: D, input: I, pacer: P) -> Self {
        Self {
            session,
            display,
            input,
            pacer,
            scene: SceneRenderer::new(),
            frames: 0,
            max_frames: None,
            autopilot: false,
        }
    }

    /// Stop after this many frames even if the session is still running
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Let the session play itself
    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn scene(&self) -> &SceneRenderer {
        &self.scene
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Give the display back, e.g. to release it explicitly
    pub fn into_display(self) -> D {
        self.display
    }

    /// Run until the session terminates or the frame limit is hit.
    /// Drawing errors abort the loop.
    pub fn run(&mut self) -> Result<(), GameError> {
        log::info!("Game loop running");
        while !self.session.is_terminated() {
            if self.max_frames.is_some_and(|max| self.frames >= max) {
                log::info!("Frame limit reached after {} frames", self.frames);
                break;
            }
            self.step()?;
        }
        log::info!("Game loop finished after {} frames", self.frames);
        Ok(())
    }

    /// One full frame
    pub fn step(&mut self) -> Result<(), GameError> {
        self.pacer.start_frame();

        let mut input = self.input.poll()?;
        input.autopilot |= self.autopilot;

        if self.session.tick(&input) {
            let score = self.session.score();
            log::debug!(
                "Score {} / lives {}",
                score.points(),
                score.lives_remaining()
            );
        }

        if !self.session.is_terminated() {
            self.scene.render(&mut self.display, &self.session)?;
        }

        self.pacer.wait_until_next_frame();
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::{ScriptedInput, Unpaced};
    use crate::renderer::Framebuffer;
    use crate::settings::GameSettings;
    use crate::sim::{GamePhase, Outcome, Rect, Rgba, RowLayout, TickInput};

    fn game(input: ScriptedInput) -> Game<Framebuffer, ScriptedInput, Unpaced> {
        let settings = GameSettings::default();
        let session = Session::new(&settings, &RowLayout::new(&settings.layout));
        Game::new(session, Framebuffer::new(800, 600).unwrap(), input, Unpaced)
    }

    fn quit() -> TickInput {
        TickInput {
            quit: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_quit_stops_loop_without_drawing_that_frame() {
        let input = ScriptedInput::default()
            .hold(TickInput::default(), 3)
            .then(quit());
        let mut game = game(input);
        game.run().unwrap();

        assert_eq!(game.frames(), 4);
        assert_eq!(game.display().frames_presented(), 3);
        assert_eq!(game.session().phase(), GamePhase::Terminated);
        assert!(game.session().hard_quit_requested());
    }

    #[test]
    fn test_frame_limit() {
        let mut game = game(ScriptedInput::default()).with_max_frames(Some(25));
        game.run().unwrap();
        assert_eq!(game.frames(), 25);
        assert_eq!(game.session().phase(), GamePhase::Playing);
        assert_eq!(game.scene().hud_renders(), 1);
    }

    #[test]
    fn test_paddle_moves_with_held_input() {
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        let input = ScriptedInput::default().hold(left, 10).then(quit());
        let mut game = game(input);
        game.run().unwrap();
        assert_eq!(game.session().paddle().left(), 350 - 10 * PADDLE_SPEED);
    }

    #[test]
    fn test_autopilot_session_runs_to_an_end() {
        // One ball, tiny field: the demo either clears it or drops the ball
        let settings = GameSettings {
            num_of_balls: 0,
            layout: crate::settings::RowLayoutSettings {
                brick_rows: 1,
                brick_cols: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let session = Session::new(&settings, &RowLayout::new(&settings.layout));
        let fb = Framebuffer::new(800, 600).unwrap();
        let mut game = Game::new(session, fb, ScriptedInput::default(), Unpaced)
            .with_autopilot(true)
            .with_max_frames(Some(3_000));
        game.run().unwrap();

        let session = game.session();
        match session.phase() {
            GamePhase::EndScreen => {
                assert!(session.outcome().is_some());
                let fb = game.display();
                let color = match session.outcome() {
                    Some(Outcome::Won) => WIN_COLOR,
                    _ => LOSE_COLOR,
                };
                assert!(fb.count_color(color) > 0);
            }
            phase => assert_eq!(phase, GamePhase::Playing),
        }
        let p = session.paddle();
        assert!(p.left() >= 0 && p.right() <= 800);
    }

    #[test]
    fn test_restart_from_end_screen() {
        let settings = GameSettings::default();
        let mut session = Session::new(&settings, &RowLayout::new(&settings.layout));
        for i in 0..session.bricks().len() {
            session.bricks_mut().knock_out(i);
        }
        let fresh_bricks = 40;

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let input = ScriptedInput::new([TickInput::default(), TickInput::default(), restart])
            .hold(TickInput::default(), 2)
            .then(quit());
        let mut game = Game::new(session, Framebuffer::new(800, 600).unwrap(), input, Unpaced);

        game.step().unwrap();
        assert_eq!(game.session().phase(), GamePhase::EndScreen);
        assert_eq!(game.session().outcome(), Some(Outcome::Won));
        assert!(game.display().count_color(WIN_COLOR) > 0);

        game.run().unwrap();
        assert_eq!(game.session().bricks().remaining(), fresh_bricks);
        assert_eq!(game.session().score().points(), 0);
        assert_eq!(game.session().phase(), GamePhase::Terminated);
    }

    /// Fails every present after the first few
    struct FlakyDisplay {
        inner: Framebuffer,
        presents_left: u32,
    }

    impl Display for FlakyDisplay {
        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }

        fn clear(&mut self, color: Rgba) {
            self.inner.clear(color);
        }

        fn draw_rect(&mut self, rect: &Rect, color: Rgba) -> Result<(), GameError> {
            self.inner.draw_rect(rect, color)
        }

        fn present(&mut self) -> Result<(), GameError> {
            if self.presents_left == 0 {
                return Err(GameError::Draw("display went away".to_string()));
            }
            self.presents_left -= 1;
            self.inner.present()
        }
    }

    #[test]
    fn test_draw_error_aborts_loop() {
        let settings = GameSettings::default();
        let session = Session::new(&settings, &RowLayout::new(&settings.layout));
        let display = FlakyDisplay {
            inner: Framebuffer::new(800, 600).unwrap(),
            presents_left: 2,
        };
        let mut game = Game::new(session, display, ScriptedInput::default(), Unpaced);

        let err = game.run().unwrap_err();
        assert!(matches!(err, GameError::Draw(_)));
        assert_eq!(game.frames(), 2);
        assert_eq!(game.display().inner.frames_presented(), 2);
    }
}
