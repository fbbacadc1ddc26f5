//! Game session state machine
//!
//! One tick per frame. The session owns the ball, paddle, brick field and
//! score and resets all four together on restart.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::layout::LayoutStrategy;
use super::rect::Rect;
use super::state::{BrickField, Paddle, Score};
use crate::settings::GameSettings;

/// Input commands for a single tick, level-triggered (true while held)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Launch the ball off the paddle
    pub launch: bool,
    /// Quit (hard quit while playing)
    pub quit: bool,
    /// Restart from the end screen
    pub restart: bool,
    /// Idle/demo mode - the session plays itself
    pub autopilot: bool,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (ball resting on the paddle or in flight)
    Playing,
    /// Win/lose message, waiting for restart or quit
    EndScreen,
    /// Run loop should exit
    Terminated,
}

/// How the last game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn headline(&self) -> &'static str {
        match self {
            Outcome::Won => "Congratulations!",
            Outcome::Lost => "Game Over!",
        }
    }
}

/// Hint shown under the end screen headline
pub const END_SCREEN_HINT: &str = "Q to quit / R to restart";

/// A single game session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: GamePhase,
    outcome: Option<Outcome>,
    restart_requested: bool,
    hard_quit_requested: bool,
    boundary: Rect,
    ball: Ball,
    paddle: Paddle,
    bricks: BrickField,
    score: Score,
}

impl Session {
    /// Build a session from settings and a brick layout, ready to play
    pub fn new(settings: &GameSettings, layout: &dyn LayoutStrategy) -> Self {
        let paddle = Paddle::new(
            settings.screen_width / 2 - settings.paddle_width / 2,
            settings.screen_height - settings.paddle_offset,
            settings.paddle_width,
            settings.paddle_height,
            settings.paddle_speed,
        );
        let mut session = Self {
            phase: GamePhase::Playing,
            outcome: None,
            restart_requested: false,
            hard_quit_requested: false,
            boundary: settings.boundary(),
            ball: Ball::new(settings.ball_size, settings.ball_speed, settings.ball_speed),
            paddle,
            bricks: BrickField::from_layout(layout),
            score: Score::new(settings.num_of_balls),
        };
        session.start();
        session
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == GamePhase::Terminated
    }

    /// Set by a restart from the end screen, until the next playing tick
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }

    pub fn hard_quit_requested(&self) -> bool {
        self.hard_quit_requested
    }

    pub fn boundary(&self) -> &Rect {
        &self.boundary
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn bricks(&self) -> &BrickField {
        &self.bricks
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Mutable ball access for scripted scenarios
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    /// Mutable field access for scripted scenarios; the field keeps its own
    /// count consistent.
    pub fn bricks_mut(&mut self) -> &mut BrickField {
        &mut self.bricks
    }

    /// Enter `Playing` with fresh entities
    pub fn start(&mut self) {
        self.restart();
    }

    /// Reset ball, paddle, bricks and score together and resume play
    pub fn restart(&mut self) {
        self.paddle.reset();
        self.ball.reset_to_paddle(&self.paddle);
        self.bricks.reset();
        self.score.reset();
        self.restart_requested = false;
        self.hard_quit_requested = false;
        self.outcome = None;
        self.set_phase(GamePhase::Playing);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    /// End screen text for the last outcome
    pub fn status_message(&self) -> Option<String> {
        self.outcome
            .map(|outcome| format!("{}\n\n{}", outcome.headline(), END_SCREEN_HINT))
    }

    /// Advance the session by one frame. Returns true when the score changed.
    pub fn tick(&mut self, input: &TickInput) -> bool {
        match self.phase {
            GamePhase::Playing => {
                let input = if input.autopilot {
                    self.autopilot_input(input)
                } else {
                    *input
                };
                self.tick_playing(&input)
            }
            GamePhase::EndScreen => {
                self.tick_end_screen(input);
                false
            }
            GamePhase::Terminated => false,
        }
    }

    fn tick_playing(&mut self, input: &TickInput) -> bool {
        self.restart_requested = false;
        if input.quit {
            self.hard_quit_requested = true;
            self.set_phase(GamePhase::Terminated);
            return false;
        }

        if input.move_left {
            self.paddle.move_left(&self.boundary);
        }
        if input.move_right {
            self.paddle.move_right(&self.boundary);
        }
        if input.launch && !self.ball.is_moving() {
            self.ball.set_moving(true);
            log::debug!("Ball launched");
        }

        let score_changed = if self.ball.is_moving() {
            self.ball.interact(
                &self.boundary,
                &self.paddle,
                &mut self.bricks,
                &mut self.score,
            )
        } else {
            self.ball.reset_to_paddle(&self.paddle);
            false
        };

        if self.score.is_won(&self.bricks) {
            self.finish(Outcome::Won);
        } else if self.score.is_lost() {
            self.finish(Outcome::Lost);
        }

        score_changed
    }

    fn finish(&mut self, outcome: Outcome) {
        log::info!(
            "Game over: {:?} with {} points, {} lives left",
            outcome,
            self.score.points(),
            self.score.lives_remaining()
        );
        self.outcome = Some(outcome);
        self.set_phase(GamePhase::EndScreen);
    }

    fn tick_end_screen(&mut self, input: &TickInput) {
        if input.restart {
            log::info!("Restarting");
            self.restart();
            self.restart_requested = true;
        } else if input.quit {
            self.set_phase(GamePhase::Terminated);
        }
    }

    /// Steer toward the ball and launch whenever it rests on the paddle
    fn autopilot_input(&self, input: &TickInput) -> TickInput {
        let target = self.ball.rect().center_x();
        let center = self.paddle.center_x();
        let dead_zone = self.paddle.speed().max(1);
        TickInput {
            move_left: target < center - dead_zone,
            move_right: target > center + dead_zone,
            launch: !self.ball.is_moving(),
            quit: input.quit,
            restart: false,
            autopilot: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Brick, RowLayout, Rgba};

    fn default_session() -> Session {
        let settings = GameSettings::default();
        Session::new(&settings, &RowLayout::new(&settings.layout))
    }

    fn launch() -> TickInput {
        TickInput {
            launch: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_is_playing_with_resting_ball() {
        let session = default_session();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(!session.ball().is_moving());
        assert_eq!(session.bricks().remaining(), 40);
        assert_eq!(session.score().lives_remaining(), 3);
        assert_eq!(session.ball().rect().bottom(), session.paddle().top() - 1);
    }

    #[test]
    fn test_resting_ball_follows_paddle() {
        let mut session = default_session();
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..5 {
            session.tick(&input);
        }
        assert_eq!(session.paddle().left(), 350 - 30);
        assert_eq!(session.ball().rect().center_x(), session.paddle().center_x());
        assert!(!session.ball().is_moving());
    }

    #[test]
    fn test_launch_moves_ball_same_tick() {
        let mut session = default_session();
        let before = session.ball().rect().position();
        session.tick(&launch());
        assert!(session.ball().is_moving());
        // Launch velocity points down, so the first step lands on the paddle
        // and bounces straight back up.
        let after = session.ball().rect().position();
        assert_eq!(after.x, before.x + 4);
        assert_eq!(after.y, before.y);
        assert_eq!(session.ball().velocity(), glam::IVec2::new(4, -4));
    }

    #[test]
    fn test_quit_while_playing_terminates() {
        let mut session = default_session();
        session.tick(&TickInput {
            quit: true,
            move_left: true,
            ..Default::default()
        });
        assert_eq!(session.phase(), GamePhase::Terminated);
        assert!(session.hard_quit_requested());
        assert!(session.outcome().is_none());
        // Input after termination is ignored
        session.tick(&launch());
        assert!(!session.ball().is_moving());
    }

    #[test]
    fn test_cleared_field_wins_regardless_of_lives() {
        let mut session = default_session();
        for i in 0..session.bricks().len() {
            session.bricks_mut().knock_out(i);
        }
        session.tick(&TickInput::default());
        assert_eq!(session.phase(), GamePhase::EndScreen);
        assert_eq!(session.outcome(), Some(Outcome::Won));
        assert_eq!(session.score().lives_remaining(), 3);
        let message = session.status_message().unwrap();
        assert!(message.starts_with("Congratulations!"));
    }

    /// The grace ball: at zero lives the ball is still in play, only the
    /// next miss ends the game.
    #[test]
    fn test_miss_at_zero_lives_loses() {
        let settings = GameSettings {
            num_of_balls: 0,
            ..Default::default()
        };
        let mut session = Session::new(&settings, &RowLayout::new(&settings.layout));
        assert_eq!(session.score().lives_remaining(), 0);
        assert!(!session.score().is_lost());

        // Drop the ball straight past the bottom edge
        session.ball_mut().set_moving(true);
        session.ball_mut().set_position(100, 598);
        session.ball_mut().set_direction(false, true);
        let changed = session.tick(&TickInput::default());

        assert!(changed);
        assert_eq!(session.score().lives_remaining(), -1);
        assert!(session.score().is_lost());
        assert_eq!(session.phase(), GamePhase::EndScreen);
        assert_eq!(session.outcome(), Some(Outcome::Lost));
        assert!(session.status_message().unwrap().starts_with("Game Over!"));
    }

    #[test]
    fn test_end_screen_restart_and_quit() {
        let mut session = default_session();
        for i in 0..session.bricks().len() {
            session.bricks_mut().knock_out(i);
        }
        session.tick(&TickInput::default());
        assert_eq!(session.phase(), GamePhase::EndScreen);

        // Movement is ignored on the end screen
        session.tick(&TickInput {
            move_left: true,
            launch: true,
            ..Default::default()
        });
        assert_eq!(session.phase(), GamePhase::EndScreen);

        // Restart wins when both keys are held
        session.tick(&TickInput {
            restart: true,
            quit: true,
            ..Default::default()
        });
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.bricks().remaining(), 40);
        assert!(session.restart_requested());
        session.tick(&TickInput::default());
        assert!(!session.restart_requested());

        for i in 0..session.bricks().len() {
            session.bricks_mut().knock_out(i);
        }
        session.tick(&TickInput::default());
        session.tick(&TickInput {
            quit: true,
            ..Default::default()
        });
        assert_eq!(session.phase(), GamePhase::Terminated);
        assert!(!session.hard_quit_requested());
    }

    #[test]
    fn test_restart_reproduces_initial_state() {
        let fresh = default_session();
        let mut session = fresh.clone();

        session.tick(&launch());
        for _ in 0..400 {
            session.tick(&TickInput {
                move_right: true,
                ..Default::default()
            });
        }
        session.bricks_mut().knock_out(0);
        assert_ne!(session, fresh);

        session.restart();
        assert_eq!(session, fresh);

        // Idempotent
        session.restart();
        assert_eq!(session, fresh);
    }

    #[test]
    fn test_one_brick_layout_scores_and_wins() {
        let settings = GameSettings::default();
        let single = || vec![Brick::new(Rect::new(390, 300, 20, 20), 10, Rgba::rgb(255, 0, 0))];
        let mut session = Session::new(&settings, &single);

        session.ball_mut().set_moving(true);
        session.ball_mut().set_position(395, 318);
        session.ball_mut().set_direction(true, false);
        assert!(session.tick(&TickInput::default()));
        assert_eq!(session.score().points(), 10);
        assert_eq!(session.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_autopilot_launches_and_tracks() {
        let mut session = default_session();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        session.tick(&input);
        assert!(session.ball().is_moving());

        for _ in 0..2000 {
            if session.phase() != GamePhase::Playing {
                break;
            }
            session.tick(&input);
            let paddle = session.paddle();
            assert!(paddle.left() >= 0 && paddle.right() <= 800);
        }
        assert!(session.score().points() > 0);
    }
}
