//! Scene drawing for each session phase

use crate::consts::*;
use crate::error::GameError;
use crate::sim::{GamePhase, Outcome, Session};

use super::Display;
use super::text::{TextCache, render_text};

/// Draws the session and keeps the HUD and end screen text cached
#[derive(Debug, Default)]
pub struct SceneRenderer {
    /// Keyed by (points, lives remaining)
    hud: TextCache<(u32, i32)>,
    status: TextCache<String>,
}

/// HUD line shown under the playfield
pub fn hud_text(points: u32, lives: i32) -> String {
    format!("Score: {points}  Balls: {lives}")
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// HUD renders so far, for checking the cache
    pub fn hud_renders(&self) -> u64 {
        self.hud.renders()
    }

    /// Draw and present one frame
    pub fn render<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
        session: &Session,
    ) -> Result<(), GameError> {
        display.clear(BACKGROUND);
        match session.phase() {
            GamePhase::Playing => self.draw_playfield(display, session)?,
            GamePhase::EndScreen => self.draw_end_screen(display, session)?,
            GamePhase::Terminated => {}
        }
        display.present()
    }

    fn draw_playfield<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
        session: &Session,
    ) -> Result<(), GameError> {
        display.draw_rect(session.paddle().rect(), PADDLE_COLOR)?;
        display.draw_rect(session.ball().rect(), BALL_COLOR)?;
        for brick in session.bricks().visible() {
            display.draw_rect(brick.rect(), brick.color())?;
        }

        let score = session.score();
        let key = (score.points(), score.lives_remaining());
        let hud = self.hud.get_or_render(&key, |(points, lives)| {
            render_text(&hud_text(*points, *lives), HUD_TEXT_SCALE, HUD_COLOR)
        });
        // Bottom-left, two pixels above the edge
        let (_, height) = display.size();
        hud.draw(display, 0, height as i32 - hud.height - 2)
    }

    fn draw_end_screen<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
        session: &Session,
    ) -> Result<(), GameError> {
        let (Some(outcome), Some(message)) = (session.outcome(), session.status_message()) else {
            return Ok(());
        };
        let color = match outcome {
            Outcome::Won => WIN_COLOR,
            Outcome::Lost => LOSE_COLOR,
        };
        let status = self
            .status
            .get_or_render(&message, |m| render_text(m, STATUS_TEXT_SCALE, color));

        let (width, height) = display.size();
        let x = (width as i32 - status.width) / 2;
        let y = (height as i32 - status.height) / 2;
        status.draw(display, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Framebuffer;
    use crate::settings::GameSettings;
    use crate::sim::{RowLayout, TickInput};

    fn session() -> Session {
        let settings = GameSettings::default();
        Session::new(&settings, &RowLayout::new(&settings.layout))
    }

    #[test]
    fn test_playfield_draws_entities() {
        let session = session();
        let mut fb = Framebuffer::new(800, 600).unwrap();
        let mut scene = SceneRenderer::new();
        scene.render(&mut fb, &session).unwrap();

        assert_eq!(fb.frames_presented(), 1);
        // Ball is 10x10 and green
        assert_eq!(fb.count_color(BALL_COLOR), 100);
        // 20 low-tier bricks of 70x20
        assert_eq!(fb.count_color(LOW_TIER_COLOR), 20 * 70 * 20);
        let paddle = session.paddle().rect();
        assert_eq!(fb.pixel(paddle.left(), paddle.top()), Some(PADDLE_COLOR));
        // HUD sits in the bottom-left corner
        assert!((590..598).any(|y| (0..40).any(|x| fb.pixel(x, y) == Some(HUD_COLOR))));
    }

    #[test]
    fn test_hud_rendered_only_when_score_changes() {
        let mut session = session();
        let mut fb = Framebuffer::new(800, 600).unwrap();
        let mut scene = SceneRenderer::new();

        for _ in 0..10 {
            session.tick(&TickInput::default());
            scene.render(&mut fb, &session).unwrap();
        }
        assert_eq!(scene.hud_renders(), 1);

        session.ball_mut().set_moving(true);
        session.ball_mut().set_position(5, 55);
        session.ball_mut().set_direction(true, false);
        assert!(session.tick(&TickInput::default()));
        scene.render(&mut fb, &session).unwrap();
        assert_eq!(scene.hud_renders(), 2);
    }

    #[test]
    fn test_end_screen_shows_status_only() {
        let mut session = session();
        for i in 0..session.bricks().len() {
            session.bricks_mut().knock_out(i);
        }
        session.tick(&TickInput::default());

        let mut fb = Framebuffer::new(800, 600).unwrap();
        let mut scene = SceneRenderer::new();
        scene.render(&mut fb, &session).unwrap();

        assert!(fb.count_color(WIN_COLOR) > 0);
        assert_eq!(fb.count_color(PADDLE_COLOR), 0);
        // Headline is vertically centered around the middle of the screen
        assert!((0..800).any(|x| fb.pixel(x, 270) == Some(WIN_COLOR)));
        assert!((0..800).all(|x| fb.pixel(x, 100) != Some(WIN_COLOR)));
    }
}
