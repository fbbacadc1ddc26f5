//! Brick Breaker entry point
//!
//! Loads settings, takes over the terminal and runs the game loop. Logs go
//! to stderr; redirect them (`2>brick-breaker.log`) to keep them off the
//! playfield.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use brick_breaker::platform::{FrameLimiter, Terminal};
use brick_breaker::sim::{RowLayout, Session};
use brick_breaker::{Game, GameError, GameSettings};

#[derive(Parser, Debug)]
#[command(name = "brick-breaker", version, about = "Arkanoid-style brick breaker for the terminal")]
struct Args {
    /// JSON settings file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame rate cap
    #[arg(long)]
    fps: Option<u32>,

    /// Number of balls (lives) per game
    #[arg(long)]
    lives: Option<i32>,

    /// Demo mode: the paddle plays by itself
    #[arg(long)]
    autoplay: bool,

    /// Exit after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

fn load_settings(args: &Args) -> anyhow::Result<GameSettings> {
    let mut settings = match &args.config {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => GameSettings::default(),
    };
    if let Some(fps) = args.fps {
        settings.fps_limit = fps;
    }
    if let Some(lives) = args.lives {
        settings.num_of_balls = lives;
    }
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = load_settings(&args)?;
    let layout = RowLayout::new(&settings.layout);
    let session = Session::new(&settings, &layout);
    log::info!(
        "Session ready: {} bricks, {} balls",
        session.bricks().len(),
        settings.num_of_balls
    );

    let terminal = Terminal::acquire(settings.screen_width as u32, settings.screen_height as u32)
        .context("could not start the display")?;
    let keys = terminal.keyboard();

    let mut game = Game::new(session, terminal, keys, FrameLimiter::new(settings.fps_limit))
        .with_autopilot(args.autoplay)
        .with_max_frames(args.max_frames);
    let result = game.run();

    let mut terminal = game.into_display();
    let released = terminal.release();
    shutdown_result(result, released)
}

/// Combine the game loop and terminal teardown results. A loop error is
/// reported first, with any teardown failure attached to it.
fn shutdown_result(
    run: Result<(), GameError>,
    release: Result<(), GameError>,
) -> anyhow::Result<()> {
    match (run, release) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(e), Ok(())) => Err(anyhow::Error::new(e).context("game loop aborted")),
        (Ok(()), Err(e)) => Err(anyhow::Error::new(e).context("could not restore the terminal")),
        (Err(run_err), Err(release_err)) => {
            log::error!("Terminal restore failed after the game loop aborted: {release_err}");
            Err(anyhow::Error::new(run_err).context(format!(
                "game loop aborted (and could not restore the terminal: {release_err})"
            )))
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Brick Breaker starting...");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Exiting because of an error: {e:#}");
            eprintln!("brick-breaker: {e:#}");
            ExitCode::FAILURE
        }
    }
}
