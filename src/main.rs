use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use clap::Parser;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use snake_arcade::clock::{FrameClock, frame_interval};
use snake_arcade::config::{GAME_OVER_PAUSE, GameConfig, default_log_path};
use snake_arcade::error::GameError;
use snake_arcade::game::{GameState, GameStatus};
use snake_arcade::input::{GameInput, InputHandler};
use snake_arcade::renderer;
use snake_arcade::terminal_runtime::TerminalSession;

/// Snake in the terminal: eat colored food, dodge the walls.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Field width in game units (a multiple of 10).
    #[arg(long)]
    width: Option<i32>,

    /// Field height in game units (a multiple of 10).
    #[arg(long)]
    height: Option<i32>,

    /// Number of foods kept on the field.
    #[arg(long = "max-food")]
    max_food: Option<usize>,

    /// Starting speed in cells per second.
    #[arg(long)]
    speed: Option<f64>,

    /// Speed gained per second of play, in cells per second.
    #[arg(long = "speed-ramp")]
    speed_ramp: Option<f64>,

    /// Seconds of play per extra wall.
    #[arg(long = "wall-interval")]
    wall_interval: Option<u64>,

    /// Random samples tried before a spawn is skipped for the frame.
    #[arg(long = "max-spawn-attempts")]
    max_spawn_attempts: Option<u32>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; defaults to the per-user config file when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn apply(&self, config: &mut GameConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(max_food) = self.max_food {
            config.max_food = max_food;
        }
        if let Some(speed) = self.speed {
            config.base_speed = speed;
        }
        if let Some(speed_ramp) = self.speed_ramp {
            config.speed_ramp = speed_ramp;
        }
        if let Some(wall_interval) = self.wall_interval {
            config.wall_interval_secs = wall_interval;
        }
        if let Some(max_spawn_attempts) = self.max_spawn_attempts {
            config.max_spawn_attempts = max_spawn_attempts;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<(), GameError> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path, cli.log_level);

    let mut config = GameConfig::load(cli.config.as_deref()).inspect_err(|error| {
        error!("could not load config: {error}");
    })?;
    cli.apply(&mut config);

    let state = GameState::new(config)?;
    info!("starting game with {:?}", state.config());

    let mut session = TerminalSession::enter()?;
    run(&mut session, state)
}

fn init_logging(path: &Path, level: LevelFilter) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let result = File::create(path)
        .map_err(|error| error.to_string())
        .and_then(|file| {
            WriteLogger::init(level, Config::default(), file).map_err(|error| error.to_string())
        });

    if let Err(error) = result {
        eprintln!("logging disabled ({}): {error}", path.display());
    }
}

fn run(session: &mut TerminalSession, mut state: GameState) -> Result<(), GameError> {
    let mut input = InputHandler::new();
    let clock = FrameClock::start();

    loop {
        let status = state.step(clock.elapsed());
        session.present(|frame| renderer::render(frame, &state))?;

        if let GameStatus::GameOver(_) = status {
            thread::sleep(GAME_OVER_PAUSE);
            return Ok(());
        }

        let deadline = Instant::now() + frame_interval(state.speed);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match input.poll_input(remaining)? {
                Some(GameInput::Quit) => {
                    info!("player quit with score {}", state.score);
                    return Ok(());
                }
                Some(other) => state.apply_input(other),
                None => {}
            }
        }
    }
}
