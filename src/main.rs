mod config;
mod error;
mod game;
mod geometry;
mod placement;
mod snake;
mod term;
mod toggle;

use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::{GameConfig, DEFAULT_MAX_ATTEMPTS};
use crate::game::{EndReason, Outcome, SnakeGame, ThreadSleep};
use crate::placement::Budget;
use crate::term::TermManager;

/// Snake in the terminal, with obstacles. Arrows steer, space pauses,
/// s cycles the speed and q quits.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Play on an open field without barriers.
    #[arg(long)]
    no_barrier: bool,
    /// Fewest barrier lines to place.
    #[arg(long, value_name = "COUNT", default_value_t = 3)]
    barrier_min: usize,
    /// Most barrier lines to place.
    #[arg(long, value_name = "COUNT", default_value_t = 5)]
    barrier_max: usize,
    /// Shortest barrier line. Defaults to a quarter of the shorter screen side.
    #[arg(long, value_name = "CELLS", requires = "barrier_len_max")]
    barrier_len_min: Option<usize>,
    /// Longest barrier line. Defaults to half of the shorter screen side.
    #[arg(long, value_name = "CELLS", requires = "barrier_len_min")]
    barrier_len_max: Option<usize>,
    /// Cells kept free of barriers along the screen edges.
    #[arg(long, value_name = "CELLS", default_value_t = 1, allow_negative_numbers = true)]
    margin: i32,
    /// Fewest apples on the field after a refill.
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    apples_min: usize,
    /// Most apples on the field after a refill.
    #[arg(long, value_name = "COUNT", default_value_t = 3)]
    apples_max: usize,
    /// Starting length of the snake.
    #[arg(long, value_name = "SEGMENTS", default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    body_len: u16,
    /// Starting tick in milliseconds; only the presets 60, 50, 40 and 30 are used.
    #[arg(long, value_name = "MILLISECONDS")]
    speed: Option<u64>,
    /// Seed for barrier and apple placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Give up placing barriers or apples after this many samples (0 never gives up).
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u64,
    /// Write a log to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl CliArgs {
    fn game_config(&self) -> GameConfig {
        let barrier_len = match (self.barrier_len_min, self.barrier_len_max) {
            (Some(min), Some(max)) => Some(min..=max),
            _ => None,
        };

        GameConfig {
            use_barrier: !self.no_barrier,
            barrier_count: self.barrier_min..=self.barrier_max,
            barrier_len,
            barrier_margin: self.margin,
            apples: self.apples_min..=self.apples_max,
            body_len: self.body_len as usize,
            seed: self.seed,
            budget: match self.max_attempts {
                0 => Budget::Unbounded,
                n => Budget::Attempts(n),
            },
            initial_speed: self.speed.map(Duration::from_millis),
        }
    }
}

fn run(term: &mut TermManager, config: &GameConfig) -> error::Result<Outcome> {
    let mut game = SnakeGame::new(term, ThreadSleep, config)?;
    game.play()
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // The terminal is in raw mode while playing, so logs only go to a file.
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, Config::default(), file)
            .context("logger already initialized")?;
    }

    let config = args.game_config();
    config.validate()?;

    let mut term = TermManager::new().context("cannot read terminal size")?;
    let result = term.setup().and_then(|()| run(&mut term, &config));
    let restored = term.restore();

    let outcome = result?;
    restored.context("cannot restore terminal")?;
    info!("exiting: {:?}", outcome);

    match (outcome.reason, outcome.crashed) {
        (EndReason::Resized, _) => println!("Terminal resized, game ended. Score: {}", outcome.score),
        (_, true) => println!("Game over! Score: {}", outcome.score),
        (_, false) => println!("Score: {}", outcome.score),
    }

    Ok(())
}
