mod app;
mod auto;
mod config;
mod keymap;
mod render;

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{LevelFilter, WriteLogger};
use twenty_48::{Game, RandomMoves, Versus};

use crate::{auto::AutoStrategy, config::Config, keymap::KeyMap, keymap::KeyScheme};

#[derive(Parser, Debug)]
#[command(name = "twenty48", version, about = "Play 2048 in the terminal")]
struct Args {
    /// TOML file with key scheme, bindings and rules
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keys that move the tiles, overrides the config file
    #[arg(long, value_enum)]
    scheme: Option<KeyScheme>,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write a debug log to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play on your own (the default)
    Play,
    /// Take turns with a computer that plays random moves
    Versus,
    /// Let a strategy play without a terminal UI
    Auto {
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long, value_enum, default_value_t = AutoStrategy::Random)]
        strategy: AutoStrategy,
        /// Stop each game after this many moves
        #[arg(long)]
        max_moves: Option<usize>,
    },
}

// stdout belongs to the game screen, so the log only ever goes to a file
fn setup_logging(path: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = path {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        WriteLogger::init(
            LevelFilter::Debug,
            simplelog::ConfigBuilder::new()
                .set_target_level(LevelFilter::Error)
                .build(),
            file,
        )?;
    }
    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.log.as_deref())?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(scheme) = args.scheme {
        config.scheme = scheme;
    }
    info!("starting with {config:?}");

    match args.mode.unwrap_or(Mode::Play) {
        Mode::Play => {
            let keymap = KeyMap::new(config.scheme, config.rules.undo.is_enabled())
                .with_bindings(&config.bindings)?;
            let game = Game::new(config.rules, rng(args.seed))?;
            app::play_solo(game, &keymap)
        }
        Mode::Versus => {
            let keymap = KeyMap::new(config.scheme, false).with_bindings(&config.bindings)?;
            let computer = RandomMoves::new(rng(args.seed.map(|s| !s)));
            let versus = Versus::new(config.rules, computer, rng(args.seed))?;
            app::play_versus(versus, &keymap, config.computer_delay())
        }
        Mode::Auto {
            games,
            strategy,
            max_moves,
        } => auto::run(config.rules, strategy, games, args.seed, max_moves),
    }
}
