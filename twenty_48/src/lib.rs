//! The 2048 board engine: sliding and merging tiles on a 4x4 grid, plus the
//! session types built on top of it.

pub mod board;
pub mod error;
pub mod game;
pub mod history;
pub mod strategy;
pub mod tile;
pub mod versus;

pub use board::{Board, Direction, MoveOutcome, Row, SIZE, WINNING_TILE};
pub use error::{Error, Result};
pub use game::{Command, Game, Outcome, Rules, Status};
pub use history::{History, Snapshot, UndoPolicy};
pub use strategy::{play_out, MoveStrategy, PlayOut, Priority, RandomMoves, Scripted};
pub use tile::{Tile, TileSpawner, FOUR_PROBABILITY, MAX_EXPONENT};
pub use versus::{Turn, Versus};
