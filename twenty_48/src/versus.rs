use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Board, Direction, MoveStrategy, Result, Rules, Status, TileSpawner};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Turn {
    Player,
    Computer,
}

/// A human and a computer taking turns on the same board, each keeping their
/// own score. There is no undo here.
#[derive(Debug)]
pub struct Versus<S, R = StdRng> {
    board: Board,
    player_score: u32,
    computer_score: u32,
    turn: Turn,
    win_tile: u32,
    spawner: TileSpawner,
    strategy: S,
    rng: R,
}

impl<S: MoveStrategy> Versus<S, StdRng> {
    pub fn new_from_seed(rules: Rules, strategy: S, seed: u64) -> Result<Self> {
        Self::new(rules, strategy, StdRng::seed_from_u64(seed))
    }
}

impl<S: MoveStrategy, R: Rng> Versus<S, R> {
    pub fn new(rules: Rules, strategy: S, mut rng: R) -> Result<Self> {
        let spawner = rules.spawner()?;
        Ok(Self {
            board: Board::initialize(&mut rng, &spawner),
            player_score: 0,
            computer_score: 0,
            turn: Turn::Player,
            win_tile: rules.win_tile,
            spawner,
            strategy,
            rng,
        })
    }

    pub fn from_board(board: Board, rules: Rules, strategy: S, rng: R) -> Result<Self> {
        let mut versus = Self::new(rules, strategy, rng)?;
        versus.board = board;
        Ok(versus)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn computer_score(&self) -> u32 {
        self.computer_score
    }

    pub fn status(&self) -> Status {
        self.board.status(self.win_tile)
    }

    /// The player's move. Returns the points gained, or `None` if it is not
    /// the player's turn or the move changed nothing; the turn only passes on
    /// a real move.
    pub fn player_move(&mut self, direction: Direction) -> Option<u32> {
        if self.turn != Turn::Player {
            return None;
        }
        let gained = self.board.play(direction, &mut self.rng, &self.spawner)?;
        self.player_score += gained;
        self.turn = Turn::Computer;
        debug!("player moved {direction}, gained {gained}");
        Some(gained)
    }

    /// The computer's reply. The turn goes back to the player even when the
    /// computer finds nothing to do.
    pub fn computer_move(&mut self) -> Option<Direction> {
        if self.turn != Turn::Computer {
            return None;
        }
        self.turn = Turn::Player;
        let direction = self.strategy.choose(&self.board)?;
        let gained = self.board.play(direction, &mut self.rng, &self.spawner)?;
        self.computer_score += gained;
        debug!("computer moved {direction}, gained {gained}");
        Some(direction)
    }

    pub fn restart(&mut self) {
        info!(
            "restarting versus, player {} computer {}",
            self.player_score, self.computer_score
        );
        self.board = Board::initialize(&mut self.rng, &self.spawner);
        self.player_score = 0;
        self.computer_score = 0;
        self.turn = Turn::Player;
    }
}
