use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use crate::{Board, Command, Direction, Game, Outcome, Status};

/// Something that picks the next move for a board. `None` means it has no
/// move to offer, usually because the board is stuck.
pub trait MoveStrategy {
    fn choose(&mut self, board: &Board) -> Option<Direction>;
}

impl<S: MoveStrategy + ?Sized> MoveStrategy for Box<S> {
    fn choose(&mut self, board: &Board) -> Option<Direction> {
        (**self).choose(board)
    }
}

/// Uniformly random among the directions that change the board.
#[derive(Clone, Debug)]
pub struct RandomMoves<R> {
    rng: R,
}

impl<R: Rng> RandomMoves<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MoveStrategy for RandomMoves<R> {
    fn choose(&mut self, board: &Board) -> Option<Direction> {
        let moves: Vec<Direction> = board.valid_moves().collect();
        if moves.is_empty() {
            None
        } else {
            Some(moves[self.rng.random_range(0..moves.len())])
        }
    }
}

/// Replays a fixed list of directions, skipping any that would not move.
#[derive(Clone, Debug, Default)]
pub struct Scripted {
    moves: VecDeque<Direction>,
}

impl Scripted {
    pub fn new(moves: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveStrategy for Scripted {
    fn choose(&mut self, board: &Board) -> Option<Direction> {
        while let Some(d) = self.moves.pop_front() {
            if board.slide(d).moved {
                return Some(d);
            }
        }
        None
    }
}

/// Always the first direction in a fixed order that moves the board.
#[derive(Clone, Debug)]
pub struct Priority {
    order: [Direction; 4],
}

impl Priority {
    pub fn new(order: [Direction; 4]) -> Self {
        Self { order }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::new([
            Direction::Up,
            Direction::Right,
            Direction::Left,
            Direction::Down,
        ])
    }
}

impl MoveStrategy for Priority {
    fn choose(&mut self, board: &Board) -> Option<Direction> {
        self.order.into_iter().find(|d| board.slide(*d).moved)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlayOut {
    pub moves: usize,
    pub score: u32,
    pub max_tile: u32,
}

/// Lets `strategy` play `game` until it runs out of moves, the board is
/// stuck, or `max_moves` is reached.
pub fn play_out<R: Rng, S: MoveStrategy + ?Sized>(
    game: &mut Game<R>,
    strategy: &mut S,
    max_moves: Option<usize>,
) -> PlayOut {
    let mut moves = 0;
    while game.status() != Status::Over && max_moves.map_or(true, |max| moves < max) {
        let Some(direction) = strategy.choose(game.board()) else {
            break;
        };
        match game.apply(Command::Move(direction)) {
            Outcome::Moved { .. } => moves += 1,
            _ => break,
        }
    }
    debug!("played {moves} moves, final score {}", game.score());
    PlayOut {
        moves,
        score: game.score(),
        max_tile: game.board().max_tile(),
    }
}
