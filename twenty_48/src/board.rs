use std::fmt::{self, Display};

use log::debug;
use rand::Rng;
use rand_distr::Distribution;
use crate::{Result, Status, Tile};

pub const SIZE: usize = 4;

/// Reaching this tile counts as a win, play carries on afterwards.
pub const WINNING_TILE: u32 = 2048;

pub type Row = [Option<Tile>; SIZE];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Result of sliding a board. The board itself is untouched; callers decide
/// whether to keep `board`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub moved: bool,
    /// Sum of the tiles produced by merges during this move.
    pub gained: u32,
}

impl MoveOutcome {
    fn map_board(self, f: impl FnOnce(&Board) -> Board) -> Self {
        Self {
            board: f(&self.board),
            ..self
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Row; SIZE],
}

/// Pushes every tile to the front of the row, keeping their order.
pub fn compress(row: Row) -> Row {
    let mut out = [None; SIZE];
    for (slot, tile) in out.iter_mut().zip(row.into_iter().flatten()) {
        *slot = Some(tile);
    }
    out
}

/// Merges equal neighbours front to back. A merged tile leaves a hole behind
/// it, so it can never take part in a second merge during the same pass.
/// Two [`Tile::MAX`] tiles stay side by side.
pub fn merge(mut row: Row) -> (Row, u32) {
    let mut gained = 0;
    for i in 0..SIZE - 1 {
        if let (Some(a), Some(b)) = (row[i], row[i + 1]) {
            if let Some(merged) = (a == b).then(|| a.double()).flatten() {
                row[i] = Some(merged);
                row[i + 1] = None;
                gained += merged.value();
            }
        }
    }
    (row, gained)
}

pub fn slide_row_left(row: Row) -> (Row, u32) {
    let (merged, gained) = merge(compress(row));
    (compress(merged), gained)
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fresh board with two random tiles.
    pub fn initialize<R: Rng, D: Distribution<Tile>>(rng: &mut R, dist: &D) -> Self {
        let mut board = Self::empty();
        board.spawn_random_tile(rng, dist);
        board.spawn_random_tile(rng, dist);
        board
    }

    /// Builds a board from plain numbers, 0 meaning an empty cell.
    pub fn from_values(values: [[u32; SIZE]; SIZE]) -> Result<Self> {
        let mut cells = [[None; SIZE]; SIZE];
        for (row, values) in cells.iter_mut().zip(values.iter()) {
            for (cell, &value) in row.iter_mut().zip(values.iter()) {
                if value != 0 {
                    *cell = Some(Tile::from_value(value)?);
                }
            }
        }
        Ok(Self { cells })
    }

    pub fn values(&self) -> [[u32; SIZE]; SIZE] {
        self.cells
            .map(|row| row.map(|cell| cell.map(Tile::value).unwrap_or(0)))
    }

    pub fn rows(&self) -> &[Row; SIZE] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells[row][col]
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_none())
                .map(move |(c, _)| (r, c))
        })
    }

    fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().flatten().flatten().copied()
    }

    pub fn tile_sum(&self) -> u32 {
        self.tiles().map(Tile::value).sum()
    }

    pub fn max_tile(&self) -> u32 {
        self.tiles().map(Tile::value).max().unwrap_or(0)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.tiles().any(|t| t.value() == value)
    }

    pub fn has_won(&self) -> bool {
        self.contains(WINNING_TILE)
    }

    /// Being stuck outranks having reached `win_tile`.
    pub fn status(&self, win_tile: u32) -> Status {
        if !self.can_move() {
            Status::Over
        } else if self.contains(win_tile) {
            Status::Won
        } else {
            Status::Playing
        }
    }

    pub fn transposed(&self) -> Self {
        let mut cells = [[None; SIZE]; SIZE];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                cells[c][r] = *cell;
            }
        }
        Self { cells }
    }

    pub fn mirrored(&self) -> Self {
        let mut cells = self.cells;
        cells.iter_mut().for_each(|row| row.reverse());
        Self { cells }
    }

    fn slide_left(&self) -> MoveOutcome {
        let mut board = *self;
        let mut moved = false;
        let mut gained = 0;
        for row in board.cells.iter_mut() {
            let (slid, row_gain) = slide_row_left(*row);
            moved |= slid != *row;
            gained += row_gain;
            *row = slid;
        }
        MoveOutcome {
            board,
            moved,
            gained,
        }
    }

    /// Every direction is a left slide seen through a mirror and/or a
    /// transpose, both of which undo themselves.
    pub fn slide(&self, direction: Direction) -> MoveOutcome {
        match direction {
            Direction::Left => self.slide_left(),
            Direction::Right => self.mirrored().slide_left().map_board(Board::mirrored),
            Direction::Up => self.transposed().slide_left().map_board(Board::transposed),
            Direction::Down => self
                .transposed()
                .mirrored()
                .slide_left()
                .map_board(|b| b.mirrored().transposed()),
        }
    }

    /// Puts a new tile on a uniformly chosen empty cell and returns where it
    /// went, or `None` when the board is full.
    pub fn spawn_random_tile<R: Rng, D: Distribution<Tile>>(
        &mut self,
        rng: &mut R,
        dist: &D,
    ) -> Option<(usize, usize)> {
        let open = self.empty_cells().count();
        if open == 0 {
            return None;
        }
        let (r, c) = self.empty_cells().nth(rng.random_range(0..open))?;
        let tile = dist.sample(rng);
        debug!("spawned {tile} at ({r}, {c})");
        self.cells[r][c] = Some(tile);
        Some((r, c))
    }

    /// Slides, and when something moved keeps the result and spawns a tile.
    /// Returns the points gained, `None` when the move changed nothing.
    pub fn play<R: Rng, D: Distribution<Tile>>(
        &mut self,
        direction: Direction,
        rng: &mut R,
        dist: &D,
    ) -> Option<u32> {
        let outcome = self.slide(direction);
        if !outcome.moved {
            return None;
        }
        *self = outcome.board;
        self.spawn_random_tile(rng, dist);
        Some(outcome.gained)
    }

    /// False only for a full board without mergeable neighbours.
    pub fn can_move(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let Some(tile) = self.cells[r][c] else {
                    return true;
                };
                let mergeable = |other: Option<Tile>| {
                    other == Some(tile) && tile.double().is_some()
                };
                if c + 1 < SIZE && mergeable(self.cells[r][c + 1]) {
                    return true;
                }
                if r + 1 < SIZE && mergeable(self.cells[r + 1][c]) {
                    return true;
                }
            }
        }
        false
    }

    pub fn valid_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|d| self.slide(*d).moved)
    }

    fn print_row(f: &mut impl fmt::Write, row: &Row) -> fmt::Result {
        for tile in row.iter() {
            match tile {
                Some(tile) => write!(f, "|{: ^6}", tile)?,
                None => write!(f, "|{: ^6}", " ")?,
            }
        }
        Ok(())
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            Board::print_row(f, row)?;
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rand_distr::StandardUniform;
    use test_log::test;

    use super::{compress, merge, slide_row_left, Board, Direction, Row, WINNING_TILE};
    use crate::{Status, Tile};

    fn row(values: [u32; 4]) -> Row {
        values.map(|v| (v != 0).then(|| Tile::from_value(v).unwrap()))
    }

    fn board(values: [[u32; 4]; 4]) -> Board {
        Board::from_values(values).unwrap()
    }

    // | 128 | 64  | 32  |  8  |
    // |  8  |  4  |  8  |  4  |
    // |     |     |     |     |
    // |     |     |     |     |
    #[test]
    fn packed_rows_cannot_slide_right() {
        let b = board([[128, 64, 32, 8], [8, 4, 8, 4], [0; 4], [0; 4]]);
        assert!(!b.slide(Direction::Right).moved);
        assert!(!b.slide(Direction::Up).moved);
        assert!(b.slide(Direction::Down).moved);
    }

    #[test]
    fn compress_keeps_order_and_is_idempotent() {
        let once = compress(row([0, 2, 0, 4]));
        assert_eq!(once, row([2, 4, 0, 0]));
        assert_eq!(compress(once), once);
    }

    #[test]
    fn merge_does_not_cascade() {
        assert_eq!(merge(row([2, 2, 2, 0])), (row([4, 0, 2, 0]), 4));
        assert_eq!(merge(row([4, 4, 8, 0])), (row([8, 0, 8, 0]), 8));
        assert_eq!(slide_row_left(row([2, 2, 2, 2])), (row([4, 4, 0, 0]), 8));
        assert_eq!(slide_row_left(row([2, 2, 2, 0])), (row([4, 2, 0, 0]), 4));
    }

    #[test]
    fn adjacent_pair_slides_left() {
        let out = board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).slide(Direction::Left);
        assert_eq!(out.board.values(), [[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(out.moved);
        assert_eq!(out.gained, 4);
    }

    #[test]
    fn gap_closes_before_merging() {
        let out = board([[2, 0, 2, 0], [0; 4], [0; 4], [0; 4]]).slide(Direction::Left);
        assert_eq!(out.board.values(), [[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(out.gained, 4);
    }

    #[test]
    fn each_direction_lands_on_its_edge() {
        let b = board([[2, 0, 0, 2], [0; 4], [0; 4], [2, 0, 0, 4]]);

        let right = b.slide(Direction::Right);
        assert_eq!(right.board.values(), [[0, 0, 0, 4], [0; 4], [0; 4], [0, 0, 2, 4]]);
        assert_eq!(right.gained, 4);

        let up = b.slide(Direction::Up);
        assert_eq!(up.board.values(), [[4, 0, 0, 2], [0, 0, 0, 4], [0; 4], [0; 4]]);
        assert_eq!(up.gained, 4);

        let down = b.slide(Direction::Down);
        assert_eq!(down.board.values(), [[0; 4], [0; 4], [0, 0, 0, 2], [4, 0, 0, 4]]);
        assert_eq!(down.gained, 4);
    }

    #[test]
    fn down_merges_from_the_bottom() {
        let b = board([[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0; 4]]);
        let down = b.slide(Direction::Down);
        assert_eq!(down.board.values(), [[0; 4], [0; 4], [2, 0, 0, 0], [4, 0, 0, 0]]);
    }

    fn random_board(rng: &mut StdRng) -> Board {
        let mut b = Board::empty();
        for _ in 0..rng.random_range(1..17) {
            b.spawn_random_tile(rng, &StandardUniform);
        }
        b
    }

    #[test]
    fn slide_without_merges_settles_at_once() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let b = random_board(&mut rng);
            for d in Direction::ALL {
                let once = b.slide(d);
                if once.gained == 0 {
                    let twice = once.board.slide(d);
                    assert!(!twice.moved, "{d} moved twice on\n{b}");
                    assert_eq!(twice.board, once.board);
                }
            }
        }
    }

    #[test]
    fn repeated_slides_settle_within_three_steps() {
        // one merge per pair per pass: 2 2 2 2 -> 4 4 -> 8
        let column = board([[2, 0, 0, 0]; 4]);
        let once = column.slide(Direction::Up);
        assert_eq!(once.board.values(), [[4, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0; 4]]);
        let twice = once.board.slide(Direction::Up);
        assert!(twice.moved);
        assert_eq!(twice.board.values(), [[8, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            let start = random_board(&mut rng);
            for d in Direction::ALL {
                let mut b = start;
                let mut steps = 0;
                while b.slide(d).moved {
                    b = b.slide(d).board;
                    steps += 1;
                }
                assert!(steps <= 3, "{d} took {steps} slides on\n{start}");
            }
        }
    }

    #[test]
    fn slides_keep_the_tile_sum() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let b = random_board(&mut rng);
            for d in Direction::ALL {
                let out = b.slide(d);
                assert_eq!(out.board.tile_sum(), b.tile_sum());
            }
        }
    }

    #[test]
    fn gained_is_the_sum_of_merged_tiles() {
        let b = board([[2, 2, 4, 4], [8, 8, 8, 0], [2, 4, 8, 16], [0, 0, 32, 32]]);
        let out = b.slide(Direction::Left);
        assert_eq!(
            out.board.values(),
            [[4, 8, 0, 0], [16, 8, 0, 0], [2, 4, 8, 16], [64, 0, 0, 0]]
        );
        assert_eq!(out.gained, 4 + 8 + 16 + 64);
    }

    #[test]
    fn largest_tiles_never_merge() {
        let top = Tile::MAX.value();
        let b = board([[top, top, 0, 0], [top, top, 0, 0], [0; 4], [0; 4]]);
        let left = b.slide(Direction::Left);
        assert!(!left.moved);
        assert_eq!(left.gained, 0);
        let down = b.slide(Direction::Down);
        assert_eq!(down.gained, 0);
        assert_eq!(down.board.values()[3], [top, top, 0, 0]);

        let full = board([[top; 4]; 4]);
        assert_eq!(full.tile_sum(), 16 * top);
        assert!(!full.can_move());
        assert_eq!(full.status(WINNING_TILE), Status::Over);
        assert!(Board::from_values([[1 << 30, 1 << 30, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    }

    #[test]
    fn checkerboard_is_stuck() {
        let b = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!b.can_move());
        assert_eq!(b.valid_moves().count(), 0);
    }

    #[test]
    fn full_board_with_a_pair_can_move() {
        let b = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]);
        assert!(b.can_move());
        let col_pair = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 8, 16, 32]]);
        assert!(col_pair.can_move());
        assert!(board([[0; 4]; 4]).can_move());
    }

    #[test]
    fn spawning_fills_exactly_one_empty_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut b = board([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        for expected_empty in (0..14).rev() {
            let before = b;
            let (r, c) = b.spawn_random_tile(&mut rng, &StandardUniform).unwrap();
            assert!(before.get(r, c).is_none());
            assert_eq!(b.empty_cells().count(), expected_empty);
            assert_eq!(b.get(0, 0), before.get(0, 0));
            assert_eq!(b.get(0, 1), before.get(0, 1));
        }
        let full = b;
        assert_eq!(b.spawn_random_tile(&mut rng, &StandardUniform), None);
        assert_eq!(b, full);
    }

    #[test]
    fn initialize_places_two_small_tiles() {
        let mut rng = StdRng::seed_from_u64(99);
        let b = Board::initialize(&mut rng, &StandardUniform);
        assert_eq!(b.empty_cells().count(), 14);
        assert!(b.values().iter().flatten().all(|v| [0, 2, 4].contains(v)));
    }

    #[test]
    fn play_only_spawns_after_a_real_move() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = board([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(b.play(Direction::Left, &mut rng, &StandardUniform), None);
        assert_eq!(b.empty_cells().count(), 15);
        assert_eq!(b.play(Direction::Right, &mut rng, &StandardUniform), Some(0));
        assert_eq!(b.empty_cells().count(), 14);
    }

    #[test]
    fn stuck_outranks_won() {
        let stuck = board([[2048, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(stuck.status(2048), Status::Over);
        let won = board([[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(won.status(2048), Status::Won);
        assert_eq!(won.status(4096), Status::Playing);
    }

    #[test]
    fn win_needs_the_2048_tile() {
        assert!(!board([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]).has_won());
        assert!(board([[0; 4], [0; 4], [0, 0, 2048, 0], [0; 4]]).has_won());
    }

    #[test]
    fn display_leaves_empty_cells_blank() {
        let b = board([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]);
        let text = b.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "|  2   |      |      |      |");
        assert_eq!(lines[3], "|      |      |      | 2048 |");
    }
}
