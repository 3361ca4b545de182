use clap::ValueEnum;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use twenty_48::{play_out, Game, MoveStrategy, Priority, RandomMoves, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AutoStrategy {
    /// Random moving direction each turn
    Random,
    /// Up, right, left, down: first one that moves
    Priority,
}

impl AutoStrategy {
    fn build(self, seed: Option<u64>) -> Box<dyn MoveStrategy> {
        match self {
            AutoStrategy::Random => Box::new(RandomMoves::new(
                seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64),
            )),
            AutoStrategy::Priority => Box::new(Priority::default()),
        }
    }
}

/// Geometric mean of the best tiles reached.
pub fn geometric_mean(max_tiles: &[u32]) -> f64 {
    if max_tiles.is_empty() {
        return 0.0;
    }
    let log_sum: f64 = max_tiles.iter().map(|t| f64::from(*t).log2()).sum();
    2.0_f64.powf(log_sum / max_tiles.len() as f64)
}

pub fn run(
    rules: Rules,
    strategy: AutoStrategy,
    games: u32,
    seed: Option<u64>,
    max_moves: Option<usize>,
) -> anyhow::Result<()> {
    let mut max_tiles = Vec::new();
    for i in 0..games {
        let game_seed = seed.map(|s| s.wrapping_add(u64::from(i)));
        let mut game = match game_seed {
            Some(s) => Game::new_from_seed(rules, s)?,
            None => Game::new_from_entropy(rules)?,
        };
        let mut player = strategy.build(game_seed.map(|s| !s));
        let result = play_out(&mut game, &mut player, max_moves);
        info!("game {i}: {result:?}");

        print!("{}", game.board());
        println!(
            "game {}: score {}, max tile {}, {} moves\n",
            i + 1,
            result.score,
            result.max_tile,
            result.moves
        );
        max_tiles.push(result.max_tile);
    }
    println!(
        "geometric mean of max tiles over {games} games: {:.1}",
        geometric_mean(&max_tiles)
    );
    Ok(())
}
