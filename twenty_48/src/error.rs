use rand_distr::BernoulliError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not a valid tile value, tiles are powers of two starting at 2")]
    InvalidTile(u32),
    #[error("probability of spawning a 4 must be within [0, 1]")]
    SpawnProbability(#[from] BernoulliError),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
