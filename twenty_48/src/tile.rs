use std::{fmt, num::NonZeroU32};

use rand::Rng;
use rand_distr::{Bernoulli, Distribution, StandardUniform};

use crate::{Error, Result};

/// Odds of a freshly spawned tile being a 4 rather than a 2.
pub const FOUR_PROBABILITY: f64 = 0.1;

/// 131072, the largest tile a 4x4 board can build. Capping here keeps every
/// board sum and per-move gain well inside `u32`.
pub const MAX_EXPONENT: u32 = 17;

// which power of two. NonZero because two is the lowest
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(NonZeroU32);

impl Tile {
    pub const TWO: Tile = Tile(NonZeroU32::MIN);
    pub const FOUR: Tile = Tile(NonZeroU32::MIN.saturating_add(1));
    pub const MAX: Tile = Tile(NonZeroU32::MIN.saturating_add(MAX_EXPONENT - 1));

    /// The tile two of these merge into, `None` at [`Tile::MAX`].
    pub fn double(self) -> Option<Tile> {
        (self < Tile::MAX).then(|| Tile(self.0.saturating_add(1)))
    }

    pub fn from_value(value: u32) -> Result<Tile> {
        if value < 2 || !value.is_power_of_two() || value.trailing_zeros() > MAX_EXPONENT {
            return Err(Error::InvalidTile(value));
        }
        NonZeroU32::new(value.trailing_zeros())
            .map(Tile)
            .ok_or(Error::InvalidTile(value))
    }

    pub fn value(self) -> u32 {
        2_u32.pow(self.0.get())
    }

    pub fn exponent(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // forward so width/alignment flags apply to the number
        fmt::Display::fmt(&self.value(), f)
    }
}

/// The classic spawn odds: 2 nine times out of ten, otherwise 4.
impl Distribution<Tile> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tile {
        if rng.random_bool(1.0 - FOUR_PROBABILITY) {
            Tile::TWO
        } else {
            Tile::FOUR
        }
    }
}

/// Spawns a 2 or a 4 with a configurable chance of the 4.
#[derive(Copy, Clone, Debug)]
pub struct TileSpawner {
    four: Bernoulli,
}

impl TileSpawner {
    pub fn new(four_probability: f64) -> Result<Self> {
        Ok(Self {
            four: Bernoulli::new(four_probability)?,
        })
    }
}

impl Distribution<Tile> for TileSpawner {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tile {
        if self.four.sample(rng) {
            Tile::FOUR
        } else {
            Tile::TWO
        }
    }
}
