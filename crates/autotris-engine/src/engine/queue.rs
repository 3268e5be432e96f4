use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Upcoming-piece generator using the 7-bag system.
///
/// A bag holding one of each of the seven kinds is shuffled and drawn in
/// order; a fresh shuffled bag is appended whenever seven or fewer pieces
/// remain. This bounds how long any kind can be absent while keeping the
/// sequence random. Generation is fully determined by the [`PieceSeed`].
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Creates a queue with a specific seed for reproducible sequences.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.refill();
        this
    }

    /// Tops the bag up so at least eight pieces are queued.
    fn refill(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut bag = PieceKind::ALL;
            bag.shuffle(&mut self.rng);
            self.bag.extend(bag);
        }
    }

    /// Draws the next piece kind.
    pub fn pop_next(&mut self) -> PieceKind {
        self.refill();
        self.bag.pop_front().expect("bag is refilled before drawing")
    }

    /// Iterates over the upcoming kinds without drawing them.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// 128-bit seed for the piece generator.
///
/// Serializes as a 32-character hex string, and parses from the same format
/// (the CLI `--seed` flag), so any session can be reproduced exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("seed must be 32 hex characters")]
pub struct ParseSeedError;

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("{e}: '{s}'")))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
