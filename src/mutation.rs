//! # Mutation
//!
//! Three single-parent operators. Each one returns a new chromosome and leaves
//! its input untouched.

use std::fmt;

use crate::chromosome::Chromosome;
use crate::rng::RandomNumberGenerator;

/// The mutation operator used by the engine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MutationType {
    #[default]
    Insertion,
    ReciprocalExchange,
    Scramble,
}

impl MutationType {
    /// Applies this mutation to a chromosome.
    pub fn apply(self, chromosome: &Chromosome, rng: &mut RandomNumberGenerator) -> Chromosome {
        match self {
            MutationType::Insertion => insertion(chromosome, rng),
            MutationType::ReciprocalExchange => reciprocal_exchange(chromosome, rng),
            MutationType::Scramble => scramble(chromosome, rng),
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationType::Insertion => "INSERTION",
            MutationType::ReciprocalExchange => "RECIPROCAL_EXCHANGE",
            MutationType::Scramble => "SCRAMBLE",
        };
        f.write_str(name)
    }
}

/// Moves the city at a random source index to a random destination index.
///
/// Cities between the two positions shift by one to close the gap.
pub fn insertion(chromosome: &Chromosome, rng: &mut RandomNumberGenerator) -> Chromosome {
    let n = chromosome.len();
    let source = rng.next_index(n);
    let destination = rng.next_index(n);
    insertion_at(chromosome, source, destination)
}

/// Insertion with fixed indices.
///
/// # Panics
///
/// Panics if either index is out of bounds.
pub fn insertion_at(chromosome: &Chromosome, source: usize, destination: usize) -> Chromosome {
    let mut cities = chromosome.cities().to_vec();
    if source < destination {
        cities[source..=destination].rotate_left(1);
    } else if source > destination {
        cities[destination..=source].rotate_right(1);
    }
    Chromosome::from_tour(cities)
}

/// Swaps the cities at two random indices.
pub fn reciprocal_exchange(chromosome: &Chromosome, rng: &mut RandomNumberGenerator) -> Chromosome {
    let n = chromosome.len();
    let i = rng.next_index(n);
    let j = rng.next_index(n);
    let mut cities = chromosome.cities().to_vec();
    cities.swap(i, j);
    Chromosome::from_tour(cities)
}

/// Shuffles the circular segment from a random start up to a random end.
///
/// The segment wraps around the end of the tour. Walking from `start`, each
/// position is swapped with a position drawn from the part of the segment that
/// lies ahead of it, until `end` is reached. When `start == end` nothing moves.
pub fn scramble(chromosome: &Chromosome, rng: &mut RandomNumberGenerator) -> Chromosome {
    let mut cities = chromosome.cities().to_vec();
    let n = cities.len();
    let start = rng.next_index(n);
    let end = rng.next_index(n);

    let mut current = start;
    while current != end {
        let remaining = (end + n - current) % n;
        let offset = rng.next_index(remaining);
        cities.swap(current, (current + offset) % n);
        current = (current + 1) % n;
    }

    Chromosome::from_tour(cities)
}
