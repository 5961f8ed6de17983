//! # Chromosome
//!
//! A `Chromosome` is one candidate tour: an ordered sequence of cities that visits
//! every city of the problem exactly once and returns to the start.
//!
//! Chromosomes are never modified after construction. Every operator builds a new
//! chromosome instead, which is what makes the lazily cached distance safe.
//!
//! ## Example
//!
//! ```rust
//! use genalg_tsp::{chromosome::Chromosome, city::City};
//!
//! let tour = Chromosome::new(vec![
//!     City::new("A", 0, 0),
//!     City::new("B", 10, 0),
//!     City::new("C", 10, 10),
//!     City::new("D", 0, 10),
//! ]).unwrap();
//!
//! assert_eq!(tour.distance(), 40);
//! ```

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::city::City;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Total length of the closed tour through `cities`, truncated to an integer.
///
/// The edge from the last city back to the first is included. An empty slice
/// has length zero.
///
/// Rotating or reversing the tour changes the summation order, so the result is
/// invariant only up to `f64` rounding before truncation and can differ by one.
pub fn tour_distance(cities: &[City]) -> u64 {
    let (Some(first), Some(last)) = (cities.first(), cities.last()) else {
        return 0;
    };
    let open: f64 = cities.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    (open + last.distance_to(first)) as u64
}

/// A candidate tour with a cached total distance.
///
/// Equality and hashing are defined over the exact ordered sequence, so a rotation
/// or a reversal of a tour is a different chromosome with (up to rounding) the same
/// distance.
#[derive(Debug, Clone)]
pub struct Chromosome {
    cities: Vec<City>,
    distance: OnceCell<u64>,
}

impl Chromosome {
    /// Creates a chromosome visiting the cities in the given order.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyTour` if `cities` is empty.
    pub fn new(cities: Vec<City>) -> Result<Self> {
        if cities.is_empty() {
            return Err(GeneticError::EmptyTour);
        }
        Ok(Self::from_tour(cities))
    }

    /// Creates a chromosome from a copy of `cities` in shuffled order.
    ///
    /// For each index `i` the city at `i` is swapped with a city at an index drawn
    /// from the whole range. This is not a perfectly uniform shuffle.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyTour` if `cities` is empty.
    pub fn shuffled(cities: &[City], rng: &mut RandomNumberGenerator) -> Result<Self> {
        if cities.is_empty() {
            return Err(GeneticError::EmptyTour);
        }
        let mut tour = cities.to_vec();
        let n = tour.len();
        for i in 0..n {
            let j = rng.next_index(n);
            tour.swap(i, j);
        }
        Ok(Self::from_tour(tour))
    }

    /// Operators derive tours from non-empty parents, so they skip the check.
    pub(crate) fn from_tour(cities: Vec<City>) -> Self {
        debug_assert!(!cities.is_empty());
        Self {
            cities,
            distance: OnceCell::new(),
        }
    }

    /// The cities in visiting order.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn into_cities(self) -> Vec<City> {
        self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Total closed-tour distance, computed on first access.
    pub fn distance(&self) -> u64 {
        *self.distance.get_or_init(|| tour_distance(&self.cities))
    }

    /// Orders chromosomes by ascending distance, fittest first.
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        self.distance().cmp(&other.distance())
    }
}

impl PartialEq for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        self.cities == other.cities
    }
}

impl Eq for Chromosome {}

impl Hash for Chromosome {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cities.hash(state);
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for city in &self.cities {
            write!(f, "{} ", city.name())?;
        }
        write!(f, "]")
    }
}
