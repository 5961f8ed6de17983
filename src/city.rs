//! # City
//!
//! An immutable named point on the integer plane. Cities are the genes of every
//! chromosome, so they are cheap to clone: the name is shared behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use crate::rng::RandomNumberGenerator;

/// Upper bound (exclusive) for the coordinates of randomly generated cities.
pub const RANDOM_COORDINATE_BOUND: usize = 500;

/// A city of the Traveling Salesman Problem.
///
/// Equality and hashing cover the name and both coordinates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct City {
    name: Arc<str>,
    x: i32,
    y: i32,
}

impl City {
    /// Creates a new city.
    pub fn new(name: impl Into<Arc<str>>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Euclidean distance between two cities.
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Creates a city with a random name of 3 to 7 uppercase letters and
    /// coordinates in `[0, 500)`.
    ///
    /// Draw order: name length, each letter, x, y.
    pub fn random(rng: &mut RandomNumberGenerator) -> Self {
        let len = rng.next_index(5) + 3;
        let name: String = (0..len)
            .map(|_| char::from(b'A' + rng.next_index(26) as u8))
            .collect();
        let x = rng.next_index(RANDOM_COORDINATE_BOUND) as i32;
        let y = rng.next_index(RANDOM_COORDINATE_BOUND) as i32;
        Self::new(name, x, y)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.x, self.y)
    }
}
