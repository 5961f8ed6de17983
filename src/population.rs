//! # Population
//!
//! A capacity-bounded collection of chromosomes for one generation. Members are
//! kept in fitness order, so the fittest member is always at the front.

use std::collections::HashSet;
use std::fmt;

use crate::chromosome::Chromosome;
use crate::city::City;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Number of distinct tours for 1 to 9 cities. Larger city counts are not checked.
const TOUR_COUNTS: [usize; 9] = [1, 2, 6, 24, 120, 720, 5_040, 40_320, 362_880];

/// Checks whether `population_size` distinct tours can exist over `cities` cities.
///
/// Only city counts from 1 to 9 are checked; every larger count passes.
///
/// # Errors
///
/// Returns `GeneticError::UniquenessInfeasible` when the bound is exceeded.
pub fn check_uniqueness_feasible(cities: usize, population_size: usize) -> Result<()> {
    match cities.checked_sub(1).and_then(|i| TOUR_COUNTS.get(i)) {
        Some(&limit) if population_size > limit => Err(GeneticError::UniquenessInfeasible {
            cities,
            population_size,
        }),
        _ => Ok(()),
    }
}

/// A bounded, fitness-ordered collection of chromosomes.
#[derive(Debug, Clone)]
pub struct Population {
    // Ascending distance; ties keep insertion order.
    chromosomes: Vec<Chromosome>,
    capacity: usize,
}

impl Population {
    /// Creates an empty population that can hold up to `capacity` chromosomes.
    pub fn new(capacity: usize) -> Self {
        Self {
            chromosomes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates `size` chromosomes over `num_cities` randomly generated cities.
    ///
    /// Duplicate tours are allowed.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyTour` if `num_cities` is zero.
    pub fn random(num_cities: usize, size: usize, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let cities: Vec<City> = (0..num_cities).map(|_| City::random(rng)).collect();
        let mut population = Self::new(size);
        for _ in 0..size {
            population.add(Chromosome::shuffled(&cities, rng)?)?;
        }
        Ok(population)
    }

    /// Creates a population of `size` distinct shuffled tours over `cities`.
    pub fn from_cities(cities: &[City], size: usize, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let mut population = Self::new(size);
        population.populate(cities, rng)?;
        Ok(population)
    }

    /// Adds a chromosome, keeping the fitness order.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::PopulationOverflow` if the population is full.
    pub fn add(&mut self, chromosome: Chromosome) -> Result<()> {
        if self.is_full() {
            return Err(GeneticError::PopulationOverflow {
                capacity: self.capacity,
            });
        }
        let distance = chromosome.distance();
        let index = self
            .chromosomes
            .partition_point(|member| member.distance() <= distance);
        self.chromosomes.insert(index, chromosome);
        Ok(())
    }

    /// Fills the population with distinct shuffled tours over `cities`.
    ///
    /// Shuffled tours equal to one already generated by this call are discarded
    /// until the population is full.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is already full, if `cities` is empty, or
    /// if there are fewer distinct tours than the capacity (checked for 1 to 9 cities).
    pub fn populate(&mut self, cities: &[City], rng: &mut RandomNumberGenerator) -> Result<()> {
        if self.is_full() {
            return Err(GeneticError::PopulationOverflow {
                capacity: self.capacity,
            });
        }
        if cities.is_empty() {
            return Err(GeneticError::EmptyTour);
        }
        check_uniqueness_feasible(cities.len(), self.capacity)?;

        let mut seen = HashSet::with_capacity(self.capacity);
        while !self.is_full() {
            let chromosome = Chromosome::shuffled(cities, rng)?;
            if seen.insert(chromosome.clone()) {
                self.add(chromosome)?;
            }
        }
        Ok(())
    }

    /// Removes all chromosomes. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.chromosomes.clear();
    }

    /// The chromosome with the shortest tour.
    pub fn most_fit(&self) -> Option<&Chromosome> {
        self.chromosomes.first()
    }

    /// Mean distance of all members, truncated to an integer.
    pub fn average_distance(&self) -> Option<u64> {
        if self.chromosomes.is_empty() {
            return None;
        }
        let total: u64 = self.chromosomes.iter().map(Chromosome::distance).sum();
        Some(total / self.chromosomes.len() as u64)
    }

    /// The city sequence of the fittest member.
    pub fn cities(&self) -> Option<&[City]> {
        self.most_fit().map(Chromosome::cities)
    }

    /// All members, fittest first.
    pub fn members(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome> {
        self.chromosomes.iter()
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.chromosomes.len() >= self.capacity
    }

    /// An independent population with the same capacity and copies of all members.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Chromosome;
    type IntoIter = std::slice::Iter<'a, Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Population:")?;
        for chromosome in &self.chromosomes {
            write!(f, "\n{} Value: {}", chromosome, chromosome.distance())?;
        }
        Ok(())
    }
}
