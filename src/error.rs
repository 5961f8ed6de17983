//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Errors fall into two groups: caller mistakes (bad configuration, calling
//! result accessors too early) and internal invariant violations that a correct
//! operator implementation never produces.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genalg_tsp::error::{GeneticError, Result};
//!
//! fn check_rate(rate: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&rate) {
//!         return Err(GeneticError::Configuration(format!("bad rate {}", rate)));
//!     }
//!     Ok(rate)
//! }
//!
//! assert!(check_rate(0.5).is_ok());
//! assert!(check_rate(1.5).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genalg_tsp::error::{GeneticError, OptionExt};
//!
//! fn shortest(distances: &[u64]) -> genalg_tsp::error::Result<u64> {
//!     distances.iter().min().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running the engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a tour without any cities is constructed.
    #[error("Empty tour error: A chromosome needs at least one city")]
    EmptyTour,

    /// Error that occurs when a chromosome is added to a full population.
    #[error("Population overflow: capacity of {capacity} already reached")]
    PopulationOverflow { capacity: usize },

    /// Error that occurs when unique members are requested but not enough
    /// distinct tours exist.
    #[error(
        "Cannot force uniqueness: {population_size} members requested but only {cities}! distinct tours exist"
    )]
    UniquenessInfeasible {
        cities: usize,
        population_size: usize,
    },

    /// Error that occurs when run results are read before a run has finished.
    #[error("Genetic algorithm was never run")]
    NotFinished,

    /// Error that occurs when an internal consistency check fails.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error that occurs when a coordinate dataset cannot be parsed.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
