//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the tunable parameters of a run: how many
//! generations to evolve, how selection works, how many elites survive, the
//! operator probabilities and which crossover and mutation operators to use.
//!
//! ## Example
//!
//! ```rust
//! use genalg_tsp::crossover::CrossoverType;
//! use genalg_tsp::evolution::options::EvolutionOptions;
//! use genalg_tsp::mutation::MutationType;
//!
//! let options = EvolutionOptions::builder()
//!     .max_generations(200)
//!     .tournament_size(4)
//!     .crossover_rate(0.9)
//!     .mutation_rate(0.02)
//!     .crossover_type(CrossoverType::TwoPoint)
//!     .mutation_type(MutationType::Scramble)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(options.get_elitism(), 1);
//! ```
//!
//! ## Valid ranges
//!
//! - `crossover_rate`, `mutation_rate`, `local_search_rate`: `[0, 1]`
//! - `tournament_size`: at least 1
//! - `elitism`: at most the population size (checked by the engine)

use std::fmt;

use crate::crossover::CrossoverType;
use crate::error::{GeneticError, Result};
use crate::mutation::MutationType;

/// Population size the preset configuration is tuned for.
pub const PRESET_POPULATION_SIZE: usize = 500;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    max_generations: usize,
    tournament_size: usize,
    /// Number of fittest chromosomes copied unchanged into the next generation
    elitism: usize,
    crossover_rate: f64,
    mutation_rate: f64,
    local_search_rate: f64,
    /// Reject children equal to one already bred in the same generation
    force_uniqueness: bool,
    crossover_type: CrossoverType,
    mutation_type: MutationType,
}

/// Checks that a probability lies in `[0, 1]`.
fn validate_rate(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GeneticError::Configuration(format!(
            "{} must be between 0 and 1 inclusive, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_tournament_size(tournament_size: usize) -> Result<()> {
    if tournament_size < 1 {
        return Err(GeneticError::Configuration(
            "Tournament size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl EvolutionOptions {
    /// The configuration used for the bundled 48-city benchmark runs.
    ///
    /// Intended for a population of [`PRESET_POPULATION_SIZE`] chromosomes.
    pub fn preset() -> Self {
        Self {
            max_generations: 500,
            tournament_size: 3,
            elitism: 1,
            crossover_rate: 0.90,
            mutation_rate: 0.04,
            local_search_rate: 0.0,
            force_uniqueness: false,
            crossover_type: CrossoverType::UniformOrder,
            mutation_type: MutationType::Insertion,
        }
    }

    /// Checks every range that does not depend on the population.
    pub fn validate(&self) -> Result<()> {
        validate_tournament_size(self.tournament_size)?;
        validate_rate("Crossover rate", self.crossover_rate)?;
        validate_rate("Mutation rate", self.mutation_rate)?;
        validate_rate("Local search rate", self.local_search_rate)?;
        Ok(())
    }

    pub fn get_max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_elitism(&self) -> usize {
        self.elitism
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_local_search_rate(&self) -> f64 {
        self.local_search_rate
    }

    pub fn get_force_uniqueness(&self) -> bool {
        self.force_uniqueness
    }

    pub fn get_crossover_type(&self) -> CrossoverType {
        self.crossover_type
    }

    pub fn get_mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// Sets the number of generations.
    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    /// Sets the tournament size.
    pub fn set_tournament_size(&mut self, tournament_size: usize) -> Result<()> {
        validate_tournament_size(tournament_size)?;
        self.tournament_size = tournament_size;
        Ok(())
    }

    /// Sets the elitism count. The population bound is checked by the engine.
    pub fn set_elitism(&mut self, elitism: usize) {
        self.elitism = elitism;
    }

    pub fn set_crossover_rate(&mut self, rate: f64) -> Result<()> {
        validate_rate("Crossover rate", rate)?;
        self.crossover_rate = rate;
        Ok(())
    }

    pub fn set_mutation_rate(&mut self, rate: f64) -> Result<()> {
        validate_rate("Mutation rate", rate)?;
        self.mutation_rate = rate;
        Ok(())
    }

    pub fn set_local_search_rate(&mut self, rate: f64) -> Result<()> {
        validate_rate("Local search rate", rate)?;
        self.local_search_rate = rate;
        Ok(())
    }

    /// Sets the uniqueness flag. Feasibility is checked by the engine.
    pub fn set_force_uniqueness(&mut self, force_uniqueness: bool) {
        self.force_uniqueness = force_uniqueness;
    }

    pub fn set_crossover_type(&mut self, crossover_type: CrossoverType) {
        self.crossover_type = crossover_type;
    }

    pub fn set_mutation_type(&mut self, mutation_type: MutationType) {
        self.mutation_type = mutation_type;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            max_generations: 10,
            tournament_size: 3,
            elitism: 1,
            crossover_rate: 0.95,
            mutation_rate: 0.05,
            local_search_rate: 0.0,
            force_uniqueness: false,
            crossover_type: CrossoverType::UniformOrder,
            mutation_type: MutationType::Insertion,
        }
    }
}

impl fmt::Display for EvolutionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Max. Generation:    {}", self.max_generations)?;
        writeln!(f, "k Value:            {}", self.tournament_size)?;
        writeln!(f, "Elitism Value:      {}", self.elitism)?;
        writeln!(f, "Force Uniqueness:   {}", self.force_uniqueness)?;
        writeln!(f, "Local Search Rate:  {}", self.local_search_rate)?;
        writeln!(f, "Crossover Type:     {}", self.crossover_type)?;
        writeln!(f, "Crossover Rate:     {}%", self.crossover_rate * 100.0)?;
        writeln!(f, "Mutation Type:      {}", self.mutation_type)?;
        write!(f, "Mutation Rate:      {}%", self.mutation_rate * 100.0)
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset fields take their values from `EvolutionOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    max_generations: Option<usize>,
    tournament_size: Option<usize>,
    elitism: Option<usize>,
    crossover_rate: Option<f64>,
    mutation_rate: Option<f64>,
    local_search_rate: Option<f64>,
    force_uniqueness: Option<bool>,
    crossover_type: Option<CrossoverType>,
    mutation_type: Option<MutationType>,
}

impl EvolutionOptionsBuilder {
    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn elitism(mut self, value: usize) -> Self {
        self.elitism = Some(value);
        self
    }

    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.crossover_rate = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn local_search_rate(mut self, value: f64) -> Self {
        self.local_search_rate = Some(value);
        self
    }

    pub fn force_uniqueness(mut self, value: bool) -> Self {
        self.force_uniqueness = Some(value);
        self
    }

    pub fn crossover_type(mut self, value: CrossoverType) -> Self {
        self.crossover_type = Some(value);
        self
    }

    pub fn mutation_type(mut self, value: MutationType) -> Self {
        self.mutation_type = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance. Call `validate` to check ranges.
    pub fn build(self) -> EvolutionOptions {
        let default = EvolutionOptions::default();
        EvolutionOptions {
            max_generations: self.max_generations.unwrap_or(default.max_generations),
            tournament_size: self.tournament_size.unwrap_or(default.tournament_size),
            elitism: self.elitism.unwrap_or(default.elitism),
            crossover_rate: self.crossover_rate.unwrap_or(default.crossover_rate),
            mutation_rate: self.mutation_rate.unwrap_or(default.mutation_rate),
            local_search_rate: self.local_search_rate.unwrap_or(default.local_search_rate),
            force_uniqueness: self.force_uniqueness.unwrap_or(default.force_uniqueness),
            crossover_type: self.crossover_type.unwrap_or(default.crossover_type),
            mutation_type: self.mutation_type.unwrap_or(default.mutation_type),
        }
    }
}
