pub mod analysis;
pub mod chromosome;
pub mod city;
pub mod crossover;
pub mod dataset;
pub mod error;
pub mod evolution;
pub mod local_search;
pub mod mutation;
pub mod population;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use chromosome::Chromosome;
pub use city::City;
pub use crossover::CrossoverType;
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{
    EvolutionOptions, GeneticAlgorithm, GeneticAlgorithmBuilder, GenerationObserver, RunReport,
};
pub use mutation::MutationType;
pub use population::Population;
pub use rng::RandomNumberGenerator;
