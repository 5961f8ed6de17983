pub mod builder;
pub mod engine;
pub mod observer;
pub mod options;
pub mod report;

pub use builder::GeneticAlgorithmBuilder;
pub use engine::{GeneticAlgorithm, RunState};
pub use observer::GenerationObserver;
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, PRESET_POPULATION_SIZE};
pub use report::{GenerationStats, RunReport};
