use crate::{
    error::{GeneticError, Result},
    population::Population,
    rng::RandomNumberGenerator,
};

use super::{EvolutionOptions, GeneticAlgorithm};

/// Builder for [`GeneticAlgorithm`].
///
/// Options default to `EvolutionOptions::default()` and the random stream to an
/// entropy-seeded one. The population has no default.
///
/// # Examples
///
/// ```
/// use genalg_tsp::evolution::{EvolutionOptions, GeneticAlgorithmBuilder};
/// use genalg_tsp::population::Population;
/// use genalg_tsp::rng::RandomNumberGenerator;
///
/// let mut rng = RandomNumberGenerator::from_seed(11);
/// let population = Population::random(12, 30, &mut rng).unwrap();
///
/// let mut ga = GeneticAlgorithmBuilder::new()
///     .with_population(population)
///     .with_options(EvolutionOptions::builder().max_generations(25).build())
///     .with_rng(rng)
///     .build()
///     .unwrap();
///
/// ga.run().unwrap();
/// assert_eq!(ga.best_distance_history().unwrap().len(), 25);
/// ```
#[derive(Debug, Default)]
pub struct GeneticAlgorithmBuilder {
    population: Option<Population>,
    options: Option<EvolutionOptions>,
    rng: Option<RandomNumberGenerator>,
}

impl GeneticAlgorithmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_population(mut self, population: Population) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<GeneticAlgorithm> {
        let population = self
            .population
            .ok_or_else(|| GeneticError::Configuration("Population not specified".to_string()))?;

        GeneticAlgorithm::new(
            population,
            self.options.unwrap_or_default(),
            self.rng.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_population() {
        let result = GeneticAlgorithmBuilder::new()
            .with_options(EvolutionOptions::default())
            .build();
        match result {
            Err(GeneticError::Configuration(msg)) => assert!(msg.contains("Population")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_population() {
        let result = GeneticAlgorithmBuilder::new()
            .with_population(Population::new(4))
            .build();
        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }

    #[test]
    fn test_invalid_options() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = Population::random(6, 10, &mut rng).unwrap();
        let result = GeneticAlgorithmBuilder::new()
            .with_population(population)
            .with_options(EvolutionOptions::builder().crossover_rate(1.5).build())
            .build();
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_defaults() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = Population::random(6, 10, &mut rng).unwrap();
        let ga = GeneticAlgorithmBuilder::new()
            .with_population(population)
            .build()
            .unwrap();
        assert_eq!(ga.options(), &EvolutionOptions::default());
        assert_eq!(ga.population().len(), 10);
    }
}
