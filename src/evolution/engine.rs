//! # GeneticAlgorithm
//!
//! The generational loop. Each generation is derived from the previous one by
//! copying the elites, then breeding pairs of tournament winners through the
//! gated crossover, mutation and local search operators.
//!
//! ## Random draw order
//!
//! Every breeding iteration consumes the shared stream in a fixed order:
//! parent 1 tournament, parent 2 tournament, crossover gate, mutation gates for
//! both children, local search gates for both children, crossover internals (if
//! the gate fired), then mutation internals for each child whose gate fired.
//! Local search draws nothing. A fixed seed therefore reproduces a run exactly.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, trace};

use super::observer::GenerationObserver;
use super::options::EvolutionOptions;
use super::report::{GenerationStats, RunReport};
use crate::chromosome::Chromosome;
use crate::city::City;
use crate::crossover::CrossoverType;
use crate::error::{GeneticError, OptionExt, Result};
use crate::local_search::two_opt;
use crate::mutation::MutationType;
use crate::population::{check_uniqueness_feasible, Population};
use crate::rng::RandomNumberGenerator;
use crate::selection::tournament;

/// Lifecycle of a `GeneticAlgorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not run since construction or the last `reset`.
    Configured,
    Running,
    /// A run completed; result accessors are available.
    Finished,
}

#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    options: EvolutionOptions,
    initial_population: Population,
    population: Population,
    rng: RandomNumberGenerator,
    state: RunState,
    first_generation: GenerationStats,
    last_generation: GenerationStats,
    average_history: Vec<u64>,
    best_history: Vec<u64>,
    area_under_average: u64,
    area_under_best: u64,
}

fn generation_stats(population: &Population) -> Result<GenerationStats> {
    let average = population
        .average_distance()
        .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
    let best = population
        .most_fit()
        .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?
        .distance();
    Ok(GenerationStats { average, best })
}

fn city_count(population: &Population) -> usize {
    population.most_fit().map_or(0, Chromosome::len)
}

fn validate_against_population(options: &EvolutionOptions, population: &Population) -> Result<()> {
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if options.get_elitism() > population.len() {
        return Err(GeneticError::Configuration(format!(
            "Elitism value {} exceeds population size {}",
            options.get_elitism(),
            population.len()
        )));
    }
    check_same_cities(population)?;
    if options.get_force_uniqueness() {
        check_uniqueness_feasible(city_count(population), population.len())?;
    }
    Ok(())
}

/// Every member must visit exactly the cities of the fittest member, once each.
fn check_same_cities(population: &Population) -> Result<()> {
    let reference = population
        .most_fit()
        .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
    let cities: HashSet<&City> = reference.cities().iter().collect();
    let consistent = cities.len() == reference.len()
        && population.iter().all(|member| {
            member.len() == reference.len()
                && member.cities().iter().all(|city| cities.contains(city))
        });
    if !consistent {
        return Err(GeneticError::Configuration(
            "Population members are not permutations of the same cities".to_string(),
        ));
    }
    Ok(())
}

impl GeneticAlgorithm {
    /// Creates an engine over `population`.
    ///
    /// The population is snapshotted so that `reset` can restore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty, if its members are not
    /// permutations of the same cities, if an option is out of range, if elitism
    /// exceeds the population size, or if uniqueness is requested and the
    /// population is larger than the number of distinct tours.
    pub fn new(
        population: Population,
        options: EvolutionOptions,
        rng: RandomNumberGenerator,
    ) -> Result<Self> {
        options.validate()?;
        validate_against_population(&options, &population)?;
        let first_generation = generation_stats(&population)?;

        Ok(Self {
            options,
            initial_population: population.deep_copy(),
            population,
            rng,
            state: RunState::Configured,
            first_generation,
            last_generation: first_generation,
            average_history: Vec::new(),
            best_history: Vec::new(),
            area_under_average: 0,
            area_under_best: 0,
        })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// The current generation.
    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.options.set_max_generations(max_generations);
    }

    pub fn set_tournament_size(&mut self, tournament_size: usize) -> Result<()> {
        self.options.set_tournament_size(tournament_size)
    }

    /// Sets the number of elites.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `elitism` exceeds the population size.
    pub fn set_elitism(&mut self, elitism: usize) -> Result<()> {
        if elitism > self.population.len() {
            return Err(GeneticError::Configuration(format!(
                "Elitism value {} exceeds population size {}",
                elitism,
                self.population.len()
            )));
        }
        self.options.set_elitism(elitism);
        Ok(())
    }

    pub fn set_crossover_rate(&mut self, rate: f64) -> Result<()> {
        self.options.set_crossover_rate(rate)
    }

    pub fn set_mutation_rate(&mut self, rate: f64) -> Result<()> {
        self.options.set_mutation_rate(rate)
    }

    pub fn set_local_search_rate(&mut self, rate: f64) -> Result<()> {
        self.options.set_local_search_rate(rate)
    }

    /// Enables or disables the uniqueness constraint on bred children.
    ///
    /// # Errors
    ///
    /// When enabling, returns `GeneticError::UniquenessInfeasible` if the population
    /// is larger than the number of distinct tours (checked for 1 to 9 cities).
    pub fn set_force_uniqueness(&mut self, force_uniqueness: bool) -> Result<()> {
        if force_uniqueness {
            check_uniqueness_feasible(city_count(&self.population), self.population.len())?;
        }
        self.options.set_force_uniqueness(force_uniqueness);
        Ok(())
    }

    pub fn set_crossover_type(&mut self, crossover_type: CrossoverType) {
        self.options.set_crossover_type(crossover_type);
    }

    pub fn set_mutation_type(&mut self, mutation_type: MutationType) {
        self.options.set_mutation_type(mutation_type);
    }

    /// Replaces the population and its snapshot, discarding any run results.
    ///
    /// On error the engine is left unchanged.
    pub fn set_population(&mut self, population: Population) -> Result<()> {
        validate_against_population(&self.options, &population)?;
        self.first_generation = generation_stats(&population)?;
        self.initial_population = population.deep_copy();
        self.population = population;
        self.clear_results();
        Ok(())
    }

    pub fn set_rng(&mut self, rng: RandomNumberGenerator) {
        self.rng = rng;
    }

    /// Restores the initial population and clears every recorded result.
    ///
    /// The random stream is not rewound.
    pub fn reset(&mut self) {
        self.population = self.initial_population.deep_copy();
        self.clear_results();
    }

    fn clear_results(&mut self) {
        self.average_history.clear();
        self.best_history.clear();
        self.area_under_average = 0;
        self.area_under_best = 0;
        self.last_generation = self.first_generation;
        self.state = RunState::Configured;
    }

    /// Evolves the population for the configured number of generations.
    ///
    /// Running again without `reset` continues from the current population and
    /// appends to the recorded histories.
    pub fn run(&mut self) -> Result<()> {
        self.run_inner(None)
    }

    /// Like `run`, but reports the fittest chromosome to `observer` for
    /// generation 0 and whenever it changes.
    pub fn run_with_observer<O: GenerationObserver>(&mut self, observer: &mut O) -> Result<()> {
        self.run_inner(Some(observer))
    }

    fn run_inner(&mut self, observer: Option<&mut dyn GenerationObserver>) -> Result<()> {
        let population = self.population.clone();
        let recorded = self.average_history.len();
        let areas = (self.area_under_average, self.area_under_best);
        let last_generation = self.last_generation;

        self.state = RunState::Running;
        let outcome = self.evolve(observer);
        match outcome {
            Ok(()) => self.state = RunState::Finished,
            Err(ref error) => {
                debug!(%error, "Evolution failed, rolling back");
                self.population = population;
                self.average_history.truncate(recorded);
                self.best_history.truncate(recorded);
                (self.area_under_average, self.area_under_best) = areas;
                self.last_generation = last_generation;
                self.state = RunState::Configured;
            }
        }
        outcome
    }

    fn evolve(&mut self, mut observer: Option<&mut dyn GenerationObserver>) -> Result<()> {
        let max_generations = self.options.get_max_generations();
        info!(
            generations = max_generations,
            population_size = self.population.len(),
            cities = city_count(&self.population),
            "Starting evolution"
        );

        let mut last_best = match observer.as_deref_mut() {
            Some(observer) => {
                let best = self
                    .population
                    .most_fit()
                    .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
                observer.best_changed(0, best);
                Some(best.clone())
            }
            None => None,
        };

        for generation in 1..=max_generations {
            self.population = self.create_next_generation()?;
            let stats = generation_stats(&self.population)?;

            self.average_history.push(stats.average);
            self.best_history.push(stats.best);
            self.area_under_average += stats.average;
            self.area_under_best += stats.best;
            debug!(
                generation,
                best = stats.best,
                average = stats.average,
                "Generation complete"
            );

            if let Some(observer) = observer.as_deref_mut() {
                let best = self
                    .population
                    .most_fit()
                    .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
                if last_best.as_ref() != Some(best) {
                    observer.best_changed(generation, best);
                    last_best = Some(best.clone());
                }
            }
        }

        self.last_generation = generation_stats(&self.population)?;
        info!(
            best = self.last_generation.best,
            average = self.last_generation.average,
            "Evolution finished"
        );
        Ok(())
    }

    /// Breeds the generation that follows the current population.
    ///
    /// The current population is left untouched; the shared random stream advances.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvariantViolation` if the new population does not
    /// end up exactly as large as the current one.
    pub fn create_next_generation(&mut self) -> Result<Population> {
        let target = self.population.len();
        let k = self.options.get_tournament_size();
        let crossover_rate = self.options.get_crossover_rate();
        let mutation_rate = self.options.get_mutation_rate();
        let local_search_rate = self.options.get_local_search_rate();
        let crossover_type = self.options.get_crossover_type();
        let mutation_type = self.options.get_mutation_type();
        let force_uniqueness = self.options.get_force_uniqueness();

        let mut next = Population::new(target);

        for elite in self.population.iter().take(self.options.get_elitism()) {
            let elite = if local_search_rate > 0.0 {
                two_opt(elite)
            } else {
                elite.clone()
            };
            next.add(elite)?;
        }

        let mut bred: HashSet<Chromosome> = HashSet::new();
        while next.len() + 1 < target {
            let parent1 = tournament(&self.population, k, &mut self.rng)?;
            let parent2 = tournament(&self.population, k, &mut self.rng)?;

            let do_crossover = self.rng.chance(crossover_rate);
            let mutate1 = self.rng.chance(mutation_rate);
            let mutate2 = self.rng.chance(mutation_rate);
            let search1 = self.rng.chance(local_search_rate);
            let search2 = self.rng.chance(local_search_rate);

            let (mut child1, mut child2) = if do_crossover {
                crossover_type.apply(parent1, parent2, &mut self.rng)?
            } else {
                (parent1.clone(), parent2.clone())
            };

            if mutate1 {
                child1 = mutation_type.apply(&child1, &mut self.rng);
            }
            if mutate2 {
                child2 = mutation_type.apply(&child2, &mut self.rng);
            }
            if search1 {
                child1 = two_opt(&child1);
            }
            if search2 {
                child2 = two_opt(&child2);
            }

            for child in [child1, child2] {
                if !force_uniqueness {
                    next.add(child)?;
                } else if bred.insert(child.clone()) {
                    next.add(child)?;
                } else {
                    trace!(distance = child.distance(), "Skipping duplicate child");
                }
            }
        }

        if next.len() != target {
            let filler = tournament(&self.population, k, &mut self.rng)?;
            next.add(filler.clone())?;
        }

        if next.len() != target {
            return Err(GeneticError::InvariantViolation(format!(
                "Next generation holds {} chromosomes, expected {}",
                next.len(),
                target
            )));
        }
        Ok(next)
    }

    fn ensure_finished(&self) -> Result<()> {
        if self.state != RunState::Finished {
            return Err(GeneticError::NotFinished);
        }
        Ok(())
    }

    pub fn average_distance_of_first_generation(&self) -> Result<u64> {
        self.ensure_finished()?;
        Ok(self.first_generation.average)
    }

    pub fn average_distance_of_last_generation(&self) -> Result<u64> {
        self.ensure_finished()?;
        Ok(self.last_generation.average)
    }

    pub fn best_distance_of_first_generation(&self) -> Result<u64> {
        self.ensure_finished()?;
        Ok(self.first_generation.best)
    }

    pub fn best_distance_of_last_generation(&self) -> Result<u64> {
        self.ensure_finished()?;
        Ok(self.last_generation.best)
    }

    pub fn area_under_average_distances(&self) -> Result<u64> {
        self.ensure_finished()?;
        Ok(self.area_under_average)
    }

    pub fn area_under_best_distances(&self) -> Result<u64> {
        self.ensure_finished()?;
        Ok(self.area_under_best)
    }

    /// Average distance of every generation bred so far, oldest first.
    pub fn average_distance_history(&self) -> Result<&[u64]> {
        self.ensure_finished()?;
        Ok(&self.average_history)
    }

    /// Best distance of every generation bred so far, oldest first.
    pub fn best_distance_history(&self) -> Result<&[u64]> {
        self.ensure_finished()?;
        Ok(&self.best_history)
    }

    /// The fittest chromosome of the final generation.
    pub fn most_fit(&self) -> Result<&Chromosome> {
        self.ensure_finished()?;
        self.population
            .most_fit()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
    }

    /// Collects every result of the finished run.
    pub fn report(&self) -> Result<RunReport> {
        let best_tour = self.most_fit()?.cities().to_vec();
        Ok(RunReport {
            first_generation: self.first_generation,
            last_generation: self.last_generation,
            area_under_average_distances: self.area_under_average,
            area_under_best_distances: self.area_under_best,
            average_distance_history: self.average_history.clone(),
            best_distance_history: self.best_history.clone(),
            best_tour,
        })
    }
}

impl fmt::Display for GeneticAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------Genetic Algorithm Properties----------")?;
        writeln!(f, "Number of Cities:   {}", city_count(&self.population))?;
        writeln!(f, "Population Size:    {}", self.population.len())?;
        write!(f, "{}", self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;

    fn square_cities() -> Vec<City> {
        vec![
            City::new("A", 0, 0),
            City::new("B", 10, 0),
            City::new("C", 10, 10),
            City::new("D", 0, 10),
        ]
    }

    fn engine(size: usize, options: EvolutionOptions, seed: u64) -> GeneticAlgorithm {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let mut population = Population::new(size);
        for _ in 0..size {
            population
                .add(Chromosome::shuffled(&square_cities(), &mut rng).unwrap())
                .unwrap();
        }
        GeneticAlgorithm::new(population, options, rng).unwrap()
    }

    #[test]
    fn test_accessors_require_finished_run() {
        let ga = engine(10, EvolutionOptions::default(), 1);
        assert_eq!(ga.state(), RunState::Configured);
        assert!(matches!(
            ga.best_distance_of_last_generation(),
            Err(GeneticError::NotFinished)
        ));
        assert!(matches!(ga.report(), Err(GeneticError::NotFinished)));
        assert!(matches!(ga.most_fit(), Err(GeneticError::NotFinished)));
    }

    #[test]
    fn test_run_records_one_entry_per_generation() {
        let options = EvolutionOptions::builder().max_generations(7).build();
        let mut ga = engine(10, options, 3);
        ga.run().unwrap();

        assert!(ga.is_finished());
        let best = ga.best_distance_history().unwrap();
        let average = ga.average_distance_history().unwrap();
        assert_eq!(best.len(), 7);
        assert_eq!(average.len(), 7);
        assert_eq!(ga.area_under_best_distances().unwrap(), best.iter().sum::<u64>());
        assert_eq!(
            ga.area_under_average_distances().unwrap(),
            average.iter().sum::<u64>()
        );
        assert_eq!(ga.best_distance_of_last_generation().unwrap(), best[6]);
        assert_eq!(ga.average_distance_of_last_generation().unwrap(), average[6]);
    }

    #[test]
    fn test_next_generation_keeps_size() {
        for size in [1, 2, 3, 4, 7, 10] {
            for elitism in 0..=size.min(3) {
                let options = EvolutionOptions::builder().elitism(elitism).build();
                let mut ga = engine(size, options, size as u64);
                let next = ga.create_next_generation().unwrap();
                assert_eq!(next.len(), size);
            }
        }
    }

    #[test]
    fn test_elite_survives() {
        let options = EvolutionOptions::builder()
            .elitism(1)
            .mutation_rate(1.0)
            .build();
        let mut ga = engine(12, options, 9);
        let best = ga.population().most_fit().unwrap().distance();
        let next = ga.create_next_generation().unwrap();
        assert!(next.most_fit().unwrap().distance() <= best);
    }

    #[test]
    fn test_elitism_bounded_by_population() {
        let mut ga = engine(5, EvolutionOptions::default(), 1);
        assert!(ga.set_elitism(5).is_ok());
        assert!(matches!(ga.set_elitism(6), Err(GeneticError::Configuration(_))));
        assert_eq!(ga.options().get_elitism(), 5);

        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = Population::from_cities(&square_cities(), 3, &mut rng).unwrap();
        let options = EvolutionOptions::builder().elitism(4).build();
        assert!(GeneticAlgorithm::new(population, options, rng).is_err());
    }

    #[test]
    fn test_uniqueness_feasibility() {
        // 4 cities allow 24 distinct tours
        let mut ga = engine(25, EvolutionOptions::default(), 1);
        assert!(matches!(
            ga.set_force_uniqueness(true),
            Err(GeneticError::UniquenessInfeasible { .. })
        ));
        assert!(!ga.options().get_force_uniqueness());

        let mut ga = engine(20, EvolutionOptions::default(), 1);
        assert!(ga.set_force_uniqueness(true).is_ok());
    }

    #[test]
    fn test_unique_children_are_distinct() {
        let options = EvolutionOptions::builder()
            .elitism(0)
            .force_uniqueness(true)
            .build();
        let mut ga = engine(11, options, 21);
        let next = ga.create_next_generation().unwrap();
        assert_eq!(next.len(), 11);

        // All bred members are distinct; only the final filler may repeat one.
        let distinct: HashSet<&Chromosome> = next.iter().collect();
        assert!(distinct.len() >= 10);
    }

    #[test]
    fn test_reset_restores_initial_population() {
        let options = EvolutionOptions::builder().max_generations(5).build();
        let mut ga = engine(10, options, 4);
        let initial: Vec<Chromosome> = ga.population().iter().cloned().collect();

        ga.run().unwrap();
        ga.reset();

        assert_eq!(ga.state(), RunState::Configured);
        assert!(ga.best_distance_history().is_err());
        let restored: Vec<Chromosome> = ga.population().iter().cloned().collect();
        assert_eq!(restored, initial);
    }

    #[test]
    fn test_rerun_appends_histories() {
        let options = EvolutionOptions::builder().max_generations(3).build();
        let mut ga = engine(10, options, 8);
        ga.run().unwrap();
        ga.run().unwrap();
        assert_eq!(ga.best_distance_history().unwrap().len(), 6);
    }

    #[test]
    fn test_zero_generations() {
        let options = EvolutionOptions::builder().max_generations(0).build();
        let mut ga = engine(6, options, 2);
        ga.run().unwrap();
        assert!(ga.best_distance_history().unwrap().is_empty());
        assert_eq!(
            ga.best_distance_of_last_generation().unwrap(),
            ga.best_distance_of_first_generation().unwrap()
        );
    }

    #[test]
    fn test_observer_sees_generation_zero() {
        let options = EvolutionOptions::builder().max_generations(20).build();
        let mut ga = engine(10, options, 5);
        let mut seen = Vec::new();
        ga.run_with_observer(&mut |generation: usize, best: &Chromosome| {
            seen.push((generation, best.distance()))
        })
        .unwrap();

        assert_eq!(seen[0].0, 0);
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
    }

    fn tour(cities: &[City]) -> Chromosome {
        Chromosome::new(cities.to_vec()).unwrap()
    }

    #[test]
    fn test_rejects_tours_of_different_lengths() {
        let cities = square_cities();
        let mut population = Population::new(4);
        population.add(tour(&cities)).unwrap();
        population.add(tour(&cities)).unwrap();
        population.add(tour(&cities[..3])).unwrap();
        population.add(tour(&cities[..3])).unwrap();

        let rng = RandomNumberGenerator::from_seed(1);
        let result = GeneticAlgorithm::new(population, EvolutionOptions::default(), rng);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_rejects_tours_over_different_cities() {
        let cities = square_cities();
        let mut other = cities.clone();
        other[3] = City::new("E", 5, 20);

        let mut population = Population::new(3);
        population.add(tour(&cities)).unwrap();
        population.add(tour(&cities)).unwrap();
        population.add(tour(&other)).unwrap();

        let rng = RandomNumberGenerator::from_seed(1);
        let result = GeneticAlgorithm::new(population, EvolutionOptions::default(), rng);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_rejects_tour_with_repeated_city() {
        let cities = square_cities();
        let repeated = vec![
            cities[0].clone(),
            cities[1].clone(),
            cities[0].clone(),
            cities[2].clone(),
        ];
        let mut population = Population::new(2);
        population.add(tour(&repeated)).unwrap();
        population.add(tour(&cities)).unwrap();

        let rng = RandomNumberGenerator::from_seed(1);
        let result = GeneticAlgorithm::new(population, EvolutionOptions::default(), rng);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_set_population_rejects_mixed_tours() {
        let options = EvolutionOptions::builder().max_generations(3).build();
        let mut ga = engine(6, options, 12);
        let before: Vec<Chromosome> = ga.population().iter().cloned().collect();

        let cities = square_cities();
        let mut mixed = Population::new(2);
        mixed.add(tour(&cities)).unwrap();
        mixed.add(tour(&cities[1..])).unwrap();

        assert!(matches!(
            ga.set_population(mixed),
            Err(GeneticError::Configuration(_))
        ));
        let after: Vec<Chromosome> = ga.population().iter().cloned().collect();
        assert_eq!(after, before);

        ga.run().unwrap();
        assert_eq!(ga.best_distance_history().unwrap().len(), 3);
    }

    #[test]
    fn test_properties_display() {
        let ga = engine(10, EvolutionOptions::default(), 1);
        let text = ga.to_string();
        assert!(text.contains("Number of Cities:   4"));
        assert!(text.contains("Population Size:    10"));
        assert!(text.contains("k Value:            3"));
    }
}
