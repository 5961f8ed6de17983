use genalg_tsp::{
    analysis::{average_runs, RateRange, RateSweep},
    error::GeneticError,
    evolution::{EvolutionOptions, GeneticAlgorithm, GeneticAlgorithmBuilder},
    population::Population,
    rng::RandomNumberGenerator,
};

fn small_engine(generations: usize) -> GeneticAlgorithm {
    let mut rng = RandomNumberGenerator::from_seed(2024);
    let population = Population::random(9, 14, &mut rng).unwrap();
    GeneticAlgorithmBuilder::new()
        .with_population(population)
        .with_options(EvolutionOptions::builder().max_generations(generations).build())
        .with_rng(rng)
        .build()
        .unwrap()
}

#[test]
fn test_averaging_bounds() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut ga = small_engine(12);
    let initial_best = ga.population().most_fit().unwrap().distance();

    let averaged = average_runs(&mut ga, 5).unwrap();
    assert_eq!(averaged.runs, 5);
    assert_eq!(averaged.best_distance_history.len(), 12);
    // Every run starts from the same population and keeps one elite
    assert!(averaged.best_distance_history.iter().all(|&d| d <= initial_best));
    assert!(averaged
        .best_distance_history
        .iter()
        .zip(&averaged.average_distance_history)
        .all(|(best, average)| best <= average));
}

#[test]
fn test_sweep_grid_shape() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut ga = small_engine(5);
    let crossover = RateRange::new(0.5, 1.0, 0.25).unwrap();
    let mutation = RateRange::new(0.0, 0.1, 0.05).unwrap();
    let sweep = RateSweep::new(crossover, mutation, 2).unwrap();
    assert_eq!(sweep.total_runs(), 3 * 3 * 2);

    let result = sweep.run(&mut ga).unwrap();
    assert_eq!(result.rows(), 3);
    assert_eq!(result.columns(), 3);
    assert!(result.min_value() <= result.max_value());

    let flattened: Vec<u64> = result.grid().iter().flatten().copied().collect();
    assert_eq!(flattened.iter().min().copied(), Some(result.min_value()));
    assert_eq!(flattened.iter().max().copied(), Some(result.max_value()));

    let best = result.best_cells();
    assert!(!best.is_empty());
    assert!(best.iter().all(|cell| cell.value == result.min_value()));
    assert!(result
        .worst_cells()
        .iter()
        .all(|cell| cell.value == result.max_value()));

    let corner = result.cell(2, 2).unwrap();
    assert_eq!(corner.crossover_rate, 1.0);
    assert!((corner.mutation_rate - 0.1).abs() < 1e-12);
    assert!(result.cell(3, 0).is_none());

    // Rates are put back once the sweep is done
    assert_eq!(ga.options().get_crossover_rate(), 0.95);
    assert_eq!(ga.options().get_mutation_rate(), 0.05);
}

#[test]
fn test_single_cell_sweep_matches_manual_runs() {
    let crossover = RateRange::single(0.8).unwrap();
    let mutation = RateRange::single(0.1).unwrap();
    let sweep = RateSweep::new(crossover, mutation, 3).unwrap();

    let mut swept = small_engine(6);
    let result = sweep.run(&mut swept).unwrap();

    let mut manual = small_engine(6);
    manual.set_crossover_rate(0.8).unwrap();
    manual.set_mutation_rate(0.1).unwrap();
    let mut total = 0;
    for _ in 0..3 {
        manual.reset();
        manual.run().unwrap();
        total += manual.area_under_best_distances().unwrap();
    }
    assert_eq!(result.grid(), &[vec![total / 3]]);
}

#[test]
fn test_invalid_ranges() {
    assert!(matches!(
        RateRange::new(0.9, 0.1, 0.1),
        Err(GeneticError::Configuration(_))
    ));
    assert!(matches!(
        RateRange::new(0.0, 0.3, 0.4),
        Err(GeneticError::Configuration(_))
    ));
    assert!(matches!(
        RateRange::new(0.0, 1.1, 0.1),
        Err(GeneticError::Configuration(_))
    ));
}
