use tracing::info;

use crate::error::{GeneticError, Result};
use crate::evolution::GeneticAlgorithm;

/// Per-generation histories averaged over several independent runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AveragedHistory {
    pub runs: usize,
    /// Mean average distance per generation, truncated.
    pub average_distance_history: Vec<u64>,
    /// Mean best distance per generation, truncated.
    pub best_distance_history: Vec<u64>,
    /// Mean best distance of the final generation, truncated.
    pub average_final_best: u64,
}

/// Resets and runs `ga` `runs` times and averages the recorded histories.
///
/// Every run starts from the same initial population while the random stream
/// keeps advancing, so the runs differ. The engine is left in the finished state
/// of the last run.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` if `runs` is zero, or any error raised
/// by the runs themselves.
pub fn average_runs(ga: &mut GeneticAlgorithm, runs: usize) -> Result<AveragedHistory> {
    if runs == 0 {
        return Err(GeneticError::Configuration(
            "Number of runs must be at least 1".to_string(),
        ));
    }

    let generations = ga.options().get_max_generations();
    let mut average_sums = vec![0u64; generations];
    let mut best_sums = vec![0u64; generations];
    let mut final_best_sum = 0u64;

    for run in 0..runs {
        ga.reset();
        ga.run()?;

        for (sum, value) in average_sums.iter_mut().zip(ga.average_distance_history()?) {
            *sum += value;
        }
        for (sum, value) in best_sums.iter_mut().zip(ga.best_distance_history()?) {
            *sum += value;
        }
        let final_best = ga.best_distance_of_last_generation()?;
        final_best_sum += final_best;
        info!(run = run + 1, runs, final_best, "Averaging run complete");
    }

    let divisor = runs as u64;
    Ok(AveragedHistory {
        runs,
        average_distance_history: average_sums.into_iter().map(|s| s / divisor).collect(),
        best_distance_history: best_sums.into_iter().map(|s| s / divisor).collect(),
        average_final_best: final_best_sum / divisor,
    })
}
