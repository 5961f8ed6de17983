use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// One in this many tournaments returns a sampled member other than the fittest.
pub const NOT_FITTEST_ODDS: usize = 5;

/// Tournament selection over a population.
///
/// Draws `k` members uniformly at random with replacement and usually returns the
/// one with the shortest tour. With probability 1/5, and only when `k > 1`, another
/// sampled member is returned instead, which keeps some pressure off the fittest.
///
/// Draw order: `k` member indices, the 1/5 roll, then (when the roll fires) the
/// index of the replacement among the remaining samples.
///
/// # Examples
///
/// ```
/// use genalg_tsp::population::Population;
/// use genalg_tsp::rng::RandomNumberGenerator;
/// use genalg_tsp::selection::tournament;
///
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let population = Population::random(8, 10, &mut rng).unwrap();
///
/// let winner = tournament(&population, 3, &mut rng).unwrap();
/// assert!(population.iter().any(|member| member == winner));
/// ```
///
/// # Errors
///
/// Returns an error if `k` is zero or the population is empty.
pub fn tournament<'a>(
    population: &'a Population,
    k: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<&'a Chromosome> {
    tournament_among(population.members(), k, rng)
}

/// Tournament selection over any slice of chromosomes.
///
/// See [`tournament`] for the draw order.
pub fn tournament_among<'a>(
    members: &'a [Chromosome],
    k: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<&'a Chromosome> {
    if k < 1 {
        return Err(GeneticError::Configuration(
            "Tournament size must be at least 1".to_string(),
        ));
    }
    if members.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }

    let mut participants: Vec<&Chromosome> = (0..k)
        .map(|_| &members[rng.next_index(members.len())])
        .collect();

    let mut best_idx = 0;
    for (idx, participant) in participants.iter().enumerate().skip(1) {
        if participant.distance() < participants[best_idx].distance() {
            best_idx = idx;
        }
    }

    let skip_fittest = rng.next_index(NOT_FITTEST_ODDS) == 0;
    if skip_fittest && participants.len() > 1 {
        // Removes the first sample structurally equal to the winner, which may be
        // an earlier duplicate draw.
        let best = participants[best_idx];
        if let Some(pos) = participants.iter().position(|p| *p == best) {
            participants.remove(pos);
        }
        return Ok(participants[rng.next_index(participants.len())]);
    }

    Ok(participants[best_idx])
}
