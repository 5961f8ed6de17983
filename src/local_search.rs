//! # Local Search
//!
//! A single exhaustive 2-opt pass: every segment reversal of the tour is tried
//! and the shortest resulting tour is kept.
//!
//! One call costs O(n³) (O(n²) reversals, each re-measured in O(n)), so the engine
//! only runs it behind a probability gate.

use crate::chromosome::{tour_distance, Chromosome};

/// Returns the best tour reachable from `chromosome` by reversing one segment.
///
/// For every pair `i < k` the segment `[i, k]` is reversed and the resulting tour
/// measured. If no reversal is strictly shorter, a chromosome equal to the input
/// is returned. Draws no random numbers.
///
/// # Examples
///
/// ```
/// use genalg_tsp::{chromosome::Chromosome, city::City, local_search::two_opt};
///
/// let [a, b, c, d] = [(0, 0), (10, 0), (10, 10), (0, 10)]
///     .map(|(x, y)| City::new(format!("{},{}", x, y), x, y));
/// let crossing = Chromosome::new(vec![a, c, b, d]).unwrap();
///
/// let improved = two_opt(&crossing);
/// assert_eq!(improved.distance(), 40);
/// ```
pub fn two_opt(chromosome: &Chromosome) -> Chromosome {
    let cities = chromosome.cities();
    let n = cities.len();
    let mut best_distance = chromosome.distance();
    let mut best: Option<Vec<_>> = None;

    let mut candidate = cities.to_vec();
    for i in 0..n.saturating_sub(1) {
        for k in (i + 1)..n {
            candidate.clone_from_slice(cities);
            candidate[i..=k].reverse();
            let distance = tour_distance(&candidate);
            if distance < best_distance {
                best_distance = distance;
                best = Some(candidate.clone());
            }
        }
    }

    match best {
        Some(tour) => Chromosome::from_tour(tour),
        None => chromosome.clone(),
    }
}
