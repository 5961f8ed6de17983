//! # Crossover
//!
//! Three recombination operators that each turn two parent tours into two child
//! tours. Every child is a permutation of the parents' city set.
//!
//! All three share one repair scheme. Some positions are first locked from the
//! child's own parent. The remaining positions are scanned left to right and take
//! the other parent's city at the same index unless the child already has it.
//! Cities that could not be placed that way are kept in scan order and written,
//! in that order, into whatever positions are still empty.
//!
//! | Variant | Locked positions |
//! |---|---|
//! | [`CrossoverType::UniformOrder`] | where a random 0/1 mask is 1 |
//! | [`CrossoverType::OnePoint`] | `[0, p)` for a random cut `p` |
//! | [`CrossoverType::TwoPoint`] | `[0, p1)` and `[p2, n)` for cuts `p1 <= p2` |

use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::chromosome::Chromosome;
use crate::city::City;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// The crossover operator used by the engine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrossoverType {
    #[default]
    UniformOrder,
    OnePoint,
    TwoPoint,
}

impl CrossoverType {
    /// Applies this crossover to two parents.
    pub fn apply(
        self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Chromosome, Chromosome)> {
        match self {
            CrossoverType::UniformOrder => uniform_order(parent1, parent2, rng),
            CrossoverType::OnePoint => one_point(parent1, parent2, rng),
            CrossoverType::TwoPoint => two_point(parent1, parent2, rng),
        }
    }
}

impl fmt::Display for CrossoverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrossoverType::UniformOrder => "UNIFORM_ORDER",
            CrossoverType::OnePoint => "ONE_POINT",
            CrossoverType::TwoPoint => "TWO_POINT",
        };
        f.write_str(name)
    }
}

/// Uniform order crossover.
///
/// Draws one 0/1 value per position (50/50). Where the mask is 1, child 1 keeps
/// parent 1's city and child 2 keeps parent 2's city.
pub fn uniform_order(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<(Chromosome, Chromosome)> {
    check_parents(parent1, parent2)?;
    let mask: Vec<bool> = (0..parent1.len()).map(|_| rng.next_index(2) == 1).collect();
    uniform_order_with_mask(parent1, parent2, &mask)
}

/// Uniform order crossover with a caller-supplied mask.
///
/// # Examples
///
/// ```
/// use genalg_tsp::{chromosome::Chromosome, city::City, crossover::uniform_order_with_mask};
///
/// let [a, b, c, d] = ["A", "B", "C", "D"].map(|n| City::new(n, 0, 0));
/// let p1 = Chromosome::new(vec![a.clone(), b.clone(), c.clone(), d.clone()]).unwrap();
/// let p2 = Chromosome::new(vec![b.clone(), c.clone(), d.clone(), a.clone()]).unwrap();
///
/// let (c1, c2) = uniform_order_with_mask(&p1, &p2, &[true, false, true, false]).unwrap();
/// assert_eq!(c1.cities()[0], a);
/// assert_eq!(c2.cities()[2], d);
/// ```
///
/// # Errors
///
/// Returns a configuration error if the mask length differs from the parents.
pub fn uniform_order_with_mask(
    parent1: &Chromosome,
    parent2: &Chromosome,
    mask: &[bool],
) -> Result<(Chromosome, Chromosome)> {
    check_parents(parent1, parent2)?;
    if mask.len() != parent1.len() {
        return Err(GeneticError::Configuration(format!(
            "Mask length ({}) doesn't match chromosome length ({})",
            mask.len(),
            parent1.len()
        )));
    }
    breed_pair(parent1, parent2, mask)
}

/// One-point crossover.
///
/// Draws a cut `p` in `[0, n)`. Positions before the cut come from the child's
/// own parent.
pub fn one_point(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<(Chromosome, Chromosome)> {
    check_parents(parent1, parent2)?;
    let n = parent1.len();
    let point = rng.next_index(n);
    one_point_at(parent1, parent2, point)
}

/// One-point crossover at a fixed cut.
pub fn one_point_at(
    parent1: &Chromosome,
    parent2: &Chromosome,
    point: usize,
) -> Result<(Chromosome, Chromosome)> {
    check_parents(parent1, parent2)?;
    let n = parent1.len();
    if point >= n {
        return Err(GeneticError::Configuration(format!(
            "Cut point {} out of range for {} cities",
            point, n
        )));
    }
    let mask: Vec<bool> = (0..n).map(|i| i < point).collect();
    breed_pair(parent1, parent2, &mask)
}

/// Two-point (order) crossover.
///
/// Draws `p1` in `[0, n)`, then `p2` in `[p1, n)`. Positions outside the middle
/// segment `[p1, p2)` come from the child's own parent.
pub fn two_point(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<(Chromosome, Chromosome)> {
    check_parents(parent1, parent2)?;
    let n = parent1.len();
    let first = rng.next_index(n);
    let second = rng.next_index(n - first) + first;
    two_point_at(parent1, parent2, first, second)
}

/// Two-point crossover at fixed cuts.
pub fn two_point_at(
    parent1: &Chromosome,
    parent2: &Chromosome,
    first: usize,
    second: usize,
) -> Result<(Chromosome, Chromosome)> {
    check_parents(parent1, parent2)?;
    let n = parent1.len();
    if first > second || second >= n {
        return Err(GeneticError::Configuration(format!(
            "Cut points ({}, {}) out of range for {} cities",
            first, second, n
        )));
    }
    let mask: Vec<bool> = (0..n).map(|i| i < first || i >= second).collect();
    breed_pair(parent1, parent2, &mask)
}

fn check_parents(parent1: &Chromosome, parent2: &Chromosome) -> Result<()> {
    if parent1.len() != parent2.len() {
        return Err(GeneticError::Configuration(format!(
            "Parent lengths differ ({} vs {})",
            parent1.len(),
            parent2.len()
        )));
    }
    Ok(())
}

fn breed_pair(
    parent1: &Chromosome,
    parent2: &Chromosome,
    locked: &[bool],
) -> Result<(Chromosome, Chromosome)> {
    let child1 = backfill(parent1.cities(), parent2.cities(), locked)?;
    let child2 = backfill(parent2.cities(), parent1.cities(), locked)?;
    Ok((Chromosome::from_tour(child1), Chromosome::from_tour(child2)))
}

/// Builds one child: `own` fills the locked positions, `other` donates the rest.
///
/// # Errors
///
/// Returns `GeneticError::InvariantViolation` when the leftover cities do not
/// exactly fill the empty positions, which only happens if the parents are not
/// permutations of the same city set.
pub(crate) fn backfill(own: &[City], other: &[City], locked: &[bool]) -> Result<Vec<City>> {
    let n = own.len();
    let mut child: Vec<Option<City>> = vec![None; n];
    let mut present: HashSet<&City> = HashSet::with_capacity(n);

    for i in (0..n).filter(|&i| locked[i]) {
        child[i] = Some(own[i].clone());
        present.insert(&own[i]);
    }

    let mut leftover = VecDeque::new();
    for i in 0..n {
        let candidate = &other[i];
        if present.contains(candidate) {
            continue;
        }
        present.insert(candidate);
        if locked[i] {
            leftover.push_back(candidate.clone());
        } else {
            child[i] = Some(candidate.clone());
        }
    }

    let mut tour = Vec::with_capacity(n);
    for slot in child {
        match slot.or_else(|| leftover.pop_front()) {
            Some(city) => tour.push(city),
            None => {
                return Err(GeneticError::InvariantViolation(
                    "Crossover ran out of leftover cities before the child was complete"
                        .to_string(),
                ))
            }
        }
    }

    if !leftover.is_empty() {
        return Err(GeneticError::InvariantViolation(format!(
            "Crossover left {} cities unplaced",
            leftover.len()
        )));
    }

    Ok(tour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd() -> [City; 4] {
        ["A", "B", "C", "D"].map(|n| City::new(n, 0, 0))
    }

    fn chromo(cities: &[City]) -> Chromosome {
        Chromosome::new(cities.to_vec()).unwrap()
    }

    fn names(chromosome: &Chromosome) -> Vec<&str> {
        chromosome.cities().iter().map(City::name).collect()
    }

    fn assert_permutation_of(child: &Chromosome, parent: &Chromosome) {
        assert_eq!(child.len(), parent.len());
        let child_set: HashSet<&City> = child.cities().iter().collect();
        let parent_set: HashSet<&City> = parent.cities().iter().collect();
        assert_eq!(child_set.len(), child.len(), "duplicate city in {}", child);
        assert_eq!(child_set, parent_set);
    }

    #[test]
    fn test_uniform_order_with_mask() {
        let [a, b, c, d] = abcd();
        let p1 = chromo(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let p2 = chromo(&[b.clone(), c.clone(), d.clone(), a.clone()]);

        let (c1, c2) = uniform_order_with_mask(&p1, &p2, &[true, false, true, false]).unwrap();

        // Locked positions come from the child's own parent
        assert_eq!(c1.cities()[0], a);
        assert_eq!(c1.cities()[2], c);
        assert_eq!(c2.cities()[0], b);
        assert_eq!(c2.cities()[2], d);

        assert_eq!(names(&c1), vec!["A", "B", "C", "D"]);
        assert_eq!(names(&c2), vec!["B", "A", "D", "C"]);
        assert_permutation_of(&c1, &p1);
        assert_permutation_of(&c2, &p1);
    }

    #[test]
    fn test_uniform_order_extreme_masks() {
        let [a, b, c, d] = abcd();
        let p1 = chromo(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let p2 = chromo(&[d.clone(), b.clone(), a.clone(), c.clone()]);

        // All ones: children are copies of their own parents
        let (c1, c2) = uniform_order_with_mask(&p1, &p2, &[true; 4]).unwrap();
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);

        // All zeros: children are copies of the other parent
        let (c1, c2) = uniform_order_with_mask(&p1, &p2, &[false; 4]).unwrap();
        assert_eq!(c1, p2);
        assert_eq!(c2, p1);
    }

    #[test]
    fn test_uniform_order_mask_length_mismatch() {
        let [a, b, c, d] = abcd();
        let p1 = chromo(&[a, b, c, d]);
        let result = uniform_order_with_mask(&p1, &p1, &[true, false]);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_one_point_edges() {
        let [a, b, c, d] = abcd();
        let p1 = chromo(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let p2 = chromo(&[c.clone(), d.clone(), a.clone(), b.clone()]);

        // Cut at 0 locks nothing
        let (c1, c2) = one_point_at(&p1, &p2, 0).unwrap();
        assert_eq!(c1, p2);
        assert_eq!(c2, p1);

        // Cut at n - 1 locks all but the last position
        let (c1, c2) = one_point_at(&p1, &p2, 3).unwrap();
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);

        let (c1, c2) = one_point_at(&p1, &p2, 2).unwrap();
        assert_eq!(names(&c1), vec!["A", "B", "C", "D"]);
        assert_eq!(names(&c2), vec!["C", "D", "A", "B"]);

        assert!(one_point_at(&p1, &p2, 4).is_err());
    }

    #[test]
    fn test_one_point_backfills_in_scan_order() {
        let [a, b, c, d] = abcd();
        let p1 = chromo(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let p2 = chromo(&[b.clone(), d.clone(), a.clone(), c.clone()]);

        // Child 1: [A, _, _, _]; scan of p2 places D at 1, C at 3, skips A at 2.
        // Leftover B (from locked index 0) fills position 2.
        let (c1, _) = one_point_at(&p1, &p2, 1).unwrap();
        assert_eq!(names(&c1), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_two_point_edges() {
        let [a, b, c, d] = abcd();
        let p1 = chromo(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let p2 = chromo(&[d.clone(), c.clone(), b.clone(), a.clone()]);

        // Empty middle segment: children copy their own parents
        let (c1, c2) = two_point_at(&p1, &p2, 2, 2).unwrap();
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);

        // Middle [1, 3) comes from the other parent where possible
        let (c1, c2) = two_point_at(&p1, &p2, 1, 3).unwrap();
        assert_eq!(names(&c1), vec!["A", "C", "B", "D"]);
        assert_eq!(names(&c2), vec!["D", "B", "C", "A"]);

        assert!(two_point_at(&p1, &p2, 3, 1).is_err());
        assert!(two_point_at(&p1, &p2, 0, 4).is_err());
    }

    #[test]
    fn test_random_variants_keep_permutation() {
        let cities: Vec<City> = (0..12).map(|i| City::new(format!("C{}", i), i, i * 2)).collect();
        let mut rng = RandomNumberGenerator::from_seed(31);
        for variant in [
            CrossoverType::UniformOrder,
            CrossoverType::OnePoint,
            CrossoverType::TwoPoint,
        ] {
            for _ in 0..100 {
                let p1 = Chromosome::shuffled(&cities, &mut rng).unwrap();
                let p2 = Chromosome::shuffled(&cities, &mut rng).unwrap();
                let (c1, c2) = variant.apply(&p1, &p2, &mut rng).unwrap();
                assert_permutation_of(&c1, &p1);
                assert_permutation_of(&c2, &p1);
            }
        }
    }

    #[test]
    fn test_single_city_parents() {
        let a = City::new("A", 3, 3);
        let p = chromo(&[a.clone()]);
        let mut rng = RandomNumberGenerator::from_seed(4);
        for variant in [
            CrossoverType::UniformOrder,
            CrossoverType::OnePoint,
            CrossoverType::TwoPoint,
        ] {
            let (c1, c2) = variant.apply(&p, &p, &mut rng).unwrap();
            assert_eq!(c1, p);
            assert_eq!(c2, p);
            assert_eq!(c1.distance(), 0);
        }
    }

    #[test]
    fn test_parent_length_mismatch() {
        let [a, b, c, _] = abcd();
        let p1 = chromo(&[a.clone(), b.clone(), c.clone()]);
        let p2 = chromo(&[a, b]);
        let mut rng = RandomNumberGenerator::from_seed(4);
        assert!(matches!(
            uniform_order(&p1, &p2, &mut rng),
            Err(GeneticError::Configuration(_))
        ));
    }

    #[test]
    fn test_mismatched_city_sets_violate_invariant() {
        let [a, b, c, d] = abcd();
        let [e, f, g, h] = ["E", "F", "G", "H"].map(|n| City::new(n, 0, 0));
        // Parent 2 repeats a city, so the leftovers cannot fill every gap
        let p1 = chromo(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let p2 = chromo(&[a.clone(), a.clone(), a.clone(), a.clone()]);
        assert!(matches!(
            one_point_at(&p1, &p2, 1),
            Err(GeneticError::InvariantViolation(_))
        ));

        // Too many leftovers: every donor city is new but no position is free
        let p3 = chromo(&[e, f, g, h]);
        let result = backfill(p1.cities(), p3.cities(), &[true; 4]);
        assert!(matches!(result, Err(GeneticError::InvariantViolation(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(CrossoverType::UniformOrder.to_string(), "UNIFORM_ORDER");
        assert_eq!(CrossoverType::TwoPoint.to_string(), "TWO_POINT");
        assert_eq!(CrossoverType::default(), CrossoverType::UniformOrder);
    }
}
