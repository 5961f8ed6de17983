use std::fmt;

use crate::city::City;

/// Average and best distance of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub average: u64,
    pub best: u64,
}

/// Snapshot of a finished run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub first_generation: GenerationStats,
    pub last_generation: GenerationStats,
    /// Sum of the average distance over all generations.
    pub area_under_average_distances: u64,
    /// Sum of the best distance over all generations.
    pub area_under_best_distances: u64,
    pub average_distance_history: Vec<u64>,
    pub best_distance_history: Vec<u64>,
    /// The fittest tour of the last generation.
    pub best_tour: Vec<City>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----------Genetic Algorithm Results------------")?;
        writeln!(
            f,
            "Average Distance of First Generation:  {}",
            self.first_generation.average
        )?;
        writeln!(
            f,
            "Average Distance of Last Generation:   {}",
            self.last_generation.average
        )?;
        writeln!(
            f,
            "Best Distance of First Generation:     {}",
            self.first_generation.best
        )?;
        writeln!(
            f,
            "Best Distance of Last Generation:      {}",
            self.last_generation.best
        )?;
        writeln!(
            f,
            "Area Under Average Distance:           {}",
            self.area_under_average_distances
        )?;
        write!(
            f,
            "Area Under Best Distance:              {}",
            self.area_under_best_distances
        )
    }
}
