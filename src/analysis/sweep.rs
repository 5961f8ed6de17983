//! # Rate sweep
//!
//! Runs the engine over a grid of crossover and mutation rates and records, for
//! every cell, the mean area under the best-distance curve. Lower is better: a
//! small area means the run found short tours early and kept them.
//!
//! Rows follow the mutation range and columns the crossover range.

use std::fmt;

use tracing::info;

use crate::error::{GeneticError, Result};
use crate::evolution::GeneticAlgorithm;

/// An inclusive range of rates walked in fixed increments.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRange {
    start: f64,
    finish: f64,
    increment: f64,
    steps: usize,
}

impl RateRange {
    /// Creates a range from `start` to `finish` in steps of `increment`.
    ///
    /// The number of steps is computed in whole thousandths, so increments finer
    /// than 0.001 are rejected. When `start == finish` the increment may be zero
    /// and the range holds a single rate.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if a value lies outside `[0, 1]`, if
    /// `finish < start`, or if the increment is larger than `finish - start`.
    pub fn new(start: f64, finish: f64, increment: f64) -> Result<Self> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(start) || !in_unit(finish) || !in_unit(increment) {
            return Err(GeneticError::Configuration(
                "Range values must be between 0 and 1".to_string(),
            ));
        }
        if finish < start {
            return Err(GeneticError::Configuration(
                "Range finish must not be less than its start".to_string(),
            ));
        }
        if increment > finish - start {
            return Err(GeneticError::Configuration(
                "Range increment cannot exceed the difference of finish and start".to_string(),
            ));
        }

        let start_millis = (start * 1000.0) as u64;
        let finish_millis = (finish * 1000.0) as u64;
        let increment_millis = (increment * 1000.0) as u64;

        let steps = if start_millis == finish_millis {
            1
        } else if increment_millis == 0 {
            return Err(GeneticError::Configuration(
                "Range increment must be at least 0.001".to_string(),
            ));
        } else {
            (finish_millis - start_millis) / increment_millis + 1
        };

        Ok(Self {
            start,
            finish,
            increment,
            steps: steps as usize,
        })
    }

    /// A range holding exactly one rate.
    pub fn single(rate: f64) -> Result<Self> {
        Self::new(rate, rate, 0.0)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn finish(&self) -> f64 {
        self.finish
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Number of rates in the range.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The rate at step `index`, clamped to 1.
    pub fn rate_at(&self, index: usize) -> f64 {
        (self.start + index as f64 * self.increment).min(1.0)
    }

    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |i| self.rate_at(i))
    }
}

/// A grid of crossover and mutation rates to evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSweep {
    crossover: RateRange,
    mutation: RateRange,
    runs_per_cell: usize,
}

/// One cell of a finished sweep.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepCell {
    pub row: usize,
    pub column: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Mean area under the best-distance curve, truncated.
    pub value: u64,
}

/// The outcome of a sweep.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    crossover: RateRange,
    mutation: RateRange,
    /// `grid[row][column]`, rows by mutation rate.
    grid: Vec<Vec<u64>>,
    min: u64,
    max: u64,
}

impl RateSweep {
    /// Creates a sweep that runs every cell `runs_per_cell` times.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `runs_per_cell` is zero.
    pub fn new(crossover: RateRange, mutation: RateRange, runs_per_cell: usize) -> Result<Self> {
        if runs_per_cell == 0 {
            return Err(GeneticError::Configuration(
                "Runs per cell must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            crossover,
            mutation,
            runs_per_cell,
        })
    }

    /// Total number of engine runs the sweep performs.
    pub fn total_runs(&self) -> usize {
        self.crossover.steps() * self.mutation.steps() * self.runs_per_cell
    }

    /// Evaluates every cell on `ga`.
    ///
    /// Each run resets the engine first. The engine's crossover and mutation rates
    /// are restored afterwards, even when a run fails.
    pub fn run(&self, ga: &mut GeneticAlgorithm) -> Result<SweepResult> {
        let crossover_rate = ga.options().get_crossover_rate();
        let mutation_rate = ga.options().get_mutation_rate();

        let outcome = self.evaluate(ga);

        ga.set_crossover_rate(crossover_rate)?;
        ga.set_mutation_rate(mutation_rate)?;
        outcome
    }

    fn evaluate(&self, ga: &mut GeneticAlgorithm) -> Result<SweepResult> {
        info!(
            columns = self.crossover.steps(),
            rows = self.mutation.steps(),
            runs_per_cell = self.runs_per_cell,
            total_runs = self.total_runs(),
            "Starting rate sweep"
        );

        let mut grid = Vec::with_capacity(self.mutation.steps());
        let mut min = u64::MAX;
        let mut max = 0u64;

        for (row, mutation_rate) in self.mutation.rates().enumerate() {
            let mut cells = Vec::with_capacity(self.crossover.steps());
            for (column, crossover_rate) in self.crossover.rates().enumerate() {
                let mut total = 0u64;
                for _ in 0..self.runs_per_cell {
                    ga.reset();
                    ga.set_crossover_rate(crossover_rate)?;
                    ga.set_mutation_rate(mutation_rate)?;
                    ga.run()?;
                    total += ga.area_under_best_distances()?;
                }
                let value = total / self.runs_per_cell as u64;
                min = min.min(value);
                max = max.max(value);
                info!(row, column, crossover_rate, mutation_rate, value, "Sweep cell complete");
                cells.push(value);
            }
            grid.push(cells);
        }

        Ok(SweepResult {
            crossover: self.crossover,
            mutation: self.mutation,
            grid,
            min,
            max,
        })
    }
}

impl SweepResult {
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn columns(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn grid(&self) -> &[Vec<u64>] {
        &self.grid
    }

    pub fn min_value(&self) -> u64 {
        self.min
    }

    pub fn max_value(&self) -> u64 {
        self.max
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<SweepCell> {
        let value = *self.grid.get(row)?.get(column)?;
        Some(SweepCell {
            row,
            column,
            crossover_rate: self.crossover.rate_at(column),
            mutation_rate: self.mutation.rate_at(row),
            value,
        })
    }

    fn cells_with(&self, value: u64) -> Vec<SweepCell> {
        let mut found = Vec::new();
        for (row, cells) in self.grid.iter().enumerate() {
            for (column, &cell) in cells.iter().enumerate() {
                if cell == value {
                    found.extend(self.cell(row, column));
                }
            }
        }
        found
    }

    /// Cells holding the smallest value.
    pub fn best_cells(&self) -> Vec<SweepCell> {
        self.cells_with(self.min)
    }

    /// Cells holding the largest value.
    pub fn worst_cells(&self) -> Vec<SweepCell> {
        self.cells_with(self.max)
    }
}

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cells in &self.grid {
            let line: Vec<String> = cells.iter().map(u64::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        writeln!(f, "---------------Heat Map Results-----------------")?;
        for (title, cells) in [("Best", self.best_cells()), ("Worst", self.worst_cells())] {
            writeln!(f, "{} Value(s) found at:", title)?;
            for cell in cells {
                writeln!(f, "    Crossover Rate:  {}", cell.crossover_rate)?;
                writeln!(f, "     Mutation Rate:  {}", cell.mutation_rate)?;
                writeln!(f, "        Coordinate:  ({}, {})", cell.column, cell.row)?;
            }
        }
        write!(f, "-------------------Finished--------------------")
    }
}
