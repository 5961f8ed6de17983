//! # Selection
//!
//! Selection operators choose which chromosomes of the current population get to
//! reproduce. The engine uses tournament selection.

pub mod tournament;

pub use tournament::{tournament, tournament_among, NOT_FITTEST_ODDS};
