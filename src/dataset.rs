//! # Dataset
//!
//! Reads city lists from TSPLIB-style coordinate files such as `att48.tsp`:
//!
//! ```text
//! NAME : att48
//! TYPE : TSP
//! DIMENSION : 48
//! EDGE_WEIGHT_TYPE : ATT
//! NODE_COORD_SECTION
//! 1 6734 1453
//! 2 2233 10
//! ...
//! EOF
//! ```
//!
//! Header lines before the coordinate section are scanned for `DIMENSION`; any
//! other content there (including explicit edge weight matrices) is skipped.
//! Both `NODE_COORD_SECTION` and `DISPLAY_DATA_SECTION` are accepted. Coordinates
//! are read as decimals and truncated toward zero.

use std::fs;
use std::path::Path;

use crate::city::City;
use crate::error::{GeneticError, Result};

const COORDINATE_SECTIONS: [&str; 2] = ["NODE_COORD_SECTION", "DISPLAY_DATA_SECTION"];

fn dataset_error(message: impl Into<String>) -> GeneticError {
    GeneticError::Dataset(message.into())
}

fn parse_coordinate(raw: &str, line_number: usize) -> Result<i32> {
    let value: f64 = raw.parse().map_err(|_| {
        dataset_error(format!(
            "Line {}: invalid coordinate '{}'",
            line_number, raw
        ))
    })?;
    if !value.is_finite() {
        return Err(dataset_error(format!(
            "Line {}: coordinate '{}' is not finite",
            line_number, raw
        )));
    }
    Ok(value.trunc() as i32)
}

/// Parses the cities of a TSPLIB-style file.
///
/// # Examples
///
/// ```
/// use genalg_tsp::dataset::parse_tsplib;
///
/// let text = "NAME : tiny\nDIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 3.9 4.2\nEOF\n";
/// let cities = parse_tsplib(text).unwrap();
/// assert_eq!(cities.len(), 2);
/// assert_eq!((cities[1].x(), cities[1].y()), (3, 4));
/// ```
///
/// # Errors
///
/// Returns `GeneticError::Dataset` if the dimension or coordinate section is
/// missing, if there are fewer coordinate lines than the dimension, or if a line
/// cannot be parsed.
pub fn parse_tsplib(text: &str) -> Result<Vec<City>> {
    let mut dimension: Option<usize> = None;
    let mut lines = text.lines().enumerate();

    let mut found_section = false;
    for (_, line) in lines.by_ref() {
        let line = line.trim();
        if COORDINATE_SECTIONS.iter().any(|section| line.starts_with(section)) {
            found_section = true;
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("DIMENSION") {
                let value = value.trim();
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| dataset_error(format!("Invalid dimension '{}'", value)))?;
                dimension = Some(parsed);
            }
        }
    }

    let dimension = dimension.ok_or_else(|| dataset_error("Missing DIMENSION header"))?;
    if !found_section {
        return Err(dataset_error("Missing coordinate section"));
    }

    let mut cities = Vec::with_capacity(dimension);
    for (index, line) in lines {
        if cities.len() == dimension {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "EOF" {
            break;
        }

        let line_number = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(dataset_error(format!(
                "Line {}: expected 'name x y', got '{}'",
                line_number, line
            )));
        }
        let x = parse_coordinate(fields[1], line_number)?;
        let y = parse_coordinate(fields[2], line_number)?;
        cities.push(City::new(fields[0], x, y));
    }

    if cities.len() != dimension {
        return Err(dataset_error(format!(
            "Expected {} cities, found {}",
            dimension,
            cities.len()
        )));
    }
    Ok(cities)
}

/// Reads and parses a TSPLIB-style file.
pub fn load_tsplib(path: impl AsRef<Path>) -> Result<Vec<City>> {
    let text = fs::read_to_string(path)?;
    parse_tsplib(&text)
}
