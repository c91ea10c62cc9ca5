//! # Equipot IO
//!
//! Plain-text grid interchange for the equipot solver. This crate provides:
//!
//! - **Matrix text format** ([`matrix`]): Whitespace-delimited rows of
//!   numbers, one grid row per line, `#` comments allowed.
//! - **File helpers** ([`files`]): Read and write grids on disk and load a
//!   validated mask/potential pair.

pub mod files;
pub mod matrix;

use equipot_core::solver::SolverError;
use thiserror::Error;

pub use files::{load_grid_state, read_mask_file, read_matrix_file, write_matrix_file};
pub use matrix::{parse_mask, parse_matrix, write_mask, write_matrix};

/// Errors while reading or writing grid files.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    FormatError { line: usize, message: String },

    #[error("Invalid grid: {0}")]
    Grid(#[from] SolverError),
}
