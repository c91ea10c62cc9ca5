//! Reading and writing grid files on disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use equipot_core::types::{GridState, MaskGrid, PotentialField};

use super::matrix::{parse_mask, parse_matrix, write_matrix};
use super::ParseError;

/// Read a real-valued matrix file.
pub fn read_matrix_file(path: &Path) -> Result<PotentialField, ParseError> {
    let content = fs::read_to_string(path)?;
    let grid = parse_matrix(&content)?;
    debug!("Read {:?} matrix from {}", grid.dim(), path.display());
    Ok(grid)
}

/// Read a mask file; non-zero entries are free cells.
pub fn read_mask_file(path: &Path) -> Result<MaskGrid, ParseError> {
    let content = fs::read_to_string(path)?;
    let mask = parse_mask(&content)?;
    debug!("Read {:?} mask from {}", mask.dim(), path.display());
    Ok(mask)
}

/// Write a matrix file, creating parent directories as needed.
pub fn write_matrix_file(path: &Path, grid: &PotentialField) -> Result<(), ParseError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_matrix(&mut out, grid)?;
    out.flush()?;
    Ok(())
}

/// Load a mask and seed potential and pair them into a [`GridState`].
///
/// Shape disagreement surfaces as [`ParseError::Grid`] wrapping
/// `SolverError::DimensionMismatch`.
pub fn load_grid_state(mask_path: &Path, potential_path: &Path) -> Result<GridState, ParseError> {
    let mask = read_mask_file(mask_path)?;
    let potential = read_matrix_file(potential_path)?;
    Ok(GridState::new(mask, potential)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use equipot_core::solver::SolverError;
    use ndarray::array;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("equipot-io-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_then_read_matrix_file() {
        let dir = scratch_dir("matrix");
        let path = dir.join("nested").join("potential.txt");
        let grid = array![[0.1, 0.2], [0.3, 0.4]];
        write_matrix_file(&path, &grid).unwrap();

        let back = read_matrix_file(&path).unwrap();
        for (a, b) in grid.iter().zip(back.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_grid_state_checks_shapes() {
        let dir = scratch_dir("state");
        let mask_path = dir.join("mask.txt");
        let potential_path = dir.join("potential.txt");
        fs::write(&mask_path, "0 0 0\n0 1 0\n0 0 0\n").unwrap();

        fs::write(&potential_path, "5 5 5\n0 0 0\n0 0 0\n").unwrap();
        let state = load_grid_state(&mask_path, &potential_path).unwrap();
        assert_eq!(state.free_cells(), 1);
        assert_eq!(state.potential()[[0, 1]], 5.0);

        fs::write(&potential_path, "5 5\n0 0\n").unwrap();
        let err = load_grid_state(&mask_path, &potential_path).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Grid(SolverError::DimensionMismatch { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_matrix_file(Path::new("/nonexistent/equipot/grid.txt")).unwrap_err();
        assert!(matches!(err, ParseError::IoError(_)));
    }
}
