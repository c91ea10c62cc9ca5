//! Parser and writer for the text matrix format.
//!
//! ```text
//! # mask for a 3x4 box, 1 = free, 0 = fixed
//! 0 0 0 0
//! 0 1 1 0
//! 0 0 0 0
//! ```
//!
//! Values on a line are separated by any whitespace. Blank lines and lines
//! starting with `#` are skipped; a `#` after data starts a trailing comment.
//! Every data row must have the same number of values.

use std::io::Write;

use ndarray::Array2;

use equipot_core::types::{MaskGrid, PotentialField};

use super::ParseError;

/// Parse a real-valued matrix from a string.
pub fn parse_matrix(content: &str) -> Result<PotentialField, ParseError> {
    let mut values = Vec::new();
    let mut cols = 0;
    let mut rows = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let start = values.len();
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| ParseError::FormatError {
                line: line_no,
                message: format!("Invalid number: {}", token),
            })?;
            values.push(value);
        }
        let width = values.len() - start;

        if rows == 0 {
            cols = width;
        } else if width != cols {
            return Err(ParseError::FormatError {
                line: line_no,
                message: format!("Expected {} values, found {}", cols, width),
            });
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(ParseError::FormatError {
            line: content.lines().count().max(1),
            message: "No data rows found".into(),
        });
    }

    Array2::from_shape_vec((rows, cols), values).map_err(|e| ParseError::FormatError {
        line: 1,
        message: e.to_string(),
    })
}

/// Parse a solver mask. Any non-zero value marks a free cell.
pub fn parse_mask(content: &str) -> Result<MaskGrid, ParseError> {
    Ok(parse_matrix(content)?.mapv(|v| v != 0.0))
}

/// Write `grid` with six decimal places, one row per line.
pub fn write_matrix<W: Write>(out: &mut W, grid: &PotentialField) -> Result<(), ParseError> {
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{:.6}", v)).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Write a mask as `1`/`0` values in the same layout as [`write_matrix`].
pub fn write_mask<W: Write>(out: &mut W, mask: &MaskGrid) -> Result<(), ParseError> {
    write_matrix(out, &mask.mapv(|free| if free { 1.0 } else { 0.0 }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_parse_simple_matrix() {
        let content = "1 2 3\n4.5 -6 7e-1\n";
        let grid = parse_matrix(content).unwrap();
        assert_eq!(grid, array![[1.0, 2.0, 3.0], [4.5, -6.0, 0.7]]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let content = "# header\n\n1\t2  # trailing\n   \n3 4\n";
        let grid = parse_matrix(content).unwrap();
        assert_eq!(grid, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_ragged_row_reports_line() {
        let content = "1 2 3\n# comment\n4 5\n";
        match parse_matrix(content) {
            Err(ParseError::FormatError { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_token_reports_line() {
        match parse_matrix("1 2\n3 x\n") {
            Err(ParseError::FormatError { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains('x'));
            }
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            parse_matrix("# nothing here\n\n"),
            Err(ParseError::FormatError { .. })
        ));
    }

    #[test]
    fn test_mask_coerces_non_zero_to_free() {
        let mask = parse_mask("0 1 2\n-1 0.5 0\n").unwrap();
        assert_eq!(mask, array![[false, true, true], [true, true, false]]);
    }

    #[test]
    fn test_write_uses_six_decimals() {
        let mut out = Vec::new();
        write_matrix(&mut out, &array![[1.0, -0.25], [1.0 / 3.0, 0.0]]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "1.000000 -0.250000\n0.333333 0.000000\n");
    }

    #[test]
    fn test_written_mask_reads_back() {
        let mask = array![[true, false], [false, true]];
        let mut out = Vec::new();
        write_mask(&mut out, &mask).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(parse_mask(&text).unwrap(), mask);
    }
}
