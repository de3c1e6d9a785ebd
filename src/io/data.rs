//! Whitespace-delimited column files, the format used for measured data.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CpError, Result};

/// Read `ncols` numeric columns from a text file.
///
/// Blank lines and `#` comments are skipped, as is a single leading header
/// line that does not parse as numbers.
pub fn read_columns<P: AsRef<Path>>(path: P, ncols: usize) -> Result<Vec<Vec<f64>>> {
    let reader = BufReader::new(File::open(path)?);
    parse_columns(reader, ncols)
}

pub fn parse_columns<R: BufRead>(reader: R, ncols: usize) -> Result<Vec<Vec<f64>>> {
    if ncols == 0 {
        return Err(CpError::invalid("at least one column is required"));
    }
    let mut columns = vec![Vec::new(); ncols];
    let mut seen_data = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let parsed: std::result::Result<Vec<f64>, _> =
            fields.iter().take(ncols).map(|f| f.parse::<f64>()).collect();

        match parsed {
            Ok(values) if values.len() == ncols => {
                for (column, value) in columns.iter_mut().zip(values) {
                    column.push(value);
                }
                seen_data = true;
            }
            Ok(values) => {
                return Err(CpError::Parse {
                    line: index + 1,
                    message: format!("expected {} columns, found {}", ncols, values.len()),
                })
            }
            Err(_) if !seen_data => continue,
            Err(e) => {
                return Err(CpError::Parse { line: index + 1, message: e.to_string() });
            }
        }
    }
    Ok(columns)
}

/// Read every number in a file, one column, ignoring comments.
pub fn read_values<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let mut columns = read_columns(path, 1)?;
    Ok(columns.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_with_header_and_comments() {
        let text = "t x z\n# measured\n0.0 0.0 2.45\n\n0.1 1.0 3.2\n";
        let cols = parse_columns(Cursor::new(text), 3).unwrap();
        assert_eq!(cols[0], vec![0.0, 0.1]);
        assert_eq!(cols[2], vec![2.45, 3.2]);
    }

    #[test]
    fn test_short_row_is_error() {
        let text = "1 2\n3\n";
        let err = parse_columns(Cursor::new(text), 2).unwrap_err();
        assert!(matches!(err, CpError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_garbage_after_data_is_error() {
        let text = "1.0\nabc\n";
        assert!(parse_columns(Cursor::new(text), 1).is_err());
    }
}
