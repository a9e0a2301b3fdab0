//! Reads a board from its line-based text form:
//!
//! ```text
//! <height> <width>
//! <number of persons>
//! <x> <y>            one line per person
//! <number of obstacles>
//! <x> <y>            one line per obstacle
//! <number of exits>
//! <x> <y>            one line per exit
//! ```
//!
//! `x` is the row and `y` the column. Blank lines are skipped.
use crate::grid::RescueGrid;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::Lines;
use std::time::Instant;

/// Error type for board input. Any of these aborts the run.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    /// The input stopped before the named item.
    UnexpectedEnd { expected: &'static str },
    InvalidNumber { line: usize, value: String },
    WrongFieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    InvalidDimensions { height: i64, width: i64 },
    OutOfBounds { line: usize, x: i64, y: i64 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "could not read input: {err}"),
            LoadError::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            LoadError::InvalidNumber { line, value } => {
                write!(f, "line {line}: invalid number \"{value}\"")
            }
            LoadError::WrongFieldCount {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} fields, found {found}"),
            LoadError::InvalidDimensions { height, width } => {
                write!(f, "invalid grid dimensions {height}x{width}")
            }
            LoadError::OutOfBounds { line, x, y } => {
                write!(f, "line {line}: ({x},{y}) lies outside the grid")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> LoadError {
        LoadError::Io(err)
    }
}

struct Fields<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
}

impl<'a> Fields<'a> {
    /// The next non-blank line split into exactly `N` integers, with its 1-based line number.
    fn read<const N: usize>(
        &mut self,
        expected: &'static str,
    ) -> Result<(usize, [i64; N]), LoadError> {
        let (ix, line) = self
            .lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or(LoadError::UnexpectedEnd { expected })?;
        let line_no = ix + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != N {
            return Err(LoadError::WrongFieldCount {
                line: line_no,
                expected: N,
                found: fields.len(),
            });
        }
        let mut values = [0; N];
        for (value, field) in values.iter_mut().zip(fields) {
            *value = field.parse().map_err(|_| LoadError::InvalidNumber {
                line: line_no,
                value: field.to_owned(),
            })?;
        }
        Ok((line_no, values))
    }

    fn count(&mut self, expected: &'static str) -> Result<usize, LoadError> {
        let (line, [n]) = self.read::<1>(expected)?;
        usize::try_from(n).map_err(|_| LoadError::InvalidNumber {
            line,
            value: n.to_string(),
        })
    }
}

const MAX_CELLS: i64 = i32::MAX as i64;

/// Parses a board from its text form.
pub fn parse_grid(input: &str) -> Result<RescueGrid, LoadError> {
    let mut fields = Fields {
        lines: input.lines().enumerate(),
    };
    let (_, [height, width]) = fields.read::<2>("grid dimensions")?;
    // Cell ids must fit in an i32.
    let valid = |d: i64| d > 0 && d <= MAX_CELLS;
    if !valid(height) || !valid(width) || height * width > MAX_CELLS {
        return Err(LoadError::InvalidDimensions { height, width });
    }
    let mut grid = RescueGrid::new(height as usize, width as usize);

    let sections: [(&'static str, &'static str, fn(&mut RescueGrid, i32, i32)); 3] = [
        ("person count", "person position", RescueGrid::set_person),
        ("obstacle count", "obstacle position", RescueGrid::set_blocked),
        ("exit count", "exit position", RescueGrid::set_exit),
    ];
    for (count_name, position_name, place) in sections {
        let count = fields.count(count_name)?;
        for _ in 0..count {
            let (line, [x, y]) = fields.read::<2>(position_name)?;
            if !(0..height).contains(&x) || !(0..width).contains(&y) {
                return Err(LoadError::OutOfBounds { line, x, y });
            }
            place(&mut grid, x as i32, y as i32);
        }
        debug!("read {count} entries for {count_name}");
    }
    Ok(grid)
}

/// Reads and parses the board stored at `path`.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<RescueGrid, LoadError> {
    let start = Instant::now();
    let text = fs::read_to_string(path.as_ref())?;
    let grid = parse_grid(&text)?;
    info!(
        "Parsed {} in {:.2?}: n={}, m={}, p={}, u={}, e={}",
        path.as_ref().display(),
        start.elapsed(),
        grid.height(),
        grid.width(),
        grid.person_count(),
        grid.obstacle_count(),
        grid.exit_count()
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = "\
3 4
2
0 0
2 3

1
1 1
1
0 3
";

    #[test]
    fn parses_board() {
        let grid = parse_grid(BOARD).unwrap();
        assert_eq!((grid.height(), grid.width()), (3, 4));
        assert_eq!(grid.persons(), &[0, 11]);
        assert!(grid.flags(5).is_blocked());
        assert!(grid.flags(3).is_exit());
        assert_eq!(grid.to_string(), "Grid 3x4:\nP..E\n.#..\n...P\n");
    }

    #[test]
    fn zero_counts() {
        let grid = parse_grid("1 1\n0\n0\n0\n").unwrap();
        assert_eq!(grid.person_count(), 0);
    }

    #[test]
    fn truncated_input() {
        let err = parse_grid("3 3\n2\n0 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnexpectedEnd {
                expected: "person position"
            }
        ));
        let err = parse_grid("3 3\n0\n0\n").unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedEnd { expected: "exit count" }));
    }

    #[test]
    fn malformed_fields() {
        let err = parse_grid("3 x\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidNumber { line: 1, .. }));
        let err = parse_grid("3 3\n1\n0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::WrongFieldCount {
                line: 3,
                expected: 2,
                found: 3
            }
        ));
        let err = parse_grid("3 3\n-1\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: invalid number \"-1\"");
    }

    #[test]
    fn rejects_bad_dimensions_and_positions() {
        assert!(matches!(
            parse_grid("0 3\n").unwrap_err(),
            LoadError::InvalidDimensions { height: 0, width: 3 }
        ));
        assert!(matches!(
            parse_grid("100000 100000\n0\n0\n0\n").unwrap_err(),
            LoadError::InvalidDimensions {
                height: 100000,
                width: 100000
            }
        ));
        assert!(matches!(
            parse_grid("1 2147483648\n").unwrap_err(),
            LoadError::InvalidDimensions { .. }
        ));
        let err = parse_grid("2 3\n1\n2 0\n").unwrap_err();
        assert!(matches!(err, LoadError::OutOfBounds { line: 3, x: 2, y: 0 }));
        let err = parse_grid("2 3\n0\n1\n0 -1\n").unwrap_err();
        assert!(matches!(err, LoadError::OutOfBounds { line: 4, x: 0, y: -1 }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_grid("/nonexistent/rescue/board.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
