use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{EvalError, ShapeError};

/// Widest grid whose columns all have a one-letter reference name.
pub const MAX_WIDTH: usize = 26;

/// Resolved value of a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Raw text of a non-formula cell, kept verbatim.
    Text(String),
    /// Result of a formula.
    Number(f64),
    /// The formula could not be resolved.
    Error(EvalError),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EvalError> {
        match self {
            CellValue::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Display form used by the grid and by CSV export.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(value) => f.write_str(&format_number(*value)),
            CellValue::Error(_) => f.write_str("#ERROR"),
        }
    }
}

/// Formats a number the way it is spliced back into an expression.
///
/// Never uses exponent notation, so the text can always be rescanned as a
/// plain decimal literal. Infinities and NaN come out as `inf`, `-inf` and
/// `NaN`.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub raw: String,
    /// Derived from `raw`; recomputed after loading.
    #[serde(skip)]
    pub value: CellValue,
}

impl Cell {
    pub fn is_formula(&self) -> bool {
        self.raw.starts_with('=')
    }
}

/// Fixed-size grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(4, 6)
    }
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks that every column can be named by one letter and that the
    /// grid has at least one row.
    pub fn check_dimensions(width: usize, height: usize) -> Result<(), ShapeError> {
        if !(1..=MAX_WIDTH).contains(&width) {
            return Err(ShapeError::Width(width));
        }
        if height == 0 {
            return Err(ShapeError::Height);
        }
        Ok(())
    }

    /// Checks the dimensions and that the cell storage matches them. Only a
    /// deserialized grid can fail this.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        Self::check_dimensions(self.width, self.height)?;
        if self.width.checked_mul(self.height) != Some(self.cells.len()) {
            return Err(ShapeError::CellCount {
                width: self.width,
                height: self.height,
                cells: self.cells.len(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        self.contains(row, col).then(|| self.width * row + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(self.index(row, col)?)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        let index = self.index(row, col)?;
        self.cells.get_mut(index)
    }

    /// Raw text of a cell, empty for addresses outside the grid.
    pub fn raw(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map(|cell| cell.raw.as_str()).unwrap_or("")
    }

    /// Overwrites the raw text without resolving it.
    pub fn set_raw(&mut self, row: usize, col: usize, raw: impl Into<String>) -> bool {
        match self.cell_mut(row, col) {
            Some(cell) => {
                cell.raw = raw.into();
                true
            }
            None => false,
        }
    }

    /// Iterates over `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index / width, index % width, cell))
    }

    /// Column label used both on screen and in references (`a`, `b`, ...).
    pub fn column_label(col: usize) -> String {
        u8::try_from(col)
            .ok()
            .filter(|&c| c < 26)
            .map(|c| char::from(b'a' + c).to_string())
            .unwrap_or_else(|| format!("#{col}"))
    }

    /// Address label of a cell, e.g. `b3` for row 3, column 1.
    pub fn cell_label(row: usize, col: usize) -> String {
        format!("{}{}", Self::column_label(col), row)
    }

    /// Parses a reference token such as `a0` or `c12` into `(row, col)`.
    ///
    /// The column is a single lowercase letter and the row is the 0-based
    /// row number. Bounds are not checked here.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcalc::domain::Grid;
    ///
    /// assert_eq!(Grid::parse_cell_reference("a0"), Some((0, 0)));
    /// assert_eq!(Grid::parse_cell_reference("c12"), Some((12, 2)));
    /// assert_eq!(Grid::parse_cell_reference("A1"), None);
    /// ```
    pub fn parse_cell_reference(token: &str) -> Option<(usize, usize)> {
        let (&letter, digits) = token.as_bytes().split_first()?;
        if !letter.is_ascii_lowercase()
            || digits.is_empty()
            || !digits.iter().all(u8::is_ascii_digit)
        {
            return None;
        }
        let row = token[1..].parse::<usize>().ok()?;
        Some((row, usize::from(letter - b'a')))
    }
}
