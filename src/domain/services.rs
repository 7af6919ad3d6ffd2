//! Cell resolution pipeline.
//!
//! Resolving a formula cell substitutes each cell reference with the
//! referenced cell's freshly resolved value, evaluates the resulting
//! expression and stores the outcome in the cell. Referenced cells are
//! resolved against the same grid and written back as well, so within one
//! pass a cell resolved earlier is seen with its new value while untouched
//! cells keep whatever value they had.
//!
//! Dependent cells are never re-resolved automatically. There is no cycle
//! detection either: a reference chain is cut off by
//! [`EngineConfig::max_reference_depth`], which is what a cyclic formula
//! eventually runs into.

use serde::{Deserialize, Serialize};

use super::errors::{EvalError, EvalResult};
use super::expression;
use super::models::{CellValue, Grid};
use super::references::substitute_references;
use super::stack::ensure_sufficient_stack;

/// Tunables of the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of formulas that may be in the middle of resolution
    /// at once, i.e. the longest reference chain that can be followed.
    pub max_reference_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_reference_depth: 1024 }
    }
}

/// Formula engine for a [`Grid`].
///
/// # Examples
///
/// ```
/// use gridcalc::domain::{CellValue, Engine, Grid};
///
/// let engine = Engine::default();
/// let mut grid = Grid::default();
///
/// engine.set_cell_raw(&mut grid, 0, 0, "5").unwrap();
/// let value = engine.set_cell_raw(&mut grid, 0, 1, "=a0*2").unwrap();
/// assert_eq!(value, CellValue::Number(10.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates a bare expression without cell references.
    pub fn evaluate_expression(&self, text: &str) -> EvalResult<f64> {
        expression::evaluate_expression(text)
    }

    /// Resolves the cell at `(row, col)`, stores the value in the grid and
    /// returns it.
    ///
    /// A non-formula cell resolves to its raw text unchanged. Addresses
    /// outside the grid resolve to [`EvalError::InvalidReference`] and leave
    /// the grid untouched.
    pub fn resolve_cell(&self, grid: &mut Grid, row: usize, col: usize) -> CellValue {
        if !grid.contains(row, col) {
            return CellValue::Error(EvalError::InvalidReference(Grid::cell_label(row, col)));
        }
        Resolution::new(grid, &self.config).resolve(row, col)
    }

    /// Overwrites a cell's raw text and resolves that cell only.
    pub fn set_cell_raw(
        &self,
        grid: &mut Grid,
        row: usize,
        col: usize,
        raw: impl Into<String>,
    ) -> EvalResult<CellValue> {
        if !grid.set_raw(row, col, raw) {
            return Err(EvalError::InvalidReference(Grid::cell_label(row, col)));
        }
        Ok(self.resolve_cell(grid, row, col))
    }

    /// Resolves every cell once, in row-major order, within a single pass.
    pub fn resolve_all(&self, grid: &mut Grid) {
        let (width, height) = (grid.width(), grid.height());
        let mut resolution = Resolution::new(grid, &self.config);
        for row in 0..height {
            for col in 0..width {
                resolution.resolve(row, col);
            }
        }
    }
}

/// Resolves a cell with the default engine configuration.
pub fn resolve_cell(grid: &mut Grid, row: usize, col: usize) -> CellValue {
    Engine::default().resolve_cell(grid, row, col)
}

/// State of one resolution pass, threaded through every recursive call.
struct Resolution<'g> {
    grid: &'g mut Grid,
    depth: usize,
    max_depth: usize,
}

impl<'g> Resolution<'g> {
    fn new(grid: &'g mut Grid, config: &EngineConfig) -> Self {
        Self {
            grid,
            depth: 0,
            max_depth: config.max_reference_depth,
        }
    }

    fn resolve(&mut self, row: usize, col: usize) -> CellValue {
        let raw = self.grid.raw(row, col).to_string();
        let value = match raw.strip_prefix('=') {
            None => CellValue::Text(raw.clone()),
            Some(body) => match self.evaluate_formula(body) {
                Ok(number) => CellValue::Number(number),
                Err(error) => CellValue::Error(error),
            },
        };

        tracing::debug!(cell = %Grid::cell_label(row, col), %raw, %value, "resolved cell");
        if let Some(cell) = self.grid.cell_mut(row, col) {
            cell.value = value.clone();
        }
        value
    }

    fn evaluate_formula(&mut self, body: &str) -> EvalResult<f64> {
        if self.depth >= self.max_depth {
            tracing::warn!(limit = self.max_depth, "reference depth limit reached");
            return Err(EvalError::RecursionLimit { limit: self.max_depth });
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| -> EvalResult<f64> {
            let expanded = substitute_references(body, |token| self.resolve_reference(token))?;
            expression::evaluate_expression(&expanded)
        });
        self.depth -= 1;
        result
    }

    /// Text that replaces a reference token inside a formula.
    fn resolve_reference(&mut self, token: &str) -> EvalResult<String> {
        let (row, col) = Grid::parse_cell_reference(token)
            .filter(|&(row, col)| self.grid.contains(row, col))
            .ok_or_else(|| EvalError::InvalidReference(token.to_string()))?;

        match self.resolve(row, col) {
            CellValue::Error(error) => Err(error),
            value => Ok(value.to_string()),
        }
    }
}
