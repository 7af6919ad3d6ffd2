use std::fs;
use std::io;

use thiserror::Error;

use crate::domain::{Grid, ShapeError};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid file format - {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error - {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid file format - {0}")]
    Shape(#[from] ShapeError),
}

/// Saves and loads grids as JSON.
///
/// Only the raw text of each cell is written; values are derived and have
/// to be resolved again after loading.
pub struct FileRepository;

impl FileRepository {
    pub fn save_grid(grid: &Grid, filename: &str) -> Result<String, PersistenceError> {
        let json = serde_json::to_string_pretty(grid)?;
        fs::write(filename, json)?;
        tracing::info!(filename, "saved grid");
        Ok(filename.to_string())
    }

    pub fn load_grid(filename: &str) -> Result<(Grid, String), PersistenceError> {
        let content = fs::read_to_string(filename)?;
        let grid: Grid = serde_json::from_str(&content)?;
        grid.check_shape()?;
        tracing::info!(filename, width = grid.width(), height = grid.height(), "loaded grid");
        Ok((grid, filename.to_string()))
    }
}
