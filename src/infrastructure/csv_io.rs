use crate::domain::Grid;

use super::persistence::PersistenceError;

/// CSV exchange of grid contents.
pub struct CsvExporter;

impl CsvExporter {
    /// Writes one record per row containing each cell's display value.
    pub fn export_to_csv(grid: &Grid, filename: &str) -> Result<String, PersistenceError> {
        let mut writer = csv::Writer::from_path(filename)?;
        for row in 0..grid.height() {
            let record: Vec<String> = (0..grid.width())
                .map(|col| {
                    grid.cell(row, col)
                        .map(|cell| cell.value.to_string())
                        .unwrap_or_default()
                })
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        tracing::info!(filename, "exported csv");
        Ok(filename.to_string())
    }

    /// Reads CSV fields as raw cell texts into a `width` x `height` grid.
    ///
    /// Rows and columns beyond the grid are ignored. The returned grid is
    /// not resolved.
    pub fn import_from_csv(
        filename: &str,
        width: usize,
        height: usize,
    ) -> Result<Grid, PersistenceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(filename)?;

        let mut grid = Grid::new(width, height);
        for (row, record) in reader.records().take(height).enumerate() {
            let record = record?;
            for (col, field) in record.iter().take(width).enumerate() {
                grid.set_raw(row, col, field);
            }
        }
        tracing::info!(filename, "imported csv");
        Ok(grid)
    }
}
