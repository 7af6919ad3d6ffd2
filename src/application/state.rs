//! Application state management for the terminal grid calculator.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface.

use crate::domain::{Cell, CellValue, Engine, Grid};
use crate::infrastructure::{AppConfig, PersistenceError};
use std::collections::VecDeque;

const DEFAULT_SAVE_FILE: &str = "grid.json";
const DEFAULT_CSV_FILE: &str = "grid.csv";
const MAX_UNDO_STACK_SIZE: usize = 100;

/// Represents the current mode of the application.
///
/// The application can be in different modes that determine how user input
/// is interpreted and what UI elements are displayed.
#[derive(Debug)]
pub enum AppMode {
    /// Normal navigation mode - arrow keys move selection, shortcuts available
    Normal,
    /// Cell editing mode - user is typing the raw text of a cell
    Editing,
    /// Help screen is displayed
    Help,
    /// Save dialog is open
    SaveAs,
    /// Load dialog is open
    LoadFile,
    /// CSV export dialog is open
    ExportCsv,
    /// CSV import dialog is open
    ImportCsv,
}

/// Represents an action that can be undone/redone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// The raw text of a cell was replaced.
    RawEdited {
        row: usize,
        col: usize,
        old_raw: String,
        new_raw: String,
    },
}

/// Main application state containing the grid and UI state.
///
/// # Examples
///
/// ```
/// use gridcalc::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected_row, 0);
/// assert_eq!(app.selected_col, 0);
/// assert_eq!(app.grid.width(), 4);
/// ```
#[derive(Debug)]
pub struct App {
    /// The grid of cells
    pub grid: Grid,
    /// Formula engine used for every edit
    pub engine: Engine,
    /// Currently selected row (zero-based)
    pub selected_row: usize,
    /// Currently selected column (zero-based)
    pub selected_col: usize,
    /// Top-most row visible in the viewport
    pub scroll_row: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the input buffer, in characters
    pub cursor_position: usize,
    /// Current filename (if the grid has been saved/loaded)
    pub filename: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Undo stack for tracking changes
    pub undo_stack: VecDeque<UndoAction>,
    /// Redo stack for tracking undone changes
    pub redo_stack: VecDeque<UndoAction>,
    /// Viewport height in rows (for scrolling calculations)
    pub viewport_rows: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            engine: Engine::new(config.engine),
            selected_row: 0,
            selected_col: 0,
            scroll_row: 0,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            filename: None,
            help_scroll: 0,
            status_message: None,
            filename_input: String::new(),
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            viewport_rows: 20,
        }
    }

    /// The cell under the cursor.
    pub fn selected_cell(&self) -> Option<&Cell> {
        self.grid.cell(self.selected_row, self.selected_col)
    }

    /// Switches to editing mode for the currently selected cell.
    ///
    /// The input buffer starts with the cell's raw text, not its value.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.input = self.grid.raw(self.selected_row, self.selected_col).to_string();
        self.cursor_position = self.input.chars().count();
    }

    /// Commits the input as the selected cell's raw text, resolves the cell
    /// and moves down one row.
    pub fn finish_editing(&mut self) {
        let raw = std::mem::take(&mut self.input);
        self.set_raw_with_undo(self.selected_row, self.selected_col, raw);

        if self.selected_row + 1 < self.grid.height() {
            self.selected_row += 1;
            self.ensure_cursor_visible();
        }

        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Re-resolves the selected cell against the current grid contents.
    ///
    /// Cells never update when something they reference changes; this is
    /// the explicit way to refresh one.
    pub fn resolve_selected(&mut self) {
        let (row, col) = (self.selected_row, self.selected_col);
        let value = self.engine.resolve_cell(&mut self.grid, row, col);
        self.report_value(row, col, &value);
    }

    /// Re-resolves every cell in row-major order.
    pub fn resolve_everything(&mut self) {
        self.engine.resolve_all(&mut self.grid);
        let errors = self
            .grid
            .iter()
            .filter(|(_, _, cell)| matches!(cell.value, CellValue::Error(_)))
            .count();
        self.status_message = Some(match errors {
            0 => "Recalculated all cells".to_string(),
            1 => "Recalculated all cells, 1 error".to_string(),
            n => format!("Recalculated all cells, {n} errors"),
        });
    }

    fn report_value(&mut self, row: usize, col: usize, value: &CellValue) {
        self.status_message = value
            .error()
            .map(|error| format!("{}: {}", Grid::cell_label(row, col), error));
    }

    /// Switches to save-as mode to prompt for a filename.
    pub fn start_save_as(&mut self) {
        self.start_filename_prompt(AppMode::SaveAs, self.default_filename());
    }

    /// Switches to load-file mode to prompt for a filename.
    pub fn start_load_file(&mut self) {
        self.start_filename_prompt(AppMode::LoadFile, self.default_filename());
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        let filename = self
            .filename
            .as_ref()
            .map(|f| f.replace(".json", ".csv"))
            .unwrap_or_else(|| DEFAULT_CSV_FILE.to_string());
        self.start_filename_prompt(AppMode::ExportCsv, filename);
    }

    /// Switches to CSV import mode to prompt for a filename.
    pub fn start_csv_import(&mut self) {
        self.start_filename_prompt(AppMode::ImportCsv, DEFAULT_CSV_FILE.to_string());
    }

    fn default_filename(&self) -> String {
        self.filename.clone().unwrap_or_else(|| DEFAULT_SAVE_FILE.to_string())
    }

    fn start_filename_prompt(&mut self, mode: AppMode, filename: String) {
        self.mode = mode;
        self.cursor_position = filename.chars().count();
        self.filename_input = filename;
        self.status_message = None;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Filename typed into the prompt, or the mode's default when empty.
    pub fn prompt_filename(&self) -> String {
        if !self.filename_input.is_empty() {
            return self.filename_input.clone();
        }
        match self.mode {
            AppMode::ExportCsv | AppMode::ImportCsv => DEFAULT_CSV_FILE.to_string(),
            _ => DEFAULT_SAVE_FILE.to_string(),
        }
    }

    /// Processes the result of a save operation.
    pub fn set_save_result(&mut self, result: Result<String, PersistenceError>) {
        self.status_message = Some(match result {
            Ok(filename) => {
                let message = format!("Saved to {}", filename);
                self.filename = Some(filename);
                message
            }
            Err(error) => format!("Save failed: {}", error),
        });
        self.cancel_filename_input();
    }

    /// Processes the result of a load operation.
    ///
    /// The loaded grid replaces the current one and is fully resolved.
    pub fn set_load_result(&mut self, result: Result<(Grid, String), PersistenceError>) {
        self.status_message = Some(match result {
            Ok((grid, filename)) => {
                self.replace_grid(grid);
                let message = format!("Loaded from {}", filename);
                self.filename = Some(filename);
                message
            }
            Err(error) => format!("Load failed: {}", error),
        });
        self.cancel_filename_input();
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<String, PersistenceError>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Exported to {}", filename),
            Err(error) => format!("Export failed: {}", error),
        });
        self.cancel_filename_input();
    }

    /// Processes the result of a CSV import operation.
    ///
    /// Imported data is not a saved grid, so the current filename is kept.
    pub fn set_csv_import_result(&mut self, result: Result<Grid, PersistenceError>) {
        self.status_message = Some(match result {
            Ok(grid) => {
                self.replace_grid(grid);
                "CSV data imported successfully".to_string()
            }
            Err(error) => format!("Import failed: {}", error),
        });
        self.cancel_filename_input();
    }

    fn replace_grid(&mut self, mut grid: Grid) {
        self.engine.resolve_all(&mut grid);
        self.grid = grid;
        self.selected_row = 0;
        self.selected_col = 0;
        self.scroll_row = 0;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Records an action for undo/redo functionality.
    ///
    /// Adds the action to the undo stack and clears the redo stack.
    /// Limits the undo stack to 100 actions.
    fn record_action(&mut self, action: UndoAction) {
        self.undo_stack.push_back(action);
        if self.undo_stack.len() > MAX_UNDO_STACK_SIZE {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Reverts the last edit and moves it to the redo stack.
    pub fn undo(&mut self) {
        if let Some(action) = self.undo_stack.pop_back() {
            let UndoAction::RawEdited { row, col, ref old_raw, .. } = action;
            self.apply_raw(row, col, old_raw.clone());
            self.redo_stack.push_back(action);
        }
    }

    /// Reapplies the last undone edit and moves it back to the undo stack.
    pub fn redo(&mut self) {
        if let Some(action) = self.redo_stack.pop_back() {
            let UndoAction::RawEdited { row, col, ref new_raw, .. } = action;
            self.apply_raw(row, col, new_raw.clone());
            self.undo_stack.push_back(action);
        }
    }

    /// Sets a cell's raw text, resolves it and records the edit.
    ///
    /// Edits that leave the raw text unchanged still re-resolve the cell
    /// but are not recorded.
    pub fn set_raw_with_undo(&mut self, row: usize, col: usize, raw: String) {
        let Some(old_raw) = self.grid.cell(row, col).map(|cell| cell.raw.clone()) else {
            return;
        };
        if old_raw != raw {
            self.record_action(UndoAction::RawEdited {
                row,
                col,
                old_raw,
                new_raw: raw.clone(),
            });
        }
        self.apply_raw(row, col, raw);
    }

    /// Clears a cell and records the action for undo/redo.
    pub fn clear_cell_with_undo(&mut self, row: usize, col: usize) {
        self.set_raw_with_undo(row, col, String::new());
    }

    fn apply_raw(&mut self, row: usize, col: usize, raw: String) {
        match self.engine.set_cell_raw(&mut self.grid, row, col, raw) {
            Ok(value) => self.report_value(row, col, &value),
            Err(error) => self.status_message = Some(error.to_string()),
        }
    }

    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.grid.height() {
            self.selected_row += 1;
        }
        self.ensure_cursor_visible();
    }

    pub fn move_left(&mut self) {
        self.selected_col = self.selected_col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.selected_col + 1 < self.grid.width() {
            self.selected_col += 1;
        }
    }

    /// Updates the viewport size for proper scrolling calculations.
    pub fn update_viewport_size(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_cursor_visible();
    }

    /// Ensures the selected cell is visible by adjusting the scroll position.
    pub fn ensure_cursor_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row + 1 - self.viewport_rows;
        }
    }
}
