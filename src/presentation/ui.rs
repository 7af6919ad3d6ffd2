use crate::application::{App, AppMode};
use crate::domain::{CellValue, Grid};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const COLUMN_WIDTH: usize = 10;
const ROW_LABEL_WIDTH: usize = 4;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_grid(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "gridcalc | Cell: {}",
        Grid::cell_label(app.selected_row, app.selected_col)
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

/// Rows that fit in the grid area once borders and the header row are removed.
pub fn visible_row_count(area_height: u16) -> usize {
    (area_height as usize).saturating_sub(3).max(1)
}

fn render_grid(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = visible_row_count(area.height);
    let available_width = (area.width as usize).saturating_sub(2 + ROW_LABEL_WIDTH);
    let visible_cols = (available_width / (COLUMN_WIDTH + 1)).max(1);
    let first_col = (app.selected_col + 1).saturating_sub(visible_cols);
    let last_col = (first_col + visible_cols).min(app.grid.width());

    let mut headers = vec![Cell::from("")];
    for col in first_col..last_col {
        let header_style = if col == app.selected_col {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        headers.push(Cell::from(Grid::column_label(col)).style(header_style));
    }

    let mut rows = vec![Row::new(headers).height(1)];

    let last_row = (app.scroll_row + visible_rows).min(app.grid.height());
    for row in app.scroll_row..last_row {
        let row_number_style = if row == app.selected_row {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut cells = vec![Cell::from(row.to_string()).style(row_number_style)];

        for col in first_col..last_col {
            let selected = row == app.selected_row && col == app.selected_col;
            cells.push(render_cell(app, row, col, selected));
        }

        rows.push(Row::new(cells).height(1));
    }

    let mut widths = vec![Constraint::Length(ROW_LABEL_WIDTH as u16)];
    widths.extend((first_col..last_col).map(|_| Constraint::Length(COLUMN_WIDTH as u16)));

    let title = match &app.filename {
        Some(filename) => format!("Grid - {}", filename),
        None => "Grid".to_string(),
    };
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    f.render_widget(table, area);
}

/// The focused cell shows its raw text while being edited; every other cell
/// shows its value.
fn render_cell(app: &App, row: usize, col: usize, selected: bool) -> Cell<'static> {
    if selected && matches!(app.mode, AppMode::Editing) {
        let style = Style::default().bg(Color::Green).fg(Color::Black);
        return Cell::from(app.input.clone()).style(style);
    }

    let value = app.grid.cell(row, col).map(|cell| &cell.value);
    let text = value.map(ToString::to_string).unwrap_or_default();
    let style = match (selected, value) {
        (true, _) => Style::default().bg(Color::Blue).fg(Color::White),
        (false, Some(CellValue::Error(_))) => Style::default().fg(Color::Red),
        (false, Some(CellValue::Number(_))) => Style::default().fg(Color::White),
        _ => Style::default(),
    };
    Cell::from(text).style(style)
}

/// Status bar text for the current mode.
pub fn status_text(app: &App) -> String {
    match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                return status.clone();
            }
            let raw = app.selected_cell().map(|cell| cell.raw.as_str()).unwrap_or("");
            match app.selected_cell().and_then(|cell| cell.value.error()) {
                Some(error) => format!("{} | {}", raw, error),
                None if raw.is_empty() => {
                    "Enter: edit | r/R: recalculate | Ctrl+S/O: save/load | F1/?: help | q: quit"
                        .to_string()
                }
                None => raw.to_string(),
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::Help => {
            "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
        AppMode::SaveAs => {
            format!("Save as: {} (Enter to save, Esc to cancel)", app.filename_input)
        }
        AppMode::LoadFile => {
            format!("Load file: {} (Enter to load, Esc to cancel)", app.filename_input)
        }
        AppMode::ExportCsv => {
            format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input)
        }
        AppMode::ImportCsv => {
            format!("Import CSV from: {} (Enter to import, Esc to cancel)", app.filename_input)
        }
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(status_text(app))
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveAs | AppMode::LoadFile => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv | AppMode::ImportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("gridcalc Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"GRIDCALC FORMULA REFERENCE

=== CELLS ===
• Text that starts with = is a formula; anything else is shown as typed
• Cells are named by a lowercase column letter and a row number from 0
  (a0 is the top-left cell, b3 is the second column, fourth row)
• A cell keeps its raw text; the grid shows the resolved value

=== OPERATORS ===
+  -        Addition and subtraction        =5+3 → 8
*  /        Multiplication and division     =4*3 → 12
( )         Grouping                        =(2+3)*4 → 20
* and / bind tighter than + and -; operators of one kind run left to right
Numbers may be negative or decimal (-5, 3.25, .5)
Division by zero gives inf or NaN rather than an error

=== REFERENCES ===
=a0*2       Uses the value of a0
=a0+b1      References are resolved when this cell is resolved
Editing a cell does not update the cells that reference it:
press r on a dependent cell, or R to recalculate the whole grid
A cell that references itself stops at the reference depth limit

=== ERRORS ===
Cells that fail show #ERROR; the status bar shows the reason
Unbalanced brackets     =(1+2
Missing operand         =3*
Malformed expression    =hello
Invalid reference       =z99 on a small grid
Reference depth limit   =a0+1 typed into a0

=== KEYS ===
Arrow keys / hjkl   Move the selection
Enter / F2          Edit the selected cell (shows its raw text)
Esc                 Cancel editing
Backspace / Delete  Clear the selected cell
r                   Recalculate the selected cell
R                   Recalculate every cell
Ctrl+Z / Ctrl+Y     Undo / redo
Ctrl+S / Ctrl+O     Save / load the grid as JSON
Ctrl+E / Ctrl+L     Export values to CSV / import CSV as cell text
F1 or ?             Show this help
q                   Quit

=== HELP NAVIGATION ===
↑↓ or j/k           Scroll one line
Page Up/Down        Scroll five lines
Home                Jump to the top
Esc/F1/?/q          Close this help window"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvalError;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(80, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_header_and_labels() {
        let mut app = App::default();
        app.selected_col = 1;
        app.selected_row = 3;
        let screen = draw(&app);
        assert!(screen.contains("gridcalc | Cell: b3"));
    }

    #[test]
    fn test_values_are_rendered() {
        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "=6*7".to_string());
        app.set_raw_with_undo(0, 1, "=(1".to_string());
        let screen = draw(&app);
        assert!(screen.contains("42"));
        assert!(screen.contains("#ERROR"));
        assert!(!screen.contains("=6*7"));
    }

    #[test]
    fn test_editing_shows_raw_text() {
        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "=6*7".to_string());
        app.start_editing();
        let screen = draw(&app);
        assert!(screen.contains("Editing: =6*7"));
    }

    #[test]
    fn test_status_text_shows_raw_and_error() {
        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "=a0".to_string());
        app.status_message = None;
        let expected = format!("=a0 | {}", EvalError::RecursionLimit { limit: 1024 });
        assert_eq!(status_text(&app), expected);

        app.set_raw_with_undo(0, 0, "=1+1".to_string());
        assert_eq!(status_text(&app), "=1+1");
    }

    #[test]
    fn test_help_popup_renders() {
        let mut app = App::default();
        app.mode = AppMode::Help;
        let screen = draw(&app);
        assert!(screen.contains("gridcalc Help"));
    }

    #[test]
    fn test_visible_row_count() {
        assert_eq!(visible_row_count(20), 17);
        assert_eq!(visible_row_count(2), 1);
    }
}
