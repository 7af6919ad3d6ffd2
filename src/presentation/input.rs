use crate::application::{App, AppMode};
use crate::infrastructure::{CsvExporter, FileRepository};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveAs | AppMode::LoadFile | AppMode::ExportCsv | AppMode::ImportCsv => {
                Self::handle_filename_input_mode(app, key)
            }
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => app.start_save_as(),
                KeyCode::Char('o') => app.start_load_file(),
                KeyCode::Char('e') => app.start_csv_export(),
                KeyCode::Char('l') => app.start_csv_import(),
                KeyCode::Char('z') => app.undo(),
                KeyCode::Char('y') => app.redo(),
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Left | KeyCode::Char('h') => app.move_left(),
            KeyCode::Right | KeyCode::Char('l') => app.move_right(),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Char('r') => app.resolve_selected(),
            KeyCode::Char('R') => app.resolve_everything(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Backspace | KeyCode::Delete => {
                app.clear_cell_with_undo(app.selected_row, app.selected_col);
            }
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => edit_line(&mut app.input, &mut app.cursor_position, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.prompt_filename();
                match app.mode {
                    AppMode::SaveAs => {
                        let result = FileRepository::save_grid(&app.grid, &filename);
                        app.set_save_result(result);
                    }
                    AppMode::LoadFile => {
                        let result = FileRepository::load_grid(&filename);
                        app.set_load_result(result);
                    }
                    AppMode::ExportCsv => {
                        let result = CsvExporter::export_to_csv(&app.grid, &filename);
                        app.set_csv_export_result(result);
                    }
                    AppMode::ImportCsv => {
                        let result = CsvExporter::import_from_csv(
                            &filename,
                            app.grid.width(),
                            app.grid.height(),
                        );
                        app.set_csv_import_result(result);
                    }
                    _ => {}
                }
            }
            KeyCode::Esc => app.cancel_filename_input(),
            _ => edit_line(&mut app.filename_input, &mut app.cursor_position, key),
        }
    }
}

/// Applies a line-editing key to `buffer`; `cursor` counts characters.
fn edit_line(buffer: &mut String, cursor: &mut usize, key: KeyCode) {
    let len = buffer.chars().count();
    *cursor = (*cursor).min(len);

    match key {
        KeyCode::Backspace if *cursor > 0 => {
            *cursor -= 1;
            buffer.remove(byte_offset(buffer, *cursor));
        }
        KeyCode::Delete if *cursor < len => {
            buffer.remove(byte_offset(buffer, *cursor));
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right if *cursor < len => *cursor += 1,
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = len,
        KeyCode::Char(c) => {
            buffer.insert(byte_offset(buffer, *cursor), c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn byte_offset(buffer: &str, chars: usize) -> usize {
    buffer
        .char_indices()
        .nth(chars)
        .map_or(buffer.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;
    use tempfile::TempDir;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_edit_cell_with_keys() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, AppMode::Editing));

        type_text(&mut app, "=(2+3)*4");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.grid.cell(0, 0).unwrap().value, CellValue::Number(20.0));
        assert_eq!(app.selected_row, 1);
    }

    #[test]
    fn test_editing_cursor_movement() {
        let mut app = App::default();
        press(&mut app, KeyCode::F(2));
        type_text(&mut app, "=13");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.input, "=123");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, "123");

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "12");
        assert_eq!(app.cursor_position, 2);
    }

    #[test]
    fn test_editing_multibyte_input() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "héllo");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "hllo");
    }

    #[test]
    fn test_escape_discards_edit() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "42");
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.grid.raw(0, 0).is_empty());
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!((app.selected_row, app.selected_col), (2, 1));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!((app.selected_row, app.selected_col), (1, 0));
    }

    #[test]
    fn test_resolve_keys() {
        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "5".to_string());
        app.set_raw_with_undo(1, 0, "=a0*2".to_string());
        app.set_raw_with_undo(0, 0, "7".to_string());
        assert_eq!(app.grid.cell(1, 0).unwrap().value, CellValue::Number(10.0));

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.grid.cell(1, 0).unwrap().value, CellValue::Number(14.0));

        app.grid.set_raw(0, 0, "1");
        InputHandler::handle_key_event(&mut app, KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(app.grid.cell(1, 0).unwrap().value, CellValue::Number(2.0));
    }

    #[test]
    fn test_backspace_clears_cell() {
        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "=1+1".to_string());
        press(&mut app, KeyCode::Backspace);
        assert!(app.grid.raw(0, 0).is_empty());
        assert_eq!(app.grid.cell(0, 0).unwrap().value, CellValue::default());
    }

    #[test]
    fn test_undo_redo_key_bindings() {
        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "3".to_string());
        InputHandler::handle_key_event(&mut app, KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert!(app.grid.raw(0, 0).is_empty());
        InputHandler::handle_key_event(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(app.grid.raw(0, 0), "3");
    }

    #[test]
    fn test_help_mode() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.mode, AppMode::Help));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 6);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, KeyCode::Char('q'));
        assert!(matches!(app.mode, AppMode::Normal));
    }

    #[test]
    fn test_csv_import_key_binding() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(matches!(app.mode, AppMode::ImportCsv));
        assert_eq!(app.filename_input, "grid.csv");
        assert_eq!(app.selected_col, 0);
    }

    #[test]
    fn test_csv_export_key_binding() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert!(matches!(app.mode, AppMode::ExportCsv));
        assert_eq!(app.filename_input, "grid.csv");
    }

    #[test]
    fn test_filename_input_editing() {
        let mut app = App::default();
        app.start_csv_import();

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.filename_input, "grid.csvm");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.filename_input, "grid.csv");

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_save_and_load_through_prompts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheet.json");
        let path = path.to_str().unwrap();

        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "6".to_string());
        app.set_raw_with_undo(0, 1, "=a0*7".to_string());

        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        app.filename_input = path.to_string();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.filename.as_deref(), Some(path));

        let mut fresh = App::default();
        InputHandler::handle_key_event(&mut fresh, KeyCode::Char('o'), KeyModifiers::CONTROL);
        fresh.filename_input = path.to_string();
        press(&mut fresh, KeyCode::Enter);
        assert_eq!(fresh.grid.raw(0, 1), "=a0*7");
        assert_eq!(fresh.grid.cell(0, 1).unwrap().value, CellValue::Number(42.0));
    }

    #[test]
    fn test_csv_round_trip_through_prompts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("values.csv");
        let path = path.to_str().unwrap();

        let mut app = App::default();
        app.set_raw_with_undo(0, 0, "=2*4".to_string());

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        app.filename_input = path.to_string();
        press(&mut app, KeyCode::Enter);

        let mut fresh = App::default();
        InputHandler::handle_key_event(&mut fresh, KeyCode::Char('l'), KeyModifiers::CONTROL);
        fresh.filename_input = path.to_string();
        press(&mut fresh, KeyCode::Enter);
        assert_eq!(fresh.grid.raw(0, 0), "8");
        assert_eq!(fresh.grid.cell(0, 0).unwrap().value, CellValue::Text("8".to_string()));
    }
}
