use crate::application::{App, AppMode};
use crate::infrastructure::ExportRepository;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::LoadTemplate => Self::handle_filename_input_mode(app, key, "load"),
            AppMode::ExportPdf => Self::handle_filename_input_mode(app, key, "pdf"),
            AppMode::ExportPng => Self::handle_filename_input_mode(app, key, "png"),
            AppMode::ExportXlsx => Self::handle_filename_input_mode(app, key, "xlsx"),
            AppMode::ExportJson => Self::handle_filename_input_mode(app, key, "json"),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('o') => {
                    app.start_load_template();
                    return;
                }
                KeyCode::Char('p') => {
                    app.start_export_pdf();
                    return;
                }
                KeyCode::Char('g') => {
                    app.start_export_png();
                    return;
                }
                KeyCode::Char('x') => {
                    app.start_export_xlsx();
                    return;
                }
                KeyCode::Char('j') => {
                    app.start_export_json();
                    return;
                }
                _ => {}
            }
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.status_message = None;
                app.previous_field();
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                app.status_message = None;
                app.next_field();
            }
            KeyCode::Enter | KeyCode::F(2) => {
                app.start_editing();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Esc => {
                app.status_message = None;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.finish_editing();
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    let prev = prev_boundary(&app.input, app.cursor_position);
                    app.input.remove(prev);
                    app.cursor_position = prev;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position = prev_boundary(&app.input, app.cursor_position);
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.len() {
                    app.cursor_position = next_boundary(&app.input, app.cursor_position);
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
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

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => {
                match mode {
                    "load" => {
                        app.finish_load_template();
                    }
                    "pdf" => {
                        let filename = app.get_export_filename("pdf");
                        if let Some(quote) = &app.quote {
                            let result = ExportRepository::save_pdf(quote, &filename);
                            app.set_export_result(result);
                        }
                    }
                    "png" => {
                        let filename = app.get_export_filename("png");
                        if let Some(quote) = &app.quote {
                            let result = ExportRepository::save_png(quote, &filename);
                            app.set_export_result(result);
                        }
                    }
                    "xlsx" => {
                        let filename = app.get_export_filename("xlsx");
                        // The workbook is taken out for the duration of the
                        // write so the quote and inputs can be borrowed too.
                        if let Some(mut workbook) = app.workbook.take() {
                            let result = match &app.quote {
                                Some(quote) => ExportRepository::save_workbook(
                                    &mut workbook,
                                    &app.inputs,
                                    quote,
                                    &filename,
                                ),
                                None => Err("Nothing to export yet".to_string()),
                            };
                            app.workbook = Some(workbook);
                            app.set_export_result(result);
                        }
                    }
                    "json" => {
                        let filename = app.get_export_filename("json");
                        if let Some(quote) = &app.quote {
                            let result = ExportRepository::save_json(quote, &filename);
                            app.set_export_result(result);
                        }
                    }
                    _ => {}
                }
            }
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    let prev = prev_boundary(&app.filename_input, app.cursor_position);
                    app.filename_input.remove(prev);
                    app.cursor_position = prev;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.filename_input.len() {
                    app.filename_input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position = prev_boundary(&app.filename_input, app.cursor_position);
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.filename_input.len() {
                    app.cursor_position = next_boundary(&app.filename_input, app.cursor_position);
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.filename_input.len();
            }
            KeyCode::Char(c) => {
                app.filename_input.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
            }
            _ => {}
        }
    }
}

/// Byte offset of the character before `idx`.
///
/// The cursor is a byte offset into the edit buffer, and the template's
/// rate names are Hebrew, so cursor moves must step over whole characters
/// rather than single bytes.
fn prev_boundary(s: &str, idx: usize) -> usize {
    s[..idx].char_indices().next_back().map_or(0, |(i, _)| i)
}

/// Byte offset of the character after `idx`.
fn next_boundary(s: &str, idx: usize) -> usize {
    s[idx..].chars().next().map_or(idx, |c| idx + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{App, AppMode, FormField};

    #[test]
    fn test_open_template_key_binding() {
        let mut app = App::default();

        assert!(matches!(app.mode, AppMode::Normal));

        InputHandler::handle_key_event(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL);

        assert!(matches!(app.mode, AppMode::LoadTemplate));
        assert_eq!(app.filename_input, "template.xlsx");
    }

    #[test]
    fn test_pdf_export_key_binding() {
        let mut app = App::default();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('p'), KeyModifiers::CONTROL);

        assert!(matches!(app.mode, AppMode::ExportPdf));
        assert_eq!(app.filename_input, "Project_quote.pdf");
    }

    #[test]
    fn test_xlsx_export_without_template_stays_normal() {
        let mut app = App::default();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL);

        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_field_navigation_keys() {
        let mut app = App::default();

        InputHandler::handle_key_event(&mut app, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.selected(), FormField::Material(0));

        InputHandler::handle_key_event(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.selected(), FormField::Grams(0));

        InputHandler::handle_key_event(&mut app, KeyCode::Up, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(app.selected(), FormField::ProjectName);
    }

    #[test]
    fn test_editing_keys_modify_buffer() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Editing));
        assert_eq!(app.input, "Project");

        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(app.input, "Projects");

        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.input, "Projec");

        InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.inputs.project_name, "Project");
    }

    #[test]
    fn test_editing_handles_multibyte_input() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Down, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Editing));
        assert_eq!(app.selected(), FormField::Material(0));

        InputHandler::handle_key_event(&mut app, KeyCode::Char('א'), KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('ב'), KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('ג'), KeyModifiers::NONE);
        assert_eq!(app.input, "אבג");

        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.input, "אב");

        InputHandler::handle_key_event(&mut app, KeyCode::Left, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('-'), KeyModifiers::NONE);
        assert_eq!(app.input, "א-ב");

        InputHandler::handle_key_event(&mut app, KeyCode::Home, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(app.input, "-ב");

        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.inputs.material_lines[0].material, "-ב");
    }

    #[test]
    fn test_filename_input_handles_multibyte_input() {
        let mut app = App::default();
        app.start_export_json();

        InputHandler::handle_key_event(&mut app, KeyCode::Home, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('ע'), KeyModifiers::NONE);
        assert_eq!(app.filename_input, "עProject_quote.json");

        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.filename_input, "Project_quote.json");
    }

    #[test]
    fn test_filename_input_editing() {
        let mut app = App::default();
        app.start_export_json();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.filename_input, "Project_quote.jsonx");

        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.filename_input, "Project_quote.json");

        InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_help_key_binding() {
        let mut app = App::default();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Help));

        InputHandler::handle_key_event(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.help_scroll, 5);

        InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(app.mode, AppMode::Normal));
    }
}
