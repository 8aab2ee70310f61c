//! Application state management for the quote form.
//!
//! This module contains the main application state: the open template,
//! its rate tables, the form inputs, and the quote recomputed on every
//! accepted edit.

use crate::domain::{Hms, Inputs, PricingEngine, Quote, Rates, MATERIAL_LINES};
use crate::infrastructure::TemplateWorkbook;

/// Represents the current mode of the application.
#[derive(Debug)]
pub enum AppMode {
    /// Normal navigation mode - arrow keys move field selection
    Normal,
    /// Field editing mode - user is typing into the selected field
    Editing,
    /// Help screen is displayed
    Help,
    /// Template open dialog is open
    LoadTemplate,
    /// PDF export dialog is open
    ExportPdf,
    /// PNG export dialog is open
    ExportPng,
    /// Updated-spreadsheet export dialog is open
    ExportXlsx,
    /// JSON summary export dialog is open
    ExportJson,
}

/// One editable field of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ProjectName,
    Material(usize),
    Grams(usize),
    ModelingTime,
    PrintingTime,
    AssemblyTime,
    MagnetsQty,
    LedSingleQty,
    LedDeskQty,
    UnitsQty,
}

impl FormField {
    /// All fields in the order they appear on the form.
    pub fn all() -> Vec<FormField> {
        let mut fields = vec![FormField::ProjectName];
        for i in 0..MATERIAL_LINES {
            fields.push(FormField::Material(i));
            fields.push(FormField::Grams(i));
        }
        fields.extend([
            FormField::ModelingTime,
            FormField::PrintingTime,
            FormField::AssemblyTime,
            FormField::MagnetsQty,
            FormField::LedSingleQty,
            FormField::LedDeskQty,
            FormField::UnitsQty,
        ]);
        fields
    }

    pub fn label(self) -> String {
        match self {
            FormField::ProjectName => "Project name".to_string(),
            FormField::Material(i) => format!("Material {}", i + 1),
            FormField::Grams(i) => format!("Grams {}", i + 1),
            FormField::ModelingTime => "Modeling time".to_string(),
            FormField::PrintingTime => "Printing time".to_string(),
            FormField::AssemblyTime => "Assembly time".to_string(),
            FormField::MagnetsQty => "Magnets".to_string(),
            FormField::LedSingleQty => "Single LEDs".to_string(),
            FormField::LedDeskQty => "Desk LEDs".to_string(),
            FormField::UnitsQty => "Units".to_string(),
        }
    }
}

/// Main application state: template, rates, form inputs, and the
/// derived quote.
///
/// The rates are an immutable snapshot taken when a template is opened;
/// the quote is recomputed in full after every accepted edit and never
/// mutated incrementally.
///
/// # Examples
///
/// ```
/// use printquote::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected_field, 0);
/// assert!(app.quote.is_some());
/// ```
#[derive(Debug)]
pub struct App {
    /// The open template workbook, kept for the write-back export
    pub workbook: Option<TemplateWorkbook>,
    /// Path the template was opened from
    pub template_path: Option<String>,
    /// Rate tables read from the template
    pub rates: Rates,
    /// Current form values
    pub inputs: Inputs,
    /// Quote derived from the current inputs, if computation succeeded
    pub quote: Option<Quote>,
    /// Current application mode
    pub mode: AppMode,
    /// Form fields in display order
    pub fields: Vec<FormField>,
    /// Index of the selected field
    pub selected_field: usize,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the active input buffer
    pub cursor_position: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl Default for App {
    fn default() -> Self {
        let mut app = Self {
            workbook: None,
            template_path: None,
            rates: Rates::default(),
            inputs: Inputs::default(),
            quote: None,
            mode: AppMode::Normal,
            fields: FormField::all(),
            selected_field: 0,
            input: String::new(),
            cursor_position: 0,
            status_message: None,
            filename_input: String::new(),
            help_scroll: 0,
        };
        app.recompute();
        app
    }
}

impl App {
    /// Recomputes the quote from the current inputs and rates.
    ///
    /// On a domain error the quote is cleared and the error shown in the
    /// status bar; stale results are never displayed.
    pub fn recompute(&mut self) {
        match PricingEngine::new(&self.rates).compute(&self.inputs) {
            Ok(quote) => self.quote = Some(quote),
            Err(e) => {
                self.quote = None;
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Opens a template: reads rates, seeds the form from the template's
    /// stored values, and recomputes.
    ///
    /// A template with a non-numeric price cell is rejected and the
    /// previous state kept.
    pub fn load_template(&mut self, path: &str) {
        let workbook = match TemplateWorkbook::open(path) {
            Ok(wb) => wb,
            Err(e) => {
                self.status_message = Some(format!("Load failed: {}", e));
                return;
            }
        };
        let rates = match workbook.read_rates() {
            Ok(rates) => rates,
            Err(e) => {
                self.status_message = Some(format!("Template rejected: {}", e));
                return;
            }
        };

        self.inputs = workbook.read_defaults(&rates);
        self.rates = rates;
        self.workbook = Some(workbook);
        self.template_path = Some(path.to_string());
        self.selected_field = 0;
        self.recompute();
        self.status_message = Some(format!(
            "Loaded {} ({} materials, {} labor rates, {} add-ons)",
            path,
            self.rates.materials.len(),
            self.rates.labor.len(),
            self.rates.addons.len()
        ));
    }

    /// The currently selected form field.
    pub fn selected(&self) -> FormField {
        self.fields[self.selected_field]
    }

    /// Moves the selection to the next field, wrapping around.
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Moves the selection to the previous field, wrapping around.
    pub fn previous_field(&mut self) {
        self.selected_field = (self.selected_field + self.fields.len() - 1) % self.fields.len();
    }

    /// Current display value of a field, used to seed the edit buffer.
    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::ProjectName => self.inputs.project_name.clone(),
            FormField::Material(i) => self.inputs.material_lines[i].material.clone(),
            FormField::Grams(i) => format!("{}", self.inputs.material_lines[i].grams),
            FormField::ModelingTime => self.inputs.modeling_time.to_string(),
            FormField::PrintingTime => self.inputs.printing_time.to_string(),
            FormField::AssemblyTime => self.inputs.assembly_time.to_string(),
            FormField::MagnetsQty => self.inputs.magnets_qty.to_string(),
            FormField::LedSingleQty => self.inputs.led_single_qty.to_string(),
            FormField::LedDeskQty => self.inputs.led_desk_qty.to_string(),
            FormField::UnitsQty => self.inputs.units_qty.to_string(),
        }
    }

    /// Switches to editing mode for the selected field.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.input = self.field_value(self.selected());
        self.cursor_position = self.input.len();
        self.status_message = None;
    }

    /// Completes editing: parses the buffer into the selected field and
    /// recomputes the quote.
    ///
    /// On a parse or validation failure the app stays in editing mode
    /// with the reason in the status bar. Accepted edits advance the
    /// selection to the next field.
    pub fn finish_editing(&mut self) {
        let text = self.input.trim().to_string();
        match self.selected() {
            FormField::ProjectName => {
                self.inputs.project_name = text;
            }
            FormField::Material(i) => {
                if !text.is_empty() && !self.rates.materials.contains(&text) {
                    // Lenient by design, but the zero cost should not
                    // pass silently.
                    self.status_message =
                        Some(format!("'{}' is not in the rate table; it will cost 0", text));
                }
                self.inputs.material_lines[i].material = text;
            }
            FormField::Grams(i) => match text.parse::<f64>() {
                Ok(grams) if grams >= 0.0 && grams.is_finite() => {
                    self.inputs.material_lines[i].grams = grams;
                }
                _ => {
                    self.status_message =
                        Some("Grams must be a non-negative number".to_string());
                    return;
                }
            },
            FormField::ModelingTime
            | FormField::PrintingTime
            | FormField::AssemblyTime => match Hms::parse(&text) {
                Ok(duration) => match self.selected() {
                    FormField::ModelingTime => self.inputs.modeling_time = duration,
                    FormField::PrintingTime => self.inputs.printing_time = duration,
                    _ => self.inputs.assembly_time = duration,
                },
                Err(e) => {
                    self.status_message = Some(e.to_string());
                    return;
                }
            },
            FormField::MagnetsQty
            | FormField::LedSingleQty
            | FormField::LedDeskQty
            | FormField::UnitsQty => match text.parse::<u32>() {
                Ok(qty) => match self.selected() {
                    FormField::MagnetsQty => self.inputs.magnets_qty = qty,
                    FormField::LedSingleQty => self.inputs.led_single_qty = qty,
                    FormField::LedDeskQty => self.inputs.led_desk_qty = qty,
                    _ => self.inputs.units_qty = qty,
                },
                Err(_) => {
                    self.status_message =
                        Some("Quantity must be a non-negative whole number".to_string());
                    return;
                }
            },
        }

        self.recompute();
        self.next_field();
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Switches to the template open dialog.
    pub fn start_load_template(&mut self) {
        self.mode = AppMode::LoadTemplate;
        self.filename_input = self
            .template_path
            .clone()
            .unwrap_or_else(|| "template.xlsx".to_string());
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for the template open dialog.
    pub fn get_load_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "template.xlsx".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Completes the template open dialog.
    pub fn finish_load_template(&mut self) {
        let path = self.get_load_filename();
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
        self.load_template(&path);
    }

    pub fn start_export_pdf(&mut self) {
        self.start_export(AppMode::ExportPdf, "pdf");
    }

    pub fn start_export_png(&mut self) {
        self.start_export(AppMode::ExportPng, "png");
    }

    /// Switches to the updated-spreadsheet export dialog.
    ///
    /// Requires an open template: the export is a copy of it with the
    /// designated cells overwritten.
    pub fn start_export_xlsx(&mut self) {
        if self.workbook.is_none() {
            self.status_message = Some("Open a template first (Ctrl+O)".to_string());
            return;
        }
        self.start_export(AppMode::ExportXlsx, "xlsx");
    }

    pub fn start_export_json(&mut self) {
        self.start_export(AppMode::ExportJson, "json");
    }

    fn start_export(&mut self, mode: AppMode, extension: &str) {
        if self.quote.is_none() {
            self.status_message = Some("Nothing to export yet".to_string());
            return;
        }
        self.mode = mode;
        self.filename_input = format!("{}_quote.{}", self.inputs.project_name, extension);
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for the active export dialog.
    pub fn get_export_filename(&self, extension: &str) -> String {
        if self.filename_input.is_empty() {
            format!("quote.{}", extension)
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of an export operation.
    ///
    /// Sets the status message and returns to normal mode.
    pub fn set_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_rates() -> App {
        let mut app = App::default();
        app.rates.materials.insert("PLA", 100.0);
        app.rates.labor.insert(crate::domain::LABOR_MODELING, 60.0);
        app.recompute();
        app
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.selected_field, 0);
        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.input.is_empty());
        assert!(app.workbook.is_none());
        assert!(app.status_message.is_none());
        // Empty rate tables still produce a (zero) quote
        let quote = app.quote.unwrap();
        assert_eq!(quote.total, 0.0);
    }

    #[test]
    fn test_field_order_starts_with_project_and_materials() {
        let fields = FormField::all();
        assert_eq!(fields[0], FormField::ProjectName);
        assert_eq!(fields[1], FormField::Material(0));
        assert_eq!(fields[2], FormField::Grams(0));
        assert_eq!(*fields.last().unwrap(), FormField::UnitsQty);
        assert_eq!(fields.len(), 4 + 2 * MATERIAL_LINES + MATERIAL_LINES + 1);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut app = App::default();
        app.previous_field();
        assert_eq!(app.selected(), FormField::UnitsQty);
        app.next_field();
        assert_eq!(app.selected(), FormField::ProjectName);
    }

    #[test]
    fn test_edit_grams_recomputes_quote() {
        let mut app = app_with_rates();
        app.selected_field = app
            .fields
            .iter()
            .position(|f| *f == FormField::Material(0))
            .unwrap();
        app.start_editing();
        app.input = "PLA".to_string();
        app.finish_editing();

        // Accepted edit advances to the grams field of the same line
        assert_eq!(app.selected(), FormField::Grams(0));
        app.start_editing();
        app.input = "500".to_string();
        app.finish_editing();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.inputs.material_lines[0].grams, 500.0);
        assert_eq!(app.quote.as_ref().unwrap().materials_total, 50.0);
    }

    #[test]
    fn test_edit_invalid_grams_stays_in_editing_mode() {
        let mut app = app_with_rates();
        app.selected_field = app
            .fields
            .iter()
            .position(|f| *f == FormField::Grams(0))
            .unwrap();
        app.start_editing();
        app.input = "-5".to_string();
        app.finish_editing();

        assert!(matches!(app.mode, AppMode::Editing));
        assert!(app.status_message.is_some());
        assert_eq!(app.inputs.material_lines[0].grams, 0.0);
    }

    #[test]
    fn test_edit_duration_parses_hms() {
        let mut app = app_with_rates();
        app.selected_field = app
            .fields
            .iter()
            .position(|f| *f == FormField::ModelingTime)
            .unwrap();
        app.start_editing();
        assert_eq!(app.input, "1:00:00");
        app.input = "1:30".to_string();
        app.finish_editing();

        assert_eq!(app.inputs.modeling_time, Hms::new(1, 30, 0));
        assert_eq!(app.quote.as_ref().unwrap().modeling_cost, 90.0);
    }

    #[test]
    fn test_edit_unknown_material_warns_but_is_accepted() {
        let mut app = app_with_rates();
        app.selected_field = app
            .fields
            .iter()
            .position(|f| *f == FormField::Material(0))
            .unwrap();
        app.start_editing();
        app.input = "Unobtainium".to_string();
        app.finish_editing();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.inputs.material_lines[0].material, "Unobtainium");
        assert!(app.status_message.unwrap().contains("cost 0"));
    }

    #[test]
    fn test_cancel_editing_keeps_old_value() {
        let mut app = app_with_rates();
        app.start_editing();
        app.input = "Changed".to_string();
        app.cancel_editing();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.inputs.project_name, "Project");
    }

    #[test]
    fn test_export_dialog_seeded_from_project_name() {
        let mut app = app_with_rates();
        app.inputs.project_name = "Lamp".to_string();
        app.start_export_pdf();

        assert!(matches!(app.mode, AppMode::ExportPdf));
        assert_eq!(app.filename_input, "Lamp_quote.pdf");
        assert_eq!(app.get_export_filename("pdf"), "Lamp_quote.pdf");
    }

    #[test]
    fn test_xlsx_export_requires_template() {
        let mut app = app_with_rates();
        app.start_export_xlsx();

        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.status_message.unwrap().contains("template"));
    }

    #[test]
    fn test_set_export_result() {
        let mut app = app_with_rates();
        app.start_export_json();
        app.set_export_result(Ok("Project_quote.json".to_string()));
        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(
            app.status_message.take().unwrap(),
            "Exported to Project_quote.json"
        );

        app.start_export_json();
        app.set_export_result(Err("disk full".to_string()));
        assert_eq!(app.status_message.unwrap(), "Export failed: disk full");
    }

    #[test]
    fn test_load_template_missing_file_keeps_state() {
        let mut app = app_with_rates();
        let before = app.rates.clone();
        app.load_template("/nonexistent/template.xlsx");

        assert!(app.status_message.unwrap().starts_with("Load failed"));
        assert_eq!(app.rates, before);
        assert!(app.workbook.is_none());
    }
}
