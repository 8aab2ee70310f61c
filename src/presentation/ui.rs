use crate::application::{App, AppMode};
use crate::domain::{currency, currency2};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

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

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_form(f, app, panes[0]);
    render_results(f, app, panes[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let template = app.template_path.as_deref().unwrap_or("no template");
    let header = Paragraph::new(format!(
        "printquote - Cost Estimation Form | Template: {}",
        template
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.mode, AppMode::Editing);

    let mut rows = Vec::new();
    for (i, field) in app.fields.iter().enumerate() {
        let selected = i == app.selected_field;
        let value = if selected && editing {
            format!("{}_", app.input)
        } else {
            app.field_value(*field)
        };

        let style = if selected && editing {
            Style::default().bg(Color::Green).fg(Color::Black)
        } else if selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };

        rows.push(
            Row::new(vec![Cell::from(field.label()), Cell::from(value)]).style(style),
        );
    }

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
        .block(Block::default().borders(Borders::ALL).title("Inputs"))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let summary = match &app.quote {
        Some(quote) => format!(
            "Modeling cost: {}\nUnit price (excl. modeling): {}\nQuantity: {}\nQuantity discount: {}%\nTotal: {}",
            currency(quote.modeling_cost),
            currency(quote.unit_price),
            quote.qty,
            quote.discount_percent(),
            currency(quote.total),
        ),
        None => "No quote - fix the highlighted input".to_string(),
    };
    let summary = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(summary, chunks[0]);

    let mut rows = Vec::new();
    if let Some(quote) = &app.quote {
        for row in &quote.rows {
            rows.push(Row::new(vec![
                Cell::from(row.category.clone()),
                Cell::from(row.detail.clone()),
                Cell::from(currency2(row.cost)),
            ]));
        }
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(vec!["Category", "Detail", "Cost"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(Block::default().borders(Borders::ALL).title("Cost breakdown"))
    .column_spacing(1);
    f.render_widget(table, chunks[1]);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Ctrl+O: open template | Enter: edit field | Ctrl+P: PDF | Ctrl+G: PNG | Ctrl+X: xlsx | Ctrl+J: JSON | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::LoadTemplate => format!("Open template: {} (Enter to open, Esc to cancel)", app.filename_input),
        AppMode::ExportPdf => format!("Export PDF as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::ExportPng => format!("Export PNG as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::ExportXlsx => format!("Export updated xlsx as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::ExportJson => format!("Export JSON as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::LoadTemplate => Style::default().fg(Color::Yellow),
            AppMode::ExportPdf
            | AppMode::ExportPng
            | AppMode::ExportXlsx
            | AppMode::ExportJson => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
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

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("printquote Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"PRINTQUOTE - COST ESTIMATION FORM

=== WORKFLOW ===
1. Open a quote template (Ctrl+O, or pass the path on the command line).
   Rates are read once from the template's fixed cells:
   materials (rows 6-9), labor (rows 13-15), add-ons (rows 18-20).
2. Fill in the form. The quote recomputes after every accepted edit.
3. Export the result as PDF, PNG, an updated template copy, or JSON.

=== FORM FIELDS ===
Project name    Free text, used for export filenames
Material 1-3    Material name; unknown names are priced at 0
Grams 1-3       Weight in grams, non-negative
Times           H:MM or H:MM:SS (modeling, printing, assembly)
Quantities      Whole numbers (magnets, LEDs, units)

=== PRICING RULES ===
Material cost   rate-per-kg / 1000 * grams
Labor cost      rate-per-hour * duration in hours
Modeling        One-time setup cost: excluded from the unit price
                and never multiplied by quantity or discount
Discount        1 unit: none | 2-30: 10% | 31-100: 20% | >100: 25%
Total           modeling + unit price * qty * discount,
                rounded to the nearest multiple of 5

=== NAVIGATION ===
Arrow keys/jk   Move between fields
Tab             Next field
Enter/F2        Edit selected field
Esc             Cancel edit / clear status
q               Quit (normal mode)

=== FILE OPERATIONS ===
Ctrl+O          Open template xlsx
Ctrl+P          Export PDF summary
Ctrl+G          Export PNG summary
Ctrl+X          Export updated copy of the template
                (your inputs and the computed outputs are written
                into their designated cells; everything else in the
                template is left untouched)
Ctrl+J          Export JSON summary

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_results_pane_shows_all_headline_numbers() {
        let app = App::default();
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }

        assert!(text.contains("Modeling cost:"));
        assert!(text.contains("Unit price (excl. modeling):"));
        assert!(text.contains("Quantity: 1"));
        assert!(text.contains("Quantity discount: 0%"));
        assert!(text.contains("Total:"));
    }
}
