//! Template workbook access.
//!
//! The quote template is an xlsx file with a fixed cell schema: three rate
//! tables in columns C/D (materials rows 6-9, labor rows 13-15, add-ons
//! rows 18-20) and a form area in columns H-J that the write-back export
//! fills in. The workbook is read once per session; the in-memory copy is
//! only mutated on the spreadsheet export path.

use crate::domain::{
    Hms, Inputs, MaterialLine, Quote, QuoteError, QuoteResult, RateTable, Rates, MATERIAL_LINES,
};
use std::ops::RangeInclusive;
use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet};

const COL_RATE_NAME: u32 = 3; // C
const COL_RATE_PRICE: u32 = 4; // D
const COL_FORM_MATERIAL: u32 = 8; // H
const COL_FORM_GRAMS: u32 = 9; // I

const MATERIAL_ROWS: RangeInclusive<u32> = 6..=9;
const LABOR_ROWS: RangeInclusive<u32> = 13..=15;
const ADDON_ROWS: RangeInclusive<u32> = 18..=20;

/// First row of the material-line form area (H7/I7 through H9/I9).
const FORM_MATERIAL_BASE_ROW: u32 = 7;

pub struct TemplateWorkbook {
    book: Spreadsheet,
}

impl std::fmt::Debug for TemplateWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateWorkbook").finish_non_exhaustive()
    }
}

impl TemplateWorkbook {
    /// Opens a template xlsx from disk.
    pub fn open(path: &str) -> Result<Self, String> {
        match reader::xlsx::read(path) {
            Ok(book) => Ok(Self { book }),
            Err(e) => Err(format!("Could not open template: {:?}", e)),
        }
    }

    fn sheet(&self) -> QuoteResult<&Worksheet> {
        self.book.get_sheet(&0).ok_or(QuoteError::MissingSheet)
    }

    /// Reads the three rate tables from their fixed ranges.
    ///
    /// A row counts only when its name cell is non-empty; a blank price
    /// defaults to 0.0. A non-numeric price is fatal: the template is
    /// unusable and the caller must not proceed with stale rates.
    pub fn read_rates(&self) -> QuoteResult<Rates> {
        let sheet = self.sheet()?;
        Ok(Rates {
            materials: Self::read_rate_table(sheet, MATERIAL_ROWS)?,
            labor: Self::read_rate_table(sheet, LABOR_ROWS)?,
            addons: Self::read_rate_table(sheet, ADDON_ROWS)?,
        })
    }

    fn read_rate_table(sheet: &Worksheet, rows: RangeInclusive<u32>) -> QuoteResult<RateTable> {
        let mut table = RateTable::new();
        for row in rows {
            let name = sheet.get_value((COL_RATE_NAME, row));
            if name.trim().is_empty() {
                continue;
            }
            let price_text = sheet.get_value((COL_RATE_PRICE, row));
            let price = if price_text.trim().is_empty() {
                0.0
            } else {
                price_text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| QuoteError::InvalidRateCell {
                        cell: format!("D{}", row),
                        value: price_text.clone(),
                    })?
            };
            table.insert(name, price);
        }
        Ok(table)
    }

    /// Reads form defaults from the template, best-effort.
    ///
    /// Missing or unreadable cells fall back to the stock defaults; a
    /// material name the rate table does not know falls back to the first
    /// priced material.
    pub fn read_defaults(&self, rates: &Rates) -> Inputs {
        let mut inputs = Inputs::default();
        let sheet = match self.sheet() {
            Ok(sheet) => sheet,
            Err(_) => return inputs,
        };

        let project = sheet.get_value("H5");
        if !project.trim().is_empty() {
            inputs.project_name = project;
        }

        for i in 0..MATERIAL_LINES {
            let row = FORM_MATERIAL_BASE_ROW + i as u32;
            let name = sheet.get_value((COL_FORM_MATERIAL, row));
            let material = if rates.materials.contains(name.trim()) {
                name.trim().to_string()
            } else {
                rates.materials.first_name().unwrap_or_default().to_string()
            };
            let grams = sheet
                .get_value((COL_FORM_GRAMS, row))
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0)
                .max(0.0);
            inputs.material_lines[i] = MaterialLine { material, grams };
        }

        if let Some(t) = Hms::from_cell_text(&sheet.get_value("I11")) {
            inputs.modeling_time = t;
        }
        if let Some(t) = Hms::from_cell_text(&sheet.get_value("I12")) {
            inputs.printing_time = t;
        }
        if let Some(t) = Hms::from_cell_text(&sheet.get_value("I13")) {
            inputs.assembly_time = t;
        }

        inputs.magnets_qty = Self::read_quantity(sheet, "I14").unwrap_or(0);
        inputs.led_single_qty = Self::read_quantity(sheet, "I15").unwrap_or(0);
        inputs.led_desk_qty = Self::read_quantity(sheet, "I16").unwrap_or(0);
        inputs.units_qty = Self::read_quantity(sheet, "J21").unwrap_or(1);

        inputs
    }

    fn read_quantity(sheet: &Worksheet, cell: &str) -> Option<u32> {
        // Quantity cells may hold "3" or "3.0" depending on how the
        // template was last saved.
        let value = sheet.get_value(cell).trim().parse::<f64>().ok()?;
        if value < 0.0 {
            return None;
        }
        Some(value.round() as u32)
    }

    /// Writes the user inputs and computed outputs into their designated
    /// cells, leaving every other cell of the template untouched.
    pub fn write_back(&mut self, inputs: &Inputs, quote: &Quote) -> QuoteResult<()> {
        let sheet = self.book.get_sheet_mut(&0).ok_or(QuoteError::MissingSheet)?;

        sheet.get_cell_mut("H5").set_value(inputs.project_name.as_str());

        for (i, line) in inputs.material_lines.iter().enumerate() {
            let row = FORM_MATERIAL_BASE_ROW + i as u32;
            sheet
                .get_cell_mut((COL_FORM_MATERIAL, row))
                .set_value(line.material.as_str());
            sheet
                .get_cell_mut((COL_FORM_GRAMS, row))
                .set_value_number(line.grams);
        }

        sheet
            .get_cell_mut("I11")
            .set_value(inputs.modeling_time.to_string());
        sheet
            .get_cell_mut("I12")
            .set_value(inputs.printing_time.to_string());
        sheet
            .get_cell_mut("I13")
            .set_value(inputs.assembly_time.to_string());

        sheet
            .get_cell_mut("I14")
            .set_value_number(inputs.magnets_qty as f64);
        sheet
            .get_cell_mut("I15")
            .set_value_number(inputs.led_single_qty as f64);
        sheet
            .get_cell_mut("I16")
            .set_value_number(inputs.led_desk_qty as f64);

        sheet
            .get_cell_mut("J21")
            .set_value_number(inputs.units_qty as f64);

        // Formulas in the sheet will not recalculate outside a spreadsheet
        // program, so the computed outputs are written as plain values.
        sheet.get_cell_mut("J18").set_value_number(quote.modeling_cost);
        sheet.get_cell_mut("J20").set_value_number(quote.unit_price);
        sheet.get_cell_mut("J22").set_value_number(quote.discount);
        sheet.get_cell_mut("J24").set_value_number(quote.total);

        Ok(())
    }

    /// Saves the workbook to disk.
    pub fn save(&self, filename: &str) -> Result<String, String> {
        match writer::xlsx::write(&self.book, filename) {
            Ok(_) => Ok(filename.to_string()),
            Err(e) => Err(format!("{:?}", e)),
        }
    }
}
