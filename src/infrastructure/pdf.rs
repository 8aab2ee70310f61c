//! PDF rendering of a finished quote.
//!
//! Pure formatting: one A4 page (or more) with a right-aligned headline
//! block and the tabular cost breakdown. No computation happens here.

use crate::domain::{currency, currency2, Quote};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const BOTTOM_MARGIN: f32 = 20.0;
const ROW_STEP: f32 = 5.5;

pub struct PdfExporter;

impl PdfExporter {
    /// Renders the quote to PDF bytes.
    pub fn render(quote: &Quote) -> Result<Vec<u8>, String> {
        let (doc, page, layer) =
            PdfDocument::new("Quote summary", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| e.to_string())?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| e.to_string())?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT - 20.0;

        Self::text_right(&layer, "Quote summary", 18.0, &bold, y);
        y -= 10.0;
        Self::text_right(&layer, &format!("Project: {}", quote.project), 12.0, &regular, y);
        y -= 8.0;
        let date = chrono::Local::now().format("%d/%m/%Y");
        Self::text_right(&layer, &format!("Date: {}", date), 12.0, &regular, y);
        y -= 14.0;

        let headlines = [
            format!("Modeling cost: {}", currency(quote.modeling_cost)),
            format!("Unit price (excl. modeling): {}", currency(quote.unit_price)),
            format!("Quantity: {}", quote.qty),
            format!("Quantity discount: {}%", quote.discount_percent()),
            format!("Total: {}", currency(quote.total)),
        ];
        for line in &headlines {
            Self::text_right(&layer, line, 12.0, &bold, y);
            y -= 7.0;
        }
        y -= 5.0;

        Self::text_right(&layer, "Cost breakdown", 11.0, &bold, y);
        y -= 8.0;
        layer.use_text("Cost", 10.0, Mm(MARGIN), Mm(y), &regular);
        layer.use_text("Detail", 10.0, Mm(MARGIN + 35.0), Mm(y), &regular);
        y -= 6.0;

        for row in &quote.rows {
            if y < BOTTOM_MARGIN {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(next_page).get_layer(next_layer);
                y = PAGE_HEIGHT - BOTTOM_MARGIN;
            }
            layer.use_text(currency2(row.cost), 10.0, Mm(MARGIN), Mm(y), &regular);
            let detail = format!("{}: {}", row.category, row.detail);
            layer.use_text(detail, 10.0, Mm(MARGIN + 35.0), Mm(y), &regular);
            y -= ROW_STEP;
        }

        doc.save_to_bytes().map_err(|e| e.to_string())
    }

    /// Draws text ending at the right margin.
    ///
    /// The built-in fonts expose no metrics, so the width is estimated
    /// from an average Helvetica glyph width of half an em.
    fn text_right(
        layer: &PdfLayerReference,
        text: &str,
        size: f32,
        font: &IndirectFontRef,
        y: f32,
    ) {
        const PT_TO_MM: f32 = 0.352_778;
        let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
        let x = (PAGE_WIDTH - MARGIN - width).max(MARGIN);
        layer.use_text(text, size, Mm(x), Mm(y), font);
    }
}
