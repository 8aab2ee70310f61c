//! PNG rendering of a finished quote.
//!
//! Draws the same summary as the PDF on a fixed-size white canvas using a
//! system DejaVu font. Rendering fails when no usable font is found.

use crate::domain::{currency, currency2, Quote};
use ab_glyph::{FontVec, PxScale};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::io::Cursor;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const RIGHT_MARGIN: i32 = 60;

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansCondensed.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

pub struct ImageExporter;

impl ImageExporter {
    /// Renders the quote to PNG bytes.
    pub fn render(quote: &Quote) -> Result<Vec<u8>, String> {
        let font = Self::load_font()?;
        let black = Rgb([0u8, 0u8, 0u8]);
        let title = PxScale::from(38.0);
        let body = PxScale::from(26.0);
        let small = PxScale::from(22.0);

        let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([255u8, 255u8, 255u8]));

        let mut y = 50;
        Self::draw_right(&mut img, black, y, title, &font, "Quote summary");
        y += 70;
        Self::draw_right(
            &mut img,
            black,
            y,
            body,
            &font,
            &format!("Project: {}", quote.project),
        );
        y += 40;
        Self::draw_right(
            &mut img,
            black,
            y,
            body,
            &font,
            &format!(
                "Modeling cost: {} | Unit price (excl. modeling): {}",
                currency(quote.modeling_cost),
                currency(quote.unit_price)
            ),
        );
        y += 40;
        Self::draw_right(
            &mut img,
            black,
            y,
            body,
            &font,
            &format!(
                "Quantity: {} | Discount: {}% | Total: {}",
                quote.qty,
                quote.discount_percent(),
                currency(quote.total)
            ),
        );
        y += 60;
        Self::draw_right(&mut img, black, y, body, &font, "Cost breakdown");
        y += 40;

        for row in &quote.rows {
            draw_text_mut(
                &mut img,
                black,
                RIGHT_MARGIN,
                y,
                small,
                &font,
                &currency2(row.cost),
            );
            let detail = format!("{}: {}", row.category, row.detail);
            Self::draw_right(&mut img, black, y, small, &font, &detail);
            y += 30;
            if y > HEIGHT as i32 - 40 {
                break;
            }
        }

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| e.to_string())?;
        Ok(bytes)
    }

    fn load_font() -> Result<FontVec, String> {
        for path in FONT_PATHS {
            if let Ok(data) = std::fs::read(path) {
                if let Ok(font) = FontVec::try_from_vec(data) {
                    return Ok(font);
                }
            }
        }
        Err("No usable font found (looked for DejaVu Sans)".to_string())
    }

    fn draw_right(
        img: &mut RgbImage,
        color: Rgb<u8>,
        y: i32,
        scale: PxScale,
        font: &FontVec,
        text: &str,
    ) {
        let (text_width, _) = text_size(scale, font, text);
        let x = WIDTH as i32 - RIGHT_MARGIN - text_width as i32;
        draw_text_mut(img, color, x.max(0), y, scale, font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Inputs, PricingEngine, Rates};

    #[test]
    fn test_render_produces_png_bytes() {
        let rates = Rates::default();
        let inputs = Inputs::default();
        let quote = PricingEngine::new(&rates).compute(&inputs).unwrap();

        // Skip on machines without a DejaVu font installed.
        match ImageExporter::render(&quote) {
            Ok(bytes) => assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n"),
            Err(e) => assert!(e.contains("font")),
        }
    }
}
