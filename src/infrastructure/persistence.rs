use crate::domain::{Inputs, Quote};
use crate::infrastructure::{ImageExporter, PdfExporter, TemplateWorkbook};
use std::fs;

pub struct ExportRepository;

impl ExportRepository {
    pub fn save_pdf(quote: &Quote, filename: &str) -> Result<String, String> {
        match PdfExporter::render(quote) {
            Ok(bytes) => match fs::write(filename, bytes) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(e),
        }
    }

    pub fn save_png(quote: &Quote, filename: &str) -> Result<String, String> {
        match ImageExporter::render(quote) {
            Ok(bytes) => match fs::write(filename, bytes) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(e),
        }
    }

    pub fn save_workbook(
        workbook: &mut TemplateWorkbook,
        inputs: &Inputs,
        quote: &Quote,
        filename: &str,
    ) -> Result<String, String> {
        match workbook.write_back(inputs, quote) {
            Ok(_) => workbook.save(filename),
            Err(e) => Err(e.to_string()),
        }
    }

    pub fn save_json(quote: &Quote, filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(quote) {
            Ok(json) => match fs::write(filename, &json) {
                Ok(_) => Ok(filename.to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricingEngine, Rates};

    #[test]
    fn test_save_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quote.json");
        let path = path.to_str().unwrap();

        let rates = Rates::default();
        let inputs = Inputs::default();
        let quote = PricingEngine::new(&rates).compute(&inputs).unwrap();

        let saved = ExportRepository::save_json(&quote, path).unwrap();
        assert_eq!(saved, path);

        let content = fs::read_to_string(path).unwrap();
        let loaded: Quote = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, quote);
    }

    #[test]
    fn test_save_pdf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quote.pdf");
        let path = path.to_str().unwrap();

        let rates = Rates::default();
        let inputs = Inputs::default();
        let quote = PricingEngine::new(&rates).compute(&inputs).unwrap();

        ExportRepository::save_pdf(&quote, path).unwrap();
        let bytes = fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
