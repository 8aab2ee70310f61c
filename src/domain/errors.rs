#[derive(Debug, Clone, PartialEq)]
pub enum QuoteError {
    InvalidRateCell { cell: String, value: String },
    NegativeWeight { line: usize, grams: f64 },
    InvalidDuration(String),
    MissingSheet,
}

impl std::fmt::Display for QuoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteError::InvalidRateCell { cell, value } => {
                write!(f, "Rate cell {} is not a number: '{}'", cell, value)
            }
            QuoteError::NegativeWeight { line, grams } => {
                write!(f, "Material line {} has negative weight: {} g", line, grams)
            }
            QuoteError::InvalidDuration(text) => {
                write!(f, "Invalid duration: '{}' (expected H:MM or H:MM:SS)", text)
            }
            QuoteError::MissingSheet => {
                write!(f, "Template workbook has no worksheet")
            }
        }
    }
}

impl std::error::Error for QuoteError {}

pub type QuoteResult<T> = Result<T, QuoteError>;
