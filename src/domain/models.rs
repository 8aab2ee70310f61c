use serde::{Deserialize, Serialize};

/// Number of material lines on the form.
pub const MATERIAL_LINES: usize = 3;

/// Labor rate keys as they appear in column C of the template.
pub const LABOR_MODELING: &str = "מידול";
pub const LABOR_PRINTING: &str = "הדפסה";
pub const LABOR_ASSEMBLY: &str = "הרכבה";

/// Add-on rate keys as they appear in column C of the template.
pub const ADDON_MAGNETS: &str = "מגנטים (שקל/מגנט)";
pub const ADDON_LED_SINGLE: &str = "לד בודד";
pub const ADDON_LED_DESK: &str = "לד שולחני";

/// A named price list read from the template spreadsheet.
///
/// Entries keep the order they appear in on the sheet, so the first
/// materials entry can serve as the default material choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    entries: Vec<(String, f64)>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, price: f64) {
        self.entries.push((name.into(), price));
    }

    /// Unit price for `name`, or 0.0 when the name is unknown.
    ///
    /// Unknown names are a deliberate leniency: a form referring to a
    /// material the template does not price contributes zero cost.
    pub fn rate(&self, name: &str) -> f64 {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.entries.first().map(|(n, _)| n.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three rate tables a template provides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Price per kilogram of material
    pub materials: RateTable,
    /// Price per hour of labor
    pub labor: RateTable,
    /// Price per unit of add-on
    pub addons: RateTable,
}

/// An hours-minutes-seconds duration, the template's time cell format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hms {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Hms {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Fractional hours, the unit labor rates are quoted in.
    pub fn to_hours(self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0 + self.seconds as f64 / 3600.0
    }

    /// Parses user input of the form `H:MM` or `H:MM:SS`.
    pub fn parse(text: &str) -> crate::domain::QuoteResult<Self> {
        use crate::domain::QuoteError;

        let invalid = || QuoteError::InvalidDuration(text.to_string());
        let parts: Vec<&str> = text.trim().split(':').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(invalid());
        }

        let mut fields = [0u32; 3];
        for (i, part) in parts.iter().enumerate() {
            fields[i] = part.trim().parse::<u32>().map_err(|_| invalid())?;
        }
        let (hours, minutes, seconds) = (fields[0], fields[1], fields[2]);
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }
        Ok(Self::new(hours, minutes, seconds))
    }

    /// Best-effort read of a time cell.
    ///
    /// A time cell in the raw xlsx holds either text like `2:40` or an
    /// Excel serial (fraction of a day, e.g. 0.0625 for 1:30). Anything
    /// unreadable yields `None`.
    pub fn from_cell_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if text.contains(':') {
            return Self::parse(text).ok();
        }
        let days: f64 = text.parse().ok()?;
        if !(0.0..7.0).contains(&days) {
            return None;
        }
        let total_seconds = (days * 24.0 * 3600.0).round() as u64;
        Some(Self::new(
            (total_seconds / 3600) as u32,
            (total_seconds % 3600 / 60) as u32,
            (total_seconds % 60) as u32,
        ))
    }
}

impl std::fmt::Display for Hms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// One material choice with its weight in grams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub material: String,
    pub grams: f64,
}

/// Everything the user fills in on the form.
///
/// Quantities are unsigned by construction; negative weights are rejected
/// by the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub project_name: String,
    pub material_lines: Vec<MaterialLine>,
    pub modeling_time: Hms,
    pub printing_time: Hms,
    pub assembly_time: Hms,
    pub magnets_qty: u32,
    pub led_single_qty: u32,
    pub led_desk_qty: u32,
    pub units_qty: u32,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            project_name: "Project".to_string(),
            material_lines: vec![MaterialLine::default(); MATERIAL_LINES],
            modeling_time: Hms::new(1, 0, 0),
            printing_time: Hms::new(2, 40, 0),
            assembly_time: Hms::new(0, 30, 0),
            magnets_qty: 0,
            led_single_qty: 0,
            led_desk_qty: 0,
            units_qty: 1,
        }
    }
}

/// One line item of the cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub category: String,
    pub detail: String,
    pub cost: f64,
}

/// The computed quote: breakdown rows plus headline numbers.
///
/// Derived in full from `Inputs` and `Rates` on every edit, never mutated
/// incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub project: String,
    pub rows: Vec<BreakdownRow>,
    pub materials_total: f64,
    pub labor_total: f64,
    pub addons_total: f64,
    /// One-time setup cost, excluded from the per-unit price.
    pub modeling_cost: f64,
    /// Per-unit price excluding modeling.
    pub unit_price: f64,
    pub qty: u32,
    pub discount: f64,
    pub total: f64,
}

impl Quote {
    /// Quantity discount as a whole percentage, e.g. 0.9 → 10.
    pub fn discount_percent(&self) -> i64 {
        ((1.0 - self.discount) * 100.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_to_hours() {
        assert_eq!(Hms::new(1, 30, 0).to_hours(), 1.5);
        assert_eq!(Hms::new(0, 0, 0).to_hours(), 0.0);
        assert_eq!(Hms::new(2, 40, 0).to_hours(), 2.0 + 40.0 / 60.0);
        assert_eq!(Hms::new(0, 0, 36).to_hours(), 0.01);
    }

    #[test]
    fn test_hms_parse() {
        assert_eq!(Hms::parse("1:30"), Ok(Hms::new(1, 30, 0)));
        assert_eq!(Hms::parse("0:05:30"), Ok(Hms::new(0, 5, 30)));
        assert_eq!(Hms::parse(" 12:00 "), Ok(Hms::new(12, 0, 0)));
        assert!(Hms::parse("90").is_err());
        assert!(Hms::parse("1:75").is_err());
        assert!(Hms::parse("1:00:99").is_err());
        assert!(Hms::parse("abc").is_err());
        assert!(Hms::parse("-1:30").is_err());
    }

    #[test]
    fn test_hms_from_cell_text() {
        assert_eq!(Hms::from_cell_text("2:40"), Some(Hms::new(2, 40, 0)));
        // 1:30 as an Excel day fraction
        assert_eq!(Hms::from_cell_text("0.0625"), Some(Hms::new(1, 30, 0)));
        assert_eq!(Hms::from_cell_text(""), None);
        assert_eq!(Hms::from_cell_text("not a time"), None);
    }

    #[test]
    fn test_hms_display_round_trips_through_parse() {
        let t = Hms::new(2, 5, 9);
        assert_eq!(t.to_string(), "2:05:09");
        assert_eq!(Hms::parse(&t.to_string()), Ok(t));
    }

    #[test]
    fn test_rate_table_order_and_lookup() {
        let mut table = RateTable::new();
        table.insert("PLA", 100.0);
        table.insert("PETG", 120.0);

        assert_eq!(table.rate("PLA"), 100.0);
        assert_eq!(table.rate("PETG"), 120.0);
        assert_eq!(table.rate("ABS"), 0.0);
        assert_eq!(table.first_name(), Some("PLA"));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["PLA", "PETG"]);
        assert!(table.contains("PLA"));
        assert!(!table.contains("ABS"));
    }
}
