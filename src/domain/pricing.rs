//! Pricing engine for the quote form.
//!
//! This module turns form inputs and the template's rate tables into an
//! itemized cost breakdown and a final rounded price. It is a pure
//! computation: identical inputs and rates always produce an identical
//! quote.

use super::errors::{QuoteError, QuoteResult};
use super::models::{
    BreakdownRow, Inputs, Quote, Rates, ADDON_LED_DESK, ADDON_LED_SINGLE, ADDON_MAGNETS,
    LABOR_ASSEMBLY, LABOR_MODELING, LABOR_PRINTING,
};

/// Quantity-tiered discount multiplier for the per-unit price.
///
/// A deterministic step function with no interpolation. The modeling cost
/// is never subject to it.
///
/// # Examples
///
/// ```
/// use printquote::domain::discount_factor;
///
/// assert_eq!(discount_factor(1), 1.0);
/// assert_eq!(discount_factor(10), 0.9);
/// assert_eq!(discount_factor(50), 0.8);
/// assert_eq!(discount_factor(200), 0.75);
/// ```
pub fn discount_factor(qty: u32) -> f64 {
    if qty > 100 {
        0.75
    } else if qty > 30 {
        0.8
    } else if qty > 1 {
        0.9
    } else {
        1.0
    }
}

/// Rounds `value` to the nearest multiple of `multiple`.
///
/// Ties round away from zero (`f64::round`), so `mround(2.5, 5.0)` is 5.0.
/// A zero multiple returns the value unchanged.
///
/// # Examples
///
/// ```
/// use printquote::domain::mround;
///
/// assert_eq!(mround(7.0, 5.0), 5.0);
/// assert_eq!(mround(8.0, 5.0), 10.0);
/// assert_eq!(mround(2.5, 5.0), 5.0);
/// ```
pub fn mround(value: f64, multiple: f64) -> f64 {
    if multiple == 0.0 {
        return value;
    }
    (value / multiple).round() * multiple
}

/// Formats an amount as whole shekels with thousands separators.
pub fn currency(n: f64) -> String {
    format!("{} ₪", group_thousands(&format!("{:.0}", n)))
}

/// Formats an amount with two decimal places.
pub fn currency2(n: f64) -> String {
    let text = format!("{:.2}", n);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}.{} ₪", group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{}{}", sign, out)
}

/// Computes quotes from form inputs against a set of rate tables.
///
/// The engine borrows the rates read from the template; the caller keeps
/// them immutable for the session and recomputes the whole quote on every
/// input change.
///
/// # Examples
///
/// ```
/// use printquote::domain::{Inputs, PricingEngine, Rates};
///
/// let mut rates = Rates::default();
/// rates.materials.insert("PLA", 100.0);
///
/// let mut inputs = Inputs::default();
/// inputs.material_lines[0].material = "PLA".to_string();
/// inputs.material_lines[0].grams = 500.0;
///
/// let quote = PricingEngine::new(&rates).compute(&inputs).unwrap();
/// assert_eq!(quote.materials_total, 50.0);
/// ```
pub struct PricingEngine<'a> {
    rates: &'a Rates,
}

impl<'a> PricingEngine<'a> {
    pub fn new(rates: &'a Rates) -> Self {
        Self { rates }
    }

    /// Builds the full quote: breakdown rows, subtotals, and the final
    /// rounded total.
    ///
    /// Unknown material, labor, or add-on names contribute exactly zero
    /// cost and never error. Negative weights are rejected; quantities
    /// cannot be negative by type.
    pub fn compute(&self, inputs: &Inputs) -> QuoteResult<Quote> {
        let mut rows = Vec::new();

        let mut materials_total = 0.0;
        for (i, line) in inputs.material_lines.iter().enumerate() {
            if line.grams < 0.0 {
                return Err(QuoteError::NegativeWeight {
                    line: i + 1,
                    grams: line.grams,
                });
            }
            // Material rates are per kilogram, weights are in grams.
            let cost = self.rates.materials.rate(&line.material) / 1000.0 * line.grams;
            rows.push(BreakdownRow {
                category: format!("Material {}", i + 1),
                detail: format!("{} - {:.0} g", line.material, line.grams),
                cost,
            });
            materials_total += cost;
        }

        let modeling_h = inputs.modeling_time.to_hours();
        let printing_h = inputs.printing_time.to_hours();
        let assembly_h = inputs.assembly_time.to_hours();

        let modeling_cost = self.rates.labor.rate(LABOR_MODELING) * modeling_h;
        let printing_cost = self.rates.labor.rate(LABOR_PRINTING) * printing_h;
        let assembly_cost = self.rates.labor.rate(LABOR_ASSEMBLY) * assembly_h;

        rows.push(BreakdownRow {
            category: "Labor".to_string(),
            detail: format!("Modeling - {:.2} h", modeling_h),
            cost: modeling_cost,
        });
        rows.push(BreakdownRow {
            category: "Labor".to_string(),
            detail: format!("Printing - {:.2} h", printing_h),
            cost: printing_cost,
        });
        rows.push(BreakdownRow {
            category: "Labor".to_string(),
            detail: format!("Assembly - {:.2} h", assembly_h),
            cost: assembly_cost,
        });
        let labor_total = modeling_cost + printing_cost + assembly_cost;

        let magnets_cost = self.rates.addons.rate(ADDON_MAGNETS) * inputs.magnets_qty as f64;
        let led_single_cost =
            self.rates.addons.rate(ADDON_LED_SINGLE) * inputs.led_single_qty as f64;
        let led_desk_cost = self.rates.addons.rate(ADDON_LED_DESK) * inputs.led_desk_qty as f64;

        rows.push(BreakdownRow {
            category: "Add-ons".to_string(),
            detail: format!("Magnets - {} pcs", inputs.magnets_qty),
            cost: magnets_cost,
        });
        rows.push(BreakdownRow {
            category: "Add-ons".to_string(),
            detail: format!("Single LED - {} pcs", inputs.led_single_qty),
            cost: led_single_cost,
        });
        rows.push(BreakdownRow {
            category: "Add-ons".to_string(),
            detail: format!("Desk LED - {} pcs", inputs.led_desk_qty),
            cost: led_desk_cost,
        });
        let addons_total = magnets_cost + led_single_cost + led_desk_cost;

        // Modeling is a one-time setup cost: it is excluded from the
        // per-unit price and added back unscaled in the total.
        let unit_price = materials_total + labor_total + addons_total - modeling_cost;
        let qty = inputs.units_qty;
        let discount = discount_factor(qty);
        let total = mround(modeling_cost + unit_price * qty as f64 * discount, 5.0);

        Ok(Quote {
            project: inputs.project_name.clone(),
            rows,
            materials_total,
            labor_total,
            addons_total,
            modeling_cost,
            unit_price,
            qty,
            discount,
            total,
        })
    }
}
