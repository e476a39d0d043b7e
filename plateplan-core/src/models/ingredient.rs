use serde::{Deserialize, Serialize};
use std::fmt;

use super::unit::Unit;

/// An amount of something, measured in a fixed unit.
///
/// With [`Unit::None`] the value carries no meaning and is normally absent.
/// With [`Unit::Number`] the value is a plain count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Quantity {
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Quantity {
    pub fn new(unit: Unit, value: f64) -> Self {
        Self {
            unit,
            value: Some(value),
        }
    }

    /// A quantity with no unit and no value ("to taste").
    pub fn unitless() -> Self {
        Self {
            unit: Unit::None,
            value: None,
        }
    }

    /// Render this quantity together with the ingredient it measures.
    ///
    /// - no unit (or no value): the ingredient name alone
    /// - a count: the bare number
    /// - anything else: `<value><abbrev> <lowercased name>`, e.g. `1.5kg chicken`
    ///
    /// Values are rounded to two decimals with trailing zeros dropped.
    pub fn to_string_with_ingredient(&self, ingredient: &str) -> String {
        let value = match self.value {
            Some(value) if self.unit.is_measured() => value,
            _ => return ingredient.to_string(),
        };

        match self.unit.abbreviation() {
            Some(abbrev) => format!(
                "{}{} {}",
                format_amount(value),
                abbrev,
                ingredient.to_lowercase()
            ),
            None => format_amount(value),
        }
    }
}

/// Round to two decimals and drop trailing zeros (`2.50` -> `2.5`, `3.00` -> `3`).
///
/// Rounding works on the exact decimal expansion of `value`, so `1.045`
/// (stored as 1.04499...) gives `1.04`. Exact half-cent ties round away
/// from zero (`0.125` -> `0.13`).
pub fn format_amount(value: f64) -> String {
    // Half-cent ties are exactly the odd multiples of 1/8.
    let eighths = value * 8.0;
    let fixed = if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    } else {
        format!("{:.2}", value)
    };
    let rounded: f64 = fixed.parse().unwrap_or(value);
    // Adding zero folds -0.0 into 0.0 so it never prints as "-0".
    format!("{}", rounded + 0.0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Quantity,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    /// Ingredient measured in `unit`, e.g. `Ingredient::measured("Flour", 200.0, Unit::Gram)`.
    pub fn measured(name: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self::new(name, Quantity::new(unit, value))
    }

    /// Ingredient without a quantity.
    pub fn unmeasured(name: impl Into<String>) -> Self {
        Self::new(name, Quantity::unitless())
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantity.unit {
            Unit::Number if self.quantity.value.is_some() => write!(
                f,
                "{} {}",
                self.quantity.to_string_with_ingredient(&self.name),
                self.name
            ),
            _ => write!(f, "{}", self.quantity.to_string_with_ingredient(&self.name)),
        }
    }
}
