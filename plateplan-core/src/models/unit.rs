use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Units an ingredient quantity can be measured in.
///
/// Units are never converted into one another: 200 g and 1 kg of the same
/// ingredient stay as two separate quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// No measurable quantity ("salt to taste").
    #[default]
    None,
    Milliliter,
    Liter,
    Gram,
    Kilogram,
    Cup,
    Teaspoon,
    Tablespoon,
    /// A plain count ("3 eggs").
    Number,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::None,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Cup,
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Number,
    ];

    /// Short suffix printed right after the value, if the unit has one.
    pub fn abbreviation(&self) -> Option<&'static str> {
        match self {
            Unit::None | Unit::Number => None,
            Unit::Milliliter => Some("mL"),
            Unit::Liter => Some("L"),
            Unit::Gram => Some("g"),
            Unit::Kilogram => Some("kg"),
            Unit::Cup => Some("cup"),
            Unit::Teaspoon => Some("tsp"),
            Unit::Tablespoon => Some("tbsp"),
        }
    }

    /// Whether quantities in this unit are accumulated on a shopping list.
    pub fn is_measured(&self) -> bool {
        !matches!(self, Unit::None)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::None => write!(f, "none"),
            Unit::Milliliter => write!(f, "milliliter"),
            Unit::Liter => write!(f, "liter"),
            Unit::Gram => write!(f, "gram"),
            Unit::Kilogram => write!(f, "kilogram"),
            Unit::Cup => write!(f, "cup"),
            Unit::Teaspoon => write!(f, "teaspoon"),
            Unit::Tablespoon => write!(f, "tablespoon"),
            Unit::Number => write!(f, "number"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid unit '{0}'. Valid options: none, ml, l, g, kg, cup, tsp, tbsp, number")]
pub struct UnitParseError(pub String);

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Unit::None),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Ok(Unit::Milliliter)
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Ok(Unit::Liter),
            "g" | "gram" | "grams" => Ok(Unit::Gram),
            "kg" | "kilogram" | "kilograms" => Ok(Unit::Kilogram),
            "cup" | "cups" => Ok(Unit::Cup),
            "tsp" | "teaspoon" | "teaspoons" => Ok(Unit::Teaspoon),
            "tbsp" | "tablespoon" | "tablespoons" => Ok(Unit::Tablespoon),
            "number" | "count" | "x" => Ok(Unit::Number),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}
