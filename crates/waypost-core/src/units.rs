//! Distance units and their conversion ratios.
//!
//! Ratios are expressed relative to one kilometer. Unknown unit symbols are
//! never an error: callers that accept user input go through
//! [`DistanceUnit::parse_or_default`], which falls back to kilometers so that
//! distance computation stays always-available.

use serde::{Deserialize, Serialize};

/// A recognized distance unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
    Feet,
    Inches,
    NauticalMiles,
}

impl DistanceUnit {
    /// All recognized units.
    pub const ALL: [DistanceUnit; 5] = [
        DistanceUnit::Kilometers,
        DistanceUnit::Miles,
        DistanceUnit::Feet,
        DistanceUnit::Inches,
        DistanceUnit::NauticalMiles,
    ];

    /// Parse a one-letter unit symbol (`k`, `m`, `f`, `i`, `n`),
    /// case-insensitive.
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol.trim().to_ascii_lowercase().as_str() {
            "k" => Some(DistanceUnit::Kilometers),
            "m" => Some(DistanceUnit::Miles),
            "f" => Some(DistanceUnit::Feet),
            "i" => Some(DistanceUnit::Inches),
            "n" => Some(DistanceUnit::NauticalMiles),
            _ => None,
        }
    }

    /// Parse a unit symbol, falling back to kilometers for anything
    /// unrecognized.
    pub fn parse_or_default(symbol: &str) -> Self {
        Self::parse(symbol).unwrap_or_default()
    }

    /// Conversion ratio from kilometers to this unit.
    pub fn ratio(self) -> f64 {
        match self {
            DistanceUnit::Kilometers => 1.0,
            DistanceUnit::Miles => 0.621371192,
            DistanceUnit::Feet => 3280.8399,
            DistanceUnit::Inches => 39370.0787,
            DistanceUnit::NauticalMiles => 0.539956803,
        }
    }

    /// One-letter symbol for this unit.
    pub fn symbol(self) -> char {
        match self {
            DistanceUnit::Kilometers => 'k',
            DistanceUnit::Miles => 'm',
            DistanceUnit::Feet => 'f',
            DistanceUnit::Inches => 'i',
            DistanceUnit::NauticalMiles => 'n',
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
