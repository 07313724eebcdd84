//! Geographic primitives and address inputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AddressPart;

/// A latitude/longitude pair in double-precision degrees.
///
/// A `Coordinate` is never partially populated: APIs either produce a whole
/// pair or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the pair lies within the valid degree ranges
    /// (latitude in [-90, 90], longitude in [-180, 180]).
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A geocoding result: resolved coordinate plus whatever standardized
/// address components the provider returned.
///
/// Components are used to backfill address columns when a geocode record is
/// persisted; providers that only return coordinates leave them `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodePlace {
    pub coordinate: Coordinate,
    pub address: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl GeocodePlace {
    /// A place with a coordinate and no standardized components.
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            address: None,
            address1: None,
            address2: None,
            city: None,
            state: None,
            zip: None,
            country: None,
        }
    }

    /// The standardized value for one logical address part, if the provider
    /// returned it.
    pub fn component(&self, part: AddressPart) -> Option<&str> {
        let value = match part {
            AddressPart::Address1 => &self.address1,
            AddressPart::Address2 => &self.address2,
            AddressPart::City => &self.city,
            AddressPart::State => &self.state,
            AddressPart::Zip => &self.zip,
            AddressPart::Country => &self.country,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }
}

/// A structured address: source-field name to raw value.
///
/// Keys are whatever the caller's schema uses (`addr`, `zip_code`, ...); the
/// alias table in [`crate::config::GeocodeConfig`] maps them onto logical
/// parts at composition time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAddress(HashMap<String, String>);

impl StructuredAddress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The first non-empty trimmed value among `candidates`, checked in
    /// order.
    pub fn first_present(&self, candidates: &[&str]) -> Option<&str> {
        candidates.iter().find_map(|key| {
            self.get(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StructuredAddress {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Input to geocode resolution and proximity-search origins.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressSource {
    /// Already-resolved numeric pair; no composition or lookup needed.
    Point(Coordinate),
    /// A complete address string, treated as already canonical.
    Text(String),
    /// Structured components to be composed into a canonical string.
    Structured(StructuredAddress),
}

impl From<Coordinate> for AddressSource {
    fn from(point: Coordinate) -> Self {
        AddressSource::Point(point)
    }
}

impl From<(f64, f64)> for AddressSource {
    fn from(pair: (f64, f64)) -> Self {
        AddressSource::Point(pair.into())
    }
}

impl From<&str> for AddressSource {
    fn from(text: &str) -> Self {
        AddressSource::Text(text.to_string())
    }
}

impl From<String> for AddressSource {
    fn from(text: String) -> Self {
        AddressSource::Text(text)
    }
}

impl From<StructuredAddress> for AddressSource {
    fn from(address: StructuredAddress) -> Self {
        AddressSource::Structured(address)
    }
}

/// A persisted row, keyed by configured column names.
///
/// Storage adapters own the translation from these logical column names to
/// their native schema.
pub type Record = HashMap<String, Value>;

/// Coerce a stored JSON value to `f64`, accepting numbers and numeric
/// strings (some schemas store coordinates as decimal strings).
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
