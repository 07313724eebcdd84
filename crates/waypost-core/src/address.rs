//! Canonical-address composition.
//!
//! Builds the single formatted string used both as the provider query and as
//! the cache key. Field values are resolved through the configured alias
//! table, substituted into the bound template, and normalized so that the
//! same structured input always yields byte-identical output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{AddressPart, FieldSpec, GeocodeConfig};
use crate::geo::{AddressSource, GeocodePlace, Record, StructuredAddress};

/// Default template, matching the layout most providers expect.
pub const DEFAULT_TEMPLATE: &str = "${address1} ${address2}, ${city}, ${zip} ${state}, ${country}";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").unwrap());
static REPEATED_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*,)+").unwrap());
static EDGE_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s,]+|[\s,]+$").unwrap());

/// A canonical-address template over `${part}` placeholders.
///
/// One format is bound to one provider profile; the normalization ruleset
/// applied after substitution is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressFormat {
    template: String,
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl AddressFormat {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute resolved part values into the template and normalize.
    ///
    /// Returns `None` when every placeholder resolved empty: there is no
    /// usable address in that case, not an empty string.
    pub fn render(&self, mut value_of: impl FnMut(AddressPart) -> Option<String>) -> Option<String> {
        let mut rendered = self.template.clone();
        let mut any_present = false;

        for part in AddressPart::ALL {
            let value = value_of(part).unwrap_or_default();
            if !value.is_empty() {
                any_present = true;
            }
            rendered = rendered.replace(&format!("${{{}}}", part.as_str()), &value);
        }

        if !any_present {
            return None;
        }

        Some(normalize(&rendered))
    }
}

/// Post-substitution cleanup: collapse whitespace runs, drop spaces before
/// commas, collapse repeated commas, strip leading/trailing comma sequences.
fn normalize(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    let no_dangling = SPACE_BEFORE_COMMA.replace_all(&collapsed, ",");
    let single_commas = REPEATED_COMMAS.replace_all(&no_dangling, ",");
    EDGE_COMMAS.replace_all(&single_commas, "").trim().to_string()
}

/// Resolve a structured or plain-text address into one canonical string.
///
/// Plain text is passed through unchanged (already canonical). Structured
/// input goes through alias resolution: for each logical part, the first
/// source field present with a non-empty trimmed value wins, canonical name
/// before aliases. Commas inside a chosen value become spaces so they cannot
/// corrupt the field separator. A raw `address` value with no `address1` is
/// treated as the street line. Returns `None` when nothing usable remains,
/// and for coordinate-pair input (there is no address to compose).
pub fn compose(config: &GeocodeConfig, source: &AddressSource) -> Option<String> {
    match source {
        AddressSource::Point(_) => None,
        AddressSource::Text(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        AddressSource::Structured(address) => {
            let mut address = address.clone();
            promote_street_address(&mut address);

            config.format.render(|part| {
                address
                    .first_present(&config.aliases.candidates(part))
                    .map(|value| value.replace(',', " "))
            })
        }
    }
}

/// A raw `address` value alongside no `address1` is a street line, not a
/// full address; re-key it so composition picks it up.
pub fn promote_street_address(address: &mut StructuredAddress) {
    let has_address1 = address
        .get("address1")
        .map(str::trim)
        .is_some_and(|v| !v.is_empty());
    if has_address1 {
        return;
    }
    if let Some(street) = address.remove("address") {
        if !street.trim().is_empty() {
            address.set("address1", street);
        }
    }
}

/// Copy non-empty geocoded components into a record under the configured
/// column names. Missing components and unconfigured columns are skipped.
pub fn standardize(fields: &FieldSpec, record: &mut Record, place: &GeocodePlace) {
    for part in AddressPart::ALL {
        if let (Some(column), Some(value)) = (fields.column(part), place.component(part)) {
            record.insert(column.to_string(), Value::String(value.to_string()));
        }
    }
}
