//! Geocoding configuration: field mappings, alias tables, and cross-entity
//! backfill rules.
//!
//! A [`GeocodeConfig`] is built once per record type and passed into each
//! component as a read-only snapshot. There is no ambient per-entity
//! registry: everything a component needs to know about the owning schema
//! travels in this struct.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Logical address parts that participate in canonical-address composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressPart {
    Address1,
    Address2,
    City,
    State,
    Zip,
    Country,
}

impl AddressPart {
    /// All parts, in template order.
    pub const ALL: [AddressPart; 6] = [
        AddressPart::Address1,
        AddressPart::Address2,
        AddressPart::City,
        AddressPart::State,
        AddressPart::Zip,
        AddressPart::Country,
    ];

    /// Canonical field name for this part.
    pub fn as_str(self) -> &'static str {
        match self {
            AddressPart::Address1 => "address1",
            AddressPart::Address2 => "address2",
            AddressPart::City => "city",
            AddressPart::State => "state",
            AddressPart::Zip => "zip",
            AddressPart::Country => "country",
        }
    }
}

impl std::fmt::Display for AddressPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column names on the owning record schema for every field this subsystem
/// reads or writes. `None` means the schema does not carry that column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical-address column (doubles as the cache key when no hash
    /// column is configured).
    pub address: Option<String>,
    /// Address-hash column; preferred cache key when present.
    pub hash: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            address: Some("address".to_string()),
            hash: None,
            latitude: Some("latitude".to_string()),
            longitude: Some("longitude".to_string()),
            address1: Some("address1".to_string()),
            address2: Some("address2".to_string()),
            city: Some("city".to_string()),
            state: Some("state".to_string()),
            zip: Some("zip".to_string()),
            country: Some("country".to_string()),
        }
    }
}

impl FieldSpec {
    /// Column name for a composable address part.
    pub fn column(&self, part: AddressPart) -> Option<&str> {
        let column = match part {
            AddressPart::Address1 => &self.address1,
            AddressPart::Address2 => &self.address2,
            AddressPart::City => &self.city,
            AddressPart::State => &self.state,
            AddressPart::Zip => &self.zip,
            AddressPart::Country => &self.country,
        };
        column.as_deref()
    }

    /// Both coordinate columns, when the schema carries them.
    pub fn coordinate_columns(&self) -> Option<(&str, &str)> {
        match (self.latitude.as_deref(), self.longitude.as_deref()) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Ordered source-field aliases per logical address part.
///
/// The canonical part name is always consulted before any alias; aliases are
/// tried in configured order, not alphabetical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasTable(HashMap<AddressPart, Vec<String>>);

impl Default for AliasTable {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(
            AddressPart::Address1,
            vec!["addr".to_string(), "address_1".to_string()],
        );
        aliases.insert(
            AddressPart::Address2,
            vec!["addr2".to_string(), "address_2".to_string()],
        );
        aliases.insert(
            AddressPart::Zip,
            vec![
                "zipcode".to_string(),
                "zip_code".to_string(),
                "postal_code".to_string(),
            ],
        );
        Self(aliases)
    }
}

impl AliasTable {
    /// An alias table with no aliases at all.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Replace the alias list for one part.
    pub fn with_aliases<I, S>(mut self, part: AddressPart, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(part, aliases.into_iter().map(Into::into).collect());
        self
    }

    /// Candidate source-field names for a part: canonical name first, then
    /// configured aliases in order.
    pub fn candidates(&self, part: AddressPart) -> Vec<&str> {
        let mut candidates = vec![part.as_str()];
        if let Some(aliases) = self.0.get(&part) {
            candidates.extend(aliases.iter().map(String::as_str));
        }
        candidates
    }
}

/// How to backfill one missing address part from a related entity.
///
/// `entity` may carry one further dotted hop (`"State.Country"`) for values
/// that live on a second-degree relation; the injected entity-lookup
/// capability interprets the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossEntityFieldRule {
    /// Logical part this rule fills.
    pub field: AddressPart,
    /// Related entity kind, optionally dotted for one extra hop.
    pub entity: String,
    /// Field on the local record holding the reference id.
    pub reference_field: String,
    /// Field on the related entity to read.
    pub lookup_field: String,
}

impl CrossEntityFieldRule {
    /// Rule with derived defaults: reference field is the snake_cased first
    /// path segment plus `_id`, lookup field is `name`.
    pub fn new(field: AddressPart, entity: impl Into<String>) -> Self {
        let entity = entity.into();
        let base = entity.split('.').next().unwrap_or(&entity);
        Self {
            reference_field: format!("{}_id", underscore(base)),
            lookup_field: "name".to_string(),
            field,
            entity,
        }
    }

    pub fn with_reference_field(mut self, reference_field: impl Into<String>) -> Self {
        self.reference_field = reference_field.into();
        self
    }

    pub fn with_lookup_field(mut self, lookup_field: impl Into<String>) -> Self {
        self.lookup_field = lookup_field.into();
        self
    }
}

/// CamelCase to snake_case, for deriving reference-field names.
fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Read-only configuration snapshot for one geocodable record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeConfig {
    pub fields: FieldSpec,
    pub aliases: AliasTable,
    /// Canonical-address template; normally inherited from the provider
    /// profile in use.
    pub format: crate::address::AddressFormat,
    pub rules: Vec<CrossEntityFieldRule>,
}

impl GeocodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: FieldSpec) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_format(mut self, format: crate::address::AddressFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_rule(mut self, rule: CrossEntityFieldRule) -> Self {
        self.rules.push(rule);
        self
    }
}
