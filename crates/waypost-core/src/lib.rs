//! # waypost-core
//!
//! Core types, configuration, and adapter traits for the waypost geocoding
//! and proximity-search toolkit.
//!
//! This crate is pure: canonical-address composition, haversine distance,
//! and proximity-query construction all live here with no I/O. Storage,
//! remote providers, and cross-entity lookups are trait seams implemented by
//! the `waypost-provider` and `waypost-search` crates (or by applications).

pub mod address;
pub mod config;
pub mod distance;
pub mod error;
pub mod geo;
pub mod logging;
pub mod query;
pub mod traits;
pub mod units;

// Re-export commonly used types at crate root
pub use address::{compose, standardize, AddressFormat, DEFAULT_TEMPLATE};
pub use config::{AddressPart, AliasTable, CrossEntityFieldRule, FieldSpec, GeocodeConfig};
pub use distance::{distance, EARTH_RADIUS_KM};
pub use error::{Error, Result};
pub use geo::{value_as_f64, AddressSource, Coordinate, GeocodePlace, Record, StructuredAddress};
pub use query::{
    build, round4, DistanceExpr, FilterCondition, ProximityFilter, ProximityQuery, QueryMode,
    SortDirection,
};
pub use traits::{EntityLookup, GeocodeProvider, GeocodeStorage, QueryOptions};
pub use units::DistanceUnit;
