//! Structured logging field name constants for waypost.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by the same names across subsystems.

/// Component within a crate.
/// Examples: "resolver", "http_geocoder", "memory_store"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "near", "geocode"
pub const OPERATION: &str = "op";

/// Canonical address being resolved.
pub const ADDRESS: &str = "address";

/// Provider name serving a remote lookup.
pub const PROVIDER: &str = "provider";

/// Whether a resolution was served from storage without a remote call.
pub const CACHE_HIT: &str = "cache_hit";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a proximity query.
pub const RESULT_COUNT: &str = "result_count";
