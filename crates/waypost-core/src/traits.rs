//! Adapter traits: the seams between the core and its collaborators.
//!
//! Storage, remote geocoding, and cross-entity lookups are all injected
//! capabilities. The core never knows a concrete schema, query language, or
//! wire format.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::geo::{GeocodePlace, Record};
use crate::query::ProximityFilter;

/// Caller-supplied query extras merged into a proximity search.
///
/// Equality conditions are combined with the proximity filter's own
/// conditions; the proximity ordering always wins, so there is no ordering
/// override here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Extra equality filters, keyed by configured column names.
    pub conditions: Vec<(String, Value)>,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Storage adapter for geocode records.
///
/// Field names are the configured column names; the adapter owns translation
/// to its native schema and query language. Geocode persistence is
/// append-only: this subsystem inserts fresh rows and never updates one in
/// place, so adapters need no update operation.
#[async_trait]
pub trait GeocodeStorage: Send + Sync {
    /// First row matching all equality conditions, or `None`.
    async fn find_one(&self, conditions: &[(String, Value)]) -> Result<Option<Record>>;

    /// Insert a new geocode record.
    async fn insert(&self, record: Record) -> Result<()>;

    /// Rows matching the proximity filter plus caller extras, ordered per
    /// the filter when it carries an ordering.
    async fn query(&self, filter: &ProximityFilter, options: &QueryOptions) -> Result<Vec<Record>>;

    /// Count of rows matching the proximity filter plus caller extras.
    async fn count(&self, filter: &ProximityFilter, options: &QueryOptions) -> Result<u64>;
}

/// Cross-entity lookup capability for backfilling address parts.
///
/// `entity` may carry one dotted hop (`"State.Country"`): resolve the first
/// segment by `reference`, then follow the relation named by the second
/// segment before reading `field`. A missing entity or field is `Ok(None)`,
/// never an error; cross-entity misses are non-fatal by design.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn lookup(&self, entity: &str, reference: &Value, field: &str)
        -> Result<Option<String>>;
}

/// Remote geocoding provider adapter.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Resolve one canonical address string to a place. A single attempt;
    /// the core never retries.
    async fn geocode(&self, address: &str) -> Result<GeocodePlace>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}
