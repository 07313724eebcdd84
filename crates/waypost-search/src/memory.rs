//! In-memory storage adapter.
//!
//! Interprets the proximity-filter AST directly via
//! [`DistanceExpr::evaluate`], mirroring what a SQL adapter renders with
//! [`ProximityFilter::conditions_sql`]. Serves tests and embedded use;
//! deduplication of concurrently inserted identical addresses is a real
//! database's concern, not this adapter's.
//!
//! [`DistanceExpr::evaluate`]: waypost_core::DistanceExpr::evaluate
//! [`ProximityFilter::conditions_sql`]: waypost_core::ProximityFilter::conditions_sql

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use waypost_core::{
    round4, value_as_f64, FilterCondition, GeocodeStorage, ProximityFilter, QueryOptions, Record,
    Result, SortDirection,
};

/// Append-only in-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all rows, in insertion order.
    pub fn rows(&self) -> Vec<Record> {
        self.rows.read().unwrap().clone()
    }

    fn matching_scored(&self, filter: &ProximityFilter, options: &QueryOptions) -> Vec<(f64, Record)> {
        self.rows
            .read()
            .unwrap()
            .iter()
            .filter(|record| equality_match(record, &options.conditions))
            .filter_map(|record| {
                let latitude = record.get(&filter.latitude_column).and_then(value_as_f64)?;
                let longitude = record.get(&filter.longitude_column).and_then(value_as_f64)?;
                let score = filter.expr.evaluate(latitude, longitude);

                let passes = filter.conditions.iter().all(|condition| match condition {
                    // Both rounded coordinates must differ, matching the
                    // SQL rendering of the self-exclusion policy.
                    FilterCondition::NotAtPoint {
                        latitude: ref_lat,
                        longitude: ref_lon,
                    } => {
                        round4(latitude) != round4(*ref_lat)
                            && round4(longitude) != round4(*ref_lon)
                    }
                    FilterCondition::WithinDistance { max, scale } => score * scale <= *max,
                });

                passes.then(|| (score, record.clone()))
            })
            .collect()
    }
}

#[async_trait]
impl GeocodeStorage for MemoryStore {
    async fn find_one(&self, conditions: &[(String, Value)]) -> Result<Option<Record>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .find(|record| equality_match(record, conditions))
            .cloned())
    }

    async fn insert(&self, record: Record) -> Result<()> {
        self.rows.write().unwrap().push(record);
        Ok(())
    }

    async fn query(&self, filter: &ProximityFilter, options: &QueryOptions) -> Result<Vec<Record>> {
        let mut scored = self.matching_scored(filter, options);

        if let Some(direction) = filter.order {
            scored.sort_by(|(a, _), (b, _)| {
                let ordering = a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let mut records: Vec<Record> = scored.into_iter().map(|(_, record)| record).collect();
        if let Some(limit) = options.limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn count(&self, filter: &ProximityFilter, options: &QueryOptions) -> Result<u64> {
        Ok(self.matching_scored(filter, options).len() as u64)
    }
}

/// Equality with numeric coercion: `33613` and `"33613"` compare equal, the
/// way loosely typed schemas store zip codes.
fn value_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    matches!(
        (value_as_f64(a), value_as_f64(b)),
        (Some(x), Some(y)) if x == y
    )
}

fn equality_match(record: &Record, conditions: &[(String, Value)]) -> bool {
    conditions
        .iter()
        .all(|(column, expected)| record.get(column).is_some_and(|v| value_eq(v, expected)))
}
