//! Proximity search over stored geocode records.
//!
//! Execution is delegated to the storage adapter; afterwards every returned
//! row is annotated with its exact haversine distance from the origin. The
//! second pass is deliberate: the storage-side scoring expression may be an
//! approximation, the reported distance never is.

use std::sync::Arc;

use tracing::{debug, warn};

use waypost_core::{
    build, distance, value_as_f64, AddressSource, Coordinate, DistanceUnit, Error, GeocodeStorage,
    ProximityQuery, QueryMode, QueryOptions, Record, Result, SortDirection,
};

use crate::resolver::GeocodeResolver;

/// Parameters for one near/count query.
#[derive(Debug, Clone, Default)]
pub struct NearRequest {
    /// Maximum radius in `unit`; unbounded when `None`.
    pub max_distance: Option<f64>,
    pub unit: DistanceUnit,
    pub direction: SortDirection,
    /// Extra equality filters and limit, merged into the proximity query.
    pub options: QueryOptions,
}

impl NearRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn within(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn in_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// One proximity-search result: the stored row and its haversine distance
/// from the origin, in the requested unit.
#[derive(Debug, Clone)]
pub struct NearHit {
    pub record: Record,
    pub distance: f64,
}

/// Public entry point for "find near" operations.
pub struct ProximitySearchService {
    resolver: GeocodeResolver,
    storage: Arc<dyn GeocodeStorage>,
}

impl ProximitySearchService {
    pub fn new(resolver: GeocodeResolver, storage: Arc<dyn GeocodeStorage>) -> Self {
        Self { resolver, storage }
    }

    pub fn resolver(&self) -> &GeocodeResolver {
        &self.resolver
    }

    /// Records near `origin`, ordered by proximity, each annotated with its
    /// exact haversine distance.
    pub async fn near(&self, origin: &AddressSource, request: &NearRequest) -> Result<Vec<NearHit>> {
        let point = self.origin_point(origin).await?;
        let fields = &self.resolver.config().fields;

        let query = ProximityQuery {
            origin: point,
            max_distance: request.max_distance,
            unit: request.unit,
            direction: request.direction,
        };
        let filter = build(&query, QueryMode::Fetch, fields)?;
        let rows = self.storage.query(&filter, &request.options).await?;

        // Columns are present: build() already required them.
        let (lat_col, lon_col) = (filter.latitude_column, filter.longitude_column);

        let mut hits = Vec::with_capacity(rows.len());
        for record in rows {
            let latitude = record.get(&lat_col).and_then(value_as_f64);
            let longitude = record.get(&lon_col).and_then(value_as_f64);
            let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
                warn!("Skipping row without stored coordinates");
                continue;
            };
            let row_point = Coordinate::new(latitude, longitude);
            hits.push(NearHit {
                record,
                distance: distance(row_point, point, request.unit),
            });
        }

        debug!(
            result_count = hits.len(),
            latitude = point.latitude,
            longitude = point.longitude,
            "Proximity search complete"
        );

        Ok(hits)
    }

    /// Count of records near `origin`, with no ordering clause.
    pub async fn count(&self, origin: &AddressSource, request: &NearRequest) -> Result<u64> {
        let point = self.origin_point(origin).await?;
        let fields = &self.resolver.config().fields;

        let query = ProximityQuery {
            origin: point,
            max_distance: request.max_distance,
            unit: request.unit,
            direction: request.direction,
        };
        let filter = build(&query, QueryMode::Count, fields)?;
        self.storage.count(&filter, &request.options).await
    }

    /// Haversine distance between two address sources, resolving either
    /// side through the geocode cache/provider as needed.
    pub async fn distance_between(
        &self,
        origin: &AddressSource,
        destination: &AddressSource,
        unit: DistanceUnit,
    ) -> Result<f64> {
        let a = self.resolver.resolve(origin, false).await?;
        let b = self.resolver.resolve(destination, false).await?;
        Ok(distance(a, b, unit))
    }

    /// Numeric-pair origins are used directly; anything else is resolved
    /// without persisting.
    async fn origin_point(&self, origin: &AddressSource) -> Result<Coordinate> {
        match origin {
            AddressSource::Point(point) => Ok(*point),
            other => self.resolver.resolve(other, false).await.map_err(|e| match e {
                Error::EmptyAddress => {
                    Error::InvalidQueryOrigin("address has no usable content".to_string())
                }
                other => other,
            }),
        }
    }
}
