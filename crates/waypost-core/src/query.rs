//! Proximity-query construction.
//!
//! The scoring expression is kept as data — a [`DistanceExpr`] over the
//! fixed reference point — so each storage adapter renders it in its native
//! query language instead of the core emitting raw SQL. A reference
//! interpreter ([`DistanceExpr::evaluate`]) and a SQL renderer are provided;
//! both compute the planar chord length between the unit vectors of the
//! reference point and a candidate row.

use serde::{Deserialize, Serialize};

use crate::config::FieldSpec;
use crate::distance::EARTH_RADIUS_KM;
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::units::DistanceUnit;

/// Ordering direction for proximity results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Whether the caller wants rows or a row count. Count queries carry no
/// ordering clause; some storage backends reject ordering on aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    #[default]
    Fetch,
    Count,
}

/// Chord-length scoring expression anchored at a fixed reference point.
///
/// The value is unit-less; multiplying by `EARTH_RADIUS_KM` and a unit ratio
/// turns it into the same scale used for distance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceExpr {
    pub latitude: f64,
    pub longitude: f64,
}

impl DistanceExpr {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            latitude: origin.latitude,
            longitude: origin.longitude,
        }
    }

    /// Evaluate the expression against one row's coordinates.
    pub fn evaluate(&self, row_latitude: f64, row_longitude: f64) -> f64 {
        let (ref_lat, ref_lon) = (self.latitude.to_radians(), self.longitude.to_radians());
        let (row_lat, row_lon) = (row_latitude.to_radians(), row_longitude.to_radians());

        let dx = ref_lat.cos() * ref_lon.cos() - row_lat.cos() * row_lon.cos();
        let dy = ref_lat.cos() * ref_lon.sin() - row_lat.cos() * row_lon.sin();
        let dz = ref_lat.sin() - row_lat.sin();

        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Render as a SQL expression over the given coordinate columns.
    pub fn to_sql(&self, latitude_column: &str, longitude_column: &str) -> String {
        format!(
            "SQRT(POW((COS(RADIANS({lat})) * COS(RADIANS({lon})) - COS(RADIANS({lat_col})) * COS(RADIANS({lon_col}))), 2) + POW((COS(RADIANS({lat})) * SIN(RADIANS({lon})) - COS(RADIANS({lat_col})) * SIN(RADIANS({lon_col}))), 2) + POW((SIN(RADIANS({lat})) - SIN(RADIANS({lat_col}))), 2))",
            lat = self.latitude,
            lon = self.longitude,
            lat_col = latitude_column,
            lon_col = longitude_column,
        )
    }
}

/// Filter conditions a storage adapter must apply alongside the scoring
/// expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterCondition {
    /// Self-match exclusion: rows whose coordinates, rounded to four decimal
    /// places, equal the reference point are excluded so a record never
    /// matches itself when searching from its own location.
    NotAtPoint { latitude: f64, longitude: f64 },
    /// Distance threshold: `expression * scale <= max`, where `scale` folds
    /// in the Earth radius and unit ratio used for distance reporting.
    WithinDistance { max: f64, scale: f64 },
}

/// Round to four decimal places, the self-exclusion comparison precision.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// A proximity query: reference point, optional radius, unit, direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityQuery {
    pub origin: Coordinate,
    /// Maximum radius in `unit`; must be positive when present.
    pub max_distance: Option<f64>,
    pub unit: DistanceUnit,
    pub direction: SortDirection,
}

impl ProximityQuery {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            max_distance: None,
            unit: DistanceUnit::Kilometers,
            direction: SortDirection::Asc,
        }
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
}

/// The storage-agnostic filter + ordering specification for one proximity
/// query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityFilter {
    pub expr: DistanceExpr,
    pub latitude_column: String,
    pub longitude_column: String,
    pub conditions: Vec<FilterCondition>,
    /// `None` for count queries: ordering is meaningless for counts.
    pub order: Option<SortDirection>,
}

impl ProximityFilter {
    /// Render the ordering clause for SQL adapters.
    pub fn order_sql(&self) -> Option<String> {
        self.order.map(|direction| {
            format!(
                "{} {}",
                self.expr.to_sql(&self.latitude_column, &self.longitude_column),
                direction.as_sql()
            )
        })
    }

    /// Render the filter conditions for SQL adapters.
    pub fn conditions_sql(&self) -> Vec<String> {
        self.conditions
            .iter()
            .map(|condition| match condition {
                FilterCondition::NotAtPoint {
                    latitude,
                    longitude,
                } => format!(
                    "ROUND({}, 4) != {} AND ROUND({}, 4) != {}",
                    self.latitude_column,
                    round4(*latitude),
                    self.longitude_column,
                    round4(*longitude)
                ),
                FilterCondition::WithinDistance { max, scale } => format!(
                    "({} * {}) <= {}",
                    self.expr.to_sql(&self.latitude_column, &self.longitude_column),
                    scale,
                    max
                ),
            })
            .collect()
    }
}

/// Build the filter + ordering specification for a proximity query.
///
/// Fails when the schema carries no coordinate columns or the radius is not
/// positive.
pub fn build(query: &ProximityQuery, mode: QueryMode, fields: &FieldSpec) -> Result<ProximityFilter> {
    let (latitude_column, longitude_column) = fields.coordinate_columns().ok_or_else(|| {
        Error::InvalidInput("proximity query requires latitude and longitude columns".to_string())
    })?;

    if let Some(max) = query.max_distance {
        if max <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "max distance must be positive, got {max}"
            )));
        }
    }

    let mut conditions = vec![FilterCondition::NotAtPoint {
        latitude: query.origin.latitude,
        longitude: query.origin.longitude,
    }];

    if let Some(max) = query.max_distance {
        conditions.push(FilterCondition::WithinDistance {
            max,
            scale: EARTH_RADIUS_KM * query.unit.ratio(),
        });
    }

    Ok(ProximityFilter {
        expr: DistanceExpr::new(query.origin),
        latitude_column: latitude_column.to_string(),
        longitude_column: longitude_column.to_string(),
        conditions,
        order: match mode {
            QueryMode::Fetch => Some(query.direction),
            QueryMode::Count => None,
        },
    })
}
