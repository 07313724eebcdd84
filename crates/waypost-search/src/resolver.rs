//! Cache-first geocode resolution.
//!
//! Resolution follows a fixed progression: backfill missing address parts
//! from related entities, compose the canonical address, try the storage
//! cache (hash key first, canonical address otherwise), and only then call
//! the remote provider. Successful remote results are persisted as fresh
//! rows; the cache grows append-only and existing rows are never touched.

use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use waypost_core::{
    compose, standardize, value_as_f64, AddressPart, AddressSource, Coordinate, EntityLookup,
    Error, GeocodeConfig, GeocodePlace, GeocodeProvider, GeocodeStorage, Record, Result,
    StructuredAddress,
};

/// Outcome of one resolution, including the canonical address that keyed it.
struct Resolution {
    place: GeocodePlace,
    canonical: String,
}

/// Orchestrates canonical-address composition, cache lookup, remote
/// fallback, and append-only persistence.
pub struct GeocodeResolver {
    config: GeocodeConfig,
    storage: Arc<dyn GeocodeStorage>,
    provider: Option<Arc<dyn GeocodeProvider>>,
    entities: Option<Arc<dyn EntityLookup>>,
}

impl GeocodeResolver {
    pub fn new(config: GeocodeConfig, storage: Arc<dyn GeocodeStorage>) -> Self {
        Self {
            config,
            storage,
            provider: None,
            entities: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn GeocodeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_entities(mut self, entities: Arc<dyn EntityLookup>) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn config(&self) -> &GeocodeConfig {
        &self.config
    }

    /// Resolve an address source to a coordinate.
    ///
    /// Numeric-pair input is returned as-is. With `persist`, a coordinate
    /// obtained remotely is written back through the storage adapter as a
    /// new geocode record.
    pub async fn resolve(&self, source: &AddressSource, persist: bool) -> Result<Coordinate> {
        if let AddressSource::Point(point) = source {
            return Ok(*point);
        }
        Ok(self.resolve_inner(source, persist).await?.place.coordinate)
    }

    /// Resolve an address source to a full place, including any
    /// standardized components the provider returned. Cache hits carry only
    /// the coordinate.
    pub async fn resolve_place(&self, source: &AddressSource, persist: bool) -> Result<GeocodePlace> {
        if let AddressSource::Point(point) = source {
            return Ok(GeocodePlace::at(*point));
        }
        Ok(self.resolve_inner(source, persist).await?.place)
    }

    /// Enrich an inbound record with geocode data before it is saved.
    ///
    /// Active only when both coordinate columns are configured and the
    /// record carries neither: the record's own fields are composed and
    /// resolved (without persisting a separate cache row), and the
    /// coordinate, canonical address, and standardized components are merged
    /// in. A record that composes to nothing is returned unchanged.
    pub async fn prepare_record(&self, mut record: Record) -> Result<Record> {
        let Some((lat_col, lon_col)) = self.config.fields.coordinate_columns() else {
            return Ok(record);
        };
        if record.contains_key(lat_col) || record.contains_key(lon_col) {
            return Ok(record);
        }

        let mut structured = StructuredAddress::new();
        for (key, value) in &record {
            if let Some(text) = value_as_text(value) {
                structured.set(key, text);
            }
        }

        let resolution = match self
            .resolve_inner(&AddressSource::Structured(structured), false)
            .await
        {
            Ok(resolution) => resolution,
            Err(Error::EmptyAddress) => return Ok(record),
            Err(e) => return Err(e),
        };

        let coordinate = resolution.place.coordinate;
        record.insert(lat_col.to_string(), coordinate.latitude.into());
        record.insert(lon_col.to_string(), coordinate.longitude.into());
        if let Some(address_col) = self.config.fields.address.as_deref() {
            record.insert(address_col.to_string(), resolution.canonical.clone().into());
        }
        standardize(&self.config.fields, &mut record, &resolution.place);

        Ok(record)
    }

    async fn resolve_inner(&self, source: &AddressSource, persist: bool) -> Result<Resolution> {
        let source = self.backfill(source).await;
        let canonical = compose(&self.config, &source).ok_or(Error::EmptyAddress)?;

        let hash = self
            .config
            .fields
            .hash
            .is_some()
            .then(|| hash_address(&canonical));

        if let Some(coordinate) = self.cache_lookup(&canonical, hash.as_deref()).await? {
            debug!(
                address = %canonical,
                cache_hit = true,
                "Resolved from stored geocode record"
            );
            return Ok(Resolution {
                place: GeocodePlace::at(coordinate),
                canonical,
            });
        }

        let provider = self.provider.as_ref().ok_or(Error::NoProviderConfigured)?;
        let place = provider.geocode(&canonical).await?;

        debug!(
            address = %canonical,
            cache_hit = false,
            provider = provider.name(),
            "Resolved via remote provider"
        );

        if persist {
            self.persist(&canonical, hash.as_deref(), &place, &source)
                .await?;
        }

        Ok(Resolution { place, canonical })
    }

    /// Backfill missing logical fields from related entities. Misses and
    /// lookup failures are non-fatal: the field simply stays blank.
    async fn backfill(&self, source: &AddressSource) -> AddressSource {
        let (Some(entities), AddressSource::Structured(address)) = (&self.entities, source) else {
            return source.clone();
        };
        if self.config.rules.is_empty() {
            return source.clone();
        }

        let mut address = address.clone();
        for rule in &self.config.rules {
            let candidates = self.config.aliases.candidates(rule.field);
            if address.first_present(&candidates).is_some() {
                continue;
            }
            let Some(reference) = address
                .get(&rule.reference_field)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
            else {
                continue;
            };

            match entities
                .lookup(&rule.entity, &Value::String(reference), &rule.lookup_field)
                .await
            {
                Ok(Some(value)) => address.set(rule.field.as_str(), value),
                Ok(None) => debug!(
                    entity = %rule.entity,
                    field = %rule.field,
                    "Related record not found, leaving field blank"
                ),
                Err(e) => warn!(
                    entity = %rule.entity,
                    field = %rule.field,
                    error = %e,
                    "Cross-entity lookup failed, leaving field blank"
                ),
            }
        }

        AddressSource::Structured(address)
    }

    /// Cache lookup by hash when a hash column is configured, by canonical
    /// address otherwise. With neither column there is no cache key and the
    /// lookup is skipped entirely.
    async fn cache_lookup(&self, canonical: &str, hash: Option<&str>) -> Result<Option<Coordinate>> {
        let Some((lat_col, lon_col)) = self.config.fields.coordinate_columns() else {
            return Ok(None);
        };

        let conditions: Vec<(String, Value)> = match (&self.config.fields.hash, hash) {
            (Some(hash_col), Some(hash)) => vec![(hash_col.clone(), hash.into())],
            _ => match &self.config.fields.address {
                Some(address_col) => vec![(address_col.clone(), canonical.into())],
                None => return Ok(None),
            },
        };

        let Some(row) = self.storage.find_one(&conditions).await? else {
            return Ok(None);
        };

        // A cached row only counts when both coordinate columns are populated.
        let latitude = row.get(lat_col).and_then(value_as_f64);
        let longitude = row.get(lon_col).and_then(value_as_f64);
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Ok(Some(Coordinate::new(latitude, longitude))),
            _ => Ok(None),
        }
    }

    /// Insert a fresh geocode record. Requires coordinate columns plus at
    /// least one identifying column (address or hash); otherwise there is
    /// nothing for a later cache lookup to find and nothing is written.
    async fn persist(
        &self,
        canonical: &str,
        hash: Option<&str>,
        place: &GeocodePlace,
        source: &AddressSource,
    ) -> Result<()> {
        let fields = &self.config.fields;
        let Some((lat_col, lon_col)) = fields.coordinate_columns() else {
            return Ok(());
        };
        if fields.address.is_none() && fields.hash.is_none() {
            return Ok(());
        }

        let mut record = Record::new();

        // Carry over the caller's own values for configured columns.
        if let AddressSource::Structured(address) = source {
            for part in AddressPart::ALL {
                if let (Some(column), Some(value)) = (
                    fields.column(part),
                    address.first_present(&self.config.aliases.candidates(part)),
                ) {
                    record.insert(column.to_string(), value.into());
                }
            }
        }

        if let Some(address_col) = fields.address.as_deref() {
            record.insert(address_col.to_string(), canonical.into());
        }
        if let (Some(hash_col), Some(hash)) = (fields.hash.as_deref(), hash) {
            record.insert(hash_col.to_string(), hash.into());
        }
        record.insert(lat_col.to_string(), place.coordinate.latitude.into());
        record.insert(lon_col.to_string(), place.coordinate.longitude.into());
        standardize(fields, &mut record, place);

        self.storage.insert(record).await?;

        info!(address = %canonical, "Persisted new geocode record");
        Ok(())
    }
}

/// SHA-256 hex digest of the canonical address, the storage cache key when a
/// hash column is configured.
pub fn hash_address(canonical: &str) -> String {
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
