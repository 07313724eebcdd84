//! Integration tests for cache-first geocode resolution.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use common::*;
use waypost_core::{
    compose, AddressPart, AddressSource, Coordinate, CrossEntityFieldRule, EntityLookup, Error,
    FieldSpec, GeocodeConfig, GeocodePlace, Record, Result, StructuredAddress,
};
use waypost_provider::MockGeocoder;
use waypost_search::{hash_address, GeocodeResolver, MemoryStore};

const GOOGLEPLEX: (f64, f64) = (37.4221, -122.0841);

fn amphitheatre() -> StructuredAddress {
    StructuredAddress::new()
        .with("address1", "1600 Amphitheatre Parkway")
        .with("city", "Mountain View")
        .with("state", "CA")
        .with("zip", "94043")
        .with("country", "USA")
}

#[tokio::test]
async fn test_cache_hit_skips_provider() {
    let storage = Arc::new(tampa_store());
    let mock = MockGeocoder::new();
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage.clone())
        .with_provider(Arc::new(mock.clone()));

    let resolved = resolver
        .resolve(&AddressSource::from(LA_BRAD_ADDRESS), true)
        .await
        .unwrap();

    assert_eq!(resolved, point(LA_BRAD));
    assert_eq!(mock.call_count(), 0);
    assert_eq!(storage.len(), 5, "cache hit must not insert a new row");
}

#[tokio::test]
async fn test_remote_resolution_then_cache_round_trip() {
    let config = GeocodeConfig::default();
    let source = AddressSource::from(amphitheatre());
    let canonical = compose(&config, &source).unwrap();
    assert_eq!(
        canonical,
        "1600 Amphitheatre Parkway, Mountain View, 94043 CA, USA"
    );

    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_point(&canonical, GOOGLEPLEX.0, GOOGLEPLEX.1);
    let resolver =
        GeocodeResolver::new(config, storage.clone()).with_provider(Arc::new(mock.clone()));

    let first = resolver.resolve(&source, true).await.unwrap();
    assert_eq!(first, point(GOOGLEPLEX));
    assert_eq!(storage.len(), 1);

    let row = &storage.rows()[0];
    assert_eq!(row.get("address"), Some(&json!(canonical)));
    assert_eq!(row.get("latitude"), Some(&json!(GOOGLEPLEX.0)));
    assert_eq!(row.get("longitude"), Some(&json!(GOOGLEPLEX.1)));
    assert_eq!(row.get("city"), Some(&json!("Mountain View")));

    // Identical input again: served from storage, no second provider call,
    // no second row.
    let second = resolver.resolve(&source, false).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(mock.call_count(), 1);
    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn test_hash_column_keys_the_cache() {
    let config = GeocodeConfig::default().with_fields(FieldSpec {
        hash: Some("address_hash".to_string()),
        ..FieldSpec::default()
    });
    let source = AddressSource::from(amphitheatre());
    let canonical = compose(&config, &source).unwrap();

    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_point(&canonical, GOOGLEPLEX.0, GOOGLEPLEX.1);
    let resolver =
        GeocodeResolver::new(config, storage.clone()).with_provider(Arc::new(mock.clone()));

    resolver.resolve(&source, true).await.unwrap();

    let row = &storage.rows()[0];
    assert_eq!(row.get("address_hash"), Some(&json!(hash_address(&canonical))));

    resolver.resolve(&source, false).await.unwrap();
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_provider_components_standardize_the_record() {
    let config = GeocodeConfig::default();
    // Misspelled city on input; the provider's standardized component wins.
    let source = AddressSource::from(
        StructuredAddress::new()
            .with("address1", "1600 Amphitheatre Parkway")
            .with("city", "Mountan View")
            .with("state", "CA"),
    );
    let canonical = compose(&config, &source).unwrap();

    let mut place = GeocodePlace::at(Coordinate::new(GOOGLEPLEX.0, GOOGLEPLEX.1));
    place.city = Some("Mountain View".to_string());
    place.zip = Some("94043".to_string());

    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_place(&canonical, place);
    let resolver = GeocodeResolver::new(config, storage.clone()).with_provider(Arc::new(mock));

    resolver.resolve(&source, true).await.unwrap();

    let row = &storage.rows()[0];
    assert_eq!(row.get("city"), Some(&json!("Mountain View")));
    assert_eq!(row.get("zip"), Some(&json!("94043")));
    assert_eq!(row.get("state"), Some(&json!("CA")));
}

#[tokio::test]
async fn test_no_provider_configured_is_surfaced() {
    let storage = Arc::new(MemoryStore::new());
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage);

    let result = resolver
        .resolve(&AddressSource::from("10 Downing Street, London"), false)
        .await;
    assert!(matches!(result, Err(Error::NoProviderConfigured)));
}

#[tokio::test]
async fn test_empty_address_is_surfaced() {
    let storage = Arc::new(MemoryStore::new());
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage)
        .with_provider(Arc::new(MockGeocoder::new()));

    let result = resolver
        .resolve(&AddressSource::Structured(StructuredAddress::new()), false)
        .await;
    assert!(matches!(result, Err(Error::EmptyAddress)));
}

#[tokio::test]
async fn test_provider_failure_is_terminal() {
    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().failing();
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage.clone())
        .with_provider(Arc::new(mock));

    let result = resolver
        .resolve(&AddressSource::from("1209 La Brad Lane, Tampa, FL"), true)
        .await;
    assert!(matches!(result, Err(Error::Provider(_))));
    assert!(storage.is_empty(), "failed resolution must not persist");
}

#[tokio::test]
async fn test_point_origin_needs_no_resolution() {
    let storage = Arc::new(MemoryStore::new());
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage);

    let resolved = resolver
        .resolve(&AddressSource::Point(point(LA_BRAD)), true)
        .await
        .unwrap();
    assert_eq!(resolved, point(LA_BRAD));
}

// ---------------------------------------------------------------------------
// Cross-entity backfill
// ---------------------------------------------------------------------------

/// Lookup table standing in for related City/State entities, including a
/// dotted hop from State to its Country.
struct FakeEntities;

#[async_trait]
impl EntityLookup for FakeEntities {
    async fn lookup(&self, entity: &str, reference: &Value, field: &str) -> Result<Option<String>> {
        let reference = reference.as_str().unwrap_or_default();
        let value = match (entity, reference, field) {
            ("City", "c1", "name") => Some("Mountain View"),
            ("State", "s1", "name") => Some("CA"),
            ("State.Country", "s1", "name") => Some("USA"),
            _ => None,
        };
        Ok(value.map(str::to_string))
    }
}

fn cross_entity_config() -> GeocodeConfig {
    GeocodeConfig::default()
        .with_rule(CrossEntityFieldRule::new(AddressPart::City, "City"))
        .with_rule(CrossEntityFieldRule::new(AddressPart::State, "State"))
        .with_rule(CrossEntityFieldRule::new(AddressPart::Country, "State.Country"))
}

#[tokio::test]
async fn test_cross_entity_backfill_fills_missing_parts() {
    let canonical = "1600 Amphitheatre Parkway, Mountain View, 94043 CA, USA";
    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_point(canonical, GOOGLEPLEX.0, GOOGLEPLEX.1);
    let resolver = GeocodeResolver::new(cross_entity_config(), storage.clone())
        .with_provider(Arc::new(mock.clone()))
        .with_entities(Arc::new(FakeEntities));

    let source = AddressSource::from(
        StructuredAddress::new()
            .with("address_1", "1600 Amphitheatre Parkway")
            .with("city_id", "c1")
            .with("state_id", "s1")
            .with("zip", "94043"),
    );
    let resolved = resolver.resolve(&source, true).await.unwrap();

    assert_eq!(resolved, point(GOOGLEPLEX));
    assert_eq!(mock.calls(), vec![canonical.to_string()]);
}

#[tokio::test]
async fn test_cross_entity_miss_is_non_fatal() {
    // Unknown reference ids leave city/state/country blank; the remaining
    // fields still compose.
    let canonical = "1600 Amphitheatre Parkway, 94043";
    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_point(canonical, GOOGLEPLEX.0, GOOGLEPLEX.1);
    let resolver = GeocodeResolver::new(cross_entity_config(), storage)
        .with_provider(Arc::new(mock.clone()))
        .with_entities(Arc::new(FakeEntities));

    let source = AddressSource::from(
        StructuredAddress::new()
            .with("address_1", "1600 Amphitheatre Parkway")
            .with("city_id", "unknown")
            .with("zip", "94043"),
    );
    let resolved = resolver.resolve(&source, false).await.unwrap();

    assert_eq!(resolved, point(GOOGLEPLEX));
    assert_eq!(mock.calls(), vec![canonical.to_string()]);
}

#[tokio::test]
async fn test_backfill_skips_fields_already_present() {
    let canonical = "1600 Amphitheatre Parkway, Palo Alto, CA, USA";
    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_point(canonical, GOOGLEPLEX.0, GOOGLEPLEX.1);
    let resolver = GeocodeResolver::new(cross_entity_config(), storage)
        .with_provider(Arc::new(mock.clone()))
        .with_entities(Arc::new(FakeEntities));

    let source = AddressSource::from(
        StructuredAddress::new()
            .with("address_1", "1600 Amphitheatre Parkway")
            .with("city", "Palo Alto")
            .with("city_id", "c1")
            .with("state_id", "s1"),
    );
    resolver.resolve(&source, false).await.unwrap();

    assert_eq!(mock.calls(), vec![canonical.to_string()]);
}

// ---------------------------------------------------------------------------
// Record preparation (save-time enrichment)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_prepare_record_merges_geocode_data() {
    let config = GeocodeConfig::default();
    let canonical = "1600 Amphitheatre Parkway, Mountain View, CA";

    let mut place = GeocodePlace::at(Coordinate::new(GOOGLEPLEX.0, GOOGLEPLEX.1));
    place.zip = Some("94043".to_string());

    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new().with_place(canonical, place);
    let resolver = GeocodeResolver::new(config, storage.clone()).with_provider(Arc::new(mock));

    let mut record = Record::new();
    record.insert("address1".to_string(), json!("1600 Amphitheatre Parkway"));
    record.insert("city".to_string(), json!("Mountain View"));
    record.insert("state".to_string(), json!("CA"));

    let prepared = resolver.prepare_record(record).await.unwrap();

    assert_eq!(prepared.get("latitude"), Some(&json!(GOOGLEPLEX.0)));
    assert_eq!(prepared.get("longitude"), Some(&json!(GOOGLEPLEX.1)));
    assert_eq!(prepared.get("address"), Some(&json!(canonical)));
    assert_eq!(prepared.get("zip"), Some(&json!("94043")));
    assert!(storage.is_empty(), "prepare does not insert a cache row");
}

#[tokio::test]
async fn test_prepare_record_skips_when_coordinates_present() {
    let storage = Arc::new(MemoryStore::new());
    let mock = MockGeocoder::new();
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage)
        .with_provider(Arc::new(mock.clone()));

    let mut record = Record::new();
    record.insert("address1".to_string(), json!("1600 Amphitheatre Parkway"));
    record.insert("latitude".to_string(), json!(37.4));
    record.insert("longitude".to_string(), json!(-122.1));

    let prepared = resolver.prepare_record(record.clone()).await.unwrap();
    assert_eq!(prepared, record);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_prepare_record_without_address_is_a_no_op() {
    let storage = Arc::new(MemoryStore::new());
    let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage)
        .with_provider(Arc::new(MockGeocoder::new()));

    let mut record = Record::new();
    record.insert("name".to_string(), json!("no address here"));

    let prepared = resolver.prepare_record(record.clone()).await.unwrap();
    assert_eq!(prepared, record);
}
