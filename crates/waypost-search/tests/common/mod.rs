//! Shared fixtures: a small set of Tampa-area geocode records.

use serde_json::json;

use waypost_core::{Coordinate, Record};
use waypost_search::MemoryStore;

pub const LA_BRAD: (f64, f64) = (28.0792, -82.4735);
pub const ROME_AVE: (f64, f64) = (28.0769, -82.4741);
pub const MAGDALENE: (f64, f64) = (28.0837, -82.4727);
pub const EL_PORTAL: (f64, f64) = (28.0323, -82.4578);
pub const OCEAN_DRIVE: (f64, f64) = (25.7953, -80.2789);

pub const LA_BRAD_ADDRESS: &str = "1209 La Brad Lane, Tampa, FL";
pub const ROME_AVE_ADDRESS: &str = "14348 N Rome Ave, Tampa, 33613 FL";
pub const MAGDALENE_ADDRESS: &str = "1180 Magdalene Hill, Florida, US";
pub const EL_PORTAL_ADDRESS: &str = "9106 El Portal Dr, Tampa, FL";
pub const OCEAN_DRIVE_ADDRESS: &str = "801 Ocean Drive, Miami Beach, FL";

pub fn point(pair: (f64, f64)) -> Coordinate {
    Coordinate::new(pair.0, pair.1)
}

pub fn record(address: &str, city: Option<&str>, pair: (f64, f64)) -> Record {
    let mut record = Record::new();
    record.insert("address".to_string(), json!(address));
    record.insert("latitude".to_string(), json!(pair.0));
    record.insert("longitude".to_string(), json!(pair.1));
    if let Some(city) = city {
        record.insert("city".to_string(), json!(city));
    }
    record
}

/// Store with every fixture row, insertion order north Tampa first.
pub fn tampa_store() -> MemoryStore {
    MemoryStore::with_rows(vec![
        record(LA_BRAD_ADDRESS, Some("Tampa"), LA_BRAD),
        record(ROME_AVE_ADDRESS, Some("Tampa"), ROME_AVE),
        record(MAGDALENE_ADDRESS, None, MAGDALENE),
        record(EL_PORTAL_ADDRESS, Some("Tampa"), EL_PORTAL),
        record(OCEAN_DRIVE_ADDRESS, Some("Miami Beach"), OCEAN_DRIVE),
    ])
}

pub fn address_of(record: &Record) -> &str {
    record
        .get("address")
        .and_then(serde_json::Value::as_str)
        .expect("fixture rows carry an address")
}
