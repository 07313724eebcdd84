//! Mock geocoding provider for deterministic testing.
//!
//! Serves a fixed address-to-place table and records every call, so tests
//! can assert cache-hit behavior (no remote call on the second resolution).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use waypost_core::{Coordinate, Error, GeocodePlace, GeocodeProvider, Result};

/// Mock provider backed by a fixed lookup table.
#[derive(Clone, Default)]
pub struct MockGeocoder {
    places: HashMap<String, GeocodePlace>,
    fail: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place for an exact canonical address.
    pub fn with_place(mut self, address: impl Into<String>, place: GeocodePlace) -> Self {
        self.places.insert(address.into(), place);
        self
    }

    /// Register a bare coordinate for an exact canonical address.
    pub fn with_point(self, address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        self.with_place(address, GeocodePlace::at(Coordinate::new(latitude, longitude)))
    }

    /// Make every call fail, regardless of the table.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Addresses geocoded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GeocodeProvider for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodePlace> {
        self.calls.lock().unwrap().push(address.to_string());

        if self.fail {
            return Err(Error::Provider("mock provider failure".to_string()));
        }

        self.places
            .get(address)
            .cloned()
            .ok_or_else(|| Error::Provider(format!("no mock entry for {address:?}")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
