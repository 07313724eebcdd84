//! # waypost-provider
//!
//! Remote geocoding provider adapters for waypost.
//!
//! Implements the [`waypost_core::GeocodeProvider`] seam over HTTP: a
//! provider profile pairs a URL template with a response parser (regex
//! extraction or structured JSON placemarks), and [`HttpGeocoder`] executes
//! one GET per resolution with no retries. A deterministic [`MockGeocoder`]
//! backs tests.

pub mod google;
pub mod http;
pub mod mock;
pub mod profiles;

pub use http::{HttpGeocoder, KEY_ENV, REQUEST_TIMEOUT_SECS, SERVICE_ENV};
pub use mock::MockGeocoder;
pub use profiles::{ProviderProfile, ResponseParser};
