//! # waypost-search
//!
//! Geocode resolution and proximity search for waypost.
//!
//! This crate provides:
//! - [`GeocodeResolver`]: cache-first address resolution with remote
//!   fallback and append-only persistence
//! - [`ProximitySearchService`]: near/count queries with exact haversine
//!   distance annotation
//! - [`MemoryStore`]: an in-memory storage adapter interpreting the
//!   proximity-filter AST
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use waypost_core::{AddressSource, DistanceUnit, GeocodeConfig, StructuredAddress};
//! use waypost_provider::HttpGeocoder;
//! use waypost_search::{GeocodeResolver, MemoryStore, NearRequest, ProximitySearchService};
//!
//! let storage = Arc::new(MemoryStore::new());
//! let resolver = GeocodeResolver::new(GeocodeConfig::default(), storage.clone())
//!     .with_provider(Arc::new(HttpGeocoder::from_env()));
//! let service = ProximitySearchService::new(resolver, storage);
//!
//! let origin = AddressSource::from("1209 La Brad Lane, Tampa, FL");
//! let hits = service
//!     .near(&origin, &NearRequest::new().within(1.0))
//!     .await?;
//! for hit in hits {
//!     println!("{:.3} km: {:?}", hit.distance, hit.record);
//! }
//! ```

pub mod memory;
pub mod near;
pub mod resolver;

// Re-export core types
pub use waypost_core::*;

pub use memory::MemoryStore;
pub use near::{NearHit, NearRequest, ProximitySearchService};
pub use resolver::{hash_address, GeocodeResolver};
