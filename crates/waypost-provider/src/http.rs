//! HTTP geocoder: one provider profile over a `reqwest` client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use waypost_core::{Error, GeocodePlace, GeocodeProvider, Result};

use crate::profiles::ProviderProfile;

/// Default request timeout (seconds). A single attempt; failures are
/// terminal for the resolution, never retried here.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming the built-in service profile.
pub const SERVICE_ENV: &str = "WAYPOST_GEOCODE_SERVICE";

/// Environment variable carrying the provider API key.
pub const KEY_ENV: &str = "WAYPOST_GEOCODE_KEY";

/// Remote geocoding adapter: URL-encoded template substitution, one GET,
/// profile-specific response parsing.
pub struct HttpGeocoder {
    client: Client,
    profile: ProviderProfile,
    api_key: Option<String>,
}

impl HttpGeocoder {
    pub fn new(profile: ProviderProfile, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            profile,
            api_key,
        }
    }

    /// Create from `WAYPOST_GEOCODE_SERVICE` / `WAYPOST_GEOCODE_KEY`.
    /// Unknown or unset service names fall back to the Google CSV profile.
    pub fn from_env() -> Self {
        let profile = std::env::var(SERVICE_ENV)
            .ok()
            .and_then(|name| {
                let profile = ProviderProfile::by_name(&name);
                if profile.is_none() {
                    warn!(service = %name, "Unknown geocoding service, using google");
                }
                profile
            })
            .unwrap_or_else(ProviderProfile::google_csv);
        let api_key = std::env::var(KEY_ENV).ok().filter(|k| !k.is_empty());

        Self::new(profile, api_key)
    }

    /// The address format bound to this provider's profile.
    pub fn format(&self) -> &waypost_core::AddressFormat {
        &self.profile.format
    }

    fn build_url(&self, address: &str) -> String {
        let key = self.api_key.as_deref().unwrap_or("");
        self.profile
            .url_template
            .replace("${address}", &urlencoding::encode(address))
            .replace("${key}", &urlencoding::encode(key))
    }
}

#[async_trait]
impl GeocodeProvider for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodePlace> {
        let url = self.build_url(address);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Provider(format!(
                "geocoding request returned HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("failed to read response body: {e}")))?;

        let place = self.profile.parser.parse(&body)?;

        debug!(
            provider = %self.profile.name,
            address = %address,
            duration_ms = started.elapsed().as_millis() as u64,
            latitude = place.coordinate.latitude,
            longitude = place.coordinate.longitude,
            "Geocoded address"
        );

        Ok(place)
    }

    fn name(&self) -> &str {
        &self.profile.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_substitutions() {
        let geocoder = HttpGeocoder::new(
            ProviderProfile::google_csv(),
            Some("se+cret".to_string()),
        );
        let url = geocoder.build_url("1209 La Brad Lane, Tampa, FL");
        assert_eq!(
            url,
            "http://maps.google.com/maps/geo?q=1209%20La%20Brad%20Lane%2C%20Tampa%2C%20FL&output=csv&key=se%2Bcret"
        );
    }

    #[test]
    fn test_build_url_without_key() {
        let geocoder = HttpGeocoder::new(ProviderProfile::yahoo(), None);
        let url = geocoder.build_url("Tampa");
        assert_eq!(
            url,
            "http://api.local.yahoo.com/MapsService/V1/geocode?appid=&location=Tampa"
        );
    }
}
