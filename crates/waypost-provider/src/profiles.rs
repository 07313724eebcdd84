//! Provider profiles: URL template, bound address format, and response
//! parser for each supported geocoding service.
//!
//! Parsers are a closed set of variants selected at configuration time, not
//! by runtime string lookup: either a regular-expression extraction with
//! capture-group indices, or the structured JSON placemark layout.

use regex::Regex;

use waypost_core::{AddressFormat, Coordinate, Error, GeocodePlace, Result};

use crate::google;

/// How a provider's response body is turned into a [`GeocodePlace`].
#[derive(Debug, Clone)]
pub enum ResponseParser {
    /// Regular-expression extraction. Capture groups are mapped to latitude
    /// and longitude by index.
    Regex {
        pattern: Regex,
        latitude_group: usize,
        longitude_group: usize,
    },
    /// Nested JSON placemark layout (`Status.code`, `Placemark[0]`).
    GoogleJson,
}

impl ResponseParser {
    pub fn parse(&self, body: &str) -> Result<GeocodePlace> {
        match self {
            ResponseParser::Regex {
                pattern,
                latitude_group,
                longitude_group,
            } => {
                let captures = pattern.captures(body).ok_or_else(|| {
                    Error::Provider("response did not match extraction pattern".to_string())
                })?;
                let latitude = capture_f64(&captures, *latitude_group)?;
                let longitude = capture_f64(&captures, *longitude_group)?;
                Ok(GeocodePlace::at(Coordinate::new(latitude, longitude)))
            }
            ResponseParser::GoogleJson => google::parse(body),
        }
    }
}

fn capture_f64(captures: &regex::Captures<'_>, group: usize) -> Result<f64> {
    let raw = captures
        .get(group)
        .ok_or_else(|| Error::Provider(format!("missing capture group {group}")))?
        .as_str();
    raw.trim()
        .parse()
        .map_err(|_| Error::Provider(format!("non-numeric coordinate: {raw:?}")))
}

/// One geocoding service: endpoint template plus parsing rules, with the
/// address format bound to it.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub name: String,
    /// Request URL with `${address}` and `${key}` placeholders, substituted
    /// URL-encoded.
    pub url_template: String,
    /// Canonical-address format this service expects.
    pub format: AddressFormat,
    pub parser: ResponseParser,
}

impl ProviderProfile {
    /// Google geocoder, CSV output.
    pub fn google_csv() -> Self {
        Self {
            name: "google".to_string(),
            url_template: "http://maps.google.com/maps/geo?q=${address}&output=csv&key=${key}"
                .to_string(),
            format: AddressFormat::default(),
            parser: ResponseParser::Regex {
                pattern: Regex::new(r"200,[^,]+,([^,]+),([^,\s]+)").unwrap(),
                latitude_group: 1,
                longitude_group: 2,
            },
        }
    }

    /// Google geocoder, JSON placemark output.
    pub fn google_json() -> Self {
        Self {
            name: "google-json".to_string(),
            url_template: "http://maps.google.com/maps/geo?q=${address}&output=json&key=${key}"
                .to_string(),
            format: AddressFormat::default(),
            parser: ResponseParser::GoogleJson,
        }
    }

    /// Yahoo maps geocoder, XML output parsed by extraction pattern.
    pub fn yahoo() -> Self {
        Self {
            name: "yahoo".to_string(),
            url_template:
                "http://api.local.yahoo.com/MapsService/V1/geocode?appid=${key}&location=${address}"
                    .to_string(),
            format: AddressFormat::default(),
            parser: ResponseParser::Regex {
                pattern: Regex::new(r"<Latitude>(.*?)</Latitude><Longitude>(.*?)</Longitude>")
                    .unwrap(),
                latitude_group: 1,
                longitude_group: 2,
            },
        }
    }

    /// Look up a built-in profile by service name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "google" => Some(Self::google_csv()),
            "google-json" => Some(Self::google_json()),
            "yahoo" => Some(Self::yahoo()),
            _ => None,
        }
    }

    /// Replace the endpoint template (tests point this at a local server).
    pub fn with_url_template(mut self, url_template: impl Into<String>) -> Self {
        self.url_template = url_template.into();
        self
    }
}
