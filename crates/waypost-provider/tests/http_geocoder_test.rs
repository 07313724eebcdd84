//! Integration tests for the HTTP geocoding adapter.
//!
//! A wiremock server stands in for the remote service, verifying the
//! URL-encoded query substitution and both response parser families.

use waypost_core::{Coordinate, Error, GeocodeProvider};
use waypost_provider::{HttpGeocoder, ProviderProfile};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn csv_profile(server: &MockServer) -> ProviderProfile {
    ProviderProfile::google_csv().with_url_template(format!(
        "{}/maps/geo?q=${{address}}&output=csv&key=${{key}}",
        server.uri()
    ))
}

#[tokio::test]
async fn test_csv_geocode_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/geo"))
        .and(query_param("q", "1209 La Brad Lane, Tampa, FL"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("200,8,28.0792,-82.4735"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder = HttpGeocoder::new(csv_profile(&mock_server), Some("test-key".to_string()));
    let place = geocoder
        .geocode("1209 La Brad Lane, Tampa, FL")
        .await
        .unwrap();

    assert_eq!(place.coordinate, Coordinate::new(28.0792, -82.4735));
}

#[tokio::test]
async fn test_json_geocode_extracts_components() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "Status": {"code": 200},
        "Placemark": [{
            "address": "1209 La Brad Ln, Tampa, FL 33613, USA",
            "AddressDetails": {
                "Country": {
                    "CountryNameCode": "US",
                    "AdministrativeArea": {
                        "AdministrativeAreaName": "FL",
                        "SubAdministrativeArea": {
                            "Locality": {
                                "LocalityName": "Tampa",
                                "Thoroughfare": {"ThoroughfareName": "1209 La Brad Ln"},
                                "PostalCode": {"PostalCodeNumber": "33613"}
                            }
                        }
                    }
                }
            },
            "Point": {"coordinates": [28.0792, -82.4735, 0]}
        }]
    });

    Mock::given(method("GET"))
        .and(path("/maps/geo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let profile = ProviderProfile::google_json().with_url_template(format!(
        "{}/maps/geo?q=${{address}}&output=json&key=${{key}}",
        mock_server.uri()
    ));
    let geocoder = HttpGeocoder::new(profile, Some("test-key".to_string()));
    let place = geocoder
        .geocode("1209 La Brad Lane, Tampa, FL")
        .await
        .unwrap();

    assert_eq!(place.coordinate, Coordinate::new(28.0792, -82.4735));
    assert_eq!(place.city.as_deref(), Some("Tampa"));
    assert_eq!(place.state.as_deref(), Some("FL"));
    assert_eq!(place.zip.as_deref(), Some("33613"));
    assert_eq!(place.country.as_deref(), Some("US"));
}

#[tokio::test]
async fn test_yahoo_regex_extraction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/MapsService/V1/geocode"))
        .and(query_param("appid", "yk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<ResultSet><Result><Latitude>37.4</Latitude><Longitude>-122.1</Longitude></Result></ResultSet>",
        ))
        .mount(&mock_server)
        .await;

    let profile = ProviderProfile::yahoo().with_url_template(format!(
        "{}/MapsService/V1/geocode?appid=${{key}}&location=${{address}}",
        mock_server.uri()
    ));
    let geocoder = HttpGeocoder::new(profile, Some("yk".to_string()));
    let place = geocoder.geocode("Mountain View, CA").await.unwrap();

    assert_eq!(place.coordinate, Coordinate::new(37.4, -122.1));
}

#[tokio::test]
async fn test_http_failure_surfaces_as_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let geocoder = HttpGeocoder::new(csv_profile(&mock_server), None);
    let result = geocoder.geocode("Tampa, FL").await;
    assert!(matches!(result, Err(Error::Provider(_))));
}

#[tokio::test]
async fn test_unmatchable_body_surfaces_as_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("602,0,0,0"))
        .mount(&mock_server)
        .await;

    let geocoder = HttpGeocoder::new(csv_profile(&mock_server), None);
    let result = geocoder.geocode("nowhere at all").await;
    assert!(matches!(result, Err(Error::Provider(_))));
}
