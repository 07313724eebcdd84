//! Structured parser for the Google JSON placemark response layout.
//!
//! `Status.code == 200` is required; coordinates come from
//! `Placemark[0].Point.coordinates` with latitude first, and standardized
//! address components from the nested
//! `AddressDetails.Country.AdministrativeArea.SubAdministrativeArea.Locality`
//! structure when present.

use serde::Deserialize;

use waypost_core::{Coordinate, Error, GeocodePlace, Result};

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(rename = "Status")]
    status: Status,
    #[serde(rename = "Placemark", default)]
    placemarks: Vec<Placemark>,
}

#[derive(Debug, Deserialize)]
struct Status {
    code: i64,
}

#[derive(Debug, Deserialize)]
struct Placemark {
    address: Option<String>,
    #[serde(rename = "Point")]
    point: Point,
    #[serde(rename = "AddressDetails")]
    address_details: Option<AddressDetails>,
}

#[derive(Debug, Deserialize)]
struct Point {
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct AddressDetails {
    #[serde(rename = "Country")]
    country: Option<Country>,
}

#[derive(Debug, Deserialize)]
struct Country {
    #[serde(rename = "CountryNameCode")]
    country_name_code: Option<String>,
    #[serde(rename = "AdministrativeArea")]
    administrative_area: Option<AdministrativeArea>,
}

#[derive(Debug, Deserialize)]
struct AdministrativeArea {
    #[serde(rename = "AdministrativeAreaName")]
    administrative_area_name: Option<String>,
    #[serde(rename = "SubAdministrativeArea")]
    sub_administrative_area: Option<SubAdministrativeArea>,
}

#[derive(Debug, Deserialize)]
struct SubAdministrativeArea {
    #[serde(rename = "Locality")]
    locality: Option<Locality>,
}

#[derive(Debug, Deserialize)]
struct Locality {
    #[serde(rename = "LocalityName")]
    locality_name: Option<String>,
    #[serde(rename = "Thoroughfare")]
    thoroughfare: Option<Thoroughfare>,
    #[serde(rename = "PostalCode")]
    postal_code: Option<PostalCode>,
}

#[derive(Debug, Deserialize)]
struct Thoroughfare {
    #[serde(rename = "ThoroughfareName")]
    thoroughfare_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostalCode {
    #[serde(rename = "PostalCodeNumber")]
    postal_code_number: Option<String>,
}

pub fn parse(body: &str) -> Result<GeocodePlace> {
    let response: Response = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("unparseable JSON response: {e}")))?;

    if response.status.code != 200 {
        return Err(Error::Provider(format!(
            "geocoding failed with status {}",
            response.status.code
        )));
    }

    let placemark = response
        .placemarks
        .into_iter()
        .next()
        .ok_or_else(|| Error::Provider("response carries no placemark".to_string()))?;

    if placemark.point.coordinates.len() < 2 {
        return Err(Error::Provider("placemark has no coordinate pair".to_string()));
    }
    let coordinate = Coordinate::new(
        placemark.point.coordinates[0],
        placemark.point.coordinates[1],
    );

    let mut place = GeocodePlace::at(coordinate);
    place.address = placemark.address;

    if let Some(country) = placemark.address_details.and_then(|d| d.country) {
        place.country = country.country_name_code;
        if let Some(area) = country.administrative_area {
            place.state = area.administrative_area_name;
            if let Some(locality) = area
                .sub_administrative_area
                .and_then(|sub| sub.locality)
            {
                place.city = locality.locality_name;
                place.address1 = locality
                    .thoroughfare
                    .and_then(|t| t.thoroughfare_name);
                place.zip = locality
                    .postal_code
                    .and_then(|p| p.postal_code_number);
            }
        }
    }

    Ok(place)
}
