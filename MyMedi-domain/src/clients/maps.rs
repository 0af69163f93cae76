//! Google Maps geocoding and places client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

const MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const REQUEST_TIMEOUT_SECS: u64 = 20;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors from the maps provider
#[derive(Debug, Error)]
pub enum MapsError {
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("Network error: {0}")]
    Request(String),

    #[error("Maps response parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

/// Reverse geocoding reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub geometry: Geometry,
}

/// Nearby search reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

/// Parameters for a nearby places search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    pub location: LatLng,
    pub radius_m: u32,
    pub place_type: Option<String>,
    pub keyword: Option<String>,
}

/// Geocoding and places lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MapsClient: Send + Sync {
    async fn reverse_geocode(&self, location: LatLng) -> Result<GeocodeResponse, MapsError>;

    async fn nearby_search(&self, search: NearbySearch) -> Result<PlacesResponse, MapsError>;
}

/// reqwest implementation of [`MapsClient`] for the Google Maps web services
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| MapsError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: MAPS_BASE_URL.to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MapsError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MapsError::Request(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| MapsError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MapsClient for GoogleMapsClient {
    async fn reverse_geocode(&self, location: LatLng) -> Result<GeocodeResponse, MapsError> {
        debug!("Reverse geocoding {},{}", location.lat, location.lng);
        self.get_json(
            "/geocode/json",
            &[("latlng", format!("{},{}", location.lat, location.lng))],
        )
        .await
    }

    async fn nearby_search(&self, search: NearbySearch) -> Result<PlacesResponse, MapsError> {
        debug!(
            "Nearby search at {},{} type={:?} keyword={:?}",
            search.location.lat, search.location.lng, search.place_type, search.keyword
        );

        let mut params = vec![
            ("location", format!("{},{}", search.location.lat, search.location.lng)),
            ("radius", search.radius_m.to_string()),
        ];
        if let Some(place_type) = search.place_type {
            params.push(("type", place_type));
        }
        if let Some(keyword) = search.keyword {
            params.push(("keyword", keyword));
        }

        self.get_json("/place/nearbysearch/json", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_places_response_tolerates_missing_fields() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "place_id": "abc",
                "name": "City Clinic",
                "geometry": { "location": { "lat": 19.07, "lng": 72.87 } }
            }]
        }"#;
        let parsed: PlacesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results[0].vicinity, None);
        assert!(parsed.results[0].types.is_empty());
        assert_eq!(parsed.results[0].geometry.location.lat, 19.07);
    }

    #[test]
    fn test_geocode_response_parses_components() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "Andheri, Mumbai, Maharashtra 400053, India",
                "address_components": [
                    { "long_name": "Mumbai", "types": ["locality", "political"] }
                ]
            }]
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results[0].address_components[0].long_name, "Mumbai");
    }
}
