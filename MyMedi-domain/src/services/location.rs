use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use futures::future::join_all;
use tracing::{debug, error, warn};

use crate::clients::maps::{GoogleMapsClient, LatLng, MapsClient, MapsError, NearbySearch, PlaceResult};
use crate::config::AppConfig;
use crate::entities::location::{
    ApiProbe, Coordinates, FacilityGeometry, FacilityHours, HealthcareFacility, LocationInfo,
    LocationLookup, LocationRequest, MapsValidation, ProbeResults, SetupStep,
};
use crate::error::ServiceError;

const EARTH_RADIUS_KM: f64 = 6371.0;
const SEARCH_RADIUS_M: u32 = 5000;
const LAB_KEYWORDS: [&str; 4] = ["pathology lab", "diagnostic center", "medical laboratory", "blood test center"];

/// New Delhi, used to probe the maps APIs
const PROBE_LOCATION: LatLng = LatLng { lat: 28.6139, lng: 77.2090 };

/// Great-circle distance in kilometres
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Metres below one kilometre, otherwise kilometres with one decimal
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{}m", (distance_km * 1000.0).round())
    } else {
        format!("{:.1}km", distance_km)
    }
}

/// Health advice for the user's city and state in the given month (1-12)
pub fn location_recommendations(info: &LocationInfo, month: u32) -> Vec<String> {
    let mut out = Vec::new();

    if !info.city.is_empty() || !info.state.is_empty() {
        let place = format!("{} {}", info.city, info.state).to_lowercase();
        let mentions = |names: &[&str]| names.iter().any(|n| place.contains(n));

        if mentions(&["delhi", "mumbai", "kolkata"]) {
            out.push("Air pollution levels may be high. Consider wearing a mask outdoors and using air purifiers indoors.".to_string());
        }
        if mentions(&["rajasthan", "gujarat"]) {
            out.push("Stay hydrated and avoid prolonged sun exposure during peak hours (10 AM - 4 PM).".to_string());
        }
        if mentions(&["kerala", "goa"]) {
            out.push("High humidity levels. Stay hydrated and watch for heat-related illnesses.".to_string());
        }
        if mentions(&["himachal", "uttarakhand", "kashmir"]) {
            out.push("High altitude area. Take time to acclimatize and stay hydrated.".to_string());
        }
        if (6..=9).contains(&month) {
            out.push("Monsoon season: Be cautious of waterborne diseases. Drink boiled/filtered water and avoid street food.".to_string());
        }
    }

    out.push("Keep emergency contacts handy and know the location of nearest hospital.".to_string());
    out
}

/// First eight and last four characters of a key
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(8).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

fn to_facility(place: PlaceResult, origin: Coordinates, extra_types: &[&str]) -> HealthcareFacility {
    let location = place.geometry.location;
    let mut types = place.types;
    types.extend(extra_types.iter().map(|t| t.to_string()));

    HealthcareFacility {
        place_id: place.place_id,
        name: place.name,
        vicinity: place.vicinity.unwrap_or_default(),
        rating: place.rating,
        user_ratings_total: place.user_ratings_total,
        opening_hours: place.opening_hours.map(|h| FacilityHours { open_now: h.open_now }),
        types,
        geometry: FacilityGeometry {
            location: Coordinates { lat: location.lat, lng: location.lng },
        },
        distance: haversine_km(origin.lat, origin.lng, location.lat, location.lng),
    }
}

fn sort_by_distance(facilities: &mut [HealthcareFacility]) {
    facilities.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

fn probe_error(err: &MapsError) -> String {
    match err {
        MapsError::Request(_) => err.to_string(),
        other => format!("Network error: {}", other),
    }
}

fn setup_step(geocoding: &ApiProbe, places: &ApiProbe, billing: &ApiProbe) -> SetupStep {
    let (step, message) = if !geocoding.enabled {
        (2, "Enable Geocoding API in Google Cloud Console")
    } else if !places.enabled {
        (3, "Enable Places API in Google Cloud Console")
    } else if !billing.enabled {
        (4, "Set up billing account for Places API")
    } else {
        (5, "Configuration complete")
    };
    SetupStep { step, message: message.to_string() }
}

/// Trait for location lookups and maps configuration checks
#[async_trait]
pub trait LocationServiceTrait {
    /// Address, nearby facilities and regional advice for a coordinate pair
    async fn lookup(&self, request: LocationRequest) -> Result<LocationLookup, ServiceError>;

    /// Probe the geocoding and places APIs with the configured key
    async fn validate(&self) -> MapsValidation;
}

pub struct LocationService {
    api_key: Option<String>,
    maps: Option<Arc<dyn MapsClient>>,
}

impl LocationService {
    pub fn new(api_key: Option<String>, maps: Option<Arc<dyn MapsClient>>) -> Self {
        Self { api_key, maps }
    }

    /// Service without a maps key
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    async fn geocode(&self, maps: &dyn MapsClient, origin: Coordinates) -> LocationInfo {
        let mut info = LocationInfo::at(origin);

        let response = match maps.reverse_geocode(LatLng { lat: origin.lat, lng: origin.lng }).await {
            Ok(response) => response,
            Err(e) => {
                error!("Geocoding error: {}", e);
                return info;
            }
        };

        if response.status != "OK" {
            debug!(status = %response.status, "Geocoding returned no address");
            return info;
        }
        let Some(result) = response.results.into_iter().next() else {
            return info;
        };

        info.address = result.formatted_address;
        for component in result.address_components {
            let has = |t: &str| component.types.iter().any(|ty| ty == t);
            if has("locality") {
                info.city = component.long_name;
            } else if has("administrative_area_level_1") {
                info.state = component.long_name;
            } else if has("country") {
                info.country = component.long_name;
            } else if has("postal_code") {
                info.postal_code = component.long_name;
            }
        }
        info
    }

    async fn find_facilities(&self, maps: &dyn MapsClient, origin: Coordinates) -> (Vec<HealthcareFacility>, String) {
        let center = LatLng { lat: origin.lat, lng: origin.lng };

        let general = maps
            .nearby_search(NearbySearch {
                location: center,
                radius_m: SEARCH_RADIUS_M,
                place_type: Some("health".to_string()),
                keyword: None,
            })
            .await;

        let general = match general {
            Ok(response) => response,
            Err(e) => {
                error!("Places API error: {}", e);
                return (Vec::new(), "REQUEST_FAILED".to_string());
            }
        };

        let status = general.status.clone();
        let mut facilities: Vec<HealthcareFacility> = if general.status == "OK" {
            general
                .results
                .into_iter()
                .map(|place| to_facility(place, origin, &[]))
                .collect()
        } else {
            Vec::new()
        };

        let lab_searches = LAB_KEYWORDS.iter().map(|keyword| {
            maps.nearby_search(NearbySearch {
                location: center,
                radius_m: SEARCH_RADIUS_M,
                place_type: None,
                keyword: Some(keyword.to_string()),
            })
        });

        for (keyword, result) in LAB_KEYWORDS.iter().zip(join_all(lab_searches).await) {
            let response = match result {
                Ok(response) if response.status == "OK" => response,
                Ok(_) => continue,
                Err(e) => {
                    warn!(keyword, "Lab search error: {}", e);
                    continue;
                }
            };
            for place in response.results {
                if facilities.iter().any(|existing| existing.place_id == place.place_id) {
                    continue;
                }
                facilities.push(to_facility(place, origin, &["laboratory", "medical_lab"]));
            }
        }

        sort_by_distance(&mut facilities);
        (facilities, status)
    }

    async fn probe_geocoding(&self, maps: &dyn MapsClient) -> ApiProbe {
        match maps.reverse_geocode(PROBE_LOCATION).await {
            Ok(response) => match response.status.as_str() {
                "OK" => ApiProbe::ok(),
                "REQUEST_DENIED" => ApiProbe::failed("API key invalid or Geocoding API not enabled"),
                "OVER_QUERY_LIMIT" => ApiProbe::failed("Quota exceeded - check billing and limits"),
                other => ApiProbe::failed(format!("Geocoding API error: {}", other)),
            },
            Err(e) => ApiProbe::failed(probe_error(&e)),
        }
    }

    async fn probe_places(&self, maps: &dyn MapsClient) -> ApiProbe {
        let search = NearbySearch {
            location: PROBE_LOCATION,
            radius_m: 1000,
            place_type: Some("hospital".to_string()),
            keyword: None,
        };
        match maps.nearby_search(search).await {
            Ok(response) => match response.status.as_str() {
                "OK" | "ZERO_RESULTS" => ApiProbe::ok(),
                "REQUEST_DENIED" => {
                    ApiProbe::failed("API key invalid, Places API not enabled, or billing not set up")
                }
                "OVER_QUERY_LIMIT" => ApiProbe::failed("Quota exceeded - check billing and limits"),
                other => ApiProbe::failed(format!("Places API error: {}", other)),
            },
            Err(e) => ApiProbe::failed(probe_error(&e)),
        }
    }
}

#[async_trait]
impl LocationServiceTrait for LocationService {
    async fn lookup(&self, request: LocationRequest) -> Result<LocationLookup, ServiceError> {
        let (Some(lat), Some(lng)) = (request.lat.filter(|v| *v != 0.0), request.lng.filter(|v| *v != 0.0)) else {
            warn!("Location lookup without coordinates");
            return Err(ServiceError::Validation("Coordinates are required".to_string()));
        };
        let origin = Coordinates { lat, lng };

        let Some(maps) = self.maps.as_deref() else {
            return Ok(LocationLookup {
                location_info: LocationInfo::at(origin),
                facilities: Vec::new(),
                recommendations: Vec::new(),
                google_status: "API_KEY_MISSING".to_string(),
            });
        };

        let location_info = self.geocode(maps, origin).await;
        let (facilities, google_status) = self.find_facilities(maps, origin).await;
        let recommendations = location_recommendations(&location_info, Utc::now().month());

        debug!(facilities = facilities.len(), status = %google_status, "Location lookup complete");

        Ok(LocationLookup {
            location_info,
            facilities,
            recommendations,
            google_status,
        })
    }

    async fn validate(&self) -> MapsValidation {
        let (Some(api_key), Some(maps)) = (self.api_key.as_deref(), self.maps.as_deref()) else {
            return MapsValidation {
                valid: false,
                error: Some("GOOGLE_MAPS_API_KEY environment variable is not set".to_string()),
                results: None,
                setup: Some(SetupStep {
                    step: 1,
                    message: "Please add your Google Maps API key to environment variables".to_string(),
                }),
            };
        };

        let geocoding = self.probe_geocoding(maps).await;
        let places = self.probe_places(maps).await;
        let billing = if places.enabled {
            ApiProbe::ok()
        } else {
            ApiProbe::failed("Billing required for Places API")
        };

        let valid = geocoding.enabled && places.enabled && billing.enabled;
        let setup = (!valid).then(|| setup_step(&geocoding, &places, &billing));

        MapsValidation {
            valid,
            error: None,
            results: Some(ProbeResults {
                api_key: mask_api_key(api_key),
                geocoding,
                places,
                billing,
            }),
            setup,
        }
    }
}

/// Create the location service from configuration
pub fn create_default_location_service(config: &AppConfig) -> Result<LocationService, ServiceError> {
    let Some(key) = config.google_maps_api_key.clone() else {
        return Ok(LocationService::disabled());
    };
    let client = GoogleMapsClient::new(key.clone())?;
    Ok(LocationService::new(Some(key), Some(Arc::new(client))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::maps::{
        AddressComponent, GeocodeResponse, GeocodeResult, Geometry, MockMapsClient, PlacesResponse,
    };

    fn place(id: &str, lat: f64, lng: f64) -> PlaceResult {
        PlaceResult {
            place_id: id.to_string(),
            name: format!("Clinic {}", id),
            geometry: Geometry { location: LatLng { lat, lng } },
            ..Default::default()
        }
    }

    fn mumbai_geocode() -> GeocodeResponse {
        GeocodeResponse {
            status: "OK".to_string(),
            results: vec![GeocodeResult {
                formatted_address: "Andheri, Mumbai, Maharashtra, India".to_string(),
                address_components: vec![
                    AddressComponent { long_name: "Mumbai".to_string(), types: vec!["locality".to_string()] },
                    AddressComponent {
                        long_name: "Maharashtra".to_string(),
                        types: vec!["administrative_area_level_1".to_string()],
                    },
                    AddressComponent { long_name: "India".to_string(), types: vec!["country".to_string()] },
                    AddressComponent { long_name: "400053".to_string(), types: vec!["postal_code".to_string()] },
                ],
            }],
        }
    }

    #[test]
    fn test_haversine_and_format() {
        let km = haversine_km(19.0760, 72.8777, 18.5204, 73.8567);
        assert!((km - 120.0).abs() < 3.0, "Mumbai to Pune was {}", km);
        assert_eq!(format_distance(0.4567), "457m");
        assert_eq!(format_distance(12.345), "12.3km");
    }

    #[test]
    fn test_location_recommendations() {
        let info = LocationInfo {
            city: "Jaipur".to_string(),
            state: "Rajasthan".to_string(),
            ..Default::default()
        };
        let recs = location_recommendations(&info, 7);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("Stay hydrated and avoid prolonged sun exposure"));
        assert!(recs[1].starts_with("Monsoon season"));

        let recs = location_recommendations(&LocationInfo::default(), 7);
        assert_eq!(recs, vec!["Keep emergency contacts handy and know the location of nearest hospital."]);
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("AIzaSyABCDEFGHIJKLMNOP1234"), "AIzaSyAB...1234");
        assert_eq!(mask_api_key("abc"), "abc...abc");
    }

    #[tokio::test]
    async fn test_lookup_requires_coordinates() {
        let service = LocationService::disabled();
        let result = service.lookup(LocationRequest { lat: Some(19.0), lng: None }).await;
        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg == "Coordinates are required"));
    }

    #[tokio::test]
    async fn test_lookup_without_key_reports_missing() {
        let service = LocationService::disabled();
        let lookup = service
            .lookup(LocationRequest { lat: Some(19.07), lng: Some(72.87) })
            .await
            .unwrap();
        assert_eq!(lookup.google_status, "API_KEY_MISSING");
        assert_eq!(lookup.location_info.coordinates.lat, 19.07);
        assert!(lookup.facilities.is_empty());
        assert!(lookup.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_merges_lab_results_sorted_by_distance() {
        let mut maps = MockMapsClient::new();
        maps.expect_reverse_geocode().returning(|_| Ok(mumbai_geocode()));
        maps.expect_nearby_search().returning(|search| {
            let results = match search.keyword.as_deref() {
                None => vec![place("far", 19.20, 72.87)],
                Some("pathology lab") => vec![place("near", 19.071, 72.871), place("far", 19.20, 72.87)],
                Some(_) => Vec::new(),
            };
            Ok(PlacesResponse { status: "OK".to_string(), results })
        });

        let service = LocationService::new(Some("test-key".to_string()), Some(Arc::new(maps)));
        let lookup = service
            .lookup(LocationRequest { lat: Some(19.07), lng: Some(72.87) })
            .await
            .unwrap();

        assert_eq!(lookup.location_info.city, "Mumbai");
        assert_eq!(lookup.location_info.state, "Maharashtra");
        assert_eq!(lookup.location_info.postal_code, "400053");
        assert_eq!(lookup.google_status, "OK");

        let ids: Vec<&str> = lookup.facilities.iter().map(|f| f.place_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!(lookup.facilities[0].types.contains(&"laboratory".to_string()));
        assert!(!lookup.facilities[1].types.contains(&"laboratory".to_string()));
        assert!(lookup.recommendations[0].starts_with("Air pollution"));
    }

    #[tokio::test]
    async fn test_places_failure_sets_request_failed() {
        let mut maps = MockMapsClient::new();
        maps.expect_reverse_geocode()
            .returning(|_| Err(MapsError::Request("timeout".to_string())));
        maps.expect_nearby_search()
            .returning(|_| Err(MapsError::Request("timeout".to_string())));

        let service = LocationService::new(Some("test-key".to_string()), Some(Arc::new(maps)));
        let lookup = service
            .lookup(LocationRequest { lat: Some(19.07), lng: Some(72.87) })
            .await
            .unwrap();

        assert_eq!(lookup.google_status, "REQUEST_FAILED");
        assert_eq!(lookup.location_info.address, "");
    }

    #[tokio::test]
    async fn test_validate_reports_next_setup_step() {
        let mut maps = MockMapsClient::new();
        maps.expect_reverse_geocode().returning(|_| {
            Ok(GeocodeResponse { status: "OK".to_string(), results: Vec::new() })
        });
        maps.expect_nearby_search().returning(|_| {
            Ok(PlacesResponse { status: "REQUEST_DENIED".to_string(), results: Vec::new() })
        });

        let service = LocationService::new(Some("AIzaSyABCDEFGHIJKLMNOP1234".to_string()), Some(Arc::new(maps)));
        let validation = service.validate().await;

        assert!(!validation.valid);
        let results = validation.results.unwrap();
        assert_eq!(results.api_key, "AIzaSyAB...1234");
        assert!(results.geocoding.enabled);
        assert_eq!(results.billing.error.as_deref(), Some("Billing required for Places API"));
        assert_eq!(validation.setup.unwrap().step, 3);
    }

    #[tokio::test]
    async fn test_validate_without_key() {
        let validation = LocationService::disabled().validate().await;
        assert!(!validation.valid);
        assert_eq!(validation.setup.unwrap().step, 1);
        assert!(validation.results.is_none());
    }
}
