use serde::Serialize;

/// Row in the city directory
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub name: &'static str,
    pub state: &'static str,
    pub population: &'static str,
    pub hospitals: u32,
    pub slug: &'static str,
    pub languages: &'static [&'static str],
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityCoordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopHospital {
    pub name: &'static str,
    pub specialty: &'static str,
    pub rating: f64,
}

/// Detailed healthcare profile of a city
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityProfile {
    pub slug: &'static str,
    pub name: &'static str,
    pub state: &'static str,
    pub population: &'static str,
    pub coordinates: CityCoordinates,
    pub languages: &'static [&'static str],
    pub hospitals: u32,
    pub doctors: u32,
    pub life_expectancy: f64,
    pub common_issues: &'static [&'static str],
    pub top_hospitals: &'static [TopHospital],
    pub emergency_numbers: &'static [&'static str],
    pub description: &'static str,
}
