use tracing::debug;

use crate::entities::city::{CityCoordinates, CityProfile, CitySummary, TopHospital};
use crate::error::ServiceError;

/// Cities listed on the directory page
pub static CITY_DIRECTORY: [CitySummary; 20] = [
    CitySummary {
        name: "Mumbai",
        state: "Maharashtra",
        population: "12.5M",
        hospitals: 150,
        slug: "mumbai",
        languages: &["Hindi", "Marathi", "English"],
        description: "India's financial capital with world-class healthcare infrastructure",
    },
    CitySummary {
        name: "Delhi",
        state: "National Capital Territory",
        population: "11.0M",
        hospitals: 180,
        slug: "delhi",
        languages: &["Hindi", "English", "Punjabi"],
        description: "India's capital with premier medical institutions",
    },
    CitySummary {
        name: "Bangalore",
        state: "Karnataka",
        population: "8.4M",
        hospitals: 120,
        slug: "bangalore",
        languages: &["Kannada", "English", "Tamil"],
        description: "India's Silicon Valley with excellent healthcare facilities",
    },
    CitySummary {
        name: "Chennai",
        state: "Tamil Nadu",
        population: "7.0M",
        hospitals: 100,
        slug: "chennai",
        languages: &["Tamil", "English", "Telugu"],
        description: "Major healthcare hub in South India",
    },
    CitySummary {
        name: "Hyderabad",
        state: "Telangana",
        population: "6.9M",
        hospitals: 90,
        slug: "hyderabad",
        languages: &["Telugu", "Hindi", "English"],
        description: "Emerging IT hub with growing healthcare infrastructure",
    },
    CitySummary {
        name: "Kolkata",
        state: "West Bengal",
        population: "4.5M",
        hospitals: 80,
        slug: "kolkata",
        languages: &["Bengali", "Hindi", "English"],
        description: "Cultural capital with established medical institutions",
    },
    CitySummary {
        name: "Pune",
        state: "Maharashtra",
        population: "3.1M",
        hospitals: 70,
        slug: "pune",
        languages: &["Marathi", "Hindi", "English"],
        description: "Educational hub with quality healthcare facilities",
    },
    CitySummary {
        name: "Ahmedabad",
        state: "Gujarat",
        population: "5.6M",
        hospitals: 85,
        slug: "ahmedabad",
        languages: &["Gujarati", "Hindi", "English"],
        description: "Commercial capital of Gujarat with growing medical facilities",
    },
    CitySummary {
        name: "Jaipur",
        state: "Rajasthan",
        population: "3.1M",
        hospitals: 60,
        slug: "jaipur",
        languages: &["Hindi", "English", "Rajasthani"],
        description: "Pink City with traditional and modern healthcare blend",
    },
    CitySummary {
        name: "Surat",
        state: "Gujarat",
        population: "4.5M",
        hospitals: 55,
        slug: "surat",
        languages: &["Gujarati", "Hindi", "English"],
        description: "Diamond city with expanding healthcare services",
    },
    CitySummary {
        name: "Lucknow",
        state: "Uttar Pradesh",
        population: "2.8M",
        hospitals: 65,
        slug: "lucknow",
        languages: &["Hindi", "English", "Urdu"],
        description: "City of Nawabs with historic medical institutions",
    },
    CitySummary {
        name: "Kanpur",
        state: "Uttar Pradesh",
        population: "2.7M",
        hospitals: 50,
        slug: "kanpur",
        languages: &["Hindi", "English"],
        description: "Industrial city with developing healthcare infrastructure",
    },
    CitySummary {
        name: "Nagpur",
        state: "Maharashtra",
        population: "2.4M",
        hospitals: 45,
        slug: "nagpur",
        languages: &["Marathi", "Hindi", "English"],
        description: "Orange city with central India's medical hub",
    },
    CitySummary {
        name: "Indore",
        state: "Madhya Pradesh",
        population: "1.9M",
        hospitals: 40,
        slug: "indore",
        languages: &["Hindi", "English"],
        description: "Commercial capital of MP with quality healthcare",
    },
    CitySummary {
        name: "Thane",
        state: "Maharashtra",
        population: "1.8M",
        hospitals: 35,
        slug: "thane",
        languages: &["Marathi", "Hindi", "English"],
        description: "Mumbai's satellite city with modern medical facilities",
    },
    CitySummary {
        name: "Bhopal",
        state: "Madhya Pradesh",
        population: "1.8M",
        hospitals: 42,
        slug: "bhopal",
        languages: &["Hindi", "English"],
        description: "City of Lakes with comprehensive healthcare services",
    },
    CitySummary {
        name: "Visakhapatnam",
        state: "Andhra Pradesh",
        population: "1.7M",
        hospitals: 38,
        slug: "visakhapatnam",
        languages: &["Telugu", "Hindi", "English"],
        description: "Port city with coastal healthcare excellence",
    },
    CitySummary {
        name: "Patna",
        state: "Bihar",
        population: "1.7M",
        hospitals: 35,
        slug: "patna",
        languages: &["Hindi", "English"],
        description: "Historic city with emerging medical infrastructure",
    },
    CitySummary {
        name: "Vadodara",
        state: "Gujarat",
        population: "1.7M",
        hospitals: 40,
        slug: "vadodara",
        languages: &["Gujarati", "Hindi", "English"],
        description: "Cultural city with quality healthcare facilities",
    },
    CitySummary {
        name: "Ghaziabad",
        state: "Uttar Pradesh",
        population: "1.6M",
        hospitals: 30,
        slug: "ghaziabad",
        languages: &["Hindi", "English"],
        description: "NCR city with accessible healthcare services",
    },
];

/// Cities with a detailed healthcare page
pub static CITY_PROFILES: [CityProfile; 8] = [
    CityProfile {
        slug: "mumbai",
        name: "Mumbai",
        state: "Maharashtra",
        population: "12.5 million",
        coordinates: CityCoordinates { lat: 19.076, lng: 72.8777 },
        languages: &["Hindi", "Marathi", "English", "Gujarati"],
        hospitals: 150,
        doctors: 25000,
        life_expectancy: 74.2,
        common_issues: &[
            "Air pollution-related respiratory problems",
            "Monsoon-related infections",
            "Stress and lifestyle diseases",
            "Traffic accident injuries",
            "Waterborne diseases during monsoons",
        ],
        top_hospitals: &[
            TopHospital { name: "Tata Memorial Hospital", specialty: "Cancer Care", rating: 4.8 },
            TopHospital { name: "Kokilaben Dhirubhai Ambani Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "Lilavati Hospital", specialty: "Cardiac Care", rating: 4.6 },
            TopHospital { name: "Hinduja Hospital", specialty: "Multi-specialty", rating: 4.5 },
            TopHospital { name: "Breach Candy Hospital", specialty: "General Medicine", rating: 4.4 },
        ],
        emergency_numbers: &["108", "102", "022-24177777"],
        description: "India's financial capital with world-class healthcare infrastructure and leading medical institutions.",
    },
    CityProfile {
        slug: "delhi",
        name: "Delhi",
        state: "National Capital Territory",
        population: "11.0 million",
        coordinates: CityCoordinates { lat: 28.6139, lng: 77.209 },
        languages: &["Hindi", "English", "Punjabi", "Urdu"],
        hospitals: 180,
        doctors: 30000,
        life_expectancy: 73.8,
        common_issues: &[
            "Severe air pollution and smog",
            "Respiratory diseases and asthma",
            "Heat-related illnesses in summer",
            "Vector-borne diseases",
            "Lifestyle and stress-related disorders",
        ],
        top_hospitals: &[
            TopHospital { name: "AIIMS Delhi", specialty: "Multi-specialty", rating: 4.9 },
            TopHospital { name: "Fortis Escorts Heart Institute", specialty: "Cardiac Care", rating: 4.8 },
            TopHospital { name: "Max Super Speciality Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "Apollo Hospital", specialty: "Multi-specialty", rating: 4.6 },
            TopHospital { name: "Sir Ganga Ram Hospital", specialty: "General Medicine", rating: 4.5 },
        ],
        emergency_numbers: &["108", "102", "011-23921000"],
        description: "India's capital with premier medical institutions and comprehensive healthcare facilities.",
    },
    CityProfile {
        slug: "bangalore",
        name: "Bangalore",
        state: "Karnataka",
        population: "8.4 million",
        coordinates: CityCoordinates { lat: 12.9716, lng: 77.5946 },
        languages: &["Kannada", "English", "Tamil", "Telugu", "Hindi"],
        hospitals: 120,
        doctors: 20000,
        life_expectancy: 75.1,
        common_issues: &[
            "Traffic pollution and respiratory issues",
            "Lifestyle diseases in IT professionals",
            "Stress and mental health concerns",
            "Seasonal allergies",
            "Dengue and chikungunya during monsoons",
        ],
        top_hospitals: &[
            TopHospital { name: "Narayana Health City", specialty: "Cardiac Care", rating: 4.8 },
            TopHospital { name: "Manipal Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "Apollo Hospital", specialty: "Multi-specialty", rating: 4.6 },
            TopHospital { name: "Fortis Hospital", specialty: "Multi-specialty", rating: 4.5 },
            TopHospital { name: "St. John's Medical College Hospital", specialty: "General Medicine", rating: 4.4 },
        ],
        emergency_numbers: &["108", "102", "080-22227788"],
        description: "India's Silicon Valley with excellent healthcare infrastructure and medical research facilities.",
    },
    CityProfile {
        slug: "chennai",
        name: "Chennai",
        state: "Tamil Nadu",
        population: "7.0 million",
        coordinates: CityCoordinates { lat: 13.0827, lng: 80.2707 },
        languages: &["Tamil", "English", "Telugu", "Hindi"],
        hospitals: 100,
        doctors: 18000,
        life_expectancy: 74.8,
        common_issues: &[
            "Heat stroke and dehydration",
            "Monsoon-related infections",
            "Dengue and chikungunya",
            "Coastal humidity-related skin issues",
            "Lifestyle diseases",
        ],
        top_hospitals: &[
            TopHospital { name: "Apollo Hospital", specialty: "Multi-specialty", rating: 4.8 },
            TopHospital { name: "Fortis Malar Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "MIOT International", specialty: "Orthopedics", rating: 4.6 },
            TopHospital { name: "Stanley Medical College Hospital", specialty: "General Medicine", rating: 4.4 },
            TopHospital { name: "Vijaya Hospital", specialty: "Multi-specialty", rating: 4.3 },
        ],
        emergency_numbers: &["108", "102", "044-28190000"],
        description: "Major healthcare hub in South India with renowned medical colleges and hospitals.",
    },
    CityProfile {
        slug: "hyderabad",
        name: "Hyderabad",
        state: "Telangana",
        population: "6.9 million",
        coordinates: CityCoordinates { lat: 17.385, lng: 78.4867 },
        languages: &["Telugu", "Hindi", "English", "Urdu"],
        hospitals: 90,
        doctors: 15000,
        life_expectancy: 74.5,
        common_issues: &[
            "Heat-related illnesses",
            "Water scarcity health impacts",
            "Air pollution in IT corridors",
            "Lifestyle diseases in tech workers",
            "Seasonal viral infections",
        ],
        top_hospitals: &[
            TopHospital { name: "Apollo Hospital", specialty: "Multi-specialty", rating: 4.8 },
            TopHospital { name: "CARE Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "Continental Hospital", specialty: "Multi-specialty", rating: 4.6 },
            TopHospital { name: "Yashoda Hospital", specialty: "Multi-specialty", rating: 4.5 },
            TopHospital { name: "NIMS Hospital", specialty: "General Medicine", rating: 4.3 },
        ],
        emergency_numbers: &["108", "102", "040-23607777"],
        description: "Emerging IT hub with growing healthcare infrastructure and medical tourism facilities.",
    },
    CityProfile {
        slug: "kolkata",
        name: "Kolkata",
        state: "West Bengal",
        population: "4.5 million",
        coordinates: CityCoordinates { lat: 22.5726, lng: 88.3639 },
        languages: &["Bengali", "Hindi", "English"],
        hospitals: 80,
        doctors: 12000,
        life_expectancy: 73.2,
        common_issues: &[
            "Monsoon-related waterborne diseases",
            "Air pollution and respiratory issues",
            "Dengue and malaria",
            "Seasonal flu and viral infections",
            "Lifestyle and dietary disorders",
        ],
        top_hospitals: &[
            TopHospital { name: "Apollo Gleneagles Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "AMRI Hospital", specialty: "Multi-specialty", rating: 4.6 },
            TopHospital { name: "Fortis Hospital", specialty: "Multi-specialty", rating: 4.5 },
            TopHospital { name: "Medical College Hospital", specialty: "General Medicine", rating: 4.2 },
            TopHospital { name: "Ruby General Hospital", specialty: "Multi-specialty", rating: 4.1 },
        ],
        emergency_numbers: &["108", "102", "033-22875000"],
        description: "Cultural capital with established medical institutions and traditional healthcare practices.",
    },
    CityProfile {
        slug: "pune",
        name: "Pune",
        state: "Maharashtra",
        population: "3.1 million",
        coordinates: CityCoordinates { lat: 18.5204, lng: 73.8567 },
        languages: &["Marathi", "Hindi", "English"],
        hospitals: 70,
        doctors: 10000,
        life_expectancy: 75.3,
        common_issues: &[
            "Traffic pollution effects",
            "Monsoon-related infections",
            "Student stress and mental health",
            "Lifestyle diseases",
            "Seasonal allergies",
        ],
        top_hospitals: &[
            TopHospital { name: "Ruby Hall Clinic", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "Jehangir Hospital", specialty: "Multi-specialty", rating: 4.6 },
            TopHospital { name: "Deenanath Mangeshkar Hospital", specialty: "Multi-specialty", rating: 4.5 },
            TopHospital { name: "Sahyadri Hospital", specialty: "Multi-specialty", rating: 4.4 },
            TopHospital { name: "KEM Hospital", specialty: "General Medicine", rating: 4.2 },
        ],
        emergency_numbers: &["108", "102", "020-26127777"],
        description: "Educational hub with quality healthcare facilities and medical research institutions.",
    },
    CityProfile {
        slug: "ahmedabad",
        name: "Ahmedabad",
        state: "Gujarat",
        population: "5.6 million",
        coordinates: CityCoordinates { lat: 23.0225, lng: 72.5714 },
        languages: &["Gujarati", "Hindi", "English"],
        hospitals: 85,
        doctors: 12000,
        life_expectancy: 74.1,
        common_issues: &[
            "Extreme heat and heat stroke",
            "Air pollution and dust storms",
            "Water quality issues",
            "Industrial pollution effects",
            "Lifestyle and dietary disorders",
        ],
        top_hospitals: &[
            TopHospital { name: "Apollo Hospital", specialty: "Multi-specialty", rating: 4.7 },
            TopHospital { name: "Sterling Hospital", specialty: "Multi-specialty", rating: 4.6 },
            TopHospital { name: "Zydus Hospital", specialty: "Multi-specialty", rating: 4.5 },
            TopHospital { name: "Civil Hospital", specialty: "General Medicine", rating: 4.1 },
            TopHospital { name: "SAL Hospital", specialty: "Multi-specialty", rating: 4.3 },
        ],
        emergency_numbers: &["108", "102", "079-26577777"],
        description: "Commercial capital of Gujarat with growing healthcare infrastructure and medical facilities.",
    },
];

/// Trait for the static city directory
pub trait CityServiceTrait {
    fn directory(&self) -> &'static [CitySummary];

    /// Detailed profile for a slug, matched case-insensitively
    fn profile(&self, slug: &str) -> Result<&'static CityProfile, ServiceError>;

    fn has_profile(&self, slug: &str) -> bool {
        self.profile(slug).is_ok()
    }
}

pub struct CityService;

impl CityServiceTrait for CityService {
    fn directory(&self) -> &'static [CitySummary] {
        &CITY_DIRECTORY
    }

    fn profile(&self, slug: &str) -> Result<&'static CityProfile, ServiceError> {
        let wanted = slug.to_lowercase();
        CITY_PROFILES
            .iter()
            .find(|city| city.slug == wanted)
            .ok_or_else(|| {
                debug!(slug, "Unknown city");
                ServiceError::NotFound(format!("City {} not found", slug))
            })
    }
}

pub fn create_default_city_service() -> impl CityServiceTrait + Send + Sync {
    CityService
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_slugs_are_unique() {
        let mut slugs: Vec<&str> = CITY_DIRECTORY.iter().map(|c| c.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), CITY_DIRECTORY.len());
    }

    #[test]
    fn test_every_profile_is_in_directory() {
        for profile in CITY_PROFILES.iter() {
            let summary = CITY_DIRECTORY.iter().find(|c| c.slug == profile.slug);
            assert!(summary.is_some(), "{} missing from directory", profile.slug);
            assert_eq!(profile.top_hospitals.len(), 5);
        }
    }

    #[test]
    fn test_profile_lookup_is_case_insensitive() {
        let city = CityService.profile("Mumbai").unwrap();
        assert_eq!(city.state, "Maharashtra");
        assert_eq!(city.emergency_numbers[0], "108");
        assert!(CityService.has_profile("pune"));
    }

    #[test]
    fn test_directory_only_city_has_no_profile() {
        assert!(CITY_DIRECTORY.iter().any(|c| c.slug == "jaipur"));
        assert!(matches!(CityService.profile("jaipur"), Err(ServiceError::NotFound(_))));
        assert!(!CityService.has_profile("atlantis"));
    }
}
