use serde::{Deserialize, Serialize};

/// Body mass index band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Categorize a BMI value
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Health risk associated with the band: `Low`, `Moderate` or `High`
    pub fn risk(&self) -> &'static str {
        match self {
            BmiCategory::Underweight | BmiCategory::Normal => "Low",
            BmiCategory::Overweight => "Moderate",
            BmiCategory::Obese => "High",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calculate BMI from weight in kilograms and height in centimetres.
///
/// Returns `None` when either measurement is not positive.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_bmi() {
        let bmi = calculate_bmi(70.0, 175.0).unwrap();
        assert_eq!(round1(bmi), 22.9);
    }

    #[test]
    fn test_calculate_bmi_rejects_non_positive() {
        assert!(calculate_bmi(0.0, 175.0).is_none());
        assert!(calculate_bmi(70.0, -1.0).is_none());
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_category_risk() {
        assert_eq!(BmiCategory::Underweight.risk(), "Low");
        assert_eq!(BmiCategory::Normal.risk(), "Low");
        assert_eq!(BmiCategory::Overweight.risk(), "Moderate");
        assert_eq!(BmiCategory::Obese.risk(), "High");
    }
}
