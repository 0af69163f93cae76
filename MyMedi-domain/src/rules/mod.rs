//! Heuristic rule tables
//!
//! Fixed keyword and threshold tables behind the analysis endpoints.
//! Matching is case-insensitive substring containment: the input is
//! lower-cased and checked for each keyword.

mod glossary;
mod safety;
mod symptoms;

pub use glossary::{FALLBACK_EXPLANATIONS, MEDICAL_CONDITIONS, MEDICAL_TERMS};
pub use safety::{CLARITY_TERMS, HIGH_RISK_MEDICATIONS, SAFETY_EMERGENCY_KEYWORDS, SYMPTOM_DESCRIPTORS};
pub use symptoms::{
    QuickMedication, CRITICAL_COMBINATIONS, EMERGENCY_SERVICES, EMERGENCY_SYMPTOMS,
    HIGH_RISK_CONDITIONS, MODERATE_RISK_CONDITIONS, QUICK_MEDICATIONS,
};

/// Keywords from `table` contained in `text`, in table order
pub fn matching_keywords(text: &str, table: &[&'static str]) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    table
        .iter()
        .copied()
        .filter(|keyword| lowered.contains(keyword))
        .collect()
}

/// Whether `text` contains any keyword from `table`
pub fn contains_any(text: &str, table: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    table.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        let found = matching_keywords("Sudden CHEST PAIN and Shortness of Breath", EMERGENCY_SYMPTOMS);
        assert_eq!(found, vec!["chest pain", "shortness of breath"]);
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(EMERGENCY_SYMPTOMS.len(), 15);
        assert_eq!(CRITICAL_COMBINATIONS.len(), 6);
        assert_eq!(SAFETY_EMERGENCY_KEYWORDS.len(), 22);
        assert_eq!(HIGH_RISK_MEDICATIONS.len(), 8);
        assert_eq!(CLARITY_TERMS.len(), 10);
        assert_eq!(SYMPTOM_DESCRIPTORS.len(), 8);
        assert_eq!(MEDICAL_CONDITIONS.len(), 15);
        assert_eq!(FALLBACK_EXPLANATIONS.len(), 7);
        assert_eq!(MEDICAL_TERMS.len(), 34);
        assert_eq!(EMERGENCY_SERVICES.len(), 4);
    }

    #[test]
    fn test_quick_medication_order() {
        let keys: Vec<&str> = QUICK_MEDICATIONS.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["fever", "headache", "stomach pain", "acidity", "cough"]);
    }
}
