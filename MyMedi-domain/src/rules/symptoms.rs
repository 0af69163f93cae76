use crate::entities::live_analysis::Urgency;

/// Symptoms that require immediate attention
pub const EMERGENCY_SYMPTOMS: &[&str] = &[
    "chest pain",
    "severe chest pain",
    "difficulty breathing",
    "shortness of breath",
    "severe headache",
    "sudden severe headache",
    "loss of consciousness",
    "severe abdominal pain",
    "high fever",
    "severe bleeding",
    "stroke symptoms",
    "heart attack symptoms",
    "severe allergic reaction",
    "poisoning",
    "severe burns",
];

/// Symptom pairs that are critical when reported together
pub const CRITICAL_COMBINATIONS: &[[&str; 2]] = &[
    ["chest pain", "shortness of breath"],
    ["chest pain", "sweating"],
    ["chest pain", "nausea"],
    ["severe headache", "vision changes"],
    ["fever", "neck stiffness"],
    ["abdominal pain", "vomiting blood"],
];

pub const HIGH_RISK_CONDITIONS: &[&str] = &["diabetes-type2", "heart-disease", "kidney-disease"];

pub const MODERATE_RISK_CONDITIONS: &[&str] = &["hypertension", "high-cholesterol", "asthma"];

/// Emergency numbers shown with every alert
pub const EMERGENCY_SERVICES: &[&str] = &[
    "Emergency Services: 108",
    "Medical Emergency: 102",
    "Police: 100",
    "Fire: 101",
];

/// Over-the-counter suggestion for a common symptom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickMedication {
    pub name: &'static str,
    pub reason: &'static str,
    pub dosage: &'static str,
    pub urgency: Urgency,
}

const fn med(name: &'static str, reason: &'static str, dosage: &'static str, urgency: Urgency) -> QuickMedication {
    QuickMedication { name, reason, dosage, urgency }
}

/// Symptom keyword to medication suggestions, in lookup order
pub const QUICK_MEDICATIONS: &[(&str, [QuickMedication; 2])] = &[
    ("fever", [
        med("Paracetamol 500mg", "Fever reduction", "1 tablet every 6 hours", Urgency::Soon),
        med("Ibuprofen 400mg", "Fever and inflammation", "1 tablet every 8 hours", Urgency::Soon),
    ]),
    ("headache", [
        med("Paracetamol 500mg", "Pain relief", "1-2 tablets every 6 hours", Urgency::Soon),
        med("Ibuprofen 400mg", "Pain and inflammation", "1 tablet every 8 hours", Urgency::Soon),
    ]),
    ("stomach pain", [
        med("Antacid", "Stomach acid neutralization", "2 tablets after meals", Urgency::Routine),
        med("Omeprazole 20mg", "Acid reduction", "1 tablet before breakfast", Urgency::Routine),
    ]),
    ("acidity", [
        med("Omeprazole 20mg", "Acid suppression", "1 tablet before breakfast", Urgency::Routine),
        med("Pantoprazole 40mg", "Acid control", "1 tablet daily", Urgency::Routine),
    ]),
    ("cough", [
        med("Dextromethorphan syrup", "Cough suppression", "10ml every 6 hours", Urgency::Routine),
        med("Honey and warm water", "Natural cough relief", "1 tsp honey in warm water", Urgency::Routine),
    ]),
];
