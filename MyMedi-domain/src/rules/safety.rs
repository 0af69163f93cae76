/// Keywords that escalate a response to the emergency protocol
pub const SAFETY_EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "shortness of breath",
    "severe bleeding",
    "unconscious",
    "heart attack",
    "stroke",
    "seizure",
    "severe allergic reaction",
    "poisoning",
    "suicide",
    "overdose",
    "severe burns",
    "broken bone",
    "head injury",
    "can't breathe",
    "choking",
    "severe pain",
    "blood vomit",
    "severe headache",
    "vision loss",
    "paralysis",
];

pub const HIGH_RISK_MEDICATIONS: &[&str] = &[
    "warfarin",
    "insulin",
    "chemotherapy",
    "immunosuppressant",
    "anticoagulant",
    "blood thinner",
    "heart medication",
    "psychiatric medication",
];

/// Medical terms that make a user description clearer
pub const CLARITY_TERMS: &[&str] = &[
    "pain",
    "fever",
    "headache",
    "nausea",
    "fatigue",
    "cough",
    "rash",
    "swelling",
    "dizziness",
    "vomiting",
];

pub const SYMPTOM_DESCRIPTORS: &[&str] = &[
    "sharp",
    "dull",
    "throbbing",
    "burning",
    "tingling",
    "severe",
    "mild",
    "moderate",
];
