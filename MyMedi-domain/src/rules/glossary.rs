/// Plain-language explanations of common conditions
pub const MEDICAL_CONDITIONS: &[(&str, &str)] = &[
    ("hypertension", "High blood pressure - when blood pressure in arteries is consistently too high"),
    ("diabetes", "A group of metabolic disorders characterized by high blood sugar levels"),
    ("asthma", "A respiratory condition marked by attacks of spasm in the bronchi causing difficulty breathing"),
    ("migraine", "A recurrent throbbing headache that typically affects one side of the head"),
    ("arthritis", "Inflammation of one or more joints, causing pain and stiffness"),
    ("fever", "Elevated body temperature, usually indicating infection or illness"),
    ("cough", "A sudden expulsion of air from the lungs to clear irritants from airways"),
    ("headache", "Pain in the head or upper neck, can be tension, cluster, or migraine type"),
    ("nausea", "Feeling of sickness with an inclination to vomit"),
    ("fatigue", "Extreme tiredness resulting from mental or physical exertion or illness"),
    ("chest pain", "Discomfort in the chest area, can indicate heart, lung, or muscle issues"),
    ("shortness of breath", "Difficulty breathing or feeling of not getting enough air"),
    ("dizziness", "Feeling of being lightheaded, unsteady, or having a spinning sensation"),
    ("insomnia", "Inability to fall asleep or stay asleep regularly"),
    ("anxiety", "Feeling of worry, nervousness, or unease about something with an uncertain outcome"),
];

/// Keyword explanations used when no condition matches
pub const FALLBACK_EXPLANATIONS: &[(&str, &str)] = &[
    ("pain", "Physical suffering or discomfort caused by illness or injury"),
    ("ache", "A continuous or prolonged dull pain"),
    ("swelling", "Enlargement of a body part due to fluid buildup or inflammation"),
    ("rash", "Area of irritated or swollen skin"),
    ("burning", "A hot, stinging sensation"),
    ("numbness", "Loss of sensation or feeling in a body part"),
    ("weakness", "Lack of physical strength or energy"),
];

/// Autocomplete vocabulary
pub const MEDICAL_TERMS: &[&str] = &[
    "fever",
    "headache",
    "cough",
    "sore throat",
    "nausea",
    "vomiting",
    "diarrhea",
    "constipation",
    "chest pain",
    "shortness of breath",
    "dizziness",
    "fatigue",
    "insomnia",
    "anxiety",
    "depression",
    "hypertension",
    "diabetes",
    "asthma",
    "arthritis",
    "migraine",
    "allergies",
    "rash",
    "itching",
    "stomach ache",
    "back pain",
    "joint pain",
    "muscle pain",
    "burning sensation",
    "numbness",
    "swelling",
    "weight loss",
    "weight gain",
    "loss of appetite",
    "increased appetite",
];
