use serde::{Deserialize, Serialize};

/// One of the two independent sensing channels producing emotion classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Modality {
    Voice,
    Facial,
}

impl Modality {
    pub const COUNT: usize = 2;
    pub const ALL: [Modality; Modality::COUNT] = [Modality::Voice, Modality::Facial];

    pub fn index(&self) -> usize {
        match self {
            Modality::Voice => 0,
            Modality::Facial => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Voice => "Voice",
            Modality::Facial => "Facial",
        }
    }
}

/// One of the four fused display buckets. The set is closed: every raw label
/// maps to exactly one category, unmapped labels fall back to `Calm`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Calm,
    Focus,
    Stress,
    Fatigue,
}

impl Category {
    pub const COUNT: usize = 4;
    pub const ALL: [Category; Category::COUNT] = [
        Category::Calm,
        Category::Focus,
        Category::Stress,
        Category::Fatigue,
    ];

    pub fn index(&self) -> usize {
        match self {
            Category::Calm => 0,
            Category::Focus => 1,
            Category::Stress => 2,
            Category::Fatigue => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Calm => "Calm",
            Category::Focus => "Focus",
            Category::Stress => "Stress",
            Category::Fatigue => "Fatigue",
        }
    }
}

/// Labels the voice emotion classifier can emit (GoEmotions subset).
pub const VOICE_VOCABULARY: [&str; 21] = [
    "neutral",
    "calm",
    "relief",
    "approval",
    "curiosity",
    "realization",
    "admiration",
    "desire",
    "nervousness",
    "fear",
    "anxiety",
    "annoyance",
    "anger",
    "disgust",
    "disapproval",
    "embarrassment",
    "sadness",
    "grief",
    "disappointment",
    "remorse",
    "confusion",
];

/// Labels the facial expression classifier can emit.
pub const FACIAL_VOCABULARY: [&str; 7] = [
    "happy", "neutral", "surprise", "sad", "angry", "fear", "disgust",
];

/// Map a raw classifier label onto a display category. Case-insensitive,
/// total: anything outside the modality's vocabulary resolves to `Calm`
/// (deliberate fallback policy, not an error).
pub fn map_to_category(modality: Modality, label: &str) -> Category {
    let label = label.to_ascii_lowercase();
    match modality {
        Modality::Voice => match label.as_str() {
            "neutral" | "calm" | "relief" | "approval" => Category::Calm,
            "curiosity" | "realization" | "admiration" | "desire" => Category::Focus,
            "nervousness" | "fear" | "anxiety" | "annoyance" | "anger" | "disgust"
            | "disapproval" | "embarrassment" => Category::Stress,
            "sadness" | "grief" | "disappointment" | "remorse" | "confusion" => Category::Fatigue,
            _ => Category::Calm,
        },
        Modality::Facial => match label.as_str() {
            "happy" => Category::Calm,
            "neutral" | "surprise" => Category::Focus,
            "angry" | "fear" | "disgust" => Category::Stress,
            "sad" => Category::Fatigue,
            _ => Category::Calm,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_voice_label_maps_to_a_category() {
        for label in VOICE_VOCABULARY {
            let category = map_to_category(Modality::Voice, label);
            assert!(Category::ALL.contains(&category), "{label} unmapped");
        }
    }

    #[test]
    fn every_facial_label_maps_to_a_category() {
        assert_eq!(map_to_category(Modality::Facial, "happy"), Category::Calm);
        assert_eq!(map_to_category(Modality::Facial, "neutral"), Category::Focus);
        assert_eq!(map_to_category(Modality::Facial, "surprise"), Category::Focus);
        assert_eq!(map_to_category(Modality::Facial, "sad"), Category::Fatigue);
        assert_eq!(map_to_category(Modality::Facial, "angry"), Category::Stress);
        assert_eq!(map_to_category(Modality::Facial, "fear"), Category::Stress);
        assert_eq!(map_to_category(Modality::Facial, "disgust"), Category::Stress);
    }

    #[test]
    fn mapping_is_case_insensitive() {
        assert_eq!(map_to_category(Modality::Voice, "SADNESS"), Category::Fatigue);
        assert_eq!(map_to_category(Modality::Facial, "Happy"), Category::Calm);
    }

    #[test]
    fn unknown_labels_fall_back_to_calm() {
        assert_eq!(map_to_category(Modality::Voice, "euphoria"), Category::Calm);
        assert_eq!(map_to_category(Modality::Facial, ""), Category::Calm);
    }
}
