use serde::{Deserialize, Serialize};
use std::fmt;

/// Personality model identifier stored on every profile.
pub const MODEL_TYPE_BIG_FIVE: &str = "BigFive";

/// The five traits of the Big Five model. Serialized by exact name —
/// the analysis contract with the LLM is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "Openness",
            BigFiveTrait::Conscientiousness => "Conscientiousness",
            BigFiveTrait::Extraversion => "Extraversion",
            BigFiveTrait::Agreeableness => "Agreeableness",
            BigFiveTrait::Neuroticism => "Neuroticism",
        }
    }

    /// Case-sensitive lookup by the exact trait name the LLM is instructed to emit.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for BigFiveTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scored trait from a completed analysis. Produced only by the
/// response parser; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitScore {
    #[serde(rename = "trait")]
    pub trait_name: BigFiveTrait,
    /// 0 = extremely low, 100 = extremely high on the trait.
    pub score: u8,
    pub insights: String,
}

/// The stored result of one successful analysis: all five trait scores
/// plus a narrative summary. Keyed by candidate, overwrite on re-analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub candidate_id: String,
    pub model_type: String,
    pub traits: Vec<TraitScore>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(
            BigFiveTrait::from_name("Openness"),
            Some(BigFiveTrait::Openness)
        );
        assert_eq!(BigFiveTrait::from_name("openness"), None);
        assert_eq!(BigFiveTrait::from_name("Charisma"), None);
    }

    #[test]
    fn test_trait_score_serializes_with_trait_key() {
        let ts = TraitScore {
            trait_name: BigFiveTrait::Neuroticism,
            score: 42,
            insights: "steady under pressure".to_string(),
        };
        let json = serde_json::to_value(&ts).unwrap();
        assert_eq!(json["trait"], "Neuroticism");
        assert_eq!(json["score"], 42);
    }
}
