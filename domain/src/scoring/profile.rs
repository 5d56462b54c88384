//! Maturity profile bands

use serde::{Deserialize, Serialize};

/// Overall maturity profile derived from the global score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "Débutant")]
    Beginner,
    #[serde(rename = "Émergent")]
    Emerging,
    Challenger,
    Leader,
}

/// Lower bound (inclusive) of each band, checked from the top band down.
const BANDS: [(f64, Profile); 4] = [
    (76.0, Profile::Leader),
    (51.0, Profile::Challenger),
    (26.0, Profile::Emerging),
    (0.0, Profile::Beginner),
];

impl Profile {
    /// Classify a global score in `0..=100`.
    pub fn from_global_score(global_score: f64) -> Self {
        BANDS
            .iter()
            .find(|(min, _)| global_score >= *min)
            .map(|(_, profile)| *profile)
            .unwrap_or(Profile::Beginner)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Beginner => "Débutant",
            Profile::Emerging => "Émergent",
            Profile::Challenger => "Challenger",
            Profile::Leader => "Leader",
        }
    }

    /// Level 1..=4, also the target tier for gap analysis.
    pub fn level(&self) -> u8 {
        match self {
            Profile::Beginner => 1,
            Profile::Emerging => 2,
            Profile::Challenger => 3,
            Profile::Leader => 4,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Profile::from_global_score(0.0), Profile::Beginner);
        assert_eq!(Profile::from_global_score(25.0), Profile::Beginner);
        assert_eq!(Profile::from_global_score(25.99), Profile::Beginner);
        assert_eq!(Profile::from_global_score(26.0), Profile::Emerging);
        assert_eq!(Profile::from_global_score(50.0), Profile::Emerging);
        assert_eq!(Profile::from_global_score(51.0), Profile::Challenger);
        assert_eq!(Profile::from_global_score(75.99), Profile::Challenger);
        assert_eq!(Profile::from_global_score(76.0), Profile::Leader);
        assert_eq!(Profile::from_global_score(100.0), Profile::Leader);
    }

    #[test]
    fn test_negative_score_is_beginner() {
        assert_eq!(Profile::from_global_score(-1.0), Profile::Beginner);
    }

    #[test]
    fn test_levels_and_names() {
        assert_eq!(Profile::Leader.level(), 4);
        assert_eq!(Profile::Emerging.name(), "Émergent");
        assert_eq!(
            serde_json::to_string(&Profile::Beginner).unwrap(),
            "\"Débutant\""
        );
    }
}
