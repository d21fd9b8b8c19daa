//! Travel personality archetypes derived from the onboarding answers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed archetypes a user is classified into.
///
/// Decoding is lenient: any unknown code deserializes as [`PersonalityId::Fw`]
/// instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PersonalityId {
    #[serde(rename = "ME")]
    Me,
    #[serde(rename = "PE")]
    Pe,
    #[serde(rename = "RT")]
    Rt,
    #[default]
    #[serde(rename = "FW")]
    #[serde(other)]
    Fw,
}

pub const ALL_PERSONALITIES: [PersonalityId; 4] = [
    PersonalityId::Me,
    PersonalityId::Pe,
    PersonalityId::Rt,
    PersonalityId::Fw,
];

impl PersonalityId {
    /// Classify the three onboarding answers.
    ///
    /// `plan && place` is always ME. With exactly one of `place`/`plan`, the
    /// `journey` answer decides between PE and RT. Anything else is FW.
    pub fn classify(journey: bool, place: bool, plan: bool) -> Self {
        match (journey, place, plan) {
            (_, true, true) => PersonalityId::Me,
            (true, true, false) | (true, false, true) => PersonalityId::Pe,
            (false, true, false) | (false, false, true) => PersonalityId::Rt,
            _ => PersonalityId::Fw,
        }
    }

    /// Wire code (`ME`, `PE`, `RT`, `FW`).
    pub fn code(&self) -> &'static str {
        match self {
            PersonalityId::Me => "ME",
            PersonalityId::Pe => "PE",
            PersonalityId::Rt => "RT",
            PersonalityId::Fw => "FW",
        }
    }

    /// Lenient decode from a wire code; unknown codes fall back to FW.
    pub fn from_code(code: &str) -> Self {
        ALL_PERSONALITIES
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code.trim()))
            .unwrap_or_default()
    }

    /// Lenient decode from a display title, as cached in preferences.
    pub fn from_title(title: &str) -> Self {
        ALL_PERSONALITIES
            .into_iter()
            .find(|p| p.title() == title.trim())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &'static str {
        match self {
            PersonalityId::Me => "꼼꼼한 탐험가",
            PersonalityId::Pe => "열정왕 탐험가",
            PersonalityId::Rt => "낭만적인 여행자",
            PersonalityId::Fw => "자유로운 방랑자",
        }
    }

    /// Profile image used when the user keeps the default profile.
    pub fn default_image_path(&self) -> &'static str {
        match self {
            PersonalityId::Me => "profile/default_me.png",
            PersonalityId::Pe => "profile/default_pe.png",
            PersonalityId::Rt => "profile/default_rt.png",
            PersonalityId::Fw => "profile/default_fw.png",
        }
    }
}

impl fmt::Display for PersonalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_meticulous() {
        assert_eq!(PersonalityId::classify(true, true, true), PersonalityId::Me);
        assert_eq!(PersonalityId::classify(false, true, true), PersonalityId::Me);
    }

    #[test]
    fn test_classify_passionate() {
        assert_eq!(PersonalityId::classify(true, false, true), PersonalityId::Pe);
        assert_eq!(PersonalityId::classify(true, true, false), PersonalityId::Pe);
    }

    #[test]
    fn test_classify_romantic() {
        assert_eq!(PersonalityId::classify(false, false, true), PersonalityId::Rt);
        assert_eq!(PersonalityId::classify(false, true, false), PersonalityId::Rt);
    }

    #[test]
    fn test_classify_free_wanderer() {
        assert_eq!(PersonalityId::classify(false, false, false), PersonalityId::Fw);
        assert_eq!(PersonalityId::classify(true, false, false), PersonalityId::Fw);
    }

    #[test]
    fn test_lenient_deserialize() {
        let p: PersonalityId = serde_json::from_str("\"RT\"").unwrap();
        assert_eq!(p, PersonalityId::Rt);

        let p: PersonalityId = serde_json::from_str("\"XX\"").unwrap();
        assert_eq!(p, PersonalityId::Fw);
    }

    #[test]
    fn test_from_title_roundtrip_and_fallback() {
        for p in ALL_PERSONALITIES {
            assert_eq!(PersonalityId::from_title(p.title()), p);
        }
        assert_eq!(PersonalityId::from_title(""), PersonalityId::Fw);
        assert_eq!(PersonalityId::from_code("pe"), PersonalityId::Pe);
        assert_eq!(PersonalityId::from_code("??"), PersonalityId::Fw);
    }
}
