//! Wish classification labels.

use std::fmt;
use std::str::FromStr;

use crate::LabelError;

/// What kind of thing the user is wishing for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WishType {
    Material,
    Feeling,
    Achieve,
    Unknown,
}

/// Emotional tone of the wish text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl WishType {
    /// Label as persisted in the `wish_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Feeling => "Feeling",
            Self::Achieve => "Achieve",
            Self::Unknown => crate::UNKNOWN_LABEL,
        }
    }
}

impl Sentiment {
    /// Label as persisted in the `sentiment` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Unknown => crate::UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for WishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Material" => Ok(Self::Material),
            "Feeling" => Ok(Self::Feeling),
            "Achieve" => Ok(Self::Achieve),
            "Unknown" => Ok(Self::Unknown),
            other => Err(LabelError {
                kind: "wish_type",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for Sentiment {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Positive" => Ok(Self::Positive),
            "Negative" => Ok(Self::Negative),
            // Older model schemas emitted this spelling.
            "Neutral" | "Nutural" => Ok(Self::Neutral),
            "Unknown" => Ok(Self::Unknown),
            other => Err(LabelError {
                kind: "sentiment",
                value: other.to_string(),
            }),
        }
    }
}

/// A (wish_type, sentiment) pair.
///
/// Either both labels are known, or both are `Unknown`. Use
/// [`Classification::new`] to enforce this when building from untrusted
/// parts; a half-known pair collapses to [`Classification::unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub wish_type: WishType,
    pub sentiment: Sentiment,
}

impl Classification {
    /// Build a pair, collapsing to Unknown/Unknown if either side is unknown.
    pub fn new(wish_type: WishType, sentiment: Sentiment) -> Self {
        let candidate = Self {
            wish_type,
            sentiment,
        };
        if candidate.is_complete() {
            candidate
        } else {
            Self::unknown()
        }
    }

    /// The Unknown/Unknown pair stored when classification is skipped or fails.
    pub const fn unknown() -> Self {
        Self {
            wish_type: WishType::Unknown,
            sentiment: Sentiment::Unknown,
        }
    }

    /// True when both labels carry a real classification.
    pub fn is_complete(&self) -> bool {
        self.wish_type != WishType::Unknown && self.sentiment != Sentiment::Unknown
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_and_print() {
        for wish in [WishType::Material, WishType::Feeling, WishType::Achieve, WishType::Unknown] {
            assert_eq!(wish.as_str().parse::<WishType>().expect("parse"), wish);
        }
        for sentiment in [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Unknown,
        ] {
            assert_eq!(sentiment.to_string().parse::<Sentiment>().expect("parse"), sentiment);
        }
    }

    #[test]
    fn test_legacy_neutral_spelling() {
        assert_eq!("Nutural".parse::<Sentiment>().expect("parse"), Sentiment::Neutral);
    }

    #[test]
    fn test_unrecognised_label() {
        let err = "Spiritual".parse::<WishType>().expect_err("should reject");
        assert_eq!(err.kind, "wish_type");
        assert_eq!(err.value, "Spiritual");
    }

    #[test]
    fn test_half_known_pair_collapses() {
        let pair = Classification::new(WishType::Material, Sentiment::Unknown);
        assert_eq!(pair, Classification::unknown());

        let pair = Classification::new(WishType::Unknown, Sentiment::Positive);
        assert_eq!(pair, Classification::unknown());
    }

    #[test]
    fn test_complete_pair_kept() {
        let pair = Classification::new(WishType::Achieve, Sentiment::Positive);
        assert!(pair.is_complete());
        assert_eq!(pair.wish_type, WishType::Achieve);
        assert_eq!(pair.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_default_is_unknown() {
        assert!(!Classification::default().is_complete());
    }
}
