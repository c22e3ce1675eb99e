// src/item.rs
// Data model for ranked articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// User preference signal for an article title.
/// Wire format is the integer the UI has always sent: -1, 0, 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Negative,
    Neutral,
    Positive,
}

impl Label {
    pub fn as_i8(self) -> i8 {
        match self {
            Label::Negative => -1,
            Label::Neutral => 0,
            Label::Positive => 1,
        }
    }

    /// Strict mapping from the wire integer. Anything outside {-1, 0, 1}
    /// is rejected by the caller as `InvalidLabel`.
    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            -1 => Some(Label::Negative),
            0 => Some(Label::Neutral),
            1 => Some(Label::Positive),
            _ => None,
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = i64::deserialize(deserializer)?;
        Label::from_i64(v).ok_or_else(|| serde::de::Error::custom("label must be -1, 0 or 1"))
    }
}

/// One ingested article, tracked through labeling and ranking.
///
/// `title` is the dedup key (exact, case-sensitive match — titles differing
/// by whitespace or case are distinct items; accepted limitation).
/// `normalized_title` feeds the classifier and may equal `title`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub normalized_title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Set only by explicit user feedback; overwritable, never auto-cleared.
    pub label: Option<Label>,
    /// Derived 0–100 relevance estimate; absent until a model could be trained.
    pub score: Option<f64>,
    /// Times this item was delivered by the serving query.
    pub exposure_count: u32,
}

impl Item {
    /// Serving-query eligibility: unlabeled, neutral, or negative.
    pub fn is_unresolved(&self) -> bool {
        matches!(self.label, None | Some(Label::Neutral) | Some(Label::Negative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_wire_mapping_roundtrips() {
        for (v, l) in [
            (-1, Label::Negative),
            (0, Label::Neutral),
            (1, Label::Positive),
        ] {
            assert_eq!(Label::from_i64(v), Some(l));
            assert_eq!(l.as_i8() as i64, v);
        }
        assert_eq!(Label::from_i64(2), None);
        assert_eq!(Label::from_i64(-5), None);
    }

    #[test]
    fn label_serializes_as_integer() {
        let s = serde_json::to_string(&Label::Negative).unwrap();
        assert_eq!(s, "-1");
        let l: Label = serde_json::from_str("1").unwrap();
        assert_eq!(l, Label::Positive);
        assert!(serde_json::from_str::<Label>("7").is_err());
    }
}
