// src/scoring.rs
// Maps a classifier's class-probability output onto the 0–100 relevance
// scale. Each observed class carries a fixed anchor (-1 → 0, 0 → 50,
// 1 → 100); the score is the probability-weighted mix of the anchors for
// the class subset the model actually saw. Partial label coverage therefore
// degrades toward neutral instead of producing extreme scores from sparse
// evidence.

use crate::classifier::TrainedModel;
use crate::item::Label;

/// Fallback when no model is available or the class configuration is not in
/// the lookup table.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Explicit weight vector for each supported class-subset configuration of
/// {-1, 0, 1}, keyed by the model's ascending class list. Single-class
/// configurations (and anything else unexpected) are deliberately absent:
/// they fall back to neutral.
pub fn class_weights(classes: &[Label]) -> Option<&'static [f64]> {
    use Label::{Negative, Neutral, Positive};
    match classes {
        [Negative, Positive] => Some(&[0.0, 100.0]),
        [Neutral, Positive] => Some(&[50.0, 100.0]),
        [Negative, Neutral] => Some(&[0.0, 50.0]),
        [Negative, Neutral, Positive] => Some(&[0.0, 50.0, 100.0]),
        _ => None,
    }
}

/// Pure mapping from a probability vector (ordered like `classes`) to the
/// bounded score. Rounded to two decimals.
pub fn map_probabilities(classes: &[Label], probs: &[f64]) -> f64 {
    let Some(weights) = class_weights(classes) else {
        return NEUTRAL_SCORE;
    };
    if weights.len() != probs.len() {
        return NEUTRAL_SCORE;
    }
    let raw: f64 = probs.iter().zip(weights).map(|(p, w)| p * w).sum();
    round2(raw.clamp(0.0, 100.0))
}

/// Score one title under a trained model.
pub fn score(title: &str, model: &TrainedModel) -> f64 {
    map_probabilities(model.classes(), &model.predict_proba(title))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Negative, Neutral, Positive};

    #[test]
    fn neutral_positive_mix_matches_anchor_math() {
        // P(0)=0.3, P(1)=0.7 → 100·0.7 + 50·0.3 = 85.0
        let s = map_probabilities(&[Neutral, Positive], &[0.3, 0.7]);
        assert_eq!(s, 85.0);
    }

    #[test]
    fn all_supported_subsets_have_weights() {
        assert_eq!(class_weights(&[Negative, Positive]), Some(&[0.0, 100.0][..]));
        assert_eq!(class_weights(&[Neutral, Positive]), Some(&[50.0, 100.0][..]));
        assert_eq!(class_weights(&[Negative, Neutral]), Some(&[0.0, 50.0][..]));
        assert_eq!(
            class_weights(&[Negative, Neutral, Positive]),
            Some(&[0.0, 50.0, 100.0][..])
        );
    }

    #[test]
    fn degenerate_configurations_fall_back_to_neutral() {
        assert_eq!(map_probabilities(&[Positive], &[1.0]), NEUTRAL_SCORE);
        assert_eq!(map_probabilities(&[Negative], &[1.0]), NEUTRAL_SCORE);
        assert_eq!(map_probabilities(&[], &[]), NEUTRAL_SCORE);
        // Length mismatch between classes and probabilities.
        assert_eq!(
            map_probabilities(&[Negative, Positive], &[1.0]),
            NEUTRAL_SCORE
        );
    }

    #[test]
    fn scores_stay_in_bounds() {
        assert_eq!(map_probabilities(&[Negative, Positive], &[0.0, 1.0]), 100.0);
        assert_eq!(map_probabilities(&[Negative, Positive], &[1.0, 0.0]), 0.0);
        assert_eq!(
            map_probabilities(&[Negative, Neutral], &[0.0, 1.0]),
            NEUTRAL_SCORE
        );
        let mid = map_probabilities(&[Negative, Neutral, Positive], &[0.2, 0.5, 0.3]);
        assert!((0.0..=100.0).contains(&mid));
        assert_eq!(mid, 55.0);
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let s = map_probabilities(&[Negative, Positive], &[1.0 / 3.0, 2.0 / 3.0]);
        assert_eq!(s, 66.67);
    }
}
