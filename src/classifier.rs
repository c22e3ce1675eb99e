// src/classifier.rs
// Multinomial (softmax) logistic regression over TF-IDF title features.
// Always a full retrain over the current labeled set: O(labeled items) per
// pass, which bounds staleness and stays cheap at the hundreds-of-items
// scale this service runs at. No model state survives between passes.

use ndarray::{Array1, Array2, Axis};

use crate::error::RankerError;
use crate::features::Vectorizer;
use crate::item::Label;

/// Training knobs the configuration collaborator supplies.
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    pub min_train_samples: usize,
    pub max_features: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            min_train_samples: 5,
            max_features: 500,
        }
    }
}

const EPOCHS: usize = 300;
const LEARNING_RATE: f64 = 0.5;
const L2_PENALTY: f64 = 1e-3;

/// A fitted classifier. Exposes the ordered set of classes actually observed
/// (any 2- or 3-element subset of {-1, 0, 1}, ascending) and a probability
/// distribution over them for any title.
#[derive(Debug)]
pub struct TrainedModel {
    vectorizer: Vectorizer,
    classes: Vec<Label>,
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl TrainedModel {
    /// Observed classes, ascending by their -1/0/1 value. `predict_proba`
    /// output is ordered to match.
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    pub fn predict_proba(&self, title: &str) -> Vec<f64> {
        let x = Array1::from_vec(self.vectorizer.transform(title));
        let logits = x.dot(&self.weights) + &self.bias;
        softmax(&logits).to_vec()
    }
}

/// Fit a fresh model from `(normalized_title, label)` pairs.
///
/// Fails with `InsufficientData` when fewer than `min_train_samples` labels
/// exist, or when all labels are identical — a one-class problem has no
/// decision boundary to fit, regardless of sample count.
pub fn fit(samples: &[(String, Label)], params: &FitParams) -> Result<TrainedModel, RankerError> {
    if samples.len() < params.min_train_samples {
        return Err(RankerError::InsufficientData(format!(
            "{} labeled items, need {}",
            samples.len(),
            params.min_train_samples
        )));
    }

    let mut classes: Vec<Label> = samples.iter().map(|(_, l)| *l).collect();
    classes.sort_by_key(|l| l.as_i8());
    classes.dedup();
    if classes.len() < 2 {
        return Err(RankerError::InsufficientData(
            "all labels identical, need at least 2 distinct classes".to_string(),
        ));
    }

    let docs: Vec<&str> = samples.iter().map(|(t, _)| t.as_str()).collect();
    let vectorizer = Vectorizer::fit(&docs, params.max_features);

    let n = samples.len();
    let d = vectorizer.vocab_len();
    let k = classes.len();

    let mut x = Array2::<f64>::zeros((n, d));
    let mut y = Array2::<f64>::zeros((n, k));
    for (i, (title, label)) in samples.iter().enumerate() {
        let row = vectorizer.transform(title);
        for (j, v) in row.into_iter().enumerate() {
            x[[i, j]] = v;
        }
        let c = classes.iter().position(|l| l == label).unwrap_or(0);
        y[[i, c]] = 1.0;
    }

    // Full-batch gradient descent on the cross-entropy loss with a small L2
    // penalty. Deterministic: zero init, fixed epoch count.
    let mut weights = Array2::<f64>::zeros((d, k));
    let mut bias = Array1::<f64>::zeros(k);
    let inv_n = 1.0 / n as f64;

    for _ in 0..EPOCHS {
        let mut probs = x.dot(&weights);
        probs += &bias;
        for mut row in probs.axis_iter_mut(Axis(0)) {
            let sm = softmax(&row.to_owned());
            row.assign(&sm);
        }
        let delta = &probs - &y;
        let grad_w = x.t().dot(&delta) * inv_n + &(&weights * L2_PENALTY);
        let grad_b = delta.sum_axis(Axis(0)) * inv_n;
        weights -= &(grad_w * LEARNING_RATE);
        bias -= &(grad_b * LEARNING_RATE);
    }

    Ok(TrainedModel {
        vectorizer,
        classes,
        weights,
        bias,
    })
}

fn softmax(logits: &Array1<f64>) -> Array1<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Array1<f64> = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}
