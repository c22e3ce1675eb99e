// src/features.rs
// Sparse-ish bag-of-words features for article titles: lowercase alphanumeric
// tokens, English stop-word removal, TF-IDF weighting with a bounded
// vocabulary. Titles are short, so dense vectors are fine at this scale.

use std::collections::{HashMap, HashSet};

/// English stop words dropped before vectorization. Sorted so membership is
/// a binary search.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your", "yours",
];

fn is_stop_word(tok: &str) -> bool {
    STOP_WORDS.binary_search(&tok).is_ok()
}

/// Alphanumeric tokens, lower-cased, stop words removed.
pub fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !is_stop_word(t))
}

/// TF-IDF vectorizer fitted on a training corpus. Vocabulary is capped at
/// `max_features` terms, ranked by total corpus frequency (ties broken
/// alphabetically so fits are deterministic).
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocab: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vectorizer {
    pub fn fit(docs: &[&str], max_features: usize) -> Self {
        let n_docs = docs.len();

        // Corpus term frequency (for the vocabulary cap) and document
        // frequency (for idf).
        let mut corpus_tf: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            let mut seen: HashSet<String> = HashSet::new();
            for tok in tokenize(doc) {
                *corpus_tf.entry(tok.clone()).or_insert(0) += 1;
                seen.insert(tok);
            }
            for tok in seen {
                *doc_freq.entry(tok).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = corpus_tf.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut vocab: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        vocab.sort();

        let index: HashMap<String, usize> = vocab
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1, never zero or negative.
        let idf: Vec<f64> = vocab
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0);
                ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        Self { vocab, index, idf }
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// TF-IDF vector for one document, L2-normalized. Out-of-vocabulary
    /// tokens are dropped; an all-unknown document maps to the zero vector.
    pub fn transform(&self, doc: &str) -> Vec<f64> {
        let mut v = vec![0.0; self.vocab.len()];
        for tok in tokenize(doc) {
            if let Some(&i) = self.index.get(&tok) {
                v[i] += 1.0;
            }
        }
        for (i, x) in v.iter_mut().enumerate() {
            *x *= self.idf[i];
        }
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_word_list_is_sorted() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS, "binary search needs a sorted list");
    }

    #[test]
    fn tokenize_lowercases_and_drops_stop_words() {
        let toks: Vec<String> = tokenize("The Fed Raises Rates, and markets react").collect();
        assert_eq!(toks, vec!["fed", "raises", "rates", "markets", "react"]);
    }

    #[test]
    fn vocab_cap_keeps_most_frequent_terms() {
        let docs = [
            "rust rust rust tokio",
            "rust tokio async",
            "gossip once",
        ];
        let v = Vectorizer::fit(&docs, 2);
        assert_eq!(v.vocab_len(), 2);
        // "rust" (4) and "tokio" (2) outrank "async"/"gossip"/"once" (1 each).
        assert!(v.index.contains_key("rust"));
        assert!(v.index.contains_key("tokio"));
    }

    #[test]
    fn transform_is_l2_normalized_and_zero_on_unknown() {
        let docs = ["alpha beta", "beta gamma"];
        let v = Vectorizer::fit(&docs, 500);
        let x = v.transform("alpha beta beta");
        let norm: f64 = x.iter().map(|a| a * a).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);

        let zero = v.transform("completely unknown words");
        assert!(zero.iter().all(|&a| a == 0.0));
    }

    #[test]
    fn rarer_terms_get_higher_idf_weight() {
        let docs = ["shared unique1", "shared unique2", "shared unique3"];
        let v = Vectorizer::fit(&docs, 500);
        let shared = v.index["shared"];
        let rare = v.index["unique1"];
        assert!(v.idf[rare] > v.idf[shared]);
    }
}
