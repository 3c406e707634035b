/*! Verb ranking.

Ranks the verbal lemmas of a POS-tagged corpus, in order to pick the lexical units worth extracting sentences for.

- [verbs::produce_lemma_tokens] collects the verbal lemmas along with their surface tokens,
- [tfidf::TfIdfRanking] scores lemmas by the TF-IDF similarity of their tokens against the corpus documents,
  along with the standard deviation of those similarities,
- [popularity::PopularityRanking] scores lemmas by raw frequency of their tokens,
- [harmonic] combines rankings into a final one.
!*/
pub mod popularity;
pub mod tfidf;
pub mod verbs;

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use popularity::PopularityRanking;
pub use tfidf::{TfIdfMatrix, TfIdfRanking};
pub use verbs::produce_lemma_tokens;

/// Lemmas sorted by descending score, ties broken by ascending lemma.
///
/// Serializes as a JSON object keeping the rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Ranking {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut entries: Vec<(String, f64)> = scores.into_iter().collect();
        entries.sort_by(|(lemma_a, a), (lemma_b, b)| {
            b.partial_cmp(a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| lemma_a.cmp(lemma_b))
        });

        let index = entries
            .iter()
            .enumerate()
            .map(|(idx, (lemma, _))| (lemma.clone(), idx))
            .collect();

        Self { entries, index }
    }

    pub fn get(&self, lemma: &str) -> Option<f64> {
        self.index.get(lemma).map(|idx| self.entries[*idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(lemma, score)| (lemma.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Divide every score by the top one.
    ///
    /// Left untouched when the top score is 0.
    pub fn normalized(mut self) -> Self {
        let max = match self.entries.first() {
            Some((_, max)) if *max != 0.0 => *max,
            _ => return self,
        };

        for (_, score) in self.entries.iter_mut() {
            *score /= max;
        }
        self
    }
}

impl Serialize for Ranking {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (lemma, score) in &self.entries {
            map.serialize_entry(lemma, score)?;
        }
        map.end()
    }
}

/// Harmonic combination of rankings: `n * product(scores) / (1 + sum(scores))`.
///
/// Lemmas are the ones of the first ranking, a lemma missing from another ranking scores 0 there.
pub fn harmonic(rankings: &[&Ranking]) -> Ranking {
    let first = match rankings.first() {
        Some(first) => first,
        None => return Ranking::default(),
    };

    let n = rankings.len() as f64;
    Ranking::from_scores(first.iter().map(|(lemma, _)| {
        let scores: Vec<f64> = rankings
            .iter()
            .map(|r| r.get(lemma).unwrap_or(0.0))
            .collect();
        let product: f64 = scores.iter().product();
        let sum: f64 = scores.iter().sum();
        (lemma.to_string(), n * product / (1.0 + sum))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(scores: &[(&str, f64)]) -> Ranking {
        Ranking::from_scores(scores.iter().map(|(l, s)| (l.to_string(), *s)))
    }

    #[test]
    fn sorted_with_ties() {
        let r = ranking(&[("b", 1.0), ("c", 2.0), ("a", 1.0)]);
        let lemmas: Vec<&str> = r.iter().map(|(l, _)| l).collect();
        assert_eq!(lemmas, vec!["c", "a", "b"]);
        assert_eq!(r.get("a"), Some(1.0));
        assert_eq!(r.get("z"), None);
    }

    #[test]
    fn normalization() {
        let r = ranking(&[("a", 4.0), ("b", 2.0)]).normalized();
        assert_eq!(r.get("a"), Some(1.0));
        assert_eq!(r.get("b"), Some(0.5));

        let zeros = ranking(&[("a", 0.0), ("b", 0.0)]).normalized();
        assert_eq!(zeros.get("a"), Some(0.0));
    }

    #[test]
    fn serialization_keeps_order() {
        let r = ranking(&[("z", 3.0), ("a", 1.0), ("m", 2.0)]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"z":3.0,"m":2.0,"a":1.0}"#);
    }

    #[test]
    fn harmonic_combination() {
        let pop = ranking(&[("a", 1.0), ("b", 0.5)]);
        let tfidf = ranking(&[("a", 0.2), ("b", 0.4)]);
        let h = harmonic(&[&pop, &tfidf]);

        let a = 2.0 * (1.0 * 0.2) / (1.0 + 1.2);
        let b = 2.0 * (0.5 * 0.4) / (1.0 + 0.9);
        assert!((h.get("a").unwrap() - a).abs() < 1e-12);
        assert!((h.get("b").unwrap() - b).abs() < 1e-12);
        assert_eq!(h.iter().next().unwrap().0, "b");
    }

    #[test]
    fn harmonic_missing_lemma() {
        let pop = ranking(&[("a", 1.0), ("b", 0.5)]);
        let tfidf = ranking(&[("a", 0.2)]);
        assert_eq!(harmonic(&[&pop, &tfidf]).get("b"), Some(0.0));
        assert!(harmonic(&[]).is_empty());
    }
}
