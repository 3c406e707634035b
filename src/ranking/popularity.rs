//! Popularity ranking: how often the tokens of a lemma occur in the corpus.
use std::collections::HashMap;

use crate::error::Error;
use crate::extraction::LemmaTokens;
use crate::parallel;

use super::Ranking;

/// Documents scored per parallel task.
const BULK_SIZE: usize = 100;

pub struct PopularityRanking<'a> {
    documents: &'a [String],
    verbs: &'a LemmaTokens,
}

impl<'a> PopularityRanking<'a> {
    pub fn new(documents: &'a [String], verbs: &'a LemmaTokens) -> Self {
        Self { documents, verbs }
    }

    /// Count the non-overlapping occurrences of each lemma's tokens in the lowercased documents.
    fn score_from_text(&self, documents: &[String]) -> HashMap<&'a str, usize> {
        let mut scores = HashMap::new();
        for doc in documents {
            let text = doc.to_lowercase();
            for (lemma, tokens) in self.verbs {
                let count: usize = tokens
                    .iter()
                    .filter(|t| !t.is_empty())
                    .map(|t| text.matches(t.as_str()).count())
                    .sum();
                *scores.entry(lemma.as_str()).or_default() += count;
            }
        }
        scores
    }

    /// Every lemma is ranked, lemmas that never occur score 0.
    /// With `normalize`, scores are divided by the top one.
    pub fn find_ranking(&self, processes: usize, normalize: bool) -> Result<Ranking, Error> {
        let pool = parallel::pool(processes)?;
        let bulks: Vec<&[String]> = self.documents.chunks(BULK_SIZE).collect();

        let mut ranking: HashMap<&str, usize> =
            self.verbs.lemmas().map(|lemma| (lemma.as_str(), 0)).collect();
        for scores in parallel::map(pool.as_ref(), bulks, |bulk| self.score_from_text(bulk)) {
            for (lemma, score) in scores {
                *ranking.entry(lemma).or_default() += score;
            }
        }

        let ranking = Ranking::from_scores(
            ranking
                .into_iter()
                .map(|(lemma, score)| (lemma.to_string(), score as f64)),
        );

        if normalize {
            Ok(ranking.normalized())
        } else {
            Ok(ranking)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn verbs() -> LemmaTokens {
        serde_json::from_value(json!({
            "bear": ["born"],
            "die": ["died", "dies"],
            "fly": ["flew"]
        }))
        .unwrap()
    }

    #[test]
    fn raw_counts() {
        let docs = vec![
            "Born in Rome, she died in Paris.".to_string(),
            "He was born and he died. Nobody dies twice.".to_string(),
        ];
        let verbs = verbs();
        let r = PopularityRanking::new(&docs, &verbs)
            .find_ranking(0, false)
            .unwrap();

        assert_eq!(r.get("die"), Some(3.0));
        assert_eq!(r.get("bear"), Some(2.0));
        assert_eq!(r.get("fly"), Some(0.0));
    }

    #[test]
    fn normalized_over_bulks() {
        // more documents than a single bulk
        let docs: Vec<String> = (0..250)
            .map(|i| {
                if i % 2 == 0 {
                    "she died".to_string()
                } else {
                    "he was born".to_string()
                }
            })
            .collect();
        let verbs = verbs();

        let r = PopularityRanking::new(&docs, &verbs)
            .find_ranking(3, true)
            .unwrap();
        assert_eq!(r.get("die"), Some(1.0));
        assert_eq!(r.get("bear"), Some(1.0));
        assert_eq!(r.iter().next().unwrap().0, "bear");
        assert_eq!(r.get("fly"), Some(0.0));
    }

    #[test]
    fn empty_corpus() {
        let verbs = verbs();
        let r = PopularityRanking::new(&[], &verbs)
            .find_ranking(0, true)
            .unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.iter().all(|(_, s)| s == 0.0));
    }
}
