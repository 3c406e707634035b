//! TF-IDF based ranking.
//!
//! The matrix follows the usual text-mining defaults: tokens are lowercased runs of at least two word characters,
//! term frequencies are raw counts, idf is smoothed (`ln((1 + n) / (1 + df)) + 1`) and rows are L2-normalised.
//! The cosine similarity of a text against a document is then the dot product of their normalised vectors.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};
use regex::Regex;

use crate::error::Error;
use crate::extraction::LemmaTokens;
use crate::parallel;

use super::Ranking;

const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse vector, term index to weight.
type SparseVec = HashMap<usize, f64>;

pub struct TfIdfMatrix {
    token_pattern: Regex,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVec>,
}

impl TfIdfMatrix {
    /// Learn vocabulary and idf from `documents` and compute their TF-IDF vectors.
    pub fn fit<I, S>(documents: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let token_pattern = Regex::new(TOKEN_PATTERN)?;

        let counts: Vec<HashMap<String, usize>> = documents
            .into_iter()
            .map(|doc| term_counts(&token_pattern, doc.as_ref()))
            .collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_default() += 1;
            }
        }

        let n = counts.len() as f64;
        let vocabulary: HashMap<String, usize> = df
            .keys()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();
        let idf: Vec<f64> = df
            .values()
            .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let mut matrix = Self {
            token_pattern,
            vocabulary,
            idf,
            rows: Vec::with_capacity(counts.len()),
        };
        let rows: Vec<SparseVec> = counts.iter().map(|doc| matrix.vectorize(doc)).collect();
        matrix.rows = rows;

        info!(
            "TF-IDF matrix: {} documents, {} terms",
            matrix.rows.len(),
            matrix.vocabulary.len()
        );
        Ok(matrix)
    }

    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Normalised TF-IDF vector of terms counts. Out-of-vocabulary terms are ignored.
    fn vectorize(&self, counts: &HashMap<String, usize>) -> SparseVec {
        let mut vector: SparseVec = counts
            .iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(term)
                    .map(|idx| (*idx, *count as f64 * self.idf[*idx]))
            })
            .collect();

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in vector.values_mut() {
                *w /= norm;
            }
        }
        vector
    }

    /// TF-IDF vector of an arbitrary text.
    pub fn transform(&self, text: &str) -> HashMap<usize, f64> {
        self.vectorize(&term_counts(&self.token_pattern, text))
    }

    /// Cosine similarity of `text` against every document, in document order.
    pub fn similarity_scores(&self, text: &str) -> Vec<f64> {
        let query = self.transform(text);
        self.rows
            .iter()
            .map(|row| {
                query
                    .iter()
                    .filter_map(|(idx, w)| row.get(idx).map(|r| r * w))
                    .sum()
            })
            .collect()
    }
}

fn term_counts(token_pattern: &Regex, text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for m in token_pattern.find_iter(&text.to_lowercase()) {
        *counts.entry(m.as_str().to_string()).or_default() += 1;
    }
    counts
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Ranks lemmas by the similarity of their tokens against the corpus.
pub struct TfIdfRanking<'a> {
    matrix: &'a TfIdfMatrix,
    verbs: &'a LemmaTokens,
}

impl<'a> TfIdfRanking<'a> {
    pub fn new(matrix: &'a TfIdfMatrix, verbs: &'a LemmaTokens) -> Self {
        Self { matrix, verbs }
    }

    /// Average of the non-zero similarities of all tokens,
    /// and average of the per-token standard deviations.
    fn score_lemma(&self, tokens: &BTreeSet<String>) -> (f64, f64) {
        let mut tf_idfs = Vec::new();
        let mut st_devs = Vec::with_capacity(tokens.len());

        for token in tokens {
            let scores = self.matrix.similarity_scores(token);
            debug!("Average TF/IDF score for '{}': {}", token, mean(&scores));
            tf_idfs.extend(scores.iter().copied().filter(|s| *s != 0.0));
            st_devs.push(std_dev(&scores));
        }

        (mean(&tf_idfs), mean(&st_devs))
    }

    /// TF-IDF and standard deviation rankings.
    pub fn find_ranking(&self, processes: usize) -> Result<(Ranking, Ranking), Error> {
        let pool = parallel::pool(processes)?;
        let lemmas: Vec<(&String, &BTreeSet<String>)> = self.verbs.iter().collect();

        let scores = parallel::map(pool.as_ref(), lemmas, |(lemma, tokens)| {
            let (tf_idf, st_dev) = self.score_lemma(tokens);
            (lemma.clone(), tf_idf, st_dev)
        });

        let tf_idf = Ranking::from_scores(scores.iter().map(|(l, t, _)| (l.clone(), *t)));
        let st_dev = Ranking::from_scores(scores.into_iter().map(|(l, _, s)| (l, s)));
        Ok((tf_idf, st_dev))
    }
}
