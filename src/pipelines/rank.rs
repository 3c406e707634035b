//! Verb ranking pipeline.
//!
//! 1. Verbal lemmas and corpus documents are loaded concurrently,
//! 1. lemmas are ranked by popularity, by TF-IDF and by TF-IDF standard deviation,
//! 1. the three rankings are combined into the final one.
//!
//! Every intermediate result is dumped as JSON.
use std::path::PathBuf;

use log::info;

use crate::error::Error;
use crate::io::{dump_json, CorpusReader};
use crate::lang;
use crate::ranking::{
    harmonic, produce_lemma_tokens, PopularityRanking, Ranking, TfIdfMatrix, TfIdfRanking,
};

use super::{skip_malformed, Pipeline};

/// Dump destinations.
#[derive(Debug, Clone)]
pub struct RankingDumps {
    pub verbs: PathBuf,
    pub tf_idf: PathBuf,
    pub stdev: PathBuf,
    pub popularity: PathBuf,
    pub final_ranking: PathBuf,
}

impl Default for RankingDumps {
    fn default() -> Self {
        Self {
            verbs: PathBuf::from("dev/verbs.json"),
            tf_idf: PathBuf::from("dev/tf_idf_ranking.json"),
            stdev: PathBuf::from("dev/stdev_ranking.json"),
            popularity: PathBuf::from("dev/popularity_ranking.json"),
            final_ranking: PathBuf::from("dev/verb_ranking.json"),
        }
    }
}

pub struct RankVerbs {
    pos_tagged: PathBuf,
    document_key: String,
    pos_tag_key: String,
    language: String,
    dumps: RankingDumps,
    processes: usize,
}

impl RankVerbs {
    pub fn new(
        pos_tagged: PathBuf,
        document_key: String,
        pos_tag_key: String,
        language: String,
        dumps: RankingDumps,
        processes: usize,
    ) -> Self {
        Self {
            pos_tagged,
            document_key,
            pos_tag_key,
            language,
            dumps,
            processes,
        }
    }

    /// Textual documents of the corpus.
    fn documents(&self) -> Result<Vec<String>, Error> {
        let corpus = skip_malformed(CorpusReader::from_path(&self.pos_tagged)?);
        Ok(corpus
            .filter_map(|item| item.document(&self.document_key))
            .collect())
    }
}

impl Pipeline<Ranking> for RankVerbs {
    /// Returns the final ranking.
    fn run(&self) -> Result<Ranking, Error> {
        // fail before reading anything
        lang::verbal_prefix(&self.language)?;

        let (lemma_tokens, documents) = rayon::join(
            || -> Result<_, Error> {
                let corpus = skip_malformed(CorpusReader::from_path(&self.pos_tagged)?);
                produce_lemma_tokens(corpus, &self.pos_tag_key, &self.language)
            },
            || self.documents(),
        );
        let (lemma_tokens, documents) = (lemma_tokens?, documents?);
        info!(
            "{} verbal lemmas, {} documents",
            lemma_tokens.len(),
            documents.len()
        );

        let popularity =
            PopularityRanking::new(&documents, &lemma_tokens).find_ranking(self.processes, true)?;

        let matrix = TfIdfMatrix::fit(&documents)?;
        let (tf_idf, stdev) =
            TfIdfRanking::new(&matrix, &lemma_tokens).find_ranking(self.processes)?;

        let final_ranking = harmonic(&[&popularity, &tf_idf, &stdev]);

        dump_json(&tf_idf, &self.dumps.tf_idf)?;
        dump_json(&stdev, &self.dumps.stdev)?;
        dump_json(&popularity, &self.dumps.popularity)?;
        dump_json(&lemma_tokens, &self.dumps.verbs)?;
        dump_json(&final_ranking, &self.dumps.final_ranking)?;

        Ok(final_ranking)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;

    use super::*;
    use crate::io::reader::load_json;

    fn dumps(dir: &std::path::Path) -> RankingDumps {
        RankingDumps {
            verbs: dir.join("verbs.json"),
            tf_idf: dir.join("tf_idf.json"),
            stdev: dir.join("stdev.json"),
            popularity: dir.join("popularity.json"),
            final_ranking: dir.join("final.json"),
        }
    }

    #[test]
    fn rank_and_dump() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("tagged.jsonl");
        fs::write(
            &corpus,
            concat!(
                r#"{"bio": "She was born in Rome. She died in Paris.", "pos_tag": [["She", "PP", "she"], ["was", "VBD", "be"], ["born", "VVN", "bear"], ["died", "VVD", "die"]]}"#,
                "\n",
                r#"{"bio": "He was born in a village.", "pos_tag": [["was", "VBD", "be"], ["born", "VVN", "bear"]]}"#,
                "\n",
            ),
        )
        .unwrap();

        let dumps = dumps(dir.path());
        let ranking = RankVerbs::new(
            corpus,
            "bio".to_string(),
            "pos_tag".to_string(),
            "en".to_string(),
            dumps.clone(),
            0,
        )
        .run()
        .unwrap();

        assert_eq!(ranking.len(), 3);

        let verbs: Value = load_json(&dumps.verbs).unwrap();
        assert_eq!(verbs["bear"], serde_json::json!(["born"]));

        let popularity: Value = load_json(&dumps.popularity).unwrap();
        assert_eq!(popularity["bear"], 1.0);
        assert_eq!(popularity["die"], 0.5);

        let final_ranking: Value = load_json(&dumps.final_ranking).unwrap();
        assert_eq!(final_ranking.as_object().unwrap().len(), 3);
        assert!(dumps.tf_idf.exists());
        assert!(dumps.stdev.exists());
    }

    #[test]
    fn unsupported_language() {
        let dir = tempfile::tempdir().unwrap();
        let dumps = dumps(dir.path());
        let res = RankVerbs::new(
            dir.path().join("missing.jsonl"),
            "bio".to_string(),
            "pos_tag".to_string(),
            "xx".to_string(),
            dumps.clone(),
            0,
        )
        .run();

        assert!(matches!(res, Err(Error::UnsupportedLanguage(_))));
        assert!(!dumps.final_ranking.exists());
    }
}
