//! Syntactic extraction strategy.
//!
//! Sentences are parsed and split into their lowest clauses,
//! only clauses holding exactly one matching verb are kept.
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, error};

use crate::error::Error;
use crate::nlp::{ConstituencyParser, SentenceSplitter};

use super::{
    url_and_document, CorpusItem, Extract, ExtractorSettings, LemmaTokens, Sentence, Toolkit,
    VERB_PREFIX,
};

/// Clause label in the parser tagset.
const CLAUSE: &str = "S";

pub struct SyntacticExtractor {
    document_key: String,
    splitter: Box<dyn SentenceSplitter>,
    parser: Box<dyn ConstituencyParser>,
    token_to_lemma: BTreeMap<String, String>,
}

impl SyntacticExtractor {
    pub fn new(
        settings: &ExtractorSettings,
        lemma_tokens: &LemmaTokens,
        toolkit: Toolkit,
    ) -> Result<Self, Error> {
        let parser = toolkit.parser.ok_or_else(|| {
            Error::Parser("the syntactic strategy needs a constituency parser".to_string())
        })?;

        Ok(Self {
            document_key: settings.document_key.clone(),
            splitter: toolkit.splitter,
            parser,
            token_to_lemma: lemma_tokens.token_to_lemma(),
        })
    }
}

impl Extract for SyntacticExtractor {
    fn setup(&mut self) -> Result<(), Error> {
        debug!("starting constituency parser");
        self.parser.start()
    }

    fn extract_from_item(&self, item: &CorpusItem) -> Vec<Sentence> {
        let (url, document) = match url_and_document(item, &self.document_key) {
            Some(x) => x,
            None => return Vec::new(),
        };

        let sentences = self.splitter.split(&document.to_lowercase());
        let trees = match self.parser.parse_sents(&sentences) {
            Ok(trees) => trees,
            Err(e) => {
                error!("cannot parse sentences from {}: {:?}", url, e);
                return Vec::new();
            }
        };

        let mut extracted = Vec::new();
        for tree in trees {
            let tree = match tree {
                Ok(tree) => tree,
                Err(e) => {
                    error!("cannot parse sentence from {}: {:?}", url, e);
                    continue;
                }
            };

            for sub in tree.sub_sentences(CLAUSE) {
                let found: BTreeSet<&str> = sub
                    .terminals_with_prefix(VERB_PREFIX)
                    .into_iter()
                    .map(|(_, word)| word)
                    .filter(|word| self.token_to_lemma.contains_key(*word))
                    .collect();

                let mut found = found.into_iter();
                match (found.next(), found.next()) {
                    (None, _) => debug!("No matching verbs found in sub sentence"),
                    (Some(token), None) => {
                        let lemma = &self.token_to_lemma[token];
                        extracted.push(Sentence::new(lemma, &sub.text(), url));
                    }
                    (Some(_), Some(_)) => {
                        debug!("More than one matching verb found in sentence, skipping")
                    }
                }
            }
        }

        if extracted.is_empty() {
            debug!("No sentences extracted");
        } else {
            debug!("{} sentences extracted", extracted.len());
        }

        extracted
    }

    fn teardown(&mut self) {
        self.parser.stop();
    }
}
