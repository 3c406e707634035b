//! n2n extraction strategy: many sentences per many LUs.
//!
//! N.B.: the same sentence is likely to appear multiple times, once per matching LU.
use std::collections::HashSet;

use log::debug;

use crate::nlp::{SentenceSplitter, Tagger};

use super::{
    tag_sentences, url_and_document, CorpusItem, Extract, ExtractorSettings, LemmaTokens,
    Sentence, Toolkit, VERB_PREFIX,
};

pub struct ManyToManyExtractor {
    document_key: String,
    splitter: Box<dyn SentenceSplitter>,
    tagger: Box<dyn Tagger>,
    lemma_tokens: Vec<(String, HashSet<String>)>,
}

impl ManyToManyExtractor {
    pub fn new(settings: &ExtractorSettings, lemma_tokens: &LemmaTokens, toolkit: Toolkit) -> Self {
        Self {
            document_key: settings.document_key.clone(),
            splitter: toolkit.splitter,
            tagger: toolkit.tagger,
            lemma_tokens: lemma_tokens.lowercased(),
        }
    }
}

impl Extract for ManyToManyExtractor {
    fn extract_from_item(&self, item: &CorpusItem) -> Vec<Sentence> {
        let (url, document) = match url_and_document(item, &self.document_key) {
            Some(x) => x,
            None => return Vec::new(),
        };

        let mut extracted = Vec::new();
        let sentences = self.splitter.split(&document);
        for (sentence, tagged) in tag_sentences(self.tagger.as_ref(), sentences, url) {
            let sentence_verbs: HashSet<String> = tagged
                .iter()
                .filter(|t| t.is_verb(VERB_PREFIX))
                .map(|t| t.token().to_lowercase())
                .collect();

            for (lemma, tokens) in &self.lemma_tokens {
                if tokens.iter().any(|token| sentence_verbs.contains(token)) {
                    extracted.push(Sentence::new(lemma, &sentence, url).with_tagged(tagged.clone()));
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
}
