//! 121 extraction strategy: 1 sentence per 1 LU.
//!
//! N.B.: the same sentence will appear only once,
//! the sentence is assigned to a RANDOM LU among the matching ones.
use std::collections::{BTreeMap, HashSet};

use log::debug;
use rand::seq::SliceRandom;

use crate::nlp::{SentenceSplitter, Tagger};

use super::{
    tag_sentences, url_and_document, CorpusItem, Extract, ExtractorSettings, LemmaTokens,
    Sentence, Toolkit, VERB_PREFIX,
};

pub struct OneToOneExtractor {
    document_key: String,
    splitter: Box<dyn SentenceSplitter>,
    tagger: Box<dyn Tagger>,
    token_to_lemma: BTreeMap<String, String>,
}

impl OneToOneExtractor {
    pub fn new(settings: &ExtractorSettings, lemma_tokens: &LemmaTokens, toolkit: Toolkit) -> Self {
        let token_to_lemma = lemma_tokens.token_to_lemma();
        debug!("All match tokens: {:?}", token_to_lemma.keys());

        Self {
            document_key: settings.document_key.clone(),
            splitter: toolkit.splitter,
            tagger: toolkit.tagger,
            token_to_lemma,
        }
    }
}

impl Extract for OneToOneExtractor {
    fn extract_from_item(&self, item: &CorpusItem) -> Vec<Sentence> {
        let (url, document) = match url_and_document(item, &self.document_key) {
            Some(x) => x,
            None => return Vec::new(),
        };

        let mut rng = rand::thread_rng();
        let mut extracted = Vec::new();
        let sentences = self.splitter.split(&document);
        for (sentence, tagged) in tag_sentences(self.tagger.as_ref(), sentences, url) {
            let sentence_verbs: HashSet<String> = tagged
                .iter()
                .filter(|t| t.is_verb(VERB_PREFIX))
                .map(|t| t.token().to_lowercase())
                .collect();

            let matched: Vec<&String> = self
                .token_to_lemma
                .keys()
                .filter(|token| sentence_verbs.contains(*token))
                .collect();

            if let Some(token) = matched.choose(&mut rng) {
                let lemma = &self.token_to_lemma[*token];
                extracted.push(Sentence::new(lemma, &sentence, url).with_tagged(tagged));
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
