//! Grammar extraction strategy: pick the sentence chunks that comply with a per-language grammar.
use std::collections::HashSet;

use log::debug;

use crate::error::Error;
use crate::lang;
use crate::nlp::{RegexpChunker, SentenceSplitter, Tagger};

use super::{
    tag_sentences, url_and_document, CorpusItem, Extract, ExtractorSettings, LemmaTokens,
    Sentence, Toolkit, VERB_PREFIX,
};

/// Label of the grammar rule producing extractable chunks.
const CHUNK: &str = "CHUNK";

pub struct GrammarExtractor {
    document_key: String,
    splitter: Box<dyn SentenceSplitter>,
    tagger: Box<dyn Tagger>,
    chunker: RegexpChunker,
    lemma_tokens: Vec<(String, HashSet<String>)>,
}

impl GrammarExtractor {
    /// Fails with [Error::UnsupportedLanguage] when there's no grammar for the language.
    pub fn new(
        settings: &ExtractorSettings,
        lemma_tokens: &LemmaTokens,
        toolkit: Toolkit,
    ) -> Result<Self, Error> {
        let chunker = RegexpChunker::new(lang::grammar(&settings.language)?)?;

        Ok(Self {
            document_key: settings.document_key.clone(),
            splitter: toolkit.splitter,
            tagger: toolkit.tagger,
            chunker,
            lemma_tokens: lemma_tokens.lowercased(),
        })
    }
}

impl Extract for GrammarExtractor {
    fn extract_from_item(&self, item: &CorpusItem) -> Vec<Sentence> {
        let (url, document) = match url_and_document(item, &self.document_key) {
            Some(x) => x,
            None => return Vec::new(),
        };

        let mut extracted = Vec::new();
        let sentences = self.splitter.split(&document);
        for (_, tagged) in tag_sentences(self.tagger.as_ref(), sentences, url) {
            let parsed = self.chunker.parse(&tagged);
            for chunk in parsed.subtrees(CHUNK) {
                debug!("Grammar match: '{}'", chunk);
                let text = chunk.text();

                for (_, token) in chunk.terminals_with_prefix(VERB_PREFIX) {
                    let token = token.to_lowercase();
                    for (lemma, tokens) in &self.lemma_tokens {
                        if tokens.contains(&token) {
                            debug!("Sentence token '{}' matches LU '{}'", token, lemma);
                            extracted.push(
                                Sentence::new(lemma, &text, url).with_tagged(tagged.clone()),
                            );
                        }
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
}
