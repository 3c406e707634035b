/*! Sentence extraction.

Extracts corpus sentences containing at least one token attributed to a lexical unit (LU).

Every strategy follows the same template: split the document into sentences, tag (or parse) them,
match verbs against the lemma tokens, emit sentences.
They differ in how a sentence gets attributed to LUs:

- [Strategy::ManyToMany] (`n2n`): one record per matching LU, so the same sentence is likely to appear multiple times.
- [Strategy::OneToOne] (`121`): one record per matching sentence, attributed to a random matching LU.
- [Strategy::Grammar] (`grammar`): records are the chunks of a per-language grammar that contain a matching verb.
- [Strategy::Syntactic] (`syntactic`): sentences are parsed and split into their lowest clauses,
  clauses with exactly one matching verb are kept.

The [Extraction] iterator drives a strategy over a corpus, assigning sequential ids to extracted sentences.
!*/
mod extractor;
mod grammar;
mod many_to_many;
mod one_to_one;
mod syntactic;
mod types;

use std::fmt;
use std::str::FromStr;

use log::{debug, error, warn};

use crate::error::Error;
use crate::nlp::{ConstituencyParser, SentenceSplitter, TaggedToken, Tagger};

pub use extractor::{Extract, Extraction, SentenceExtractor};
pub use grammar::GrammarExtractor;
pub use many_to_many::ManyToManyExtractor;
pub use one_to_one::OneToOneExtractor;
pub use syntactic::SyntacticExtractor;
pub use types::{CorpusItem, LemmaTokens, Sentence};

/// POS tag prefix of verbs, both in tagger and parser tagsets.
const VERB_PREFIX: &str = "V";

/// Log progress every n corpus items.
const PROGRESS_EVERY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ManyToMany,
    OneToOne,
    Grammar,
    Syntactic,
}

impl Strategy {
    pub const NAMES: [&'static str; 4] = ["n2n", "121", "grammar", "syntactic"];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ManyToMany => "n2n",
            Strategy::OneToOne => "121",
            Strategy::Grammar => "grammar",
            Strategy::Syntactic => "syntactic",
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n2n" | "many-to-many" => Ok(Strategy::ManyToMany),
            "121" | "one-to-one" => Ok(Strategy::OneToOne),
            "grammar" => Ok(Strategy::Grammar),
            "syntactic" => Ok(Strategy::Syntactic),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Extraction parameters shared by all strategies.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// ISO 639-1 code of the corpus language.
    pub language: String,
    /// Item field holding the textual document.
    pub document_key: String,
    /// Whether a lemma matches its own base form.
    pub match_base_form: bool,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            document_key: "bio".to_string(),
            match_base_form: false,
        }
    }
}

/// NLP collaborators handed to extractors.
pub struct Toolkit {
    pub splitter: Box<dyn SentenceSplitter>,
    pub tagger: Box<dyn Tagger>,
    pub parser: Option<Box<dyn ConstituencyParser>>,
}

impl Toolkit {
    pub fn new(splitter: Box<dyn SentenceSplitter>, tagger: Box<dyn Tagger>) -> Self {
        Self {
            splitter,
            tagger,
            parser: None,
        }
    }

    pub fn with_parser(mut self, parser: Box<dyn ConstituencyParser>) -> Self {
        self.parser = Some(parser);
        self
    }
}

/// Get url and document of an item, logging why it can't be used otherwise.
fn url_and_document<'a>(item: &'a CorpusItem, document_key: &str) -> Option<(&'a str, String)> {
    let url = match item.url() {
        Some(url) => url,
        None => {
            warn!("skipping item without url");
            return None;
        }
    };

    match item.document(document_key) {
        Some(document) => Some((url, document)),
        None => {
            debug!("skipping item without document: {}", url);
            None
        }
    }
}

/// Tag the sentences of a document, logging and dropping the ones that can't be tagged.
fn tag_sentences(
    tagger: &dyn Tagger,
    sentences: Vec<String>,
    url: &str,
) -> Vec<(String, Vec<TaggedToken>)> {
    let tagged = match tagger.tag_sents(&sentences) {
        Ok(tagged) => tagged,
        Err(e) => {
            error!("cannot tag sentences from {}: {:?}", url, e);
            return Vec::new();
        }
    };

    sentences
        .into_iter()
        .zip(tagged)
        .filter_map(|(sentence, tagged)| match tagged {
            Ok(tagged) => Some((sentence, tagged)),
            Err(e) => {
                error!("cannot tag sentence from {}: {:?}", url, e);
                None
            }
        })
        .collect()
}

/// Extract sentences from `corpus` using the strategy named `strategy`.
///
/// Fails before touching the corpus if the strategy is unknown
/// or can't be built for the requested language.
pub fn extract_sentences<I>(
    corpus: I,
    settings: &ExtractorSettings,
    lemma_tokens: LemmaTokens,
    strategy: &str,
    toolkit: Toolkit,
    processes: usize,
) -> Result<Extraction<I::IntoIter>, Error>
where
    I: IntoIterator<Item = CorpusItem>,
{
    let strategy: Strategy = strategy.parse()?;
    SentenceExtractor::new(strategy, settings, lemma_tokens, toolkit)?.extract(corpus, processes)
}
