//! Extraction template.
use std::collections::VecDeque;

use log::{info, warn};
use rayon::ThreadPool;

use crate::error::Error;
use crate::parallel;

use super::{
    CorpusItem, ExtractorSettings, GrammarExtractor, LemmaTokens, ManyToManyExtractor,
    OneToOneExtractor, Sentence, Strategy, SyntacticExtractor, Toolkit, PROGRESS_EVERY,
};

/// Sentence extraction capability.
///
/// [Extract::extract_from_item] may be called concurrently and only after [Extract::setup].
pub trait Extract: Send + Sync {
    /// Optional setup code, run before starting the extraction.
    fn setup(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Extract sentences from an item.
    /// Per-item failures are logged and result in no sentences.
    fn extract_from_item(&self, item: &CorpusItem) -> Vec<Sentence>;

    /// Optional teardown code, run after the extraction.
    fn teardown(&mut self) {}
}

pub enum SentenceExtractor {
    ManyToMany(ManyToManyExtractor),
    OneToOne(OneToOneExtractor),
    Grammar(GrammarExtractor),
    Syntactic(SyntacticExtractor),
}

impl SentenceExtractor {
    /// Build the extractor of `strategy`.
    pub fn new(
        strategy: Strategy,
        settings: &ExtractorSettings,
        lemma_tokens: LemmaTokens,
        toolkit: Toolkit,
    ) -> Result<Self, Error> {
        let lemma_tokens = if settings.match_base_form {
            lemma_tokens
        } else {
            lemma_tokens.without_base_form()
        };

        let extractor = match strategy {
            Strategy::ManyToMany => {
                info!("About to extract sentences using the 'many to many' strategy: the same sentence is likely to appear multiple times, with different LUs.");
                SentenceExtractor::ManyToMany(ManyToManyExtractor::new(
                    settings,
                    &lemma_tokens,
                    toolkit,
                ))
            }
            Strategy::OneToOne => {
                info!("About to extract sentences using the 'one to one' strategy: the same sentence will appear only once.");
                SentenceExtractor::OneToOne(OneToOneExtractor::new(
                    settings,
                    &lemma_tokens,
                    toolkit,
                ))
            }
            Strategy::Grammar => {
                info!("About to extract sentences using the 'grammar' strategy: every grammar chunk holding a matching verb is extracted.");
                SentenceExtractor::Grammar(GrammarExtractor::new(settings, &lemma_tokens, toolkit)?)
            }
            Strategy::Syntactic => {
                info!("About to extract sentences using the 'syntactic' strategy: the same sentence will appear only once.");
                SentenceExtractor::Syntactic(SyntacticExtractor::new(
                    settings,
                    &lemma_tokens,
                    toolkit,
                )?)
            }
        };

        Ok(extractor)
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            SentenceExtractor::ManyToMany(_) => Strategy::ManyToMany,
            SentenceExtractor::OneToOne(_) => Strategy::OneToOne,
            SentenceExtractor::Grammar(_) => Strategy::Grammar,
            SentenceExtractor::Syntactic(_) => Strategy::Syntactic,
        }
    }

    /// Run setup and get a lazy iterator over the sentences extracted from `corpus`.
    ///
    /// Teardown runs when the iterator is dropped.
    pub fn extract<I>(mut self, corpus: I, processes: usize) -> Result<Extraction<I::IntoIter>, Error>
    where
        I: IntoIterator<Item = CorpusItem>,
    {
        let pool = parallel::pool(processes)?;

        if let Err(e) = self.setup() {
            self.teardown();
            return Err(e);
        }

        Ok(Extraction {
            extractor: self,
            corpus: corpus.into_iter(),
            pool,
            batch_size: parallel::batch_size(processes),
            pending: VecDeque::new(),
            nb_items: 0,
            nb_sentences: 0,
            done: false,
        })
    }
}

impl Extract for SentenceExtractor {
    fn setup(&mut self) -> Result<(), Error> {
        match self {
            SentenceExtractor::ManyToMany(e) => e.setup(),
            SentenceExtractor::OneToOne(e) => e.setup(),
            SentenceExtractor::Grammar(e) => e.setup(),
            SentenceExtractor::Syntactic(e) => e.setup(),
        }
    }

    fn extract_from_item(&self, item: &CorpusItem) -> Vec<Sentence> {
        match self {
            SentenceExtractor::ManyToMany(e) => e.extract_from_item(item),
            SentenceExtractor::OneToOne(e) => e.extract_from_item(item),
            SentenceExtractor::Grammar(e) => e.extract_from_item(item),
            SentenceExtractor::Syntactic(e) => e.extract_from_item(item),
        }
    }

    fn teardown(&mut self) {
        match self {
            SentenceExtractor::ManyToMany(e) => e.teardown(),
            SentenceExtractor::OneToOne(e) => e.teardown(),
            SentenceExtractor::Grammar(e) => e.teardown(),
            SentenceExtractor::Syntactic(e) => e.teardown(),
        }
    }
}

/// Lazy, single-pass iterator over extracted sentences.
///
/// Each sentence gets a sequential id (in corpus order, starting at 0)
/// and the name and url of the item it comes from.
/// Items without name or url are skipped.
pub struct Extraction<I>
where
    I: Iterator<Item = CorpusItem>,
{
    extractor: SentenceExtractor,
    corpus: I,
    pool: Option<ThreadPool>,
    batch_size: usize,
    pending: VecDeque<Sentence>,
    nb_items: usize,
    nb_sentences: u64,
    done: bool,
}

impl<I> Extraction<I>
where
    I: Iterator<Item = CorpusItem>,
{
    /// Number of corpus items consumed so far.
    pub fn nb_items(&self) -> usize {
        self.nb_items
    }

    /// Number of sentences extracted so far.
    pub fn nb_sentences(&self) -> u64 {
        self.nb_sentences
    }

    fn process_item(extractor: &SentenceExtractor, item: CorpusItem) -> Option<Vec<Sentence>> {
        let (name, url) = match (item.name(), item.url()) {
            (Some(name), Some(url)) => (name.to_string(), url.to_string()),
            _ => {
                warn!("Skipping item without name or URL");
                return None;
            }
        };

        let mut extracted = extractor.extract_from_item(&item);
        for sentence in extracted.iter_mut() {
            sentence.url = url.clone();
            sentence.name = Some(name.clone());
        }

        Some(extracted)
    }

    /// Extract sentences from the next batch of items.
    /// Returns false when the corpus is exhausted.
    fn fill(&mut self) -> bool {
        let batch: Vec<CorpusItem> = self.corpus.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            return false;
        }

        let extractor = &self.extractor;
        let results = parallel::map(self.pool.as_ref(), batch, |item| {
            Self::process_item(extractor, item)
        });

        for extracted in results {
            self.nb_items += 1;

            // assign an unique incremental ID to each sentence
            for mut sentence in extracted.into_iter().flatten() {
                sentence.id = Some(self.nb_sentences);
                self.nb_sentences += 1;
                self.pending.push_back(sentence);
            }

            if self.nb_items % PROGRESS_EVERY == 0 {
                info!(
                    "Processed {} items, extracted {} sentences",
                    self.nb_items, self.nb_sentences
                );
            }
        }

        true
    }
}

impl<I> Iterator for Extraction<I>
where
    I: Iterator<Item = CorpusItem>,
{
    type Item = Sentence;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(sentence) = self.pending.pop_front() {
                return Some(sentence);
            }

            if self.done {
                return None;
            }

            if !self.fill() {
                self.done = true;
                info!("Done, total sentences extracted: {}", self.nb_sentences);
            }
        }
    }
}

impl<I> Drop for Extraction<I>
where
    I: Iterator<Item = CorpusItem>,
{
    fn drop(&mut self) {
        self.extractor.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::nlp::{ConstituencyParser, LexiconTagger, Tree, UnicodeSplitter};

    /// Parses everything as a single clause, counting stops.
    struct CountingParser {
        fail_start: bool,
        stops: Arc<AtomicUsize>,
    }

    impl ConstituencyParser for CountingParser {
        fn start(&mut self) -> Result<(), Error> {
            if self.fail_start {
                Err(Error::Parser("cannot start".to_string()))
            } else {
                Ok(())
            }
        }

        fn parse_sents(&self, sentences: &[String]) -> Result<Vec<Result<Tree, Error>>, Error> {
            Ok(sentences
                .iter()
                .map(|_| Tree::parse("(ROOT (S (NP (PRP she)) (VP (VBD died))))"))
                .collect())
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn syntactic(fail_start: bool) -> (SentenceExtractor, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        let parser = CountingParser {
            fail_start,
            stops: stops.clone(),
        };
        let toolkit = Toolkit::new(
            Box::new(UnicodeSplitter::new("en")),
            Box::new(LexiconTagger::default()),
        )
        .with_parser(Box::new(parser));
        let lemma_tokens: LemmaTokens = serde_json::from_value(json!({"die": ["died"]})).unwrap();

        let extractor = SentenceExtractor::new(
            Strategy::Syntactic,
            &ExtractorSettings::default(),
            lemma_tokens,
            toolkit,
        )
        .unwrap();
        (extractor, stops)
    }

    fn corpus(size: usize) -> Vec<CorpusItem> {
        (0..size)
            .map(|i| {
                serde_json::from_value(json!({
                    "name": format!("p{}", i),
                    "url": format!("http://u/{}", i),
                    "bio": "She died.",
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn teardown_after_full_pass() {
        let (extractor, stops) = syntactic(false);
        assert_eq!(extractor.strategy(), Strategy::Syntactic);

        let mut extraction = extractor.extract(corpus(3), 0).unwrap();
        let ids: Vec<Option<u64>> = extraction.by_ref().map(|s| s.id).collect();
        assert_eq!(ids, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(extraction.nb_items(), 3);
        assert_eq!(stops.load(Ordering::SeqCst), 0);

        drop(extraction);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn teardown_when_dropped_early() {
        let (extractor, stops) = syntactic(false);
        let mut extraction = extractor.extract(corpus(3), 0).unwrap();

        let first = extraction.next().unwrap();
        assert_eq!(first.url, "http://u/0");
        assert_eq!(first.name.as_deref(), Some("p0"));

        drop(extraction);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn teardown_when_setup_fails() {
        let (extractor, stops) = syntactic(true);
        let res = extractor.extract(corpus(3), 0);

        assert!(matches!(res, Err(Error::Parser(_))));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
