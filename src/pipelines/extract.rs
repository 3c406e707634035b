//! Sentence extraction pipeline.
//!
//! Reads a JSON lines corpus, extracts the sentences holding lexical units
//! and writes them as JSON lines.
//!
//! Everything that may fail because of the invocation (lemma tokens file, strategy/language support, tagger)
//! is checked before the corpus is read and before the output file is created.
use std::path::PathBuf;

use log::info;

use crate::error::Error;
use crate::extraction::{ExtractorSettings, LemmaTokens, SentenceExtractor, Strategy, Toolkit};
use crate::io::{CorpusReader, JsonLinesWriter, WriterTrait};
use crate::lang;
use crate::nlp::{CommandParser, CommandTagger, LexiconTagger, Tagger, UnicodeSplitter};

use super::{skip_malformed, Pipeline};

/// Where POS tags come from.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggerSpec {
    /// The language's TreeTagger wrapper.
    Default,
    Lexicon(PathBuf),
    Command { program: String, args: Vec<String> },
}

/// Constituency parser command, used by the syntactic strategy only.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserSpec {
    Stanford,
    Command { program: String, args: Vec<String> },
}

pub struct ExtractSentences {
    corpus: PathBuf,
    lemma_tokens: PathBuf,
    outfile: PathBuf,
    strategy: Strategy,
    settings: ExtractorSettings,
    processes: usize,
    tagger: TaggerSpec,
    parser: ParserSpec,
}

impl ExtractSentences {
    pub fn new(
        corpus: PathBuf,
        lemma_tokens: PathBuf,
        outfile: PathBuf,
        strategy: Strategy,
        settings: ExtractorSettings,
        processes: usize,
    ) -> Self {
        Self {
            corpus,
            lemma_tokens,
            outfile,
            strategy,
            settings,
            processes,
            tagger: TaggerSpec::Default,
            parser: ParserSpec::Stanford,
        }
    }

    pub fn with_tagger(mut self, tagger: TaggerSpec) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_parser(mut self, parser: ParserSpec) -> Self {
        self.parser = parser;
        self
    }

    fn tagger(&self) -> Result<Box<dyn Tagger>, Error> {
        let tagger: Box<dyn Tagger> = match &self.tagger {
            TaggerSpec::Default => {
                let program = lang::tagger_command(&self.settings.language)?;
                Box::new(CommandTagger::new(program, Vec::new()))
            }
            TaggerSpec::Lexicon(path) => Box::new(LexiconTagger::from_path(path)?),
            TaggerSpec::Command { program, args } => {
                Box::new(CommandTagger::new(program, args.clone()))
            }
        };
        Ok(tagger)
    }

    fn toolkit(&self) -> Result<Toolkit, Error> {
        let toolkit = Toolkit::new(
            Box::new(UnicodeSplitter::new(&self.settings.language)),
            self.tagger()?,
        );

        if self.strategy != Strategy::Syntactic {
            return Ok(toolkit);
        }

        let parser = match &self.parser {
            ParserSpec::Stanford => CommandParser::stanford(),
            ParserSpec::Command { program, args } => CommandParser::new(program, args.clone()),
        };
        Ok(toolkit.with_parser(Box::new(parser)))
    }
}

impl Pipeline<u64> for ExtractSentences {
    /// Returns the number of extracted sentences.
    fn run(&self) -> Result<u64, Error> {
        let lemma_tokens = LemmaTokens::from_path(&self.lemma_tokens)?;
        info!("{} lemmas loaded from {:?}", lemma_tokens.len(), self.lemma_tokens);

        let extractor =
            SentenceExtractor::new(self.strategy, &self.settings, lemma_tokens, self.toolkit()?)?;
        let corpus = skip_malformed(CorpusReader::from_path(&self.corpus)?);
        let extraction = extractor.extract(corpus, self.processes)?;

        let mut writer = JsonLinesWriter::create(&self.outfile)?;
        for sentence in extraction {
            writer.write_single(&sentence)?;
        }
        writer.flush()?;

        info!("Dumped {} sentences to {:?}", writer.count(), self.outfile);
        Ok(writer.count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;

    use super::*;
    use crate::io::JsonLines;

    fn setup(dir: &std::path::Path) -> (PathBuf, PathBuf, PathBuf) {
        let corpus = dir.join("corpus.jsonl");
        fs::write(
            &corpus,
            concat!(
                r#"{"name": "X", "url": "http://u", "bio": "She was born in 1900. She died in 1950."}"#,
                "\n",
                "garbage\n",
                r#"{"name": "Y", "bio": "He died in 1960."}"#,
                "\n",
            ),
        )
        .unwrap();

        let lemma_tokens = dir.join("lemma_tokens.json");
        fs::write(&lemma_tokens, r#"{"born": ["born"], "die": ["died"]}"#).unwrap();

        let lexicon = dir.join("lexicon.tsv");
        fs::write(&lexicon, "born\tVVN\tbear\ndied\tVVD\tdie\nwas\tVBD\tbe\n").unwrap();

        (corpus, lemma_tokens, lexicon)
    }

    #[test]
    fn extract_with_lexicon() {
        let dir = tempfile::tempdir().unwrap();
        let (corpus, lemma_tokens, lexicon) = setup(dir.path());
        let outfile = dir.path().join("output").join("sentences.jsonlines");

        let pipeline = ExtractSentences::new(
            corpus,
            lemma_tokens,
            outfile.clone(),
            Strategy::ManyToMany,
            ExtractorSettings {
                match_base_form: true,
                ..Default::default()
            },
            0,
        )
        .with_tagger(TaggerSpec::Lexicon(lexicon));
        assert_eq!(pipeline.run().unwrap(), 2);

        let sentences: Vec<Value> = JsonLines::from_path(&outfile)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sentences[0]["id"], 0);
        assert_eq!(sentences[0]["lu"], "born");
        assert_eq!(sentences[1]["id"], 1);
        assert_eq!(sentences[1]["lu"], "die");
        assert_eq!(sentences[1]["name"], "X");
    }

    #[test]
    fn unsupported_language_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let (corpus, lemma_tokens, lexicon) = setup(dir.path());
        let outfile = dir.path().join("sentences.jsonlines");

        let settings = ExtractorSettings {
            language: "fr".to_string(),
            ..Default::default()
        };
        let pipeline = ExtractSentences::new(
            corpus,
            lemma_tokens,
            outfile.clone(),
            Strategy::Grammar,
            settings,
            0,
        )
        .with_tagger(TaggerSpec::Lexicon(lexicon));

        assert!(matches!(pipeline.run(), Err(Error::UnsupportedLanguage(_))));
        assert!(!outfile.exists());
    }

    #[test]
    fn default_tagger_needs_known_language() {
        let dir = tempfile::tempdir().unwrap();
        let (corpus, lemma_tokens, _) = setup(dir.path());
        let settings = ExtractorSettings {
            language: "xx".to_string(),
            ..Default::default()
        };
        let pipeline = ExtractSentences::new(
            corpus,
            lemma_tokens,
            dir.path().join("out.jsonl"),
            Strategy::OneToOne,
            settings,
            0,
        );
        assert!(pipeline.run().is_err());
    }
}
