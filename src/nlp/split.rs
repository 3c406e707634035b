//! Sentence splitting and tokenization.
//!
//! Sentence boundaries are Unicode ones (UAX #29), with per-language
//! abbreviation lists preventing splits after `Mr.`, `b.` and the like.
//! Titles (`Mr.`) never end a sentence, other abbreviations (`etc.`) do when
//! the next word is capitalised.
use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::lang;

pub trait SentenceSplitter: Send + Sync {
    /// Split `text` into trimmed, non-empty sentences.
    fn split(&self, text: &str) -> Vec<String>;
}

type WordSet = Option<&'static HashSet<&'static str>>;

pub struct UnicodeSplitter {
    abbreviations: WordSet,
    titles: WordSet,
}

impl UnicodeSplitter {
    /// Splitter using the abbreviations and titles known for `lang`, if any.
    pub fn new(lang: &str) -> Self {
        Self {
            abbreviations: lang::abbreviations(lang),
            titles: lang::titles(lang),
        }
    }

    /// Lowercased word ending `segment`, if it ends with a period.
    fn final_word(segment: &str) -> Option<String> {
        if !segment.ends_with('.') {
            return None;
        }

        segment.split_whitespace().last().map(|word| {
            word.trim_start_matches(|c: char| !c.is_alphanumeric())
                .trim_end_matches('.')
                .to_lowercase()
        })
    }

    /// checks if `segment` ends with an abbreviation binding it to `next`.
    fn joins_next(&self, segment: &str, next: Option<&str>) -> bool {
        let word = match Self::final_word(segment) {
            Some(word) => word,
            None => return false,
        };
        let known = |words: WordSet| words.map_or(false, |w| w.contains(word.as_str()));

        if known(self.titles) {
            return true;
        }
        if !known(self.abbreviations) {
            return false;
        }

        // orthographic context: lowercase words and numbers carry on the sentence
        next.and_then(|next| next.chars().find(|c| c.is_alphanumeric()))
            .map_or(false, |c| c.is_lowercase() || c.is_numeric())
    }
}

impl Default for UnicodeSplitter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl SentenceSplitter for UnicodeSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut pending = String::new();

        let mut segments = text.split_sentence_bounds().peekable();
        while let Some(segment) = segments.next() {
            pending.push_str(segment);

            let trimmed = segment.trim_end();
            let paragraph_end = segment[trimmed.len()..].contains('\n');
            if !paragraph_end && self.joins_next(trimmed, segments.peek().copied()) {
                continue;
            }

            let sentence = pending.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            pending.clear();
        }

        let sentence = pending.trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }

        sentences
    }
}

/// Split a sentence into word and punctuation tokens.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence
        .split_word_bounds()
        .filter(|token| !token.trim().is_empty())
        .collect()
}
