//! Language-dependent tables.
//!
//! Chunk grammars and verbal prefixes rely on POS labels, which depend on the
//! tagset of the tagger used for a given language (TreeTagger tagsets here).
//!
use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::error::Error;

lazy_static! {

    /// Chunk grammars, one per supported language.
    /// The `CHUNK` label marks the spans the grammar strategy extracts.
    pub static ref GRAMMARS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(
            "en",
            r"
                NOPH: {<PDT>?<DT|PP.*|>?<CD>?<JJ.*|VVN>*<N.+|FW>+<CC>?}
                CHUNK: {<NOPH>+<MD>?<V.+>+<IN|TO>?<NOPH>+}
            ",
        );
        m.insert(
            "it",
            r"
                SN: {<PRO.*|DET.*|>?<ADJ>*<NUM>?<NOM|NPR>+<NUM>?<ADJ|VER:pper>*}
                CHUNK: {<SN><VER.*>+<SN>}
            ",
        );
        m
    };

    /// POS tag prefix identifying verbs.
    pub static ref VERBAL_PREFIXES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("en", "V");
        m.insert("it", "VER");
        m
    };

    /// TreeTagger wrapper scripts, reading raw text on stdin.
    pub static ref TAGGER_COMMANDS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("en", "tree-tagger-english");
        m.insert("it", "tree-tagger-italian");
        m.insert("fr", "tree-tagger-french");
        m.insert("de", "tree-tagger-german");
        m.insert("es", "tree-tagger-spanish");
        m
    };

    /// Abbreviations (lowercased, no trailing period) that end a sentence only when
    /// followed by a capitalised word.
    pub static ref ABBREVIATIONS: HashMap<&'static str, HashSet<&'static str>> = {
        let mut m = HashMap::new();
        m.insert(
            "en",
            [
                "jr", "sr", "b", "d", "c", "ca", "fl", "vol", "vols", "no", "pp", "ed", "eds",
                "viz", "etc", "e.g", "i.e", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
                "sep", "sept", "oct", "nov", "dec",
            ]
            .iter()
            .copied()
            .collect(),
        );
        m.insert(
            "it",
            ["n", "p", "pp", "ca", "cfr", "ecc", "vol"]
                .iter()
                .copied()
                .collect(),
        );
        m
    };

    /// Titles preceding a name, never ending a sentence.
    pub static ref TITLES: HashMap<&'static str, HashSet<&'static str>> = {
        let mut m = HashMap::new();
        m.insert(
            "en",
            [
                "mr", "mrs", "ms", "dr", "st", "prof", "rev", "gen", "col", "capt", "lt", "gov",
                "sen", "hon",
            ]
            .iter()
            .copied()
            .collect(),
        );
        m.insert(
            "it",
            ["sig", "sigg", "dott", "prof", "avv", "ing", "on", "s", "ss", "gen", "mons"]
                .iter()
                .copied()
                .collect(),
        );
        m
    };
}

/// Get the chunk grammar of `lang`.
pub fn grammar(lang: &str) -> Result<&'static str, Error> {
    GRAMMARS.get(lang).copied().ok_or_else(|| {
        let mut supported: Vec<_> = GRAMMARS.keys().collect();
        supported.sort();
        Error::UnsupportedLanguage(format!("{} (supported: {:?})", lang, supported))
    })
}

/// Get the verbal POS prefix of `lang`.
pub fn verbal_prefix(lang: &str) -> Result<&'static str, Error> {
    VERBAL_PREFIXES
        .get(lang)
        .copied()
        .ok_or_else(|| Error::UnsupportedLanguage(lang.to_string()))
}

/// Get the default tagger command of `lang`.
pub fn tagger_command(lang: &str) -> Result<&'static str, Error> {
    TAGGER_COMMANDS
        .get(lang)
        .copied()
        .ok_or_else(|| Error::UnsupportedLanguage(lang.to_string()))
}

/// Get the known abbreviations of `lang`, if any.
pub fn abbreviations(lang: &str) -> Option<&'static HashSet<&'static str>> {
    ABBREVIATIONS.get(lang)
}

/// Get the known titles of `lang`, if any.
pub fn titles(lang: &str) -> Option<&'static HashSet<&'static str>> {
    TITLES.get(lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_supported() {
        assert!(grammar("en").unwrap().contains("CHUNK"));
        assert!(grammar("it").unwrap().contains("CHUNK"));
    }

    #[test]
    fn grammar_unsupported() {
        match grammar("fr") {
            Err(Error::UnsupportedLanguage(msg)) => assert!(msg.starts_with("fr")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn titles_are_not_plain_abbreviations() {
        assert!(titles("en").unwrap().contains("mr"));
        assert!(!abbreviations("en").unwrap().contains("mr"));
        assert!(abbreviations("en").unwrap().contains("etc"));
        assert!(titles("xx").is_none());
    }

    #[test]
    fn prefixes() {
        assert_eq!(verbal_prefix("en").unwrap(), "V");
        assert_eq!(verbal_prefix("it").unwrap(), "VER");
        assert!(verbal_prefix("xx").is_err());
    }
}
