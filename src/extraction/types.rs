//! Corpus items, lemma tables and extracted sentences.
use std::collections::{btree_map, BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::io::reader::load_json;
use crate::nlp::TaggedToken;

/// Scraped corpus item.
///
/// Only `name`, `url` and the document field are interpreted,
/// other fields are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorpusItem(Map<String, Value>);

impl CorpusItem {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.non_empty_str("name")
    }

    pub fn url(&self) -> Option<&str> {
        self.non_empty_str("url")
    }

    /// Get the textual document stored at `key`.
    ///
    /// Lists of paragraphs are joined with newlines.
    /// Returns [None] if there's no or an empty document.
    pub fn document(&self, key: &str) -> Option<String> {
        let document = match self.0.get(key)? {
            Value::String(s) => s.clone(),
            Value::Array(paragraphs) => paragraphs
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            _ => return None,
        };

        if document.trim().is_empty() {
            None
        } else {
            Some(document)
        }
    }

    /// Get the POS-tagged tokens stored at `key`.
    pub fn tagged(&self, key: &str) -> Result<Vec<TaggedToken>, Error> {
        match self.0.get(key) {
            Some(value) => Ok(Vec::<TaggedToken>::deserialize(value)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Mapping from lemma to the surface tokens that match it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LemmaTokens(BTreeMap<String, BTreeSet<String>>);

impl LemmaTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object `lemma -> [token, ...]`.
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        load_json(src)
    }

    pub fn insert(&mut self, lemma: &str, token: &str) {
        self.0
            .entry(lemma.to_string())
            .or_default()
            .insert(token.to_string());
    }

    pub fn get(&self, lemma: &str) -> Option<&BTreeSet<String>> {
        self.0.get(lemma)
    }

    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.0.contains_key(lemma)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, BTreeSet<String>> {
        self.0.iter()
    }

    pub fn lemmas(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove each lemma's own base form from its tokens.
    pub fn without_base_form(mut self) -> Self {
        for (lemma, tokens) in self.0.iter_mut() {
            tokens.remove(lemma);
        }
        self
    }

    /// Lemmas along with their lowercased tokens.
    pub fn lowercased(&self) -> Vec<(String, HashSet<String>)> {
        self.0
            .iter()
            .map(|(lemma, tokens)| {
                (
                    lemma.clone(),
                    tokens.iter().map(|t| t.to_lowercase()).collect(),
                )
            })
            .collect()
    }

    /// Reverse mapping, from lowercased token to lemma.
    ///
    /// A token shared by several lemmas is attributed to the last one in lemma order.
    pub fn token_to_lemma(&self) -> BTreeMap<String, String> {
        let mut reverse = BTreeMap::new();
        for (lemma, tokens) in &self.0 {
            for token in tokens {
                reverse.insert(token.to_lowercase(), lemma.clone());
            }
        }
        reverse
    }
}

impl<'a> IntoIterator for &'a LemmaTokens {
    type Item = (&'a String, &'a BTreeSet<String>);
    type IntoIter = btree_map::Iter<'a, String, BTreeSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sentence extracted from a corpus item, attributed to a single lexical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub lu: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged: Option<Vec<TaggedToken>>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Sentence {
    pub fn new(lu: &str, text: &str, url: &str) -> Self {
        Self {
            id: None,
            lu: lu.to_string(),
            text: text.to_string(),
            tagged: None,
            url: url.to_string(),
            name: None,
        }
    }

    pub fn with_tagged(mut self, tagged: Vec<TaggedToken>) -> Self {
        self.tagged = Some(tagged);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> CorpusItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn document_string() {
        let i = item(json!({"name": "X", "url": "http://u", "bio": "She died."}));
        assert_eq!(i.name(), Some("X"));
        assert_eq!(i.url(), Some("http://u"));
        assert_eq!(i.document("bio").unwrap(), "She died.");
        assert!(i.document("other").is_none());
    }

    #[test]
    fn document_paragraphs() {
        let i = item(json!({"bio": ["first.", "second."]}));
        assert_eq!(i.document("bio").unwrap(), "first.\nsecond.");
    }

    #[test]
    fn empty_fields() {
        let i = item(json!({"name": "", "url": null, "bio": "  "}));
        assert!(i.name().is_none());
        assert!(i.url().is_none());
        assert!(i.document("bio").is_none());
    }

    #[test]
    fn item_roundtrip_keeps_fields() {
        let value = json!({"name": "X", "url": "http://u", "birth": "1900"});
        let i = item(value.clone());
        assert_eq!(serde_json::to_value(&i).unwrap(), value);
    }

    #[test]
    fn tagged_field() {
        let i = item(json!({"pos_tag": [["died", "VVD", "die"]]}));
        assert_eq!(
            i.tagged("pos_tag").unwrap(),
            vec![TaggedToken::new("died", "VVD", "die")]
        );
        assert!(i.tagged("missing").unwrap().is_empty());
        let bad = item(json!({"pos_tag": "nope"}));
        assert!(bad.tagged("pos_tag").is_err());
    }

    #[test]
    fn base_form_filtering() {
        let lt: LemmaTokens =
            serde_json::from_value(json!({"die": ["die", "died", "dies"], "bear": ["born"]}))
                .unwrap();
        let filtered = lt.without_base_form();
        assert_eq!(filtered.get("die").unwrap().len(), 2);
        assert!(!filtered.get("die").unwrap().contains("die"));
        assert_eq!(filtered.get("bear").unwrap().len(), 1);
    }

    #[test]
    fn reverse_mapping() {
        let mut lt = LemmaTokens::new();
        lt.insert("die", "Died");
        lt.insert("bear", "born");
        let reverse = lt.token_to_lemma();
        assert_eq!(reverse.get("died").unwrap(), "die");
        assert_eq!(reverse.get("born").unwrap(), "bear");
    }

    #[test]
    fn sentence_serialization() {
        let s = Sentence::new("die", "She died.", "http://u");
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v, json!({"lu": "die", "text": "She died.", "url": "http://u"}));
    }
}
