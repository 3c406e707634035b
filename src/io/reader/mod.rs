/*! Corpus reading utilities

Corpora, sentences and lemma/token mappings are all JSON based.
!*/
mod jsonlines;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::extraction::CorpusItem;

pub use jsonlines::JsonLines;

/// Corpus items, one per line.
pub type CorpusReader = JsonLines<CorpusItem>;

/// Load a whole JSON document (not JSON lines).
pub fn load_json<T: DeserializeOwned>(src: &Path) -> Result<T, Error> {
    let f = File::open(src)?;
    Ok(serde_json::from_reader(BufReader::new(f))?)
}
