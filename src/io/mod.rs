/*!
# IO utilities

Corpus loading and result saving. Everything is JSON: corpora and extracted sentences are JSON lines,
lemma tables and rankings are plain JSON documents.
!*/
pub mod reader;
pub mod writer;

pub use reader::{CorpusReader, JsonLines};
pub use writer::{dump_json, JsonLinesWriter, WriterTrait};
