/*! NLP building blocks.

Sentence splitting, tokenization, POS tagging, shallow chunking and constituency parsing.

Taggers and parsers are external collaborators more often than not, so they are
exposed through traits ([Tagger], [ConstituencyParser]) with a local and a
command-backed implementation each.
!*/
mod chunk;
mod parse;
mod split;
mod tag;
mod tree;

pub use chunk::RegexpChunker;
pub use parse::{CommandParser, ConstituencyParser};
pub use split::{tokenize, SentenceSplitter, UnicodeSplitter};
pub use tag::{parse_tagger_output, CommandTagger, LexiconTagger, TaggedToken, Tagger};
pub use tree::Tree;
