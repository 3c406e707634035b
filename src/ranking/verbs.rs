//! Verbal lemmas of a POS-tagged corpus.
use log::{debug, warn};

use crate::error::Error;
use crate::extraction::{CorpusItem, LemmaTokens};
use crate::lang;

/// Map every verbal lemma of `corpus` to all its tokens, both lowercased.
///
/// Items carry their `(token, pos, lemma)` triples under `pos_tag_key`.
/// Fails early if there's no verbal prefix for `language`.
pub fn produce_lemma_tokens<I>(
    corpus: I,
    pos_tag_key: &str,
    language: &str,
) -> Result<LemmaTokens, Error>
where
    I: IntoIterator<Item = CorpusItem>,
{
    let prefix = lang::verbal_prefix(language)?;
    let mut lemma_tokens = LemmaTokens::new();

    for item in corpus {
        let tagged = match item.tagged(pos_tag_key) {
            Ok(tagged) => tagged,
            Err(e) => {
                warn!(
                    "skipping item with malformed '{}' ({:?}): {}",
                    pos_tag_key,
                    item.url(),
                    e
                );
                continue;
            }
        };

        for t in tagged.iter().filter(|t| t.is_verb(prefix)) {
            lemma_tokens.insert(&t.lemma().to_lowercase(), &t.token().to_lowercase());
        }
    }

    debug!("{} verbal lemmas found", lemma_tokens.len());
    Ok(lemma_tokens)
}
