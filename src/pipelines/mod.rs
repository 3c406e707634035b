//! Pipelines.
//!
//! One pipeline per command line tool, built on a light [pipeline::Pipeline] trait:
//!
//! - [ExtractSentences]: extract LU sentences from a corpus,
//! - [RankVerbs]: rank the verbs of a POS-tagged corpus,
//! - [LinkEntities]: link the entities of extracted sentences.
mod extract;
mod link;
#[allow(clippy::module_inception)]
pub mod pipeline;
mod rank;

use log::error;

use crate::error::Error;

pub use extract::{ExtractSentences, ParserSpec, TaggerSpec};
pub use link::LinkEntities;
pub use pipeline::Pipeline;
pub use rank::{RankVerbs, RankingDumps};

/// Log and drop undecodable input lines.
fn skip_malformed<T, I>(items: I) -> impl Iterator<Item = T>
where
    I: Iterator<Item = Result<T, Error>>,
{
    items.filter_map(|item| match item {
        Ok(item) => Some(item),
        Err(e) => {
            error!("skipping malformed input line: {}", e);
            None
        }
    })
}
