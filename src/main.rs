//! # StrepHit
//!
//! Text-mining tools for biographical corpora.
//!
//! ## Getting started
//!
//! ```sh
//! strephit 0.1.0
//! text-mining tools for biographical corpora.
//!
//! USAGE:
//!     strephit <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     extract       Extract sentences holding lexical units from a corpus
//!     help          Prints this message or the help of the given subcommand(s)
//!     link          Link the entities of extracted sentences
//!     rank-verbs    Rank the verbs of a POS-tagged corpus
//! ```
//!
//! Logging is configured through `RUST_LOG`, e.g. `RUST_LOG=info strephit extract ...`.
use structopt::StructOpt;

use strephit::error::Error;
use strephit::pipelines::{ExtractSentences, LinkEntities, Pipeline, RankVerbs};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Strephit::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Strephit::Extract(e) => {
            let p = ExtractSentences::from(e);
            let nb_sentences = p.run()?;
            info!("Done, extracted {} sentences", nb_sentences);
        }

        cli::Strephit::RankVerbs(r) => {
            let p = RankVerbs::from(r);
            let ranking = p.run()?;
            info!("Done, ranked {} verbs", ranking.len());
        }

        cli::Strephit::Link(l) => {
            let p = LinkEntities::new(l.sentences, &l.language, l.outfile, l.confidence, l.processes)?;
            p.run()?;
        }
    };
    Ok(())
}
