//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use strephit::extraction::{ExtractorSettings, Strategy};
use strephit::pipelines::{ExtractSentences, ParserSpec, RankVerbs as RankVerbsPipeline, RankingDumps, TaggerSpec};

#[derive(Debug, StructOpt)]
#[structopt(name = "strephit", about = "text-mining tools for biographical corpora.")]
/// Holds every command that is callable by the `strephit` command.
pub enum Strephit {
    #[structopt(about = "Extract sentences holding lexical units from a corpus")]
    Extract(Extract),
    #[structopt(about = "Rank the verbs of a POS-tagged corpus")]
    RankVerbs(RankVerbs),
    #[structopt(about = "Link the entities of extracted sentences")]
    Link(Link),
}

/// Split a whitespace-separated argument list.
fn split_args(args: &Option<String>) -> Vec<String> {
    args.as_deref()
        .map(|args| args.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

#[derive(Debug, StructOpt)]
/// Extract command and parameters.
///
/// ```sh
/// strephit-extract 0.1.0
/// Extract sentences holding lexical units from a corpus
///
/// USAGE:
///     strephit extract [FLAGS] [OPTIONS] <corpus> <lemma-to-tokens> <language-code>
///
/// FLAGS:
///         --match-base-form    match the base form of lemmas too
///
/// OPTIONS:
///     -s, --strategy <strategy>        n2n, 121, grammar or syntactic [default: n2n]
///     -o, --outfile <outfile>          [default: output/sentences.jsonlines]
///     -p, --processes <processes>      [default: 0]
/// ```
pub struct Extract {
    #[structopt(
        parse(from_os_str),
        help = "corpus location: JSON lines file (optionally gzipped) or directory"
    )]
    pub corpus: PathBuf,
    #[structopt(parse(from_os_str), help = "JSON object mapping lemmas to their tokens")]
    pub lemma_to_tokens: PathBuf,
    #[structopt(help = "ISO 639-1 language code of the corpus")]
    pub language_code: String,
    #[structopt(
        short = "s",
        long = "strategy",
        default_value = "n2n",
        help = "extraction strategy: n2n (many-to-many), 121 (one-to-one), grammar or syntactic"
    )]
    pub strategy: Strategy,
    #[structopt(
        short = "o",
        long = "outfile",
        parse(from_os_str),
        default_value = "output/sentences.jsonlines"
    )]
    pub outfile: PathBuf,
    #[structopt(
        long = "document-key",
        default_value = "bio",
        help = "item field holding the document"
    )]
    pub document_key: String,
    #[structopt(
        short = "p",
        long = "processes",
        default_value = "0",
        help = "worker threads, 0 for sequential processing"
    )]
    pub processes: usize,
    #[structopt(long = "match-base-form", help = "match the base form of lemmas too")]
    pub match_base_form: bool,
    #[structopt(
        long = "lexicon",
        parse(from_os_str),
        help = "tag with a token/pos/lemma TSV lexicon instead of TreeTagger"
    )]
    pub lexicon: Option<PathBuf>,
    #[structopt(long = "tagger-cmd", help = "POS tagger command, defaults to the language's TreeTagger wrapper")]
    pub tagger_cmd: Option<String>,
    #[structopt(
        long = "tagger-args",
        allow_hyphen_values = true,
        help = "whitespace-separated POS tagger arguments"
    )]
    pub tagger_args: Option<String>,
    #[structopt(long = "parser-cmd", help = "constituency parser command, defaults to the Stanford parser")]
    pub parser_cmd: Option<String>,
    #[structopt(
        long = "parser-args",
        allow_hyphen_values = true,
        help = "whitespace-separated constituency parser arguments"
    )]
    pub parser_args: Option<String>,
}

impl From<Extract> for ExtractSentences {
    fn from(e: Extract) -> Self {
        let tagger = match (&e.lexicon, &e.tagger_cmd) {
            (Some(lexicon), _) => TaggerSpec::Lexicon(lexicon.clone()),
            (None, Some(program)) => TaggerSpec::Command {
                program: program.clone(),
                args: split_args(&e.tagger_args),
            },
            (None, None) => TaggerSpec::Default,
        };

        let parser = match &e.parser_cmd {
            Some(program) => ParserSpec::Command {
                program: program.clone(),
                args: split_args(&e.parser_args),
            },
            None => ParserSpec::Stanford,
        };

        let settings = ExtractorSettings {
            language: e.language_code,
            document_key: e.document_key,
            match_base_form: e.match_base_form,
        };

        ExtractSentences::new(
            e.corpus,
            e.lemma_to_tokens,
            e.outfile,
            e.strategy,
            settings,
            e.processes,
        )
        .with_tagger(tagger)
        .with_parser(parser)
    }
}

#[derive(Debug, StructOpt)]
/// Verb ranking command and parameters.
pub struct RankVerbs {
    #[structopt(parse(from_os_str), help = "POS-tagged corpus location")]
    pub pos_tagged: PathBuf,
    #[structopt(help = "item field holding the document")]
    pub document_key: String,
    #[structopt(help = "ISO 639-1 language code of the corpus")]
    pub language: String,
    #[structopt(long = "pos-tag-key", default_value = "pos_tag")]
    pub pos_tag_key: String,
    #[structopt(long = "dump-verbs", parse(from_os_str), default_value = "dev/verbs.json")]
    pub dump_verbs: PathBuf,
    #[structopt(
        long = "dump-tf-idf",
        parse(from_os_str),
        default_value = "dev/tf_idf_ranking.json"
    )]
    pub dump_tf_idf: PathBuf,
    #[structopt(
        long = "dump-stdev",
        parse(from_os_str),
        default_value = "dev/stdev_ranking.json"
    )]
    pub dump_stdev: PathBuf,
    #[structopt(
        long = "dump-popularity",
        parse(from_os_str),
        default_value = "dev/popularity_ranking.json"
    )]
    pub dump_popularity: PathBuf,
    #[structopt(
        long = "dump-final",
        parse(from_os_str),
        default_value = "dev/verb_ranking.json"
    )]
    pub dump_final: PathBuf,
    #[structopt(short = "p", long = "processes", default_value = "0")]
    pub processes: usize,
}

impl From<RankVerbs> for RankVerbsPipeline {
    fn from(r: RankVerbs) -> Self {
        let dumps = RankingDumps {
            verbs: r.dump_verbs,
            tf_idf: r.dump_tf_idf,
            stdev: r.dump_stdev,
            popularity: r.dump_popularity,
            final_ranking: r.dump_final,
        };

        RankVerbsPipeline::new(
            r.pos_tagged,
            r.document_key,
            r.pos_tag_key,
            r.language,
            dumps,
            r.processes,
        )
    }
}

#[derive(Debug, StructOpt)]
/// Entity linking command and parameters.
///
/// Dandelion credentials are read from `NEX_TOKEN`, or `NEX_ID` and `NEX_KEY`.
pub struct Link {
    #[structopt(parse(from_os_str), help = "extracted sentences (JSON lines)")]
    pub sentences: PathBuf,
    #[structopt(help = "ISO 639-1 language code of the sentences")]
    pub language: String,
    #[structopt(short = "p", long = "processes", default_value = "0")]
    pub processes: usize,
    #[structopt(
        short = "o",
        long = "outfile",
        parse(from_os_str),
        default_value = "output/entity_linked.jsonlines"
    )]
    pub outfile: PathBuf,
    #[structopt(
        short = "c",
        long = "confidence",
        default_value = "0.25",
        help = "Minimum confidence score"
    )]
    pub confidence: f64,
}
