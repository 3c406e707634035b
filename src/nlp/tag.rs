//! Part-of-speech tagging.
//!
//! A [Tagger] yields `(token, pos, lemma)` triples for a sentence.
//! Tag labels follow the TreeTagger tagsets.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::split::tokenize;

/// Lemma given to tokens the tagger does not know.
const UNKNOWN_LEMMA: &str = "<unknown>";

/// A `(token, pos, lemma)` triple.
///
/// Serialized as a 3-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedToken(pub String, pub String, pub String);

impl TaggedToken {
    pub fn new(token: &str, pos: &str, lemma: &str) -> Self {
        Self(token.to_string(), pos.to_string(), lemma.to_string())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn pos(&self) -> &str {
        &self.1
    }

    pub fn lemma(&self) -> &str {
        &self.2
    }

    pub fn is_verb(&self, prefix: &str) -> bool {
        self.pos().starts_with(prefix)
    }
}

pub trait Tagger: Send + Sync {
    fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, Error>;

    /// Tag the sentences of a document.
    ///
    /// The outer error fails the whole document,
    /// inner errors only concern their sentence.
    #[allow(clippy::type_complexity)]
    fn tag_sents(
        &self,
        sentences: &[String],
    ) -> Result<Vec<Result<Vec<TaggedToken>, Error>>, Error> {
        Ok(sentences.iter().map(|s| self.tag(s)).collect())
    }
}

/// Dictionary-based tagger.
///
/// Lexicon files are tab-separated, one `token<TAB>pos<TAB>lemma` entry per line.
/// Lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct LexiconTagger {
    entries: HashMap<String, (String, String)>,
}

impl LexiconTagger {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let f = File::open(src)?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut tagger = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(token), Some(pos), Some(lemma)) if !token.is_empty() && !pos.is_empty() => {
                    tagger.insert(token, pos, lemma)
                }
                _ => {
                    return Err(Error::Tagger(format!(
                        "lexicon line {}: expected token, pos and lemma, got {:?}",
                        idx + 1,
                        line
                    )))
                }
            }
        }

        debug!("lexicon loaded: {} entries", tagger.len());
        Ok(tagger)
    }

    pub fn insert(&mut self, token: &str, pos: &str, lemma: &str) {
        self.entries
            .insert(token.to_lowercase(), (pos.to_string(), lemma.to_string()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tag_token(&self, token: &str) -> TaggedToken {
        if let Some((pos, lemma)) = self.entries.get(&token.to_lowercase()) {
            return TaggedToken::new(token, pos, lemma);
        }

        if token.chars().any(|c| c.is_numeric())
            && token
                .chars()
                .all(|c| c.is_numeric() || matches!(c, ',' | '.' | '-' | '/'))
        {
            return TaggedToken::new(token, "CD", "@card@");
        }

        if token.chars().all(|c| !c.is_alphanumeric()) {
            let pos = match token {
                "." | "!" | "?" => "SENT",
                "," => ",",
                "(" | "[" => "(",
                ")" | "]" => ")",
                _ => ":",
            };
            return TaggedToken::new(token, pos, token);
        }

        let pos = if token.chars().next().map_or(false, char::is_uppercase) {
            "NP"
        } else {
            "NN"
        };
        TaggedToken::new(token, pos, UNKNOWN_LEMMA)
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, Error> {
        Ok(tokenize(sentence)
            .into_iter()
            .map(|token| self.tag_token(token))
            .collect())
    }
}

/// SGML tag separating sentences, passed through untouched by TreeTagger wrappers.
const SENTENCE_MARK: &str = "<strephit-sentence/>";

/// Tagger backed by an external command.
///
/// All the sentences of a document are written on the command's stdin in one go,
/// each followed by a [SENTENCE_MARK] line,
/// and tab-separated `token<TAB>pos<TAB>lemma` lines are read back from its stdout
/// (TreeTagger wrapper scripts behave this way).
#[derive(Debug, Clone)]
pub struct CommandTagger {
    program: String,
    args: Vec<String>,
}

impl CommandTagger {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Run the command once over `input`, returning its stdout.
    fn run(&self, input: String) -> Result<String, Error> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Tagger(format!("{}: no stdin", self.program)))?;
        // fed from another thread so that a full stdout pipe can't block us
        let feeder = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        match feeder.join() {
            Ok(written) => written?,
            Err(_) => return Err(Error::Tagger(format!("{}: stdin writer panicked", self.program))),
        }

        if !output.status.success() {
            return Err(Error::Tagger(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Tagger for CommandTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, Error> {
        let output = self.run(format!("{}\n", sentence))?;
        parse_tagger_output(&output)
    }

    fn tag_sents(
        &self,
        sentences: &[String],
    ) -> Result<Vec<Result<Vec<TaggedToken>, Error>>, Error> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let mut input = String::new();
        for sentence in sentences {
            input.push_str(&sentence.replace(['\n', '\r'], " "));
            input.push('\n');
            input.push_str(SENTENCE_MARK);
            input.push('\n');
        }

        let output = self.run(input)?;
        let tagged = split_tagger_output(&output);
        if tagged.len() != sentences.len() {
            return Err(Error::Tagger(format!(
                "{}: tagged {} sentences out of {}",
                self.program,
                tagged.len(),
                sentences.len()
            )));
        }

        Ok(tagged)
    }
}

fn parse_tagger_line(line: &str) -> Result<TaggedToken, Error> {
    let mut fields = line.split('\t');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(token), Some(pos), lemma) => Ok(TaggedToken::new(
            token,
            pos.trim(),
            lemma.map(str::trim).unwrap_or(token),
        )),
        _ => Err(Error::Tagger(format!("malformed tagger line: {:?}", line))),
    }
}

/// Parse tab-separated tagger output.
///
/// A missing lemma column falls back to the token itself.
pub fn parse_tagger_output(output: &str) -> Result<Vec<TaggedToken>, Error> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_tagger_line)
        .collect()
}

/// Parse the tagger output of several sentences separated by [SENTENCE_MARK] lines.
///
/// A malformed line only fails its own sentence.
#[allow(clippy::type_complexity)]
fn split_tagger_output(output: &str) -> Vec<Result<Vec<TaggedToken>, Error>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        // some wrappers append tag and lemma columns to SGML lines
        if line.split('\t').next().map(str::trim) == Some(SENTENCE_MARK) {
            sentences.push(current.into_iter().collect());
            current = Vec::new();
        } else {
            current.push(parse_tagger_line(line));
        }
    }
    sentences
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn lexicon() -> LexiconTagger {
        let lex = "# test lexicon
she\tPP\tshe
was\tVBD\tbe
born\tVVN\tbear
died\tVVD\tdie
in\tIN\tin
";
        LexiconTagger::from_reader(Cursor::new(lex)).unwrap()
    }

    #[test]
    fn lexicon_lookup() {
        let tagger = lexicon();
        assert_eq!(tagger.len(), 5);

        let tagged = tagger.tag("She was born in 1900.").unwrap();
        let expected = vec![
            TaggedToken::new("She", "PP", "she"),
            TaggedToken::new("was", "VBD", "be"),
            TaggedToken::new("born", "VVN", "bear"),
            TaggedToken::new("in", "IN", "in"),
            TaggedToken::new("1900", "CD", "@card@"),
            TaggedToken::new(".", "SENT", "."),
        ];
        assert_eq!(tagged, expected);
    }

    #[test]
    fn unknown_tokens() {
        let tagger = LexiconTagger::default();
        let tagged = tagger.tag("Rome wins, again").unwrap();
        assert_eq!(tagged[0], TaggedToken::new("Rome", "NP", UNKNOWN_LEMMA));
        assert_eq!(tagged[1], TaggedToken::new("wins", "NN", UNKNOWN_LEMMA));
        assert_eq!(tagged[2], TaggedToken::new(",", ",", ","));
    }

    #[test]
    fn malformed_lexicon() {
        let lex = "she\tPP\n";
        assert!(LexiconTagger::from_reader(Cursor::new(lex)).is_err());
    }

    #[test]
    fn tagger_output() {
        let out = "She\tPP\tshe\ndied\tVVD\tdie\n\n.\tSENT\n";
        let tagged = parse_tagger_output(out).unwrap();
        assert_eq!(tagged.len(), 3);
        assert_eq!(tagged[1], TaggedToken::new("died", "VVD", "die"));
        assert_eq!(tagged[2], TaggedToken::new(".", "SENT", "."));
    }

    #[test]
    fn tagger_output_of_several_sentences() {
        let out = format!(
            "She\tPP\tshe\ndied\tVVD\tdie\n{mark}\nlonely\n{mark}\n{mark}\tSYM\t{mark}\n",
            mark = SENTENCE_MARK
        );
        let tagged = split_tagger_output(&out);

        assert_eq!(tagged.len(), 3);
        assert_eq!(tagged[0].as_ref().unwrap().len(), 2);
        assert!(matches!(tagged[1], Err(Error::Tagger(_))));
        assert!(tagged[2].as_ref().unwrap().is_empty());
    }

    #[test]
    fn lexicon_tags_sentences_one_by_one() {
        let sentences = vec!["She died.".to_string(), "She was born.".to_string()];
        let tagged = lexicon().tag_sents(&sentences).unwrap();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[1].as_ref().unwrap()[2], TaggedToken::new("born", "VVN", "bear"));
    }

    #[cfg(unix)]
    #[test]
    fn command_tags_a_document_in_one_run() {
        // echoes every input line back as a tagged token
        let tagger = CommandTagger::new(
            "sh",
            vec![
                "-c".to_string(),
                "while read -r line; do printf '%s\\tX\\t%s\\n' \"$line\" \"$line\"; done".to_string(),
            ],
        );
        let sentences = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let tagged = tagger.tag_sents(&sentences).unwrap();

        assert_eq!(tagged.len(), 3);
        assert_eq!(tagged[1].as_ref().unwrap(), &vec![TaggedToken::new("two", "X", "two")]);
    }

    #[test]
    fn missing_command() {
        let tagger = CommandTagger::new("strephit-no-such-tagger", Vec::new());
        assert!(tagger.tag_sents(&["She died.".to_string()]).is_err());
    }

    #[test]
    fn tagger_output_malformed() {
        assert!(parse_tagger_output("lonely\n").is_err());
    }

    #[test]
    fn tagged_token_serializes_as_triple() {
        let t = TaggedToken::new("died", "VVD", "die");
        assert_eq!(
            serde_json::to_string(&t).unwrap(),
            r#"["died","VVD","die"]"#
        );
        assert!(t.is_verb("V"));
    }
}
