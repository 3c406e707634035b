//! Regular-expression chunking over POS tags.
//!
//! A grammar is a cascade of rules, one per line:
//!
//! ```text
//! NOPH: {<DT>?<JJ.*>*<N.+>+}
//! CHUNK: {<NOPH><V.+>+<NOPH>}
//! ```
//!
//! Each rule is applied in order on the output of the previous one:
//! spans of tags matching the pattern between braces are grouped into a node with the rule label,
//! and later rules see that node as a single `<LABEL>` tag.
//!
//! Inside a tag pattern, `.` never matches across tag boundaries, so `<N.*>` matches `<NN>` but not `<N><VB>`.
use log::debug;
use regex::Regex;

use crate::error::Error;

use super::tag::TaggedToken;
use super::tree::Tree;

/// Root label of chunked sentences.
const ROOT_LABEL: &str = "S";

#[derive(Debug)]
struct ChunkRule {
    label: String,
    pattern: Regex,
}

impl ChunkRule {
    /// Group the spans of `nodes` matched by the rule.
    fn apply(&self, nodes: Vec<Tree>) -> Vec<Tree> {
        // one <tag> per node, keeping the byte offset where each one starts
        let mut haystack = String::new();
        let mut starts = Vec::with_capacity(nodes.len() + 1);
        for node in &nodes {
            starts.push(haystack.len());
            haystack.push('<');
            haystack.push_str(node.label().unwrap_or_default());
            haystack.push('>');
        }
        starts.push(haystack.len());

        let spans: Vec<(usize, usize)> = self
            .pattern
            .find_iter(&haystack)
            .filter(|m| m.start() < m.end())
            .filter_map(|m| {
                match (starts.binary_search(&m.start()), starts.binary_search(&m.end())) {
                    (Ok(first), Ok(last)) => Some((first, last)),
                    _ => {
                        debug!("{}: match {:?} not aligned on tags", self.label, m.as_str());
                        None
                    }
                }
            })
            .collect();

        if spans.is_empty() {
            return nodes;
        }

        let mut chunked = Vec::with_capacity(nodes.len());
        let mut nodes = nodes.into_iter();
        let mut pos = 0;
        for (first, last) in spans {
            chunked.extend(nodes.by_ref().take(first - pos));
            let children: Vec<Tree> = nodes.by_ref().take(last - first).collect();
            chunked.push(Tree::node(&self.label, children));
            pos = last;
        }
        chunked.extend(nodes);

        chunked
    }
}

/// Cascaded chunk parser.
#[derive(Debug)]
pub struct RegexpChunker {
    rules: Vec<ChunkRule>,
}

impl RegexpChunker {
    /// Compile a chunk grammar.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn new(grammar: &str) -> Result<Self, Error> {
        let mut rules = Vec::new();

        for (idx, line) in grammar.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, body) = line.split_once(':').ok_or_else(|| {
                Error::Grammar(format!("line {}: missing ':' in {:?}", idx + 1, line))
            })?;
            let label = label.trim();
            if label.is_empty()
                || !label
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
            {
                return Err(Error::Grammar(format!(
                    "line {}: invalid label {:?}",
                    idx + 1,
                    label
                )));
            }

            let body = body.trim();
            let pattern = body
                .strip_prefix('{')
                .and_then(|b| b.strip_suffix('}'))
                .ok_or_else(|| {
                    Error::Grammar(format!(
                        "line {}: only chunk rules ({{...}}) are supported, got {:?}",
                        idx + 1,
                        body
                    ))
                })?;

            let pattern = Regex::new(&tag_pattern_to_regex(pattern)?)?;
            rules.push(ChunkRule {
                label: label.to_string(),
                pattern,
            });
        }

        if rules.is_empty() {
            return Err(Error::Grammar("empty grammar".to_string()));
        }

        Ok(Self { rules })
    }

    /// Chunk a tagged sentence.
    ///
    /// Tokens become `(pos token)` preterminals under a root `S` node.
    pub fn parse(&self, tagged: &[TaggedToken]) -> Tree {
        let mut nodes: Vec<Tree> = tagged
            .iter()
            .map(|t| Tree::preterminal(t.pos(), t.token()))
            .collect();

        for rule in &self.rules {
            nodes = rule.apply(nodes);
        }

        Tree::node(ROOT_LABEL, nodes)
    }
}

/// Convert a tag pattern into a regular expression over `<tag>` sequences.
fn tag_pattern_to_regex(tag_pattern: &str) -> Result<String, Error> {
    let tag_pattern: String = tag_pattern.chars().filter(|c| !c.is_whitespace()).collect();
    if !tag_pattern.contains('<') {
        return Err(Error::Grammar(format!(
            "tag pattern {:?} has no tag",
            tag_pattern
        )));
    }

    let mut re = String::with_capacity(tag_pattern.len() * 2);
    let mut in_tag = false;
    let mut escaped = false;

    for c in tag_pattern.chars() {
        if escaped {
            re.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' => {
                re.push(c);
                escaped = true;
            }
            '<' if in_tag => {
                return Err(Error::Grammar(format!(
                    "nested '<' in tag pattern {:?}",
                    tag_pattern
                )))
            }
            '<' => {
                in_tag = true;
                re.push_str("(?:<(?:");
            }
            '>' if !in_tag => {
                return Err(Error::Grammar(format!(
                    "unbalanced '>' in tag pattern {:?}",
                    tag_pattern
                )))
            }
            '>' => {
                in_tag = false;
                re.push_str(")>)");
            }
            '{' | '}' => {
                return Err(Error::Grammar(format!(
                    "braces are not allowed in tag pattern {:?}",
                    tag_pattern
                )))
            }
            '.' => re.push_str(r"[^\{\}<>]"),
            c => re.push(c),
        }
    }

    if in_tag || escaped {
        return Err(Error::Grammar(format!(
            "unterminated tag pattern {:?}",
            tag_pattern
        )));
    }

    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang;

    fn tagged(tokens: &[(&str, &str)]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|(token, pos)| TaggedToken::new(token, pos, token))
            .collect()
    }

    #[test]
    fn pattern_conversion() {
        assert_eq!(
            tag_pattern_to_regex("<N.*>+").unwrap(),
            r"(?:<(?:N[^\{\}<>]*)>)+"
        );
        assert_eq!(
            tag_pattern_to_regex("<DT|PP.*|>?").unwrap(),
            r"(?:<(?:DT|PP[^\{\}<>]*|)>)?"
        );
    }

    #[test]
    fn pattern_errors() {
        assert!(tag_pattern_to_regex("NN").is_err());
        assert!(tag_pattern_to_regex("<NN").is_err());
        assert!(tag_pattern_to_regex("NN>").is_err());
        assert!(tag_pattern_to_regex("<<NN>>").is_err());
    }

    #[test]
    fn grammar_errors() {
        assert!(RegexpChunker::new("").is_err());
        assert!(RegexpChunker::new("NP {<NN>}").is_err());
        assert!(RegexpChunker::new("NP: }<NN>{").is_err());
    }

    #[test]
    fn single_rule() {
        let chunker = RegexpChunker::new("NP: {<DT>?<JJ>*<NN>}").unwrap();
        let t = chunker.parse(&tagged(&[
            ("the", "DT"),
            ("old", "JJ"),
            ("man", "NN"),
            ("slept", "VVD"),
        ]));

        assert_eq!(t.to_string(), "(S (NP (DT the) (JJ old) (NN man)) (VVD slept))");
    }

    #[test]
    fn dot_stays_within_tag() {
        let chunker = RegexpChunker::new("X: {<N.*>}").unwrap();
        let t = chunker.parse(&tagged(&[("a", "N"), ("b", "VB")]));
        assert_eq!(t.subtrees("X").len(), 1);
        assert_eq!(t.subtrees("X")[0].text(), "a");
    }

    #[test]
    fn english_cascade() {
        let chunker = RegexpChunker::new(lang::grammar("en").unwrap()).unwrap();
        let t = chunker.parse(&tagged(&[
            ("The", "DT"),
            ("writer", "NN"),
            ("married", "VVD"),
            ("the", "DT"),
            ("daughter", "NN"),
            ("of", "IN"),
            ("a", "DT"),
            ("priest", "NN"),
            (".", "SENT"),
        ]));

        let chunks = t.subtrees("CHUNK");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text(), "The writer married the daughter");
        assert_eq!(chunks[0].subtrees("NOPH").len(), 2);
    }

    #[test]
    fn italian_cascade() {
        let chunker = RegexpChunker::new(lang::grammar("it").unwrap()).unwrap();
        let t = chunker.parse(&tagged(&[
            ("Dante", "NPR"),
            ("scrisse", "VER:remo"),
            ("la", "DET:def"),
            ("Commedia", "NPR"),
        ]));

        let chunks = t.subtrees("CHUNK");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text(), "Dante scrisse la Commedia");
    }

    #[test]
    fn no_chunk() {
        let chunker = RegexpChunker::new(lang::grammar("en").unwrap()).unwrap();
        let t = chunker.parse(&tagged(&[("died", "VVD"), (".", "SENT")]));
        assert!(t.subtrees("CHUNK").is_empty());
        assert_eq!(t.children().len(), 2);
    }
}
