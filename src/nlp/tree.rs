//! Labelled trees.
//!
//! Used both for constituency parses (read from Penn Treebank bracketed notation)
//! and for chunked sentences.
//! Traversals are iterative so that deep parses don't blow the stack.
use std::fmt;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Node { label: String, children: Vec<Tree> },
    Leaf(String),
}

/// Open node while reading bracketed notation.
struct Frame {
    label: Option<String>,
    children: Vec<Tree>,
}

impl Frame {
    fn close(self) -> Tree {
        Tree::Node {
            label: self.label.unwrap_or_default(),
            children: self.children,
        }
    }
}

impl Tree {
    pub fn node(label: &str, children: Vec<Tree>) -> Self {
        Tree::Node {
            label: label.to_string(),
            children,
        }
    }

    /// Node holding a single word, e.g. `(NN cat)`.
    pub fn preterminal(label: &str, word: &str) -> Self {
        Tree::node(label, vec![Tree::Leaf(word.to_string())])
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Tree::Node { label, .. } => Some(label),
            Tree::Leaf(_) => None,
        }
    }

    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Node { children, .. } => children,
            Tree::Leaf(_) => &[],
        }
    }

    pub fn is_preterminal(&self) -> bool {
        matches!(self.children(), [Tree::Leaf(_)])
    }

    /// Read a single tree in bracketed notation.
    pub fn parse(src: &str) -> Result<Tree, Error> {
        let mut trees = Self::parse_many(src)?;
        match trees.len() {
            1 => Ok(trees.remove(0)),
            0 => Err(Error::Tree("no tree found".to_string())),
            n => Err(Error::Tree(format!("expected one tree, found {}", n))),
        }
    }

    /// Read consecutive trees in bracketed notation, whatever the line layout.
    pub fn parse_many(src: &str) -> Result<Vec<Tree>, Error> {
        let mut trees = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut chars = src.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            match c {
                '(' => stack.push(Frame {
                    label: None,
                    children: Vec::new(),
                }),
                ')' => {
                    let frame = stack.pop().ok_or_else(|| {
                        Error::Tree(format!("unbalanced ')' at byte {}", start))
                    })?;
                    let node = frame.close();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => trees.push(node),
                    }
                }
                c if c.is_whitespace() => (),
                _ => {
                    let mut end = start + c.len_utf8();
                    while let Some(&(idx, next)) = chars.peek() {
                        if next.is_whitespace() || next == '(' || next == ')' {
                            break;
                        }
                        end = idx + next.len_utf8();
                        chars.next();
                    }
                    let atom = &src[start..end];

                    let frame = stack.last_mut().ok_or_else(|| {
                        Error::Tree(format!("unexpected {:?} outside of brackets", atom))
                    })?;
                    if frame.label.is_none() && frame.children.is_empty() {
                        frame.label = Some(atom.to_string());
                    } else {
                        frame.children.push(Tree::Leaf(atom.to_string()));
                    }
                }
            }
        }

        if !stack.is_empty() {
            return Err(Error::Tree(format!("{} unclosed bracket(s)", stack.len())));
        }

        Ok(trees)
    }

    /// Lowest `clause` nodes: nodes labelled `clause` with no `clause` descendant.
    ///
    /// Nodes are returned in post-order (left to right, bottom-up).
    pub fn sub_sentences(&self, clause: &str) -> Vec<&Tree> {
        let mut found = Vec::new();

        // (node, next child to visit, number of nodes found when entering node)
        let mut stack: Vec<(&Tree, usize, usize)> = vec![(self, 0, 0)];
        while let Some((node, idx, mark)) = stack.pop() {
            let children = node.children();
            if idx < children.len() {
                stack.push((node, idx + 1, mark));
                let child = &children[idx];
                if let Tree::Node { .. } = child {
                    stack.push((child, 0, found.len()));
                }
            } else if node.label() == Some(clause) && found.len() == mark {
                found.push(node);
            }
        }

        found
    }

    /// `(label, word)` of every preterminal, left to right.
    pub fn terminals(&self) -> Vec<(&str, &str)> {
        let mut terminals = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if let Tree::Node { label, children } = node {
                if let [Tree::Leaf(word)] = children.as_slice() {
                    terminals.push((label.as_str(), word.as_str()));
                } else {
                    stack.extend(children.iter().rev());
                }
            }
        }

        terminals
    }

    /// Preterminals whose label starts with `prefix`.
    pub fn terminals_with_prefix(&self, prefix: &str) -> Vec<(&str, &str)> {
        self.terminals()
            .into_iter()
            .filter(|(label, _)| label.starts_with(prefix))
            .collect()
    }

    /// Every subtree (self included) labelled `label`, in pre-order.
    pub fn subtrees(&self, label: &str) -> Vec<&Tree> {
        let mut subtrees = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if node.label() == Some(label) {
                subtrees.push(node);
            }
            stack.extend(node.children().iter().rev());
        }

        subtrees
    }

    /// Words of the tree joined by single spaces.
    pub fn text(&self) -> String {
        self.terminals()
            .into_iter()
            .map(|(_, word)| word)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Leaf(word) => write!(f, "{}", word),
            Tree::Node { label, children } => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
