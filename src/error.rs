//! Error enum
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Regex(regex::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
    Http(reqwest::Error),
    UnsupportedLanguage(String),
    UnknownStrategy(String),
    Grammar(String),
    Tree(String),
    Parser(String),
    Tagger(String),
    Credentials(String),
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Serde(e) => write!(f, "json error: {}", e),
            Error::Glob(e) => write!(f, "glob error: {}", e),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {}", e),
            Error::Regex(e) => write!(f, "regex error: {}", e),
            Error::ThreadPool(e) => write!(f, "thread pool error: {}", e),
            Error::Http(e) => write!(f, "http error: {}", e),
            Error::UnsupportedLanguage(lang) => {
                write!(f, "invalid or unsupported language: '{}'", lang)
            }
            Error::UnknownStrategy(s) => write!(
                f,
                "malformed or unsupported extraction strategy '{}': use one of n2n, 121, grammar, syntactic",
                s
            ),
            Error::Grammar(msg) => write!(f, "grammar error: {}", msg),
            Error::Tree(msg) => write!(f, "malformed parse tree: {}", msg),
            Error::Parser(msg) => write!(f, "parser error: {}", msg),
            Error::Tagger(msg) => write!(f, "tagger error: {}", msg),
            Error::Credentials(msg) => write!(f, "missing credentials: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Error {
        Error::Regex(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Error {
        Error::ThreadPool(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(v: reqwest::Error) -> Self {
        Self::Http(v)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
