//! Constituency parsing.
//!
//! [CommandParser] keeps an external parser process alive between [ConstituencyParser::start]
//! and [ConstituencyParser::stop]. The process must read one sentence per line on its stdin
//! and print the bracketed parse of each sentence on its stdout, flushing after each one.
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;

use log::{debug, info, warn};

use crate::error::Error;

use super::tree::Tree;

/// Stanford lexicalized parser, with jars in `dev/`.
const STANFORD_PROGRAM: &str = "java";
const STANFORD_ARGS: &[&str] = &[
    "-mx2G",
    "-cp",
    "dev/stanford-corenlp-3.6.0.jar:dev/stanford-corenlp-3.6.0-models.jar",
    "edu.stanford.nlp.parser.lexparser.LexicalizedParser",
    "-sentences",
    "newline",
    "-outputFormat",
    "oneline",
    "edu/stanford/nlp/models/lexparser/englishPCFG.ser.gz",
    "-",
];

pub trait ConstituencyParser: Send + Sync {
    /// Acquire the parser resources.
    fn start(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Parse sentences.
    ///
    /// The outer error fails the whole batch of sentences,
    /// inner errors only concern their sentence.
    fn parse_sents(&self, sentences: &[String]) -> Result<Vec<Result<Tree, Error>>, Error>;

    /// Release the parser resources. Must be callable several times.
    fn stop(&mut self) {}
}

struct ParserProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ParserProcess {
    fn parse_one(&mut self, sentence: &str) -> Result<Result<Tree, Error>, Error> {
        let line = sentence.replace(['\n', '\r'], " ");
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;

        // read until brackets are balanced
        let mut output = String::new();
        let mut depth: i64 = 0;
        let mut opened = false;
        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(Error::Parser(
                    "parser process closed its output".to_string(),
                ));
            }

            for c in line.chars() {
                match c {
                    '(' => {
                        depth += 1;
                        opened = true;
                    }
                    ')' => depth -= 1,
                    _ => (),
                }
            }
            output.push_str(&line);

            if opened && depth <= 0 {
                break;
            }
        }

        Ok(Tree::parse(output.trim()))
    }
}

pub struct CommandParser {
    program: String,
    args: Vec<String>,
    process: Option<Mutex<ParserProcess>>,
}

impl CommandParser {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
            process: None,
        }
    }

    /// Stanford lexicalized parser (English PCFG model).
    pub fn stanford() -> Self {
        Self::new(
            STANFORD_PROGRAM,
            STANFORD_ARGS.iter().map(|arg| arg.to_string()).collect(),
        )
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }
}

impl ConstituencyParser for CommandParser {
    fn start(&mut self) -> Result<(), Error> {
        if self.process.is_some() {
            return Ok(());
        }

        info!("starting parser: {} {}", self.program, self.args.join(" "));
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => {
                self.process = Some(Mutex::new(ParserProcess {
                    child,
                    stdin,
                    stdout: BufReader::new(stdout),
                }));
                Ok(())
            }
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                Err(Error::Parser(format!(
                    "{}: could not attach to stdin/stdout",
                    self.program
                )))
            }
        }
    }

    fn parse_sents(&self, sentences: &[String]) -> Result<Vec<Result<Tree, Error>>, Error> {
        let process = self
            .process
            .as_ref()
            .ok_or_else(|| Error::Parser("parser is not started".to_string()))?;
        let mut process = process
            .lock()
            .map_err(|_| Error::Parser("parser lock poisoned".to_string()))?;

        let mut trees = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            trees.push(process.parse_one(sentence)?);
        }

        Ok(trees)
    }

    fn stop(&mut self) {
        if let Some(process) = self.process.take() {
            let process = match process.into_inner() {
                Ok(p) => p,
                Err(poisoned) => poisoned.into_inner(),
            };
            let ParserProcess {
                mut child, stdin, ..
            } = process;

            // closing stdin lets well-behaved parsers exit by themselves
            drop(stdin);
            match child.try_wait() {
                Ok(Some(status)) => debug!("parser exited with {}", status),
                _ => {
                    if let Err(e) = child.kill() {
                        warn!("could not kill parser process: {}", e);
                    }
                }
            }
            let _ = child.wait();
            info!("parser stopped");
        }
    }
}

impl Drop for CommandParser {
    fn drop(&mut self) {
        self.stop();
    }
}
