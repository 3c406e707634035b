/*! JSON lines reader.

Reads one JSON value per line from a single file, a gzipped file, or every JSON lines file of a directory.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// File extensions picked up when reading a directory.
const EXTENSIONS: [&str; 4] = ["jsonl", "jsonlines", "json", "gz"];

type LineSource = Lines<BufReader<Box<dyn Read>>>;

/// Lazy iterator over the values of one or more JSON lines files.
///
/// Blank lines are skipped. Files are opened one at a time, when the previous one is exhausted.
pub struct JsonLines<T> {
    files: std::vec::IntoIter<PathBuf>,
    lines: Option<LineSource>,
    _item: PhantomData<T>,
}

impl<T> JsonLines<T>
where
    T: DeserializeOwned,
{
    /// Read from a file (gzipped if its extension is `.gz`) or from a directory.
    ///
    /// Directory entries are read in lexical order.
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let files = if src.is_dir() {
            Self::list_dir(src)?
        } else {
            // fail early on missing files
            File::open(src)?;
            vec![src.to_path_buf()]
        };

        info!("reading {} file(s) from {:?}", files.len(), src);
        Ok(Self {
            files: files.into_iter(),
            lines: None,
            _item: PhantomData,
        })
    }

    /// Read from an already open reader.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        let reader: Box<dyn Read> = Box::new(reader);
        Self {
            files: Vec::new().into_iter(),
            lines: Some(BufReader::new(reader).lines()),
            _item: PhantomData,
        }
    }

    fn list_dir(src: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();
        for ext in EXTENSIONS {
            let pattern = src.join(format!("*.{}", ext));
            let pattern = pattern.to_str().ok_or_else(|| {
                Error::Custom(format!("non UTF-8 corpus path: {:?}", src))
            })?;
            for path in glob::glob(pattern)? {
                files.push(path?);
            }
        }

        files.sort();
        Ok(files)
    }

    fn open(path: &Path) -> Result<LineSource, Error> {
        debug!("opening {:?}", path);
        let f = File::open(path)?;
        let reader: Box<dyn Read> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Box::new(MultiGzDecoder::new(f)),
            _ => Box::new(f),
        };

        Ok(BufReader::new(reader).lines())
    }
}

impl<T> Iterator for JsonLines<T>
where
    T: DeserializeOwned,
{
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.lines.is_none() {
                let path = self.files.next()?;
                match Self::open(&path) {
                    Ok(lines) => self.lines = Some(lines),
                    Err(e) => return Some(Err(e)),
                }
            }

            match self.lines.as_mut()?.next() {
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => return Some(serde_json::from_str(&line).map_err(Error::Serde)),
                // undecodable line: the reader moved past it
                Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                    return Some(Err(Error::Io(e)))
                }
                // the reader itself is broken (e.g. truncated gzip), give up on this file
                Some(Err(e)) => {
                    warn!("abandoning the rest of the current file: {}", e);
                    self.lines = None;
                    return Some(Err(Error::Io(e)));
                }
                None => self.lines = None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::Value;

    use super::*;

    const DATA: &str = "{\"name\": \"a\"}\n\n{\"name\": \"b\"}\nnot json\n";

    #[test]
    fn from_reader() {
        let reader: JsonLines<Value> = JsonLines::from_reader(Cursor::new(DATA));
        let items: Vec<Result<Value, Error>> = reader.collect();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap()["name"], "a");
        assert_eq!(items[1].as_ref().unwrap()["name"], "b");
        assert!(matches!(items[2], Err(Error::Serde(_))));
    }

    #[test]
    fn missing_file() {
        let res = JsonLines::<Value>::from_path(Path::new("does/not/exist.jsonl"));
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[test]
    fn directory_and_gzip() {
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(dir.path().join("b.jsonl"), "{\"n\": 2}\n").unwrap();
        std::fs::write(dir.path().join("ignored.txt"), "{\"n\": 100}\n").unwrap();

        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(b"{\"n\": 1}\n{\"n\": 11}\n").unwrap();
        std::fs::write(dir.path().join("a.jsonl.gz"), gz.finish().unwrap()).unwrap();

        let values: Vec<u64> = JsonLines::<Value>::from_path(dir.path())
            .unwrap()
            .map(|v| v.unwrap()["n"].as_u64().unwrap())
            .collect();

        assert_eq!(values, vec![1, 11, 2]);
    }

    #[test]
    fn truncated_gzip_is_abandoned() {
        let dir = tempfile::tempdir().unwrap();

        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        for n in 0..2000 {
            writeln!(gz, "{{\"n\": {}, \"text\": \"line number {}\"}}", n, n).unwrap();
        }
        let compressed = gz.finish().unwrap();
        std::fs::write(
            dir.path().join("a.jsonl.gz"),
            &compressed[..compressed.len() / 2],
        )
        .unwrap();
        std::fs::write(dir.path().join("b.jsonl"), "{\"n\": -1}\n").unwrap();

        // bounded, so that a looping reader fails instead of hanging
        let items: Vec<Result<Value, Error>> = JsonLines::<Value>::from_path(dir.path())
            .unwrap()
            .take(10_000)
            .collect();

        assert!(items.len() < 10_000);
        let errors = items.iter().filter(|item| item.is_err()).count();
        assert_eq!(errors, 1);
        assert!(items.len() > 1);
        assert_eq!(items.last().unwrap().as_ref().unwrap()["n"], -1);
    }
}
