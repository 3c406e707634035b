/*! JSON lines writer.

Serializes one value per line, creating the parent directories of the destination file.
!*/
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::Error;

use super::WriterTrait;

pub struct JsonLinesWriter<T, W = BufWriter<File>>
where
    W: Write,
{
    handle: W,
    count: usize,
    _item: PhantomData<T>,
}

impl<T, W> JsonLinesWriter<T, W>
where
    T: Serialize,
    W: Write,
{
    pub fn from_writer(handle: W) -> Self {
        Self {
            handle,
            count: 0,
            _item: PhantomData,
        }
    }

    /// Number of values written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(mut self) -> Result<W, Error> {
        self.handle.flush()?;
        Ok(self.handle)
    }
}

impl<T> JsonLinesWriter<T>
where
    T: Serialize,
{
    /// Create (or truncate) `dst`.
    pub fn create(dst: &Path) -> Result<Self, Error> {
        if let Some(parent) = dst.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        debug!("writing to {:?}", dst);
        Ok(Self::from_writer(BufWriter::new(File::create(dst)?)))
    }
}

impl<T, W> WriterTrait for JsonLinesWriter<T, W>
where
    T: Serialize,
    W: Write,
{
    type Item = T;

    fn write(&mut self, vals: Vec<T>) -> Result<(), Error> {
        let mut piece_str = String::new();
        for val in &vals {
            piece_str += &serde_json::to_string(val)?;
            piece_str.push('\n');
        }
        self.handle.write_all(piece_str.as_bytes())?;
        self.count += vals.len();

        Ok(())
    }

    fn write_single(&mut self, val: &T) -> Result<(), Error> {
        serde_json::to_writer(&mut self.handle, val)?;
        self.handle.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(self.handle.flush()?)
    }
}
