/*!
# File based writing

Extracted sentences and linked entities are streamed as JSON lines through [JsonLinesWriter],
rankings and lemma tables are dumped as whole (pretty-printed) JSON documents by [dump_json].
!*/
mod jsonlines;
mod writertrait;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Error;

pub use jsonlines::JsonLinesWriter;
pub use writertrait::WriterTrait;

/// Write `value` to `dst` as pretty-printed JSON, creating parent directories.
pub fn dump_json<T: Serialize + ?Sized>(value: &T, dst: &Path) -> Result<(), Error> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let f = BufWriter::new(File::create(dst)?);
    serde_json::to_writer_pretty(f, value)?;
    info!("dumped to {:?}", dst);
    Ok(())
}
