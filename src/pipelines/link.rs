//! Entity linking pipeline.
//!
//! Adds a `linked_entities` field to every input sentence having a text.
//! Sentences that can't be linked are logged and left out of the output.
use std::path::PathBuf;

use itertools::Itertools;
use log::{debug, error, info};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::io::{JsonLines, JsonLinesWriter, WriterTrait};
use crate::linking::NexClient;
use crate::parallel;

use super::{skip_malformed, Pipeline};

/// Log progress every n linked sentences.
const PROGRESS_EVERY: usize = 1_000;

type Row = Map<String, Value>;

pub struct LinkEntities {
    sentences: PathBuf,
    outfile: PathBuf,
    processes: usize,
    client: NexClient,
}

impl LinkEntities {
    /// Build the pipeline, with a Dandelion client configured from the environment.
    pub fn new(
        sentences: PathBuf,
        language: &str,
        outfile: PathBuf,
        confidence: f64,
        processes: usize,
    ) -> Result<Self, Error> {
        let client = NexClient::from_env(language, confidence)?;
        Ok(Self::with_client(sentences, outfile, processes, client))
    }

    pub fn with_client(
        sentences: PathBuf,
        outfile: PathBuf,
        processes: usize,
        client: NexClient,
    ) -> Self {
        Self {
            sentences,
            outfile,
            processes,
            client,
        }
    }

    fn link_row(&self, mut row: Row) -> Option<Row> {
        let text = match row.get("text").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                debug!("skipping row without text");
                return None;
            }
        };

        let entities = match self.client.link(&text) {
            Ok(entities) => entities,
            Err(e) => {
                error!("cannot link entities of '{}': {}", text, e);
                return None;
            }
        };

        match serde_json::to_value(entities) {
            Ok(entities) => {
                row.insert("linked_entities".to_string(), entities);
                Some(row)
            }
            Err(e) => {
                error!("cannot serialize entities of '{}': {}", text, e);
                None
            }
        }
    }
}

impl Pipeline<usize> for LinkEntities {
    /// Returns the number of linked sentences.
    fn run(&self) -> Result<usize, Error> {
        let rows = skip_malformed(JsonLines::<Row>::from_path(&self.sentences)?);
        let pool = parallel::pool(self.processes)?;
        let mut writer = JsonLinesWriter::create(&self.outfile)?;

        let batches = rows.chunks(parallel::batch_size(self.processes));
        for batch in &batches {
            let linked = parallel::map(pool.as_ref(), batch.collect(), |row| self.link_row(row));

            for row in linked.into_iter().flatten() {
                writer.write_single(&row)?;
                if writer.count() % PROGRESS_EVERY == 0 {
                    info!("Linked {} sentences", writer.count());
                }
            }
        }
        writer.flush()?;

        if writer.count() > 0 {
            info!("Dumped linked sentences to {:?}", self.outfile);
        }
        info!("Done, linked {} sentences", writer.count());
        Ok(writer.count())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::linking::Credentials;

    #[test]
    fn rows_without_text_or_links_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let sentences = dir.path().join("sentences.jsonl");
        fs::write(
            &sentences,
            concat!(
                r#"{"id": 0, "lu": "die", "text": ""}"#,
                "\n",
                r#"{"id": 1, "lu": "die"}"#,
                "\n",
                r#"{"id": 2, "lu": "die", "text": "She died in Rome."}"#,
                "\n",
            ),
        )
        .unwrap();
        let outfile = dir.path().join("out").join("linked.jsonl");

        // nothing listens there: the only linkable row fails
        let client = NexClient::new(
            "http://127.0.0.1:9/nex",
            Credentials::Token("t".to_string()),
            "en",
            0.25,
        )
        .unwrap();
        let pipeline = LinkEntities::with_client(sentences, outfile.clone(), 0, client);

        assert_eq!(pipeline.run().unwrap(), 0);
        assert_eq!(fs::read_to_string(&outfile).unwrap(), "");
    }
}
