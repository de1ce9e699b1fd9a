use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::layout::{classify, Line, LineError, Strictness, VersionSet};
use crate::store::{ControlStore, StoreError, DEFAULT_CAPACITY};
use crate::word::WordPacker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    pub capacity: usize,
    pub strictness: Strictness,
    pub accepted_versions: VersionSet,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            strictness: Strictness::Lenient,
            accepted_versions: VersionSet::default(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Line format error on line {line_number}:\n{line}")]
    Format { line_number: usize, line: String },
    #[error("line {line_number}: {source}")]
    InvalidField {
        line_number: usize,
        #[source]
        source: LineError,
    },
    #[error("line {line_number}: {source}")]
    Capacity {
        line_number: usize,
        #[source]
        source: StoreError,
    },
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    pub lines: usize,
    pub records: usize,
    pub comments: usize,
    pub unlisted: usize,
}

#[derive(Debug, Default)]
pub struct Converter {
    cfg: ConvertConfig,
    packer: WordPacker,
}

impl Converter {
    pub fn new(cfg: ConvertConfig) -> Self {
        Self {
            cfg,
            packer: WordPacker::new(),
        }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.cfg
    }

    /// Reads every line of `reader`; the first fatal line aborts the whole run.
    pub fn convert<R: BufRead>(&self, reader: R) -> Result<(ControlStore, ConvertStats), ConvertError> {
        let mut store = ControlStore::new(self.cfg.capacity);
        let mut stats = ConvertStats::default();

        for (idx, raw) in reader.split(b'\n').enumerate() {
            let raw = raw?;
            let line_number = idx + 1;
            stats.lines += 1;

            let line = match classify(&raw, &self.cfg.accepted_versions, self.cfg.strictness) {
                Ok(line) => line,
                Err(LineError::Format) => {
                    let text = String::from_utf8_lossy(&raw);
                    return Err(ConvertError::Format {
                        line_number,
                        line: text.trim_end_matches('\r').to_string(),
                    });
                }
                Err(source) => return Err(ConvertError::InvalidField { line_number, source }),
            };

            match line {
                Line::Comment => {
                    stats.comments += 1;
                }
                Line::Unlisted { tag } => {
                    debug!(line_number, tag = %tag, "skipping line with unlisted version tag");
                    stats.unlisted += 1;
                }
                Line::Record(rec) => {
                    for d in rec.truncated_hex_fields() {
                        warn!(line_number, field = d.name, "hex field is not fully numeric; value truncated");
                    }
                    let word = self.packer.pack(&rec);
                    store
                        .push(word)
                        .map_err(|source| ConvertError::Capacity { line_number, source })?;
                    stats.records += 1;
                }
            }
        }

        info!(
            lines = stats.lines,
            records = stats.records,
            comments = stats.comments,
            unlisted = stats.unlisted,
            "conversion finished"
        );
        Ok((store, stats))
    }
}
