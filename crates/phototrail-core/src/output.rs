//! Record listing output in JSON or JSON Lines.

use std::io::{self, Write};
use std::str::FromStr;

use crate::types::PhotoRecord;

/// Listing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A single JSON array
    #[default]
    Json,
    /// One record per line (newline-delimited JSON)
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = String;

    /// Case-insensitive; accepts `json`, `jsonl`, `jsonlines` and `ndjson`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Ok(Self::JsonLines),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Writes photo records to any `Write` sink.
pub struct RecordWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// `pretty` only affects the JSON array format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write the whole listing. An empty listing is `[]` in JSON and
    /// nothing at all in JSON Lines.
    pub fn write_records(&mut self, records: &[PhotoRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, records)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, records).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.records_written += records.len();
            }
            OutputFormat::JsonLines => {
                for record in records {
                    serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                    self.records_written += 1;
                }
            }
        }
        self.writer.flush()
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
