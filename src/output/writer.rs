//! Output document writer
//!
//! Writes selected values to stdout (or any `Write`), one JSON document per
//! value.

use crate::error::{Result, ResultExt};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One compact JSON document per line
    #[default]
    Json,
    /// Indented JSON
    Pretty,
}

/// Writes JSON values in the chosen format
pub struct OutputWriter<W: Write> {
    out: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            written: 0,
        }
    }

    /// Write one value followed by a newline
    pub fn write_value(&mut self, value: &JsonValue) -> Result<()> {
        let encoded = match self.format {
            OutputFormat::Json => serde_json::to_writer(&mut self.out, value),
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut self.out, value),
        };
        encoded.context("writing output")?;
        self.out.write_all(b"\n").context("writing output")?;
        self.written += 1;
        Ok(())
    }

    /// Write every value in order
    pub fn write_all(&mut self, values: &[JsonValue]) -> Result<()> {
        values.iter().try_for_each(|v| self.write_value(v))
    }

    /// Number of values written
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("flushing output")
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> std::fmt::Debug for OutputWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputWriter")
            .field("format", &self.format)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
