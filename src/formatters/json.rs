//! JSON lines formatter

use crate::core::{Formatter, Result};
use std::io::Write;

/// Writes each event as one line of JSON (JSONL)
///
/// Compatible with log aggregation tools like ELK, Loki, etc. With
/// [`JsonFormatter::pretty`] events are re-indented over several lines.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn format(&self, sink: &mut dyn Write, event: &[u8]) -> Result<()> {
        if self.pretty {
            let value: serde_json::Value = serde_json::from_slice(event)?;
            let mut out = serde_json::to_vec_pretty(&value)?;
            out.push(b'\n');
            sink.write_all(&out)?;
        } else {
            let mut line = Vec::with_capacity(event.len() + 1);
            line.extend_from_slice(event);
            line.push(b'\n');
            sink.write_all(&line)?;
        }
        Ok(())
    }
}
