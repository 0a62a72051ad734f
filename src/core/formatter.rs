//! Formatter trait for rendering closed events

use super::error::Result;
use std::io::Write;

/// Renders a closed, valid JSON event into a sink
///
/// `event` is always a complete JSON document. Implementations write one
/// record per call.
pub trait Formatter: Send + Sync {
    fn format(&self, sink: &mut dyn Write, event: &[u8]) -> Result<()>;
    fn name(&self) -> &str;
}
