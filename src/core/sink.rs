//! Output destinations for formatted events
//!
//! A [`Sink`] is a shared, thread-safe byte writer. Cloning a sink shares the
//! underlying destination, so several loggers may write to the same file.

use super::error::Result;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct Sink {
    writer: SharedWriter,
    name: Arc<str>,
}

impl Sink {
    /// Wrap any writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::named("writer", writer)
    }

    fn named<W: Write + Send + 'static>(name: &str, writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            name: Arc::from(name),
        }
    }

    pub fn stderr() -> Self {
        Self::named("stderr", io::stderr())
    }

    pub fn stdout() -> Self {
        Self::named("stdout", io::stdout())
    }

    /// Append to the file at `path`, creating it if needed
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::named(&path.display().to_string(), file))
    }

    /// Lock the destination for exclusive writing
    pub fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock()
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether both handles write to the same destination
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sink").field(&self.name).finish()
    }
}

/// In-memory destination, handy for capturing output
///
/// # Examples
///
/// ```
/// use tree_logger::{Config, Logger, MemorySink};
///
/// let out = MemorySink::new();
/// let logger = Logger::root(Config::new("app").with_sink(out.sink()));
/// logger.dict().field("msg", "hi").log();
/// assert_eq!(out.to_string_lossy(), "{\"msg\":\"hi\"}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`Sink`] writing into this buffer
    pub fn sink(&self) -> Sink {
        Sink::named("memory", self.clone())
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Captured output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.to_string_lossy().lines().map(str::to_owned).collect()
    }

    /// Take the captured bytes, leaving the buffer empty
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
