//! # Tree Logger
//!
//! Structured JSON event logging with a live configuration tree.
//!
//! ## Features
//!
//! - **Event Builder**: Build nested JSON objects and arrays in one buffer,
//!   validated before they are written
//! - **Logger Tree**: Derive loggers per component, each with its own
//!   namespace and integer labels
//! - **Live Configuration**: Walk, snapshot, and reconfigure the tree while
//!   other threads log
//! - **Hooks**: Filter and decorate events based on labels
//!
//! ## Example
//!
//! ```
//! use tree_logger::prelude::*;
//!
//! let out = MemorySink::new();
//! let root = Logger::root(Config::new("app").with_sink(out.sink()));
//! let db = root.derive("db", [(".pool", 8)]);
//!
//! db.dict()
//!     .field("msg", "connected")
//!     .with_object("peer", |peer| peer.field("host", "10.0.0.1").field("port", 5432))
//!     .log();
//!
//! assert_eq!(
//!     out.to_string_lossy(),
//!     "{\"msg\":\"connected\",\"peer\":{\"host\":\"10.0.0.1\",\"port\":5432}}\n"
//! );
//! ```

pub mod core;
pub mod formatters;
pub mod macros;
pub mod middleware;

pub mod prelude {
    pub use crate::core::{
        ApplyOptions, Config, ConfigNode, ErrorHandler, Event, Formatter, LogLevel, Logger,
        LoggerError, LoggerMetrics, MemorySink, Middleware, Result, Sink, TimestampFormat, Value,
    };
    pub use crate::formatters::{JsonFormatter, TableFormatter};
}

pub use crate::core::{
    localize, unlocalize, ApplyOptions, Config, ConfigNode, ErrorHandler, Event, Formatter,
    JsonEncode, LabelMatches, Labels, LogLevel, Logger, LoggerError, LoggerMetrics, MemorySink,
    Middleware, Result, Sink, TimestampFormat, Value, ERROR_EVENT_KEY, ERROR_KEY,
    FATAL_EXIT_CODE,
};
pub use formatters::{FloatFormat, JsonFormatter, TableFormatter};
