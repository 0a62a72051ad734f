//! Core logger types and traits

pub mod apply;
pub mod config;
pub mod error;
pub mod event;
pub mod formatter;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod middleware;
pub mod sink;
pub mod timestamp;

pub use apply::ApplyOptions;
pub use config::{localize, unlocalize, Config, Labels};
pub use error::{LoggerError, Result};
pub use event::{Event, JsonEncode, Value, ERROR_KEY};
pub use formatter::Formatter;
pub use handler::{ErrorHandler, ERROR_EVENT_KEY, FATAL_EXIT_CODE};
pub use log_level::LogLevel;
pub use logger::{ConfigNode, LabelMatches, Logger};
pub use metrics::LoggerMetrics;
pub use middleware::Middleware;
pub use sink::{MemorySink, Sink};
pub use timestamp::TimestampFormat;
