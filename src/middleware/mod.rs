//! Built-in hooks
//!
//! Filters drop events based on a logger's labels; field hooks decorate
//! events with labels, the namespace, levels, or the time.
//!
//! ```
//! use tree_logger::middleware::{geq, namespace_field};
//! use tree_logger::{Config, Logger, MemorySink};
//!
//! let out = MemorySink::new();
//! let logger = Logger::root(
//!     Config::new("svc")
//!         .with_sink(out.sink())
//!         .with_label(".verbose", 1)
//!         .with_pre(geq(".verbose", 1))
//!         .with_post(namespace_field()),
//! );
//! logger.dict().field("msg", "up").log();
//! assert_eq!(out.to_string_lossy(), "{\"msg\":\"up\",\"Lpkg\":\"svc\"}\n");
//! ```

pub mod field;
pub mod filter;

pub use field::{
    label_field, level_tag, namespace_field, time_format, timestamp, NAMESPACE_KEY,
};
pub use filter::{geq, if_label, if_not, leq, level_filter, sample};
