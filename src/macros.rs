//! Macros for the common event shapes.
//!
//! # Examples
//!
//! ```
//! use tree_logger::prelude::*;
//! use tree_logger::{event, info};
//!
//! let out = MemorySink::new();
//! let logger = Logger::root(Config::new("app").with_sink(out.sink()));
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! event!(logger, "port" => port, "tls" => false);
//!
//! assert_eq!(
//!     out.lines(),
//!     vec![
//!         r#"{"level":"info","msg":"Server listening on port 8080"}"#,
//!         r#"{"port":8080,"tls":false}"#,
//!     ]
//! );
//! ```

/// Log an object event with the given fields.
///
/// # Examples
///
/// ```
/// # use tree_logger::prelude::*;
/// # let logger = Logger::root(Config::new("app").with_sink(MemorySink::new().sink()));
/// use tree_logger::event;
/// event!(logger, "user" => 42, "action" => "login");
/// ```
#[macro_export]
macro_rules! event {
    ($logger:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $logger.dict()$(.field($key, $value))*.log()
    };
}

/// Log a formatted string event.
///
/// # Examples
///
/// ```
/// # use tree_logger::prelude::*;
/// # let out = MemorySink::new();
/// # let logger = Logger::root(Config::new("app").with_sink(out.sink()));
/// use tree_logger::message;
/// message!(logger, "{} items", 3);
/// # assert_eq!(out.to_string_lossy(), "\"3 items\"\n");
/// ```
#[macro_export]
macro_rules! message {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fmt(::std::format_args!($($arg)+)).log()
    };
}

/// Log a `{"level": ..., "msg": ...}` event.
///
/// The level is written as a field only; filtering on levels is done with
/// label hooks such as [`level_filter`](crate::middleware::level_filter).
///
/// # Examples
///
/// ```
/// # use tree_logger::prelude::*;
/// # let logger = Logger::root(Config::new("app").with_sink(MemorySink::new().sink()));
/// use tree_logger::log;
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger
            .dict()
            .field("level", $crate::LogLevel::to_str(&$level))
            .field("msg", ::std::format!($($arg)+))
            .log()
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only writes the event; it does not stop the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Config, LogLevel, Logger, MemorySink};

    fn capture() -> (Logger, MemorySink) {
        let out = MemorySink::new();
        let logger = Logger::root(Config::new("app").with_sink(out.sink()));
        (logger, out)
    }

    #[test]
    fn test_log_macro() {
        let (logger, out) = capture();
        log!(logger, LogLevel::Warn, "Formatted: {}", 42);
        assert_eq!(out.to_string_lossy(), "{\"level\":\"warn\",\"msg\":\"Formatted: 42\"}\n");
    }

    #[test]
    fn test_level_macros() {
        let (logger, out) = capture();
        trace!(logger, "t");
        debug!(logger, "d");
        info!(logger, "i");
        warn!(logger, "w");
        error!(logger, "e");
        fatal!(logger, "f");

        let levels: Vec<String> = out
            .lines()
            .iter()
            .map(|line| {
                let v: serde_json::Value = serde_json::from_str(line).unwrap();
                v["level"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(levels, ["trace", "debug", "info", "warn", "error", "fatal"]);
    }

    #[test]
    fn test_event_macro() {
        let (logger, out) = capture();
        event!(logger);
        event!(logger, "a" => 1, "b" => "two",);
        assert_eq!(out.lines(), vec!["{}", "{\"a\":1,\"b\":\"two\"}"]);
    }

    #[test]
    fn test_message_macro() {
        let (logger, out) = capture();
        message!(logger, "plain");
        message!(logger, "{}-{}", 1, 2);
        assert_eq!(out.lines(), vec!["\"plain\"", "\"1-2\""]);
    }
}
