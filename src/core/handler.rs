//! Error handling policies for failed emissions
//!
//! When an event cannot be closed, validated, formatted, or written, the
//! logger hands the error to the [`ErrorHandler`] of its configuration. The
//! handler runs after the logger's lock is released, so it may log through
//! the same logger.

use super::config::Config;
use super::error::LoggerError;
use super::logger::Logger;
use std::fmt;
use std::sync::Arc;

/// Key of the single field in events written by [`ErrorHandler::log`]
pub const ERROR_EVENT_KEY: &str = "LE";

/// Exit status used by [`ErrorHandler::fatal`]
pub const FATAL_EXIT_CODE: i32 = 7;

type HandlerFn = dyn Fn(&Logger, &Config, &LoggerError) + Send + Sync;

#[derive(Clone)]
pub struct ErrorHandler {
    f: Arc<HandlerFn>,
    name: &'static str,
}

impl ErrorHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Logger, &Config, &LoggerError) + Send + Sync + 'static,
    {
        Self::named("custom", f)
    }

    fn named<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&Logger, &Config, &LoggerError) + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            name,
        }
    }

    /// Halt immediately with the error message
    pub fn panic() -> Self {
        Self::named("panic", |_, _, err| panic!("{}", err))
    }

    /// Report the failure as a `{"LE": "<message>"}` event
    ///
    /// The report goes through a detached logger built from the failing
    /// configuration without its hooks, so it reaches the same sink.
    pub fn log() -> Self {
        Self::named("log", |_, config, err| report(config, err))
    }

    /// Report like [`ErrorHandler::log`], then exit the process
    pub fn fatal() -> Self {
        Self::named("fatal", |_, config, err| {
            report(config, err);
            std::process::exit(FATAL_EXIT_CODE);
        })
    }

    /// Print to stderr and carry on
    pub fn stderr() -> Self {
        Self::named("stderr", |_, _, err| eprintln!("[LOGGER ERROR] {}", err))
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn handle(&self, logger: &Logger, config: &Config, err: &LoggerError) {
        (self.f)(logger, config, err)
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorHandler").field(&self.name).finish()
    }
}

fn report(config: &Config, err: &LoggerError) {
    // A failing report must not recurse into this handler again.
    let reporter = Logger::root(
        config
            .clone()
            .without_hooks()
            .with_error_handler(ErrorHandler::stderr()),
    );
    reporter
        .dict()
        .field(ERROR_EVENT_KEY, err.to_string())
        .log();
    reporter.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::Middleware;
    use crate::core::sink::MemorySink;
    use parking_lot::Mutex;

    #[test]
    fn test_log_handler_writes_error_event() {
        let out = MemorySink::new();
        let config = Config::new("app").with_sink(out.sink());
        let logger = Logger::root(config.clone());

        ErrorHandler::log().handle(&logger, &config, &LoggerError::other("boom"));

        assert_eq!(out.to_string_lossy(), "{\"LE\":\"boom\"}\n");
    }

    #[test]
    fn test_log_handler_skips_hooks() {
        let out = MemorySink::new();
        let config = Config::new("app")
            .with_sink(out.sink())
            .with_pre(Middleware::new(|_, _, _| None));
        let logger = Logger::root(config.clone());

        ErrorHandler::log().handle(&logger, &config, &LoggerError::other("x"));

        assert_eq!(out.lines().len(), 1);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_handler() {
        let config = Config::new("app");
        let logger = Logger::root(config.clone());
        ErrorHandler::panic().handle(&logger, &config, &LoggerError::other("boom"));
    }

    #[test]
    fn test_custom_handler_receives_error() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let handler = ErrorHandler::new(move |_, config, err| {
            captured
                .lock()
                .push(format!("{}: {}", config.namespace(), err));
        });

        let config = Config::new("svc");
        let logger = Logger::root(config.clone());
        handler.handle(&logger, &config, &LoggerError::writer("pipe closed"));

        assert_eq!(handler.name(), "custom");
        assert_eq!(seen.lock().as_slice(), ["svc: Writer error: pipe closed"]);
    }
}
