//! Hooks run over events on their way through a logger

use super::config::Config;
use super::event::Event;
use super::logger::Logger;
use std::fmt;
use std::sync::Arc;

type HookFn = dyn Fn(&Logger, &Config, Event) -> Option<Event> + Send + Sync;

/// A transformation or filter applied to an event
///
/// A hook receives the logger, its configuration, and the event, and returns
/// the event to continue with or `None` to drop it. Hooks run while the
/// logger's configuration is locked: they must not log through, configure,
/// or derive from that same logger.
///
/// # Examples
///
/// ```
/// use tree_logger::{Config, Logger, MemorySink, Middleware};
///
/// let out = MemorySink::new();
/// let quiet = Middleware::new(|_, config, event| {
///     (config.label(".quiet") != Some(1)).then_some(event)
/// });
/// let logger = Logger::root(
///     Config::new("app").with_sink(out.sink()).with_pre(quiet).with_label(".quiet", 1),
/// );
/// logger.dict().field("msg", "dropped").log();
/// assert!(out.is_empty());
/// ```
#[derive(Clone)]
pub struct Middleware(Arc<HookFn>);

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Logger, &Config, Event) -> Option<Event> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, logger: &Logger, config: &Config, event: Event) -> Option<Event> {
        (self.0)(logger, config, event)
    }

    /// Run `hooks` in order, stopping at the first one that drops the event
    pub fn chain(
        hooks: &[Middleware],
        logger: &Logger,
        config: &Config,
        event: Event,
    ) -> Option<Event> {
        hooks
            .iter()
            .try_fold(event, |event, hook| hook.call(logger, config, event))
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware")
    }
}
