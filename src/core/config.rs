//! Logger configuration
//!
//! A [`Config`] carries integer labels, pre and post hooks, the output sink,
//! the formatter, the error handler, and a namespace.
//!
//! # Labels and namespaces
//!
//! Label names are stored fully qualified. A name starting with `.` is
//! *relative* and is qualified by prefixing the namespace: in namespace
//! `"db"`, `".level"` is stored as `"db.level"`. Localizing reverses this,
//! stripping the namespace but keeping the dot. An empty namespace leaves
//! names untouched.
//!
//! ```
//! use tree_logger::Config;
//!
//! let config = Config::new("db").with_label(".level", 3).with_label("global", 1);
//! assert_eq!(config.label(".level"), Some(3));
//! assert_eq!(config.label("db.level"), Some(3));
//! assert!(config.labels().contains_key("global"));
//! ```

use super::formatter::Formatter;
use super::handler::ErrorHandler;
use super::middleware::Middleware;
use super::sink::Sink;
use crate::formatters::JsonFormatter;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Label name to value
pub type Labels = BTreeMap<String, i64>;

/// Strip `namespace` from a qualified label name, keeping the leading dot
///
/// Names outside the namespace are returned unchanged.
pub fn localize<'a>(namespace: &str, label: &'a str) -> &'a str {
    if namespace.is_empty() {
        return label;
    }
    match label.strip_prefix(namespace) {
        Some(rest) if rest.starts_with('.') => rest,
        _ => label,
    }
}

/// Qualify a relative label name with `namespace`
pub fn unlocalize<'a>(namespace: &str, label: &'a str) -> Cow<'a, str> {
    if !namespace.is_empty() && label.starts_with('.') {
        Cow::Owned(format!("{namespace}{label}"))
    } else {
        Cow::Borrowed(label)
    }
}

#[derive(Clone, Default)]
pub struct Config {
    pub(crate) labels: Labels,
    pub(crate) pre: Vec<Middleware>,
    pub(crate) post: Vec<Middleware>,
    pub(crate) sink: Option<Sink>,
    pub(crate) formatter: Option<Arc<dyn Formatter>>,
    pub(crate) error_handler: Option<ErrorHandler>,
    pub(crate) namespace: String,
}

impl Config {
    /// A complete configuration: JSON lines to stderr, panicking on errors
    ///
    /// [`Config::default`] is the empty configuration, suited as a delta
    /// for [`Config::apply`].
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            sink: Some(Sink::stderr()),
            formatter: Some(Arc::new(JsonFormatter::new())),
            error_handler: Some(ErrorHandler::panic()),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set a label, qualifying relative names with the current namespace
    #[must_use]
    pub fn with_label(mut self, name: &str, value: i64) -> Self {
        self.set_label(name, value);
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        for (name, value) in labels {
            self.set_label(name.as_ref(), value);
        }
        self
    }

    /// Append a hook run on freshly started events
    #[must_use]
    pub fn with_pre(mut self, hook: Middleware) -> Self {
        self.pre.push(hook);
        self
    }

    /// Append a hook run on completed events just before they are written
    #[must_use]
    pub fn with_post(mut self, hook: Middleware) -> Self {
        self.post.push(hook);
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub fn with_formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use]
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Drop every pre and post hook
    #[must_use]
    pub fn without_hooks(mut self) -> Self {
        self.pre.clear();
        self.post.clear();
        self
    }

    pub fn set_label(&mut self, name: &str, value: i64) {
        let name = unlocalize(&self.namespace, name).into_owned();
        self.labels.insert(name, value);
    }

    pub fn remove_label(&mut self, name: &str) -> Option<i64> {
        let name = unlocalize(&self.namespace, name);
        self.labels.remove(name.as_ref())
    }

    pub(crate) fn set_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.to_owned();
    }

    /// Look up a label by qualified or relative name
    pub fn label(&self, name: &str) -> Option<i64> {
        self.labels
            .get(unlocalize(&self.namespace, name).as_ref())
            .copied()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.label(name).is_some()
    }

    /// Fully qualified labels
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Labels with this configuration's namespace stripped from their names
    pub fn localized_labels(&self) -> Labels {
        self.labels
            .iter()
            .map(|(name, value)| (self.localize(name).to_owned(), *value))
            .collect()
    }

    pub fn localize<'a>(&self, label: &'a str) -> &'a str {
        localize(&self.namespace, label)
    }

    pub fn unlocalize<'a>(&self, label: &'a str) -> Cow<'a, str> {
        unlocalize(&self.namespace, label)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn pre(&self) -> &[Middleware] {
        &self.pre
    }

    pub fn post(&self) -> &[Middleware] {
        &self.post
    }

    pub fn sink(&self) -> Option<&Sink> {
        self.sink.as_ref()
    }

    pub fn formatter(&self) -> Option<&dyn Formatter> {
        self.formatter.as_deref()
    }

    pub fn error_handler(&self) -> Option<&ErrorHandler> {
        self.error_handler.as_ref()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("namespace", &self.namespace)
            .field("labels", &self.labels)
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .field("sink", &self.sink)
            .field("formatter", &self.formatter.as_ref().map(|fmt| fmt.name()))
            .field("error_handler", &self.error_handler)
            .finish()
    }
}
