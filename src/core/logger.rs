//! The logger tree
//!
//! Every [`Logger`] is a handle on a node holding a [`Config`]. Nodes form a
//! tree: a root created with [`Logger::root`], loggers created from it with
//! [`Logger::new_logger`], and loggers derived from any node with
//! [`Logger::derive`] or [`Logger::with`]. Configuration can be read,
//! walked, and changed while other threads log.
//!
//! # Example
//!
//! ```
//! use tree_logger::middleware::geq;
//! use tree_logger::{ApplyOptions, Config, Logger, MemorySink};
//!
//! let out = MemorySink::new();
//! let root = Logger::root(
//!     Config::new("app")
//!         .with_sink(out.sink())
//!         .with_pre(geq(".verbose", 1)),
//! );
//! let db = root.derive("db", [(".verbose", 0)]);
//!
//! db.dict().field("msg", "hidden").log();
//! assert!(out.is_empty());
//!
//! root.apply_config(
//!     &Config::default().with_label(".verbose", 1),
//!     &ApplyOptions::new().with_recursive(true),
//! );
//! db.dict().field("msg", "shown").log();
//! assert_eq!(out.to_string_lossy(), "{\"msg\":\"shown\"}\n");
//! ```

use super::apply::ApplyOptions;
use super::config::{Config, Labels};
use super::error::{LoggerError, Result};
use super::event::Event;
use super::metrics::LoggerMetrics;
use super::middleware::Middleware;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

struct NodeState {
    config: Config,
    children: Vec<Arc<LoggerNode>>,
}

struct LoggerNode {
    state: Mutex<NodeState>,
    /// Cleared when the node is closed
    parent: Mutex<Weak<LoggerNode>>,
    /// Empty on the root itself
    root: Weak<LoggerNode>,
    metrics: LoggerMetrics,
}

/// Handle on a node of the logger tree
///
/// Cloning is cheap and yields a handle on the same node.
#[derive(Clone)]
pub struct Logger {
    node: Arc<LoggerNode>,
}

/// Snapshot of one node, as returned by [`Logger::config_tree`]
#[derive(Debug, Clone, Serialize)]
pub struct ConfigNode {
    #[serde(skip)]
    pub config: Config,
    pub namespace: String,
    /// Labels with the namespace stripped from their names
    pub labels: Labels,
    /// Index of the parent in the same snapshot list
    pub parent: Option<usize>,
}

impl ConfigNode {
    fn new(config: Config, parent: Option<usize>) -> Self {
        Self {
            namespace: config.namespace().to_owned(),
            labels: config.localized_labels(),
            config,
            parent,
        }
    }
}

/// Label values found by [`Logger::match_labels`], by namespace then label
pub type LabelMatches = BTreeMap<String, Labels>;

impl Logger {
    /// Create the root of a new logger tree
    pub fn root(config: Config) -> Self {
        Self {
            node: Arc::new(LoggerNode {
                state: Mutex::new(NodeState {
                    config,
                    children: Vec::new(),
                }),
                parent: Mutex::new(Weak::new()),
                root: Weak::new(),
                metrics: LoggerMetrics::new(),
            }),
        }
    }

    fn from_node(node: Arc<LoggerNode>) -> Self {
        Self { node }
    }

    fn add_child(&self, config: Config) -> Logger {
        let root = if self.is_root() {
            Arc::downgrade(&self.node)
        } else {
            self.node.root.clone()
        };
        let node = Arc::new(LoggerNode {
            state: Mutex::new(NodeState {
                config,
                children: Vec::new(),
            }),
            parent: Mutex::new(Arc::downgrade(&self.node)),
            root,
            metrics: LoggerMetrics::new(),
        });
        self.node.state.lock().children.push(Arc::clone(&node));
        Logger::from_node(node)
    }

    /// The root of this logger's tree
    ///
    /// A logger whose root has been dropped acts as its own root.
    pub fn tree_root(&self) -> Logger {
        match self.node.root.upgrade() {
            Some(node) => Logger::from_node(node),
            None => self.clone(),
        }
    }

    /// Create a logger directly under the tree root, configured with a copy
    /// of `config`
    ///
    /// An empty namespace is replaced by the root's.
    pub fn new_logger(&self, config: &Config) -> Logger {
        let root = self.tree_root();
        let mut config = config.clone();
        if config.namespace().is_empty() {
            let namespace = root.node.state.lock().config.namespace().to_owned();
            config.set_namespace(&namespace);
        }
        root.add_child(config)
    }

    /// Create a child logger in `namespace` with extra labels
    ///
    /// The child starts from a copy of this logger's configuration. Relative
    /// label names are qualified with the new namespace; labels already
    /// qualified with the old namespace keep their names.
    ///
    /// The parent holds the child until [`close`](Logger::close) is called,
    /// even after every handle to it is dropped. Close short-lived loggers.
    pub fn derive<I, S>(&self, namespace: &str, labels: I) -> Logger
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut config = self.read_config();
        config.set_namespace(namespace);
        for (name, value) in labels {
            config.set_label(name.as_ref(), value);
        }
        self.add_child(config)
    }

    /// Create a child logger in the same namespace with one more label
    ///
    /// As with [`derive`](Logger::derive), the child stays in the tree until
    /// closed.
    pub fn with(&self, name: &str, value: i64) -> Logger {
        self.with_labels([(name, value)])
    }

    /// Create a child logger in the same namespace with more labels
    pub fn with_labels<I, S>(&self, labels: I) -> Logger
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut config = self.read_config();
        for (name, value) in labels {
            config.set_label(name.as_ref(), value);
        }
        self.add_child(config)
    }

    /// Detach this logger from its parent
    ///
    /// The logger keeps working, but no longer takes part in walks or
    /// recursive configuration. Closing the root or an already closed
    /// logger does nothing.
    pub fn close(&self) {
        let parent = std::mem::take(&mut *self.node.parent.lock());
        if let Some(parent) = parent.upgrade() {
            parent
                .state
                .lock()
                .children
                .retain(|child| !Arc::ptr_eq(child, &self.node));
        }
    }

    /// A copy of this logger's configuration
    pub fn read_config(&self) -> Config {
        self.node.state.lock().config.clone()
    }

    /// Merge `delta` into this logger's configuration, and into every
    /// descendant's if `opts.recursive` is set
    ///
    /// Only one node is locked at a time.
    pub fn apply_config(&self, delta: &Config, opts: &ApplyOptions) {
        let children = {
            let mut state = self.node.state.lock();
            state.config.apply(delta, opts);
            if opts.recursive {
                state.children.clone()
            } else {
                Vec::new()
            }
        };
        for child in children {
            Logger::from_node(child).apply_config(delta, opts);
        }
    }

    /// Apply `delta` to every node whose namespace matches `pattern`
    ///
    /// With `opts.recursive`, descendants of a matching node are updated as
    /// well, whatever their namespace. An empty pattern matches every node.
    /// Returns snapshots of the updated nodes, in pre-order.
    pub fn apply_matching(
        &self,
        pattern: &str,
        delta: &Config,
        opts: &ApplyOptions,
    ) -> Result<Vec<ConfigNode>> {
        let re = Regex::new(pattern)?;
        let mut updated = Vec::new();
        self.apply_matching_inner(&re, delta, opts, false, &mut updated);
        Ok(updated)
    }

    fn apply_matching_inner(
        &self,
        re: &Regex,
        delta: &Config,
        opts: &ApplyOptions,
        forced: bool,
        updated: &mut Vec<ConfigNode>,
    ) {
        let (matched, children) = {
            let mut state = self.node.state.lock();
            let matched = forced || re.is_match(state.config.namespace());
            if matched {
                state.config.apply(delta, opts);
                updated.push(ConfigNode::new(state.config.clone(), None));
            }
            (matched, state.children.clone())
        };
        for child in children {
            Logger::from_node(child).apply_matching_inner(
                re,
                delta,
                opts,
                matched && opts.recursive,
                updated,
            );
        }
    }

    /// Visit a copy of each configuration in this subtree, parents first
    pub fn walk<F: FnMut(Config)>(&self, mut visitor: F) {
        self.walk_inner(&mut visitor);
    }

    fn walk_inner(&self, visitor: &mut dyn FnMut(Config)) {
        let (config, children) = {
            let state = self.node.state.lock();
            (state.config.clone(), state.children.clone())
        };
        visitor(config);
        for child in children {
            Logger::from_node(child).walk_inner(visitor);
        }
    }

    /// Snapshot this subtree, parents first
    pub fn config_tree(&self) -> Vec<ConfigNode> {
        let mut nodes = Vec::new();
        self.config_tree_inner(None, &mut nodes);
        nodes
    }

    fn config_tree_inner(&self, parent: Option<usize>, nodes: &mut Vec<ConfigNode>) {
        let (config, children) = {
            let state = self.node.state.lock();
            (state.config.clone(), state.children.clone())
        };
        let index = nodes.len();
        nodes.push(ConfigNode::new(config, parent));
        for child in children {
            Logger::from_node(child).config_tree_inner(Some(index), nodes);
        }
    }

    /// Find labels whose qualified name matches `pattern` across this subtree
    pub fn match_labels(&self, pattern: &str) -> Result<LabelMatches> {
        let re = Regex::new(pattern)?;
        let mut found = LabelMatches::new();
        self.walk(|config| {
            for (name, value) in config.labels() {
                if re.is_match(name) {
                    found
                        .entry(config.namespace().to_owned())
                        .or_default()
                        .insert(config.localize(name).to_owned(), *value);
                }
            }
        });
        Ok(found)
    }

    pub fn children_count(&self) -> usize {
        self.node.state.lock().children.len()
    }

    pub fn is_root(&self) -> bool {
        self.node.root.upgrade().is_none() && self.node.parent.lock().upgrade().is_none()
    }

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.node.metrics
    }

    /// Flush the configured sink
    pub fn flush(&self) -> Result<()> {
        let sink = self.node.state.lock().config.sink().cloned();
        match sink {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    /// Start an event, running the pre hooks over it
    ///
    /// Returns the absent event if a hook drops it.
    pub fn event(&self) -> Event {
        let state = self.node.state.lock();
        let event = Event::rooted(Some(self.clone()));
        match Middleware::chain(state.config.pre(), self, &state.config, event) {
            Some(event) => event,
            None => {
                self.node.metrics.record_suppressed();
                Event::absent()
            }
        }
    }

    /// Start an object event
    pub fn dict(&self) -> Event {
        self.event().object()
    }

    /// Start an array event
    pub fn array(&self) -> Event {
        self.event().array()
    }

    pub fn string(&self, s: &str) -> Event {
        self.event().string(s)
    }

    pub fn int(&self, v: i64) -> Event {
        self.event().int(v)
    }

    pub fn uint(&self, v: u64) -> Event {
        self.event().uint(v)
    }

    pub fn float(&self, v: f64) -> Event {
        self.event().float(v)
    }

    pub fn bool(&self, v: bool) -> Event {
        self.event().bool(v)
    }

    /// Start a base64 string event
    pub fn bytes(&self, data: &[u8]) -> Event {
        self.event().bytes(data)
    }

    pub fn null(&self) -> Event {
        self.event().null()
    }

    /// Start a string event from format arguments
    ///
    /// ```
    /// use tree_logger::{Config, Logger, MemorySink};
    ///
    /// let out = MemorySink::new();
    /// let logger = Logger::root(Config::new("app").with_sink(out.sink()));
    /// logger.fmt(format_args!("{} + {}", 1, 2)).log();
    /// assert_eq!(out.to_string_lossy(), "\"1 + 2\"\n");
    /// ```
    pub fn fmt(&self, args: fmt::Arguments<'_>) -> Event {
        let event = self.event();
        if event.is_absent() {
            return event;
        }
        match args.as_str() {
            Some(s) => event.string(s),
            None => event.string(&args.to_string()),
        }
    }

    /// Finish and write `event`
    ///
    /// Runs the post hooks, closes the node the event is positioned on,
    /// validates the buffer, and formats it into the sink. Only one node is
    /// closed, so an event with an open container above its cursor fails
    /// validation. Failures go to the error handler once, after the
    /// configuration lock is released.
    pub fn log(&self, event: Event) {
        if event.is_absent() {
            return;
        }
        let failure = {
            let state = self.node.state.lock();
            let config = &state.config;
            let Some(event) = Middleware::chain(config.post(), self, config, event) else {
                self.node.metrics.record_suppressed();
                return;
            };
            match finish(event).and_then(|event| write(config, &event)) {
                Ok(()) => None,
                Err(err) => Some((err, config.clone())),
            }
        };
        match failure {
            None => {
                self.node.metrics.record_emitted();
            }
            Some((err, config)) => {
                self.node.metrics.record_failed();
                match config.error_handler() {
                    Some(handler) => handler.handle(self, &config, &err),
                    None => eprintln!("[LOGGER ERROR] {}", err),
                }
            }
        }
    }
}

fn finish(event: Event) -> Result<Event> {
    let event = event.close()?;
    if !event.is_root() {
        event.validate()?;
    }
    Ok(event)
}

fn write(config: &Config, event: &Event) -> Result<()> {
    let (Some(formatter), Some(sink)) = (config.formatter(), config.sink()) else {
        return Err(LoggerError::writer("no sink or formatter configured"));
    };
    let mut writer = sink.lock();
    formatter.format(&mut **writer, event.raw_bytes())
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.node.state.lock();
        f.debug_struct("Logger")
            .field("namespace", &state.config.namespace())
            .field("labels", state.config.labels())
            .field("children", &state.children.len())
            .finish()
    }
}
