//! Merging one configuration into another
//!
//! [`Config::apply`] overwrites the fields a delta configuration sets and
//! merges its labels. Label names in a delta are compared and written in
//! their localized form, so one delta can retarget loggers across
//! namespaces: a delta carrying `.level` sets `db.level` on a `db` logger and
//! `http.level` on an `http` logger.

use super::config::{localize, unlocalize, Config};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How [`Config::apply`] and [`Logger::apply_config`] merge labels
///
/// Serialized with camelCase keys for remote administration:
///
/// ```
/// use tree_logger::ApplyOptions;
///
/// let opts: ApplyOptions =
///     serde_json::from_str(r#"{"recursive":true,"preserveLabels":[".level"]}"#).unwrap();
/// assert!(opts.recursive);
/// assert!(opts.preserve.contains(".level"));
/// assert!(!opts.remove_absent);
/// ```
///
/// [`Logger::apply_config`]: crate::Logger::apply_config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOptions {
    /// Also apply to every descendant logger
    #[serde(default)]
    pub recursive: bool,

    /// Localized label names left untouched by the merge
    #[serde(default, rename = "preserveLabels")]
    pub preserve: BTreeSet<String>,

    /// Delete target labels the delta does not carry
    #[serde(default, rename = "removeAbsentLabels")]
    pub remove_absent: bool,

    /// Replace hook lists even when the delta's are empty
    #[serde(default)]
    pub replace_hooks: bool,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[must_use]
    pub fn with_remove_absent(mut self, remove_absent: bool) -> Self {
        self.remove_absent = remove_absent;
        self
    }

    #[must_use]
    pub fn with_replace_hooks(mut self, replace_hooks: bool) -> Self {
        self.replace_hooks = replace_hooks;
        self
    }

    #[must_use]
    pub fn with_preserved(mut self, label: impl Into<String>) -> Self {
        self.preserve.insert(label.into());
        self
    }
}

impl Config {
    /// Merge `delta` into this configuration
    ///
    /// The sink, formatter, and error handler are replaced when the delta
    /// sets them. Hook lists are replaced when the delta's list is
    /// non-empty, or always with `replace_hooks`. The namespace never
    /// changes. Labels are then merged:
    ///
    /// 1. with `remove_absent`, labels whose localized name is neither in the
    ///    delta nor preserved are deleted;
    /// 2. every delta label that is not preserved is written, qualified with
    ///    this configuration's namespace.
    ///
    /// Applying the same delta twice gives the same result as applying it
    /// once.
    pub fn apply(&mut self, delta: &Config, opts: &ApplyOptions) {
        if let Some(sink) = &delta.sink {
            self.sink = Some(sink.clone());
        }
        if let Some(formatter) = &delta.formatter {
            self.formatter = Some(formatter.clone());
        }
        if let Some(handler) = &delta.error_handler {
            self.error_handler = Some(handler.clone());
        }
        if opts.replace_hooks || !delta.pre.is_empty() {
            self.pre = delta.pre.clone();
        }
        if opts.replace_hooks || !delta.post.is_empty() {
            self.post = delta.post.clone();
        }

        let incoming: BTreeMap<&str, i64> = delta
            .labels
            .iter()
            .map(|(name, value)| (delta.localize(name), *value))
            .collect();

        let namespace = &self.namespace;
        if opts.remove_absent {
            self.labels.retain(|name, _| {
                let local = localize(namespace, name);
                incoming.contains_key(local) || opts.preserve.contains(local)
            });
        }
        for (local, value) in incoming {
            if opts.preserve.contains(local) {
                continue;
            }
            let name = unlocalize(namespace, local).into_owned();
            self.labels.insert(name, value);
        }
    }
}
