//! Incremental JSON event builder
//!
//! An [`Event`] is a tree of JSON values written straight into one byte
//! buffer. The buffer and the node table live in an arena owned by the root;
//! the handle carries a cursor naming the node that is currently open for
//! writing. Every builder call appends at the cursor, so the finished buffer
//! is the JSON text itself and nothing is re-serialized at emission time.
//!
//! A node may have at most one open child. Opening a second child, or writing
//! into a node while one of its children is still open, panics: these are
//! programming errors, and continuing would produce malformed output.
//!
//! An event vetoed by a pre-hook is *absent*. Every operation on an absent
//! event is a no-op that returns the absent event, so call chains never need
//! to check.
//!
//! # Example
//!
//! ```
//! use tree_logger::Event;
//!
//! let event = Event::new()
//!     .object()
//!     .field("user", "alice")
//!     .with_array("ids", |ids| ids.int(1).int(2))
//!     .close()
//!     .unwrap();
//!
//! assert_eq!(event.to_string(), r#"{"user":"alice","ids":[1,2]}"#);
//! ```

use super::error::{LoggerError, Result};
use super::logger::Logger;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

type NodeId = usize;

const ROOT: NodeId = 0;

/// Key used by [`Event::err`]
pub const ERROR_KEY: &str = "Lerr";

#[derive(Debug, Clone, Copy)]
struct Node {
    start: usize,
    parent: Option<NodeId>,
    has_child: bool,
    wrote: bool,
}

#[derive(Clone)]
struct Arena {
    buf: Vec<u8>,
    nodes: Vec<Node>,
    logger: Option<Logger>,
}

impl Arena {
    fn new(logger: Option<Logger>) -> Self {
        Self {
            buf: Vec::new(),
            nodes: vec![Node {
                start: 0,
                parent: None,
                has_child: false,
                wrote: false,
            }],
            logger,
        }
    }

    fn check_open(&self, id: NodeId) {
        let node = &self.nodes[id];
        if node.has_child {
            panic!(
                "nonlinear: node at offset {} already has an open child",
                node.start
            );
        }
    }

    fn separate(&mut self, id: NodeId) {
        self.check_open(id);
        if self.nodes[id].wrote {
            self.buf.push(b',');
        }
    }

    fn open(&mut self, id: NodeId, opener: u8) -> NodeId {
        self.separate(id);
        let child = self.nodes.len();
        self.nodes.push(Node {
            start: self.buf.len(),
            parent: Some(id),
            has_child: false,
            wrote: false,
        });
        self.buf.push(opener);
        let node = &mut self.nodes[id];
        node.has_child = true;
        node.wrote = true;
        child
    }

    fn key(&mut self, id: NodeId, name: &str) {
        self.separate(id);
        escape_into(&mut self.buf, name.as_bytes());
        self.buf.push(b':');
        self.nodes[id].wrote = false;
    }

    fn value(&mut self, id: NodeId, value: Value<'_>) {
        self.separate(id);
        write_value(&mut self.buf, value);
        self.nodes[id].wrote = true;
    }

    fn raw(&mut self, id: NodeId, data: &[u8]) {
        self.check_open(id);
        self.buf.extend_from_slice(data);
        self.nodes[id].wrote = true;
    }

    /// Append the closer for a non-root node and return its parent.
    fn close_node(&mut self, id: NodeId) -> Result<NodeId> {
        self.check_open(id);
        let node = self.nodes[id];
        let closer = match self.buf.get(node.start) {
            Some(b'{') => b'}',
            Some(b'[') => b']',
            _ => return Err(LoggerError::corrupt_buffer(node.start)),
        };
        let parent = node.parent.ok_or_else(|| LoggerError::corrupt_buffer(node.start))?;
        self.buf.push(closer);
        self.nodes[parent].has_child = false;
        Ok(parent)
    }

    fn validate(&self) -> Result<()> {
        serde_json::from_slice::<serde::de::IgnoredAny>(&self.buf)
            .map(|_| ())
            .map_err(|e| LoggerError::validation(&self.buf, &e))
    }
}

/// Anything that can write itself as JSON text
///
/// Implemented for every `serde::Serialize` type. Used through
/// [`Value::Custom`].
pub trait JsonEncode {
    fn encode_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()>;
}

impl<T: Serialize + ?Sized> JsonEncode for T {
    fn encode_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(out, self)
    }
}

/// A value accepted by [`Event::field`]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(Cow<'a, str>),
    /// Written as a base64 string
    Bytes(Cow<'a, [u8]>),
    /// Spliced verbatim from another event's buffer
    Event(&'a Event),
    /// Serialized on write; a serialization failure panics
    Custom(&'a dyn JsonEncode),
}

impl<'a> Value<'a> {
    /// Wrap any serializable value
    pub fn custom<T: JsonEncode>(value: &'a T) -> Self {
        Value::Custom(value)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Uint(u) => write!(f, "Uint({})", u),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Text(s) => write!(f, "Text({:?})", s),
            Value::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Value::Event(e) => write!(f, "Event({})", e),
            Value::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

macro_rules! value_from_int {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

value_from_int!(Int, i64, i8, i16, i32, i64, isize);
value_from_int!(Uint, u64, u8, u16, u32, u64, usize);

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Text(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::Text(s)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(b))
    }
}

impl<'a> From<&'a Event> for Value<'a> {
    fn from(e: &'a Event) -> Self {
        Value::Event(e)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A JSON value under construction
///
/// See the [module documentation](self) for the builder discipline.
#[derive(Clone)]
pub struct Event {
    arena: Option<Box<Arena>>,
    cursor: NodeId,
}

impl Event {
    /// Create a detached root event, not bound to any logger
    pub fn new() -> Self {
        Self::rooted(None)
    }

    /// The absent event: every operation on it is a no-op
    pub fn absent() -> Self {
        Self {
            arena: None,
            cursor: ROOT,
        }
    }

    pub(crate) fn rooted(logger: Option<Logger>) -> Self {
        Self {
            arena: Some(Box::new(Arena::new(logger))),
            cursor: ROOT,
        }
    }

    fn with_arena(mut self, f: impl FnOnce(&mut Arena, NodeId) -> NodeId) -> Self {
        if let Some(arena) = self.arena.as_deref_mut() {
            self.cursor = f(arena, self.cursor);
        }
        self
    }

    /// Open an object at the current position and move into it
    #[must_use]
    pub fn object(self) -> Self {
        self.with_arena(|arena, id| arena.open(id, b'{'))
    }

    /// Open an array at the current position and move into it
    #[must_use]
    pub fn array(self) -> Self {
        self.with_arena(|arena, id| arena.open(id, b'['))
    }

    /// Write `"name":` and open an object as its value
    #[must_use]
    pub fn object_field(self, name: &str) -> Self {
        self.with_arena(|arena, id| {
            arena.key(id, name);
            arena.open(id, b'{')
        })
    }

    /// Write `"name":` and open an array as its value
    #[must_use]
    pub fn array_field(self, name: &str) -> Self {
        self.with_arena(|arena, id| {
            arena.key(id, name);
            arena.open(id, b'[')
        })
    }

    /// Build a keyed object with `f`, closing it afterwards
    ///
    /// ```
    /// use tree_logger::Event;
    ///
    /// let ev = Event::new()
    ///     .object()
    ///     .with_object("req", |req| req.field("id", 7))
    ///     .close()
    ///     .unwrap();
    /// assert_eq!(ev.to_string(), r#"{"req":{"id":7}}"#);
    /// ```
    #[must_use]
    pub fn with_object(self, name: &str, f: impl FnOnce(Event) -> Event) -> Self {
        let parent = self.cursor;
        f(self.object_field(name)).close_to(parent)
    }

    /// Build a keyed array with `f`, closing it afterwards
    #[must_use]
    pub fn with_array(self, name: &str, f: impl FnOnce(Event) -> Event) -> Self {
        let parent = self.cursor;
        f(self.array_field(name)).close_to(parent)
    }

    // Close nodes until the cursor is back at `target`.
    fn close_to(mut self, target: NodeId) -> Self {
        if let Some(arena) = self.arena.as_deref_mut() {
            while self.cursor != target && self.cursor != ROOT {
                match arena.close_node(self.cursor) {
                    Ok(parent) => self.cursor = parent,
                    Err(e) => panic!("{}", e),
                }
            }
        }
        self
    }

    /// Write a `"name":value` pair
    #[must_use]
    pub fn field<'v>(self, name: &str, value: impl Into<Value<'v>>) -> Self {
        let value = value.into();
        self.with_arena(|arena, id| {
            arena.key(id, name);
            arena.value(id, value);
            id
        })
    }

    /// Write `"Lerr":` followed by the error's display text
    #[must_use]
    pub fn err(self, e: &dyn std::error::Error) -> Self {
        self.field(ERROR_KEY, e.to_string())
    }

    /// Write a bare value at the current position
    #[must_use]
    pub fn value<'v>(self, value: impl Into<Value<'v>>) -> Self {
        let value = value.into();
        self.with_arena(|arena, id| {
            arena.value(id, value);
            id
        })
    }

    #[must_use]
    pub fn string(self, s: &str) -> Self {
        self.value(s)
    }

    /// Write a string from possibly invalid UTF-8; bad sequences become U+FFFD
    #[must_use]
    pub fn string_lossy(self, data: &[u8]) -> Self {
        self.with_arena(|arena, id| {
            arena.separate(id);
            escape_into(&mut arena.buf, data);
            arena.nodes[id].wrote = true;
            id
        })
    }

    #[must_use]
    pub fn int(self, v: i64) -> Self {
        self.value(v)
    }

    #[must_use]
    pub fn uint(self, v: u64) -> Self {
        self.value(v)
    }

    /// Write a float in scientific notation; NaN and infinities become `null`
    #[must_use]
    pub fn float(self, v: f64) -> Self {
        self.value(v)
    }

    #[must_use]
    pub fn bool(self, v: bool) -> Self {
        self.value(v)
    }

    /// Write `data` as a base64 string
    #[must_use]
    pub fn bytes(self, data: &[u8]) -> Self {
        self.value(data)
    }

    #[must_use]
    pub fn null(self) -> Self {
        self.value(Value::Null)
    }

    /// Append bytes verbatim, without separators or escaping
    ///
    /// Nothing checks that `data` keeps the buffer well formed until the
    /// event is closed.
    #[must_use]
    pub fn raw(self, data: &[u8]) -> Self {
        self.with_arena(|arena, id| {
            arena.raw(id, data);
            id
        })
    }

    /// Close the current node
    ///
    /// Appends the matching `}` or `]` and moves back to the parent. Once the
    /// cursor reaches the root, the whole buffer is validated.
    pub fn close(mut self) -> Result<Self> {
        let Some(arena) = self.arena.as_deref_mut() else {
            return Ok(self);
        };
        if self.cursor != ROOT {
            self.cursor = arena.close_node(self.cursor)?;
        }
        if self.cursor == ROOT {
            arena.validate()?;
        }
        Ok(self)
    }

    /// Check the whole buffer is valid JSON, without closing anything
    pub fn validate(&self) -> Result<()> {
        match self.arena.as_deref() {
            Some(arena) => arena.validate(),
            None => Ok(()),
        }
    }

    /// Move to the root node, leaving open nodes open
    #[must_use]
    pub fn root(mut self) -> Self {
        self.cursor = ROOT;
        self
    }

    /// Move to the parent node without closing the current one
    ///
    /// At the root this does nothing.
    #[must_use]
    pub fn parent(mut self) -> Self {
        if let Some(arena) = self.arena.as_deref() {
            if let Some(parent) = arena.nodes[self.cursor].parent {
                self.cursor = parent;
            }
        }
        self
    }

    pub fn is_absent(&self) -> bool {
        self.arena.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.arena.is_some() && self.cursor == ROOT
    }

    /// Whether the current node holds an object
    pub fn is_object(&self) -> bool {
        self.arena.as_deref().is_some_and(|arena| {
            arena.buf.get(arena.nodes[self.cursor].start) == Some(&b'{')
        })
    }

    /// Whether the current node has a child that is still open
    pub fn has_open_child(&self) -> bool {
        self.arena
            .as_deref()
            .is_some_and(|arena| arena.nodes[self.cursor].has_child)
    }

    /// The whole accumulated buffer
    pub fn raw_bytes(&self) -> &[u8] {
        match self.arena.as_deref() {
            Some(arena) => &arena.buf,
            None => &[],
        }
    }

    /// The logger this event will be emitted through
    pub fn logger(&self) -> Option<&Logger> {
        self.arena.as_deref().and_then(|arena| arena.logger.as_ref())
    }

    /// Rebind the event to `logger`
    ///
    /// Lets a partially built event act as a template logged elsewhere.
    #[must_use]
    pub fn attach(mut self, logger: &Logger) -> Self {
        if let Some(arena) = self.arena.as_deref_mut() {
            arena.logger = Some(logger.clone());
        }
        self
    }

    /// Emit through the originating logger
    ///
    /// Detached and absent events are dropped silently.
    pub fn log(self) {
        if let Some(logger) = self.logger().cloned() {
            logger.log(self);
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.raw_bytes()))
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arena.as_deref() {
            Some(arena) => f
                .debug_struct("Event")
                .field("buf", &String::from_utf8_lossy(&arena.buf))
                .field("cursor", &self.cursor)
                .field("nodes", &arena.nodes.len())
                .finish(),
            None => write!(f, "Event(absent)"),
        }
    }
}

/// Raw writes, so encoders can target an event directly
impl Write for Event {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Some(arena) = self.arena.as_deref_mut() {
            arena.raw(self.cursor, data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn write_value(buf: &mut Vec<u8>, value: Value<'_>) {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Int(i) => push_display(buf, i),
        Value::Uint(u) => push_display(buf, u),
        Value::Float(v) if !v.is_finite() => buf.extend_from_slice(b"null"),
        Value::Float(v) => push_display(buf, format_args!("{:e}", v)),
        Value::Text(s) => escape_into(buf, s.as_bytes()),
        Value::Bytes(data) => write_base64(buf, &data),
        Value::Event(other) => buf.extend_from_slice(other.raw_bytes()),
        Value::Custom(custom) => {
            let mark = buf.len();
            if let Err(e) = custom.encode_json(buf) {
                buf.truncate(mark);
                panic!("custom field value failed to serialize: {}", e);
            }
        }
    }
}

fn push_display(buf: &mut Vec<u8>, v: impl fmt::Display) {
    // Writes into a Vec<u8> cannot fail.
    let _ = write!(buf, "{}", v);
}

fn write_base64(buf: &mut Vec<u8>, data: &[u8]) {
    buf.push(b'"');
    let start = buf.len();
    let len = base64::encoded_len(data.len(), true).unwrap_or(0);
    buf.resize(start + len, 0);
    let written = STANDARD.encode_slice(data, &mut buf[start..]).unwrap_or(0);
    buf.truncate(start + written);
    buf.push(b'"');
}

/// Write `text` as a quoted JSON string
pub(crate) fn escape_into(buf: &mut Vec<u8>, text: &[u8]) {
    buf.push(b'"');
    for chunk in text.utf8_chunks() {
        for &b in chunk.valid().as_bytes() {
            match b {
                b'"' => buf.extend_from_slice(b"\\\""),
                b'\\' => buf.extend_from_slice(b"\\\\"),
                0x08 => buf.extend_from_slice(b"\\b"),
                0x0c => buf.extend_from_slice(b"\\f"),
                b'\n' => buf.extend_from_slice(b"\\n"),
                b'\r' => buf.extend_from_slice(b"\\r"),
                b'\t' => buf.extend_from_slice(b"\\t"),
                0x00..=0x1f => push_display(buf, format_args!("\\u{:04x}", b)),
                _ => buf.push(b),
            }
        }
        if !chunk.invalid().is_empty() {
            buf.extend_from_slice(b"\\ufffd");
        }
    }
    buf.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;

    fn closed(ev: Event) -> String {
        ev.close().expect("valid event").to_string()
    }

    #[test]
    fn test_fields_in_order() {
        let ev = Event::new().object().field("a", 1).field("b", "x");
        assert_eq!(closed(ev), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_value_shapes() {
        let ev = Event::new()
            .object()
            .field("t", true)
            .field("f", false)
            .field("neg", -42)
            .field("big", u64::MAX)
            .field("pi", 1.5)
            .field("s", "hi")
            .field("b", &b"hi"[..])
            .field("none", None::<i32>);
        assert_eq!(
            closed(ev),
            r#"{"t":true,"f":false,"neg":-42,"big":18446744073709551615,"pi":1.5e0,"s":"hi","b":"aGk=","none":null}"#
        );
    }

    #[test]
    fn test_float_scientific() {
        let ev = Event::new().array().float(1234.5).float(0.001).float(-2.0);
        let out = closed(ev);
        assert_eq!(out, "[1.2345e3,1e-3,-2e0]");
        let parsed: Vec<f64> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![1234.5, 0.001, -2.0]);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        let ev = Event::new().array().float(f64::NAN).float(f64::INFINITY);
        assert_eq!(closed(ev), "[null,null]");
    }

    #[test]
    fn test_string_escaping() {
        let ev = Event::new().object().field("s", "a\"\nb");
        assert_eq!(closed(ev), "{\"s\":\"a\\\"\\nb\"}");
    }

    #[test]
    fn test_control_characters_escaped() {
        let ev = Event::new().string("\\ \u{8}\u{c}\r\t\u{1}");
        let out = closed(ev);
        assert_eq!(out, r#""\\ \b\f\r\t\u0001""#);
        let parsed: String = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, "\\ \u{8}\u{c}\r\t\u{1}");
    }

    #[test]
    fn test_non_ascii_passes_through() {
        let ev = Event::new().string("héllo ✓");
        assert_eq!(closed(ev), "\"héllo ✓\"");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let ev = Event::new().string_lossy(b"ok\xffend");
        let out = closed(ev);
        assert_eq!(out, r#""ok\ufffdend""#);
        let parsed: String = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, "ok\u{fffd}end");
    }

    #[test]
    fn test_nested_containers() {
        let ev = Event::new()
            .object()
            .field("a", 1)
            .with_object("req", |req| req.field("id", 7).field("ok", true))
            .with_array("xs", |xs| xs.int(1).int(2).object().field("k", "v"))
            .field("z", Value::Null);
        assert_eq!(
            closed(ev),
            r#"{"a":1,"req":{"id":7,"ok":true},"xs":[1,2,{"k":"v"}],"z":null}"#
        );
    }

    #[test]
    fn test_keyed_children_with_explicit_close() {
        let ev = Event::new()
            .object()
            .array_field("xs")
            .int(1)
            .close()
            .unwrap()
            .object_field("o")
            .close()
            .unwrap()
            .field("n", 0);
        assert_eq!(closed(ev), r#"{"xs":[1],"o":{},"n":0}"#);
    }

    #[test]
    #[should_panic(expected = "nonlinear")]
    fn test_second_open_child_panics() {
        let ev = Event::new().array().array().int(1).parent();
        let _ = ev.array();
    }

    #[test]
    #[should_panic(expected = "nonlinear")]
    fn test_write_into_parent_with_open_child_panics() {
        let ev = Event::new().object().object_field("inner").parent();
        let _ = ev.field("late", 1);
    }

    #[test]
    fn test_close_then_open_sibling() {
        let ev = Event::new()
            .array()
            .array()
            .int(1)
            .close()
            .unwrap()
            .array()
            .int(2)
            .close()
            .unwrap();
        assert!(!ev.has_open_child());
        assert_eq!(closed(ev), "[[1],[2]]");
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Event::new().object().field("a", 1);
        let copy = original.clone();

        let original = original.field("b", 2);
        let copy = copy.field("c", 3).field("d", 4);

        assert_eq!(closed(original), r#"{"a":1,"b":2}"#);
        assert_eq!(closed(copy), r#"{"a":1,"c":3,"d":4}"#);
    }

    #[test]
    fn test_splice_nested_event() {
        let inner = Event::new().object().field("x", 1).close().unwrap();
        let outer = Event::new().object().field("inner", &inner).field("y", 2);
        assert_eq!(closed(outer), r#"{"inner":{"x":1},"y":2}"#);
    }

    #[test]
    fn test_custom_serializable() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }
        let p = Point { x: 1, y: -1 };
        let ev = Event::new().object().field("p", Value::custom(&p));
        assert_eq!(closed(ev), r#"{"p":{"x":1,"y":-1}}"#);
    }

    #[test]
    #[should_panic(expected = "failed to serialize")]
    fn test_custom_serialization_failure_panics() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
                Err(S::Error::custom("boom"))
            }
        }
        let _ = Event::new().object().field("b", Value::custom(&Broken));
    }

    #[test]
    fn test_raw_breaking_structure_fails_validation() {
        let ev = Event::new().object().field("a", 1).raw(b",,");
        let err = ev.close().unwrap_err();
        assert!(matches!(err, LoggerError::Validation { .. }));
        let offset = err.offset().unwrap();
        assert!((6..=8).contains(&offset), "offset {}", offset);
    }

    #[test]
    fn test_root_scalars() {
        assert_eq!(closed(Event::new().string("hello")), "\"hello\"");
        assert_eq!(closed(Event::new().null()), "null");

        let twice = Event::new().string("hello").string("again");
        assert!(matches!(
            twice.close(),
            Err(LoggerError::Validation { .. })
        ));
    }

    #[test]
    fn test_unclosed_child_fails_at_root() {
        let ev = Event::new().object().array_field("xs").int(1).root();
        assert!(ev.has_open_child());
        assert!(matches!(ev.close(), Err(LoggerError::Validation { .. })));
    }

    #[test]
    fn test_empty_event_is_invalid() {
        assert!(Event::new().close().is_err());
    }

    #[test]
    fn test_absent_event_is_noop() {
        let ev = Event::absent()
            .object()
            .field("a", 1)
            .with_array("xs", |xs| xs.int(1))
            .raw(b"garbage")
            .parent()
            .root();
        assert!(ev.is_absent());
        assert!(!ev.is_root());
        assert!(ev.raw_bytes().is_empty());
        assert!(ev.logger().is_none());
        let ev = ev.close().unwrap();
        assert!(ev.is_absent());
        ev.log();
    }

    #[test]
    fn test_traversal_helpers() {
        let ev = Event::new();
        assert!(ev.is_root());
        let ev = ev.object();
        assert!(!ev.is_root());
        assert!(ev.is_object());
        let ev = ev.array_field("a");
        assert!(!ev.is_object());
        let ev = ev.parent();
        assert!(ev.is_object());
        assert!(ev.has_open_child());
        let ev = ev.parent();
        assert!(ev.is_root());
        let ev = ev.parent();
        assert!(ev.is_root());
    }

    #[test]
    fn test_err_field() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let ev = Event::new().object().err(&io);
        assert_eq!(closed(ev), r#"{"Lerr":"disk gone"}"#);
    }

    #[test]
    fn test_io_write_appends() {
        let mut ev = Event::new().object().array_field("v");
        serde_json::to_writer(&mut ev, &vec![1, 2]).unwrap();
        assert_eq!(closed(ev.close().unwrap()), r#"{"v":[[1,2]]}"#);
    }
}
