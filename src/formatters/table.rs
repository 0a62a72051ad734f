//! Plain text formatter printing selected fields on one line

use crate::core::{Formatter, LoggerError, Result};
use serde_json::Value;
use std::io::Write;

#[cfg(feature = "console")]
use colored::Colorize;

/// How floating point field values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatFormat {
    /// Shortest representation that round-trips
    #[default]
    Shortest,
    /// Fixed number of decimals: `3.14`
    Fixed(usize),
    /// Scientific notation with the given number of decimals: `3.14e0`
    Exponent(usize),
}

impl FloatFormat {
    fn render(self, v: f64) -> String {
        match self {
            FloatFormat::Shortest => v.to_string(),
            FloatFormat::Fixed(prec) => format!("{:.*}", prec, v),
            FloatFormat::Exponent(prec) => format!("{:.*e}", prec, v),
        }
    }
}

/// Prints object events as `value<sep>value...` lines
///
/// Only the fields listed are printed, in list order; with an empty list
/// every field is printed in key order. Missing and null fields are skipped.
/// Strings are printed without quotes, nested values as compact JSON.
///
/// # Examples
///
/// ```
/// use tree_logger::{Config, Logger, MemorySink, TableFormatter};
///
/// let out = MemorySink::new();
/// let table = TableFormatter::new(["level", "msg"]).with_separator(" | ");
/// let logger = Logger::root(Config::new("app").with_sink(out.sink()).with_formatter(table));
///
/// logger.dict().field("msg", "ready").field("level", 3).log();
/// assert_eq!(out.to_string_lossy(), "3 | ready\n");
/// ```
#[derive(Debug, Clone)]
pub struct TableFormatter {
    fields: Vec<String>,
    separator: String,
    keys: bool,
    float_format: FloatFormat,
    #[cfg(feature = "console")]
    colors: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            separator: " ".to_string(),
            keys: false,
            float_format: FloatFormat::default(),
            #[cfg(feature = "console")]
            colors: false,
        }
    }
}

impl TableFormatter {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Prefix each value with `key=`
    #[must_use]
    pub fn with_keys(mut self, keys: bool) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn with_float_format(mut self, float_format: FloatFormat) -> Self {
        self.float_format = float_format;
        self
    }

    /// Color the `key=` prefixes
    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn push_key(&self, line: &mut String, key: &str) {
        #[cfg(feature = "console")]
        if self.colors {
            line.push_str(&format!("{}=", key.cyan()));
            return;
        }
        line.push_str(key);
        line.push('=');
    }

    fn push_value(&self, line: &mut String, value: &Value) -> Result<()> {
        match value {
            Value::String(s) => line.push_str(s),
            Value::Bool(b) => line.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => line.push_str(&i.to_string()),
                (None, Some(u), _) => line.push_str(&u.to_string()),
                (None, None, Some(f)) => line.push_str(&self.float_format.render(f)),
                (None, None, None) => line.push_str(&n.to_string()),
            },
            other => line.push_str(&serde_json::to_string(other)?),
        }
        Ok(())
    }
}

impl Formatter for TableFormatter {
    fn name(&self) -> &str {
        "table"
    }

    fn format(&self, sink: &mut dyn Write, event: &[u8]) -> Result<()> {
        let Value::Object(map) = serde_json::from_slice::<Value>(event)? else {
            return Err(LoggerError::formatter("table", "event is not an object"));
        };
        let fields: Vec<&str> = if self.fields.is_empty() {
            map.keys().map(String::as_str).collect()
        } else {
            self.fields.iter().map(String::as_str).collect()
        };

        let mut line = String::new();
        let mut first = true;
        for key in fields {
            let Some(value) = map.get(key).filter(|v| !v.is_null()) else {
                continue;
            };
            if !first {
                line.push_str(&self.separator);
            }
            first = false;
            if self.keys {
                self.push_key(&mut line, key);
            }
            self.push_value(&mut line, value)?;
        }
        line.push('\n');
        sink.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(formatter: &TableFormatter, event: &str) -> Result<String> {
        let mut out = Vec::new();
        formatter.format(&mut out, event.as_bytes())?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_selected_fields_in_order() {
        let table = TableFormatter::new(["b", "a", "missing"]).with_separator(",");
        let out = render(&table, r#"{"a":"x","b":2,"c":true}"#).unwrap();
        assert_eq!(out, "2,x\n");
    }

    #[test]
    fn test_keys_and_nested_values() {
        let table = TableFormatter::new(["n", "obj", "ok"]).with_keys(true);
        let out = render(&table, r#"{"n":null,"obj":{"k":[1,2]},"ok":false}"#).unwrap();
        assert_eq!(out, "obj={\"k\":[1,2]} ok=false\n");
    }

    #[test]
    fn test_all_fields_when_unfiltered() {
        let out = render(&TableFormatter::default(), r#"{"a":2,"z":1}"#).unwrap();
        assert_eq!(out, "2 1\n");
    }

    #[test]
    fn test_float_formats() {
        let event = r#"{"f":3.14159e0}"#;
        let shortest = TableFormatter::new(["f"]);
        let fixed = TableFormatter::new(["f"]).with_float_format(FloatFormat::Fixed(2));
        let exp = TableFormatter::new(["f"]).with_float_format(FloatFormat::Exponent(1));

        assert_eq!(render(&shortest, event).unwrap(), "3.14159\n");
        assert_eq!(render(&fixed, event).unwrap(), "3.14\n");
        assert_eq!(render(&exp, event).unwrap(), "3.1e0\n");
    }

    #[test]
    fn test_non_object_is_an_error() {
        let err = render(&TableFormatter::default(), "[1,2]").unwrap_err();
        assert!(matches!(err, LoggerError::FormatterError { .. }));
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colored_keys() {
        colored::control::set_override(true);
        let table = TableFormatter::new(["a"]).with_keys(true).with_colors(true);
        let out = render(&table, r#"{"a":1}"#).unwrap();
        colored::control::unset_override();

        assert!(out.contains("\u{1b}["));
        assert!(out.ends_with("=1\n"));
    }
}
