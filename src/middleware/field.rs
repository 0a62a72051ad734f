//! Hooks that add fields to events
//!
//! These hooks write into the current object and pass any other event
//! through unchanged, so they belong in the post hook list of loggers that
//! emit objects.

use crate::core::event::Event;
use crate::core::log_level::LogLevel;
use crate::core::middleware::Middleware;
use crate::core::timestamp::TimestampFormat;
use chrono::Utc;

/// Key written by [`namespace_field`]
pub const NAMESPACE_KEY: &str = "Lpkg";

fn in_object(event: Event, f: impl FnOnce(Event) -> Event) -> Option<Event> {
    if event.is_object() {
        Some(f(event))
    } else {
        Some(event)
    }
}

/// Add the label's value under its name; a missing label is written as 0
pub fn label_field(name: impl Into<String>) -> Middleware {
    let name = name.into();
    Middleware::new(move |_, config, event| {
        let value = config.label(&name).unwrap_or(0);
        in_object(event, |ev| ev.field(&name, value))
    })
}

/// Add the logger's namespace under `"Lpkg"`
pub fn namespace_field() -> Middleware {
    Middleware::new(|_, config, event| {
        in_object(event, |ev| ev.field(NAMESPACE_KEY, config.namespace()))
    })
}

/// Add the current time under `key`
///
/// Numeric formats are written as integers. An invalid custom pattern
/// leaves the event unchanged.
pub fn timestamp(key: impl Into<String>, format: TimestampFormat) -> Middleware {
    let key = key.into();
    Middleware::new(move |_, _, event| {
        let now = Utc::now();
        in_object(event, |ev| match format.numeric(&now) {
            Some(n) => ev.field(&key, n),
            None => match format.format(&now) {
                Some(text) => ev.field(&key, text),
                None => ev,
            },
        })
    })
}

/// Add the current time under `key`, rendered with a strftime pattern
pub fn time_format(key: impl Into<String>, pattern: impl Into<String>) -> Middleware {
    timestamp(key, TimestampFormat::Custom(pattern.into()))
}

/// Add the name of the level held in label `name` under `key`
///
/// Loggers without a valid level label are left unchanged.
pub fn level_tag(name: impl Into<String>, key: impl Into<String>) -> Middleware {
    let name = name.into();
    let key = key.into();
    Middleware::new(move |_, config, event| {
        match config.label(&name).and_then(LogLevel::from_label) {
            Some(level) => in_object(event, |ev| ev.field(&key, level.to_str())),
            None => Some(event),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::logger::Logger;
    use crate::core::sink::MemorySink;

    fn emit(config: Config, build: impl FnOnce(&Logger) -> Event) -> String {
        let out = MemorySink::new();
        let logger = Logger::root(config.with_sink(out.sink()));
        build(&logger).log();
        out.to_string_lossy()
    }

    #[test]
    fn test_label_and_namespace_fields() {
        let config = Config::new("db")
            .with_label(".level", 2)
            .with_post(label_field(".level"))
            .with_post(label_field("missing"))
            .with_post(namespace_field());

        let out = emit(config, |l| l.dict().field("msg", "x"));
        assert_eq!(out, "{\"msg\":\"x\",\".level\":2,\"missing\":0,\"Lpkg\":\"db\"}\n");
    }

    #[test]
    fn test_fields_skip_non_objects() {
        let config = Config::new("db").with_post(namespace_field());
        let out = emit(config, |l| l.array().int(1));
        assert_eq!(out, "[1]\n");
    }

    #[test]
    fn test_numeric_timestamp() {
        let config = Config::new("db").with_post(timestamp("ts", TimestampFormat::Unix));
        let out = emit(config, |l| l.dict());

        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert!(parsed["ts"].as_i64().unwrap() > 1_600_000_000);
    }

    #[test]
    fn test_time_format() {
        let config = Config::new("db").with_post(time_format("day", "%Y-%m-%d"));
        let out = emit(config, |l| l.dict());

        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        let day = parsed["day"].as_str().unwrap();
        assert_eq!(day.len(), 10);
        assert_eq!(&day[4..5], "-");
    }

    #[test]
    fn test_invalid_time_format_leaves_event() {
        let config = Config::new("db").with_post(time_format("t", "%Q"));
        let out = emit(config, |l| l.dict().field("a", 1));
        assert_eq!(out, "{\"a\":1}\n");
    }

    #[test]
    fn test_level_tag() {
        let config = Config::new("db")
            .with_label(".op", LogLevel::Trace.as_label())
            .with_post(level_tag(".op", "Lop"));
        assert_eq!(emit(config, |l| l.dict()), "{\"Lop\":\"trace\"}\n");

        let config = Config::new("db").with_post(level_tag(".op", "Lop"));
        assert_eq!(emit(config, |l| l.dict()), "{}\n");
    }
}
