//! Hooks that drop events based on labels

use crate::core::log_level::LogLevel;
use crate::core::middleware::Middleware;
use rand::Rng;

/// Keep events only when the label is set
pub fn if_label(name: impl Into<String>) -> Middleware {
    let name = name.into();
    Middleware::new(move |_, config, event| config.has_label(&name).then_some(event))
}

/// Keep events only when the label is not set
pub fn if_not(name: impl Into<String>) -> Middleware {
    let name = name.into();
    Middleware::new(move |_, config, event| (!config.has_label(&name)).then_some(event))
}

/// Keep events when the label is at most `value`; a missing label counts as 0
pub fn leq(name: impl Into<String>, value: i64) -> Middleware {
    let name = name.into();
    Middleware::new(move |_, config, event| {
        (config.label(&name).unwrap_or(0) <= value).then_some(event)
    })
}

/// Keep events when the label is at least `value`; a missing label counts as 0
pub fn geq(name: impl Into<String>, value: i64) -> Middleware {
    let name = name.into();
    Middleware::new(move |_, config, event| {
        (config.label(&name).unwrap_or(0) >= value).then_some(event)
    })
}

/// Keep events from loggers whose level label is at least `min`
pub fn level_filter(name: impl Into<String>, min: LogLevel) -> Middleware {
    geq(name, min.as_label())
}

/// Keep a random fraction `rate` of events
///
/// Rates outside `0.0..=1.0` are clamped.
pub fn sample(rate: f64) -> Middleware {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    Middleware::new(move |_, _, event| rand::thread_rng().gen_bool(rate).then_some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::logger::Logger;
    use crate::core::sink::MemorySink;

    fn run(hook: Middleware, config: Config) -> bool {
        let logger = Logger::root(config.clone());
        let event = logger.dict();
        hook.call(&logger, &config, event).is_some()
    }

    fn config() -> Config {
        Config::new("app")
            .with_sink(MemorySink::new().sink())
            .with_label(".level", 3)
    }

    #[test]
    fn test_if_label() {
        assert!(run(if_label(".level"), config()));
        assert!(run(if_label("app.level"), config()));
        assert!(!run(if_label(".debug"), config()));
        assert!(!run(if_not(".level"), config()));
        assert!(run(if_not(".debug"), config()));
    }

    #[test]
    fn test_comparisons() {
        assert!(run(geq(".level", 3), config()));
        assert!(!run(geq(".level", 4), config()));
        assert!(run(leq(".level", 3), config()));
        assert!(!run(leq(".level", 2), config()));
    }

    #[test]
    fn test_missing_label_counts_as_zero() {
        assert!(run(leq(".missing", 0), config()));
        assert!(!run(geq(".missing", 1), config()));
    }

    #[test]
    fn test_level_filter() {
        assert!(run(level_filter(".level", LogLevel::Info), config()));
        assert!(!run(level_filter(".level", LogLevel::Warn), config()));
    }

    #[test]
    fn test_sample_extremes() {
        for _ in 0..50 {
            assert!(run(sample(1.0), config()));
            assert!(!run(sample(0.0), config()));
        }
        assert!(run(sample(7.5), config()));
        assert!(!run(sample(f64::NAN), config()));
    }
}
