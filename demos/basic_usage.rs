//! Basic logger usage example
//!
//! Demonstrates building events, deriving loggers, and filtering on labels.
//!
//! Run with: cargo run --example basic_usage

use tree_logger::middleware::{level_filter, level_tag, namespace_field, time_format};
use tree_logger::prelude::*;
use tree_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Tree Logger - Basic Usage Example ===\n");

    let root = Logger::root(
        Config::new("app")
            .with_sink(Sink::stdout())
            .with_label(".level", LogLevel::Info.as_label())
            .with_pre(level_filter(".level", LogLevel::Info))
            .with_post(level_tag(".level", "lvl"))
            .with_post(namespace_field())
            .with_post(time_format("ts", "%H:%M:%S")),
    );

    println!("1. Events of different shapes:");
    root.dict().field("msg", "Application started").log();
    root.dict()
        .field("user", "alice")
        .with_array("roles", |roles| roles.string("admin").string("dev"))
        .with_object("session", |s| s.field("id", 42u64).field("ttl", 1.5))
        .log();
    root.string("a bare string event").log();
    info!(root, "Processing {} items", 3);

    println!("\n2. A derived logger below the minimum level:");
    let noisy = root.derive("cache", [(".level", LogLevel::Debug.as_label())]);
    noisy.dict().field("msg", "Debug message (hidden)").log();
    warn!(root, "cache logger is muted at level {}", LogLevel::Debug);

    println!("\n3. Raising the level of the whole tree:");
    root.apply_config(
        &Config::default().with_label(".level", LogLevel::Warn.as_label()),
        &ApplyOptions::new().with_recursive(true),
    );
    noisy.dict().field("msg", "Visible after reconfiguration").log();

    root.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
