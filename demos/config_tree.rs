//! Configuration tree example
//!
//! Demonstrates inspecting and reconfiguring a logger tree at runtime, and
//! writing a table-formatted log file.
//!
//! Run with: cargo run --example config_tree

use tree_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Tree Logger - Configuration Tree Example ===\n");

    let file = Sink::file("application.log")?;
    let root = Logger::root(
        Config::new("app")
            .with_sink(file)
            .with_formatter(TableFormatter::new(["msg", "id"]).with_keys(true))
            .with_error_handler(ErrorHandler::log()),
    );
    let db = root.derive("db", [(".pool", 8), (".trace", 0)]);
    let http = root.derive("http", [(".trace", 0)]);
    let _replica = db.derive("db.replica", [(".pool", 2)]);

    println!("1. Current tree:");
    for node in root.config_tree() {
        println!("   {}", serde_json::to_string(&node)?);
    }

    println!("\n2. Labels matching '\\.trace$':");
    for (namespace, labels) in root.match_labels(r"\.trace$")? {
        println!("   {namespace}: {labels:?}");
    }

    println!("\n3. Enabling tracing for every db logger:");
    let updated = root.apply_matching(
        "^db",
        &Config::default().with_label(".trace", 1),
        &ApplyOptions::new(),
    )?;
    for node in updated {
        println!("   {} -> {:?}", node.namespace, node.labels);
    }

    for id in 1..=3 {
        db.dict().field("msg", "query").field("id", id).log();
    }
    http.dict().field("msg", "request").field("id", 7).log();
    root.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the table output");

    Ok(())
}
