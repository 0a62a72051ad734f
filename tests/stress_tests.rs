//! Stress tests for concurrent logging and reconfiguration
//!
//! These tests verify:
//! - No event is lost or interleaved when many threads share a sink
//! - Reconfiguration while logging never corrupts output
//! - Deriving and closing loggers concurrently keeps the tree consistent

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use tree_logger::middleware::geq;
use tree_logger::prelude::*;

const THREADS: usize = 8;
const EVENTS_PER_THREAD: usize = 500;

/// Every event written from many threads arrives whole, exactly once
#[test]
fn test_concurrent_logging_no_loss() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let root = Logger::root(Config::new("app").with_sink(Sink::file(&log_file).unwrap()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = root.derive(&format!("worker{}", t), [(".id", t as i64)]);
            thread::spawn(move || {
                for i in 0..EVENTS_PER_THREAD {
                    logger
                        .dict()
                        .field("thread", t)
                        .field("seq", i)
                        .with_array("pad", |a| a.string("x").string("y"))
                        .log();
                }
                logger.metrics().emitted()
            })
        })
        .collect();

    let emitted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    root.flush().unwrap();

    assert_eq!(emitted as usize, THREADS * EVENTS_PER_THREAD);

    let content = std::fs::read_to_string(&log_file).unwrap();
    let mut seen = HashSet::new();
    for line in content.lines() {
        let v: serde_json::Value = serde_json::from_str(line).expect("interleaved output");
        let key = (v["thread"].as_u64().unwrap(), v["seq"].as_u64().unwrap());
        assert!(seen.insert(key), "duplicate event {:?}", key);
    }
    assert_eq!(seen.len(), THREADS * EVENTS_PER_THREAD);
}

/// Toggling a filter across the tree while threads log never breaks output
#[test]
fn test_apply_config_while_logging() {
    let out = MemorySink::new();
    let root = Logger::root(
        Config::new("app")
            .with_sink(out.sink())
            .with_label(".on", 1)
            .with_pre(geq(".on", 1)),
    );
    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let logger = root.derive("w", [(".t", t)]);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut attempts = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    logger.dict().field("t", t).log();
                    attempts += 1;
                }
                let m = logger.metrics();
                assert_eq!(m.failed(), 0);
                assert_eq!(m.emitted() + m.suppressed(), attempts);
            })
        })
        .collect();

    let opts = ApplyOptions::new().with_recursive(true);
    for round in 0..200 {
        let delta = Config::default().with_label(".on", (round % 2) as i64);
        root.apply_config(&delta, &opts);
    }
    stop.store(true, Ordering::Relaxed);

    for handle in writers {
        handle.join().unwrap();
    }

    for line in out.lines() {
        let v: serde_json::Value = serde_json::from_str(&line).expect("corrupted output");
        assert!(v["t"].is_i64());
    }
}

/// Deriving, walking, and closing loggers from many threads
#[test]
fn test_concurrent_tree_mutation() {
    let root = Logger::root(Config::new("app").with_sink(MemorySink::new().sink()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let root = root.clone();
            thread::spawn(move || {
                let mine = root.derive(&format!("t{}", t), [(".n", 0)]);
                for i in 0..100 {
                    let child = mine.with(".i", i);
                    if i % 2 == 0 {
                        child.close();
                    }
                    let mut count = 0;
                    root.walk(|_| count += 1);
                    assert!(count >= 2);
                }
                mine.children_count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 50);
    }

    assert_eq!(root.children_count(), THREADS);
    assert_eq!(root.config_tree().len(), 1 + THREADS + THREADS * 50);
}
