//! Formatter implementations

pub mod json;
pub mod table;

pub use json::JsonFormatter;
pub use table::{FloatFormat, TableFormatter};
