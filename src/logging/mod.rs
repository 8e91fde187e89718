// file: src/logging/mod.rs
// version: 1.1.0
// guid: 8e4f1a93-c27b-4d65-b0e8-3a9d52c7f614

//! Logging setup for the command line

pub mod logger;

pub use logger::{init_logger, with_async_operation_span, with_operation_span};
