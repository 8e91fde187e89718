// file: src/cli/mod.rs
// version: 1.1.0
// guid: 3f9a6d21-e8b7-4c05-a1d4-92c7b0e5f8a6

//! Command line interface

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
