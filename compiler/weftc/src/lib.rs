//! Weft command-line driver.
//!
//! The binary in `main.rs` only parses arguments and picks an exit code;
//! the commands live here so integration tests can drive them with
//! in-memory writers.

pub mod commands;
mod tracing_setup;

pub use tracing_setup::{init_tracing, LOG_TREE_ENV};
