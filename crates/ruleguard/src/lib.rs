//! Command-line front end for ruleguard.
//!
//! Reads a schema in its JSON form, checks it, and hands it to the code
//! generation backends or the reference evaluator. The binary in `main.rs`
//! only parses arguments, sets up logging and dispatches here.

pub mod commands;
pub mod config;

pub use config::RuleguardConfig;
