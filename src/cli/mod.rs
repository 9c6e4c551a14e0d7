//! CLI module for the chunking tool.
//!
//! Provides command-line interface parsing and command dispatch.

pub mod args;
pub mod commands;

pub use args::{ChunkArgs, Cli, Commands};
