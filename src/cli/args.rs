//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::chunking::ChunkingStrategy;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Text chunking for retrieval pipelines
#[derive(Parser, Debug)]
#[command(
    name = "ragchunk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Split documents into chunks for embedding and retrieval",
    long_about = "Split documents into token windows, sentences, or separator-aware chunks.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Examples:\n  ragchunk init\n  ragchunk chunk notes/ --size 256 --overlap 32\n  ragchunk chunk a.txt b.txt --strategy sentence\n  ragchunk chunk corpus/ --strategy recursive-multilingual --output chunks.jsonl"
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .ragchunk directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .ragchunk/settings.toml")]
    Config,

    /// Chunk files or directories
    #[command(
        about = "Chunk documents and write JSON Lines",
        long_about = "Chunk each input as one batch. A directory contributes its matching files in sorted order, a file contributes itself."
    )]
    Chunk(ChunkArgs),
}

/// Arguments of the `chunk` command. Every sizing option overrides settings.toml.
#[derive(Args, Debug, Clone)]
pub struct ChunkArgs {
    /// Files or directories to chunk, one batch each
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Chunking strategy: tokens, sentence, recursive-multilingual
    #[arg(short, long)]
    pub strategy: Option<ChunkingStrategy>,

    /// Maximum chunk size in tokens
    #[arg(long)]
    pub size: Option<usize>,

    /// Tokens shared between consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Tokenizer encoding or model name, e.g. cl100k_base
    #[arg(long)]
    pub encoding_model: Option<String>,

    /// Write chunks to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable progress bar (overrides settings.toml show_progress)
    #[arg(long)]
    pub no_progress: bool,

    /// Number of batches chunked in parallel (overrides config)
    #[arg(short, long)]
    pub threads: Option<usize>,
}
