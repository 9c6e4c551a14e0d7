//! Text chunking for retrieval pipelines.
//!
//! The [`chunking`] module holds the strategies and can be used on its own;
//! [`config`], [`logging`] and [`cli`] make up the `ragchunk` binary.

pub mod chunking;
pub mod cli;
pub mod config;
pub mod logging;

pub use chunking::{
    Chunk, Chunker, ChunkingConfig, ChunkingEngine, ChunkingError, ChunkingResult,
    ChunkingStrategy, ProgressTicker, Tokenizer, chunk_documents,
};
pub use config::Settings;
