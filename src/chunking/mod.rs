//! Text chunking engine.
//!
//! Turns an ordered sequence of documents into bounded, optionally
//! overlapping chunks annotated with the documents they came from.
//!
//! This module provides:
//! - Token windows over the flattened token stream of all documents
//! - Sentence-level chunks
//! - Recursive separator splitting for text without word boundaries
//! - A single dispatching entry point selected by configuration

pub mod chunker;
pub mod config;
pub mod error;
pub mod progress;
pub mod recursive;
pub mod sentence;
pub mod token_window;
pub mod tokenizer;
pub mod types;

pub use chunker::{Chunker, ChunkingEngine, chunk_documents};
pub use config::{ChunkingConfig, ChunkingStrategy, default_separators};
pub use error::{ChunkingError, ChunkingResult};
pub use progress::{NoProgress, ProgressTicker};
pub use recursive::{Leaf, MergedText, RecursiveChunker, RecursiveSplitter};
pub use sentence::{SentenceChunker, SentenceSegmenter};
pub use token_window::TokenWindowChunker;
pub use tokenizer::{TiktokenTokenizer, Tokenizer, load_tokenizer};
pub use types::{Chunk, DocIndex, SourceDocs, TokenId};
