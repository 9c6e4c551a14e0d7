//! Chunking strategies behind a single entry point.
//!
//! Provides the `Chunker` trait and the `ChunkingEngine` that selects a
//! strategy from a [`ChunkingConfig`].

use std::sync::Arc;

use super::config::{ChunkingConfig, ChunkingStrategy};
use super::error::ChunkingResult;
use super::progress::{NoProgress, ProgressTicker};
use super::recursive::{RecursiveChunker, RecursiveSplitter};
use super::sentence::SentenceChunker;
use super::token_window::TokenWindowChunker;
use super::tokenizer::{Tokenizer, load_tokenizer};
use super::types::Chunk;

/// Trait for document chunking strategies.
pub trait Chunker: Send + Sync {
    /// Split an ordered sequence of documents into chunks. A document's
    /// index is its position in `documents`.
    fn chunk(&self, documents: &[&str], ticker: &dyn ProgressTicker) -> ChunkingResult<Vec<Chunk>>;
}

/// The closed set of strategy implementations.
enum Strategy {
    Tokens(TokenWindowChunker),
    Sentence(SentenceChunker),
    Recursive(RecursiveChunker),
}

/// Validated configuration bound to its strategy implementation.
///
/// Construction fails on an invalid configuration, so a built engine never
/// produces partial output because of a configuration problem.
pub struct ChunkingEngine {
    config: ChunkingConfig,
    strategy: Strategy,
}

impl ChunkingEngine {
    /// Create an engine from a config and an already loaded tokenizer.
    pub fn new(config: ChunkingConfig, tokenizer: Arc<dyn Tokenizer>) -> ChunkingResult<Self> {
        config.validate()?;

        let strategy = match config.strategy {
            ChunkingStrategy::Tokens => Strategy::Tokens(TokenWindowChunker::new(
                tokenizer,
                config.size,
                config.overlap,
            )?),
            ChunkingStrategy::Sentence => Strategy::Sentence(SentenceChunker::new()),
            ChunkingStrategy::RecursiveMultilingual => Strategy::Recursive(RecursiveChunker::new(
                RecursiveSplitter::from_config(&config, tokenizer)?,
            )),
        };

        Ok(Self { config, strategy })
    }

    /// Create an engine, loading the tokenizer named by `config.encoding_model`
    /// when the strategy needs one.
    pub fn from_config(config: ChunkingConfig) -> ChunkingResult<Self> {
        config.validate()?;

        match config.strategy {
            ChunkingStrategy::Sentence => Ok(Self {
                config,
                strategy: Strategy::Sentence(SentenceChunker::new()),
            }),
            _ => {
                let tokenizer = load_tokenizer(&config.encoding_model)?;
                Self::new(config, tokenizer)
            }
        }
    }

    pub fn strategy(&self) -> ChunkingStrategy {
        self.config.strategy
    }

    fn chunker(&self) -> &dyn Chunker {
        match &self.strategy {
            Strategy::Tokens(c) => c,
            Strategy::Sentence(c) => c,
            Strategy::Recursive(c) => c,
        }
    }
}

impl Chunker for ChunkingEngine {
    fn chunk(&self, documents: &[&str], ticker: &dyn ProgressTicker) -> ChunkingResult<Vec<Chunk>> {
        tracing::debug!(
            target: "chunking",
            "chunking {} documents with strategy {}",
            documents.len(),
            self.config.strategy
        );
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        self.chunker().chunk(documents, ticker)
    }
}

/// Chunk `documents` with a one-off engine built from `config`.
pub fn chunk_documents(
    documents: &[&str],
    config: &ChunkingConfig,
    ticker: Option<&dyn ProgressTicker>,
) -> ChunkingResult<Vec<Chunk>> {
    let engine = ChunkingEngine::from_config(config.clone())?;
    engine.chunk(documents, ticker.unwrap_or(&NoProgress))
}
