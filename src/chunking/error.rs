//! Error types for the chunking engine.

use thiserror::Error;

/// Errors raised while configuring or running a chunking strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    #[error("Invalid chunking configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown chunking strategy '{0}' (expected one of: tokens, sentence, recursive_multilingual)")]
    UnknownStrategy(String),

    #[error("Cannot load tokenizer for encoding model '{model}': {reason}")]
    UnknownEncoding { model: String, reason: String },

    #[error("Failed to decode token window: {reason}")]
    Decode { reason: String },

    #[error("Invalid separator pattern '{pattern}': {reason}")]
    InvalidSeparator { pattern: String, reason: String },
}

impl ChunkingError {
    /// Shorthand for an [`ChunkingError::InvalidConfig`] error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Whether the chunking configuration itself was rejected.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::UnknownStrategy(_) | Self::InvalidSeparator { .. }
        )
    }

    /// Whether the tokenizer capability failed to load or decode.
    pub fn is_dependency_error(&self) -> bool {
        matches!(self, Self::UnknownEncoding { .. } | Self::Decode { .. })
    }
}

pub type ChunkingResult<T> = Result<T, ChunkingError>;
