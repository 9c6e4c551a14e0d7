//! Tokenizer capability used for token-aware chunking.
//!
//! Chunkers only see the [`Tokenizer`] trait: an `encode`/`decode` pair that is
//! loaded once per run and shared read-only across threads.

use std::fmt;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;

use super::error::{ChunkingError, ChunkingResult};
use super::types::TokenId;

/// Encode/decode pair measuring text in tokens.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<TokenId>;

    /// Decode token ids back to text.
    fn decode(&self, tokens: &[TokenId]) -> ChunkingResult<String>;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// Prefix of the `tiktoken-rs` error raised when all ids are known but their
/// bytes are not valid UTF-8.
const UTF8_DECODE_ERROR: &str = "Unable to decode into a valid UTF-8 string";

/// BPE tokenizer backed by `tiktoken-rs`.
pub struct TiktokenTokenizer {
    encoding: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load a BPE by encoding name (`cl100k_base`, `o200k_base`, ...) or by a
    /// model name such as `gpt-4`.
    pub fn new(encoding_model: &str) -> ChunkingResult<Self> {
        let name = encoding_model.trim();
        let loaded = match name {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" | "gpt2" => tiktoken_rs::r50k_base(),
            model => tiktoken_rs::get_bpe_from_model(model),
        };

        let bpe = loaded.map_err(|e| ChunkingError::UnknownEncoding {
            model: encoding_model.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(target: "chunking", "loaded tokenizer for encoding model {name}");

        Ok(Self {
            encoding: name.to_string(),
            bpe,
        })
    }

    /// Encoding name this tokenizer was loaded with.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Vec<TokenId> {
        self.bpe.encode_ordinary(text)
    }

    /// Decode token ids, replacing byte sequences cut inside a character
    /// with U+FFFD. Windows over CJK text routinely start or end mid-character.
    fn decode(&self, tokens: &[TokenId]) -> ChunkingResult<String> {
        match self.bpe.decode(tokens.to_vec()) {
            Ok(text) => Ok(text),
            // Every id resolved to bytes, only the UTF-8 check failed
            Err(e) if e.to_string().contains(UTF8_DECODE_ERROR) => {
                let bytes: Vec<u8> = self
                    .bpe
                    ._decode_native_and_split(tokens.to_vec())
                    .flatten()
                    .collect();
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Err(e) => Err(ChunkingError::Decode {
                reason: e.to_string(),
            }),
        }
    }
}

/// Load the tokenizer named by `encoding_model`, ready to be shared.
pub fn load_tokenizer(encoding_model: &str) -> ChunkingResult<Arc<dyn Tokenizer>> {
    Ok(Arc::new(TiktokenTokenizer::new(encoding_model)?))
}
