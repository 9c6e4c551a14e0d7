//! Core types shared by every chunking strategy.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Identifier of a single token produced by a [`Tokenizer`](super::Tokenizer).
pub type TokenId = u32;

/// Position of a document in the input sequence handed to a chunker.
pub type DocIndex = usize;

/// A bounded text segment plus the documents it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text content of this chunk.
    pub text: String,

    /// Documents that contributed to `text`, in first-encountered order.
    pub source_doc_indices: Vec<DocIndex>,

    /// Number of tokens in the chunk, when a token-aware strategy produced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<usize>,
}

impl Chunk {
    /// Create a chunk from a single document.
    pub fn from_document(text: String, doc_index: DocIndex, token_count: Option<usize>) -> Self {
        Self {
            text,
            source_doc_indices: vec![doc_index],
            token_count,
        }
    }

    /// Create a chunk whose provenance is collected from a possibly repeating
    /// sequence of document indices.
    pub fn from_sources(
        text: String,
        sources: impl IntoIterator<Item = DocIndex>,
        token_count: Option<usize>,
    ) -> Self {
        Self {
            text,
            source_doc_indices: sources.into_iter().collect::<SourceDocs>().into_vec(),
            token_count,
        }
    }
}

/// Order-preserving set of document indices.
///
/// Indices keep the order they were first inserted in, so provenance is
/// identical across runs for identical input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocs(IndexSet<DocIndex>);

impl SourceDocs {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contributing document. Returns false if it was already present.
    pub fn insert(&mut self, doc_index: DocIndex) -> bool {
        self.0.insert(doc_index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into a plain vector in first-seen order.
    pub fn into_vec(self) -> Vec<DocIndex> {
        self.0.into_iter().collect()
    }
}

impl FromIterator<DocIndex> for SourceDocs {
    fn from_iter<I: IntoIterator<Item = DocIndex>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
