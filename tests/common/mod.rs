//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use indexmap::IndexSet;
use ragchunk::chunking::{ChunkingError, ChunkingResult, TokenId, Tokenizer};

/// One token per whitespace-delimited word. Words are interned on first use,
/// so decoding joins them back with single spaces.
#[derive(Default)]
pub struct WordTokenizer {
    vocab: Mutex<IndexSet<String>>,
}

impl WordTokenizer {
    pub fn shared() -> Arc<dyn Tokenizer> {
        Arc::new(Self::default())
    }
}

impl Tokenizer for WordTokenizer {
    fn encode(&self, text: &str) -> Vec<TokenId> {
        let mut vocab = self.vocab.lock().unwrap();
        text.split_whitespace()
            .map(|word| vocab.insert_full(word.to_string()).0 as TokenId)
            .collect()
    }

    fn decode(&self, tokens: &[TokenId]) -> ChunkingResult<String> {
        let vocab = self.vocab.lock().unwrap();
        let words = tokens
            .iter()
            .map(|&id| {
                vocab.get_index(id as usize).map(String::as_str).ok_or_else(|| ChunkingError::Decode {
                    reason: format!("unknown token id {id}"),
                })
            })
            .collect::<ChunkingResult<Vec<_>>>()?;
        Ok(words.join(" "))
    }
}

/// Build documents whose words name their position: `d{doc}w{index}`.
pub fn numbered_documents(lengths: &[usize]) -> Vec<String> {
    lengths
        .iter()
        .enumerate()
        .map(|(doc, &len)| {
            (0..len)
                .map(|i| format!("d{doc}w{i}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Document index encoded in a word produced by [`numbered_documents`].
pub fn doc_of(word: &str) -> usize {
    word.trim_start_matches('d')
        .split('w')
        .next()
        .and_then(|d| d.parse().ok())
        .unwrap()
}

pub fn as_strs(documents: &[String]) -> Vec<&str> {
    documents.iter().map(String::as_str).collect()
}
