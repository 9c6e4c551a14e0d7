//! Fixed-size token windows over the flattened token stream of all documents.

use std::sync::Arc;

use super::chunker::Chunker;
use super::error::{ChunkingError, ChunkingResult};
use super::progress::ProgressTicker;
use super::tokenizer::Tokenizer;
use super::types::{Chunk, DocIndex, TokenId};

/// Token with the index of the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamToken {
    doc: DocIndex,
    id: TokenId,
}

/// Slides a `size`-token window with `overlap` tokens of overlap across
/// every document's tokens concatenated in input order.
///
/// Windows may straddle document boundaries; each chunk records every
/// document that donated at least one token to it.
pub struct TokenWindowChunker {
    tokenizer: Arc<dyn Tokenizer>,
    size: usize,
    overlap: usize,
}

impl TokenWindowChunker {
    /// Create a chunker. Fails unless `0 <= overlap < size`.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, size: usize, overlap: usize) -> ChunkingResult<Self> {
        if size == 0 || overlap >= size {
            return Err(ChunkingError::invalid_config(format!(
                "overlap ({overlap}) must be less than size ({size})"
            )));
        }
        Ok(Self {
            tokenizer,
            size,
            overlap,
        })
    }

    fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Encode every document and concatenate the tokens, ticking once per document.
    fn flatten(&self, documents: &[&str], ticker: &dyn ProgressTicker) -> Vec<StreamToken> {
        let mut stream = Vec::new();
        for (doc, text) in documents.iter().enumerate() {
            stream.extend(
                self.tokenizer
                    .encode(text)
                    .into_iter()
                    .map(|id| StreamToken { doc, id }),
            );
            ticker.tick(1);
        }
        stream
    }

    /// Start and end offsets of every window over a stream of `len` tokens.
    ///
    /// Stops after the first window that reaches the end of the stream, so the
    /// last token is never covered by a window that adds nothing new.
    fn windows(&self, len: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut start = 0;
        let mut done = len == 0;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let end = (start + self.size).min(len);
            let window = (start, end);
            done = end >= len;
            start += self.step();
            Some(window)
        })
    }
}

impl Chunker for TokenWindowChunker {
    fn chunk(&self, documents: &[&str], ticker: &dyn ProgressTicker) -> ChunkingResult<Vec<Chunk>> {
        let stream = self.flatten(documents, ticker);

        let mut chunks = Vec::new();
        for (start, end) in self.windows(stream.len()) {
            let window = &stream[start..end];
            let ids: Vec<TokenId> = window.iter().map(|t| t.id).collect();
            let text = self.tokenizer.decode(&ids)?;
            chunks.push(Chunk::from_sources(
                text,
                window.iter().map(|t| t.doc),
                Some(window.len()),
            ));
        }

        tracing::debug!(
            target: "chunking",
            "token windows: {} documents, {} tokens, {} chunks (size={}, overlap={})",
            documents.len(),
            stream.len(),
            chunks.len(),
            self.size,
            self.overlap
        );

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::progress::NoProgress;
    use crate::chunking::tokenizer::testing::WordTokenizer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chunker(docs: &[&str], size: usize, overlap: usize) -> TokenWindowChunker {
        TokenWindowChunker::new(Arc::new(WordTokenizer::for_corpus(docs)), size, overlap).unwrap()
    }

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_single_document_with_overlap() {
        let docs = ["A B C D E F"];
        let chunks = chunker(&docs, 3, 1).chunk(&docs, &NoProgress).unwrap();

        assert_eq!(texts(&chunks), vec!["A B C", "C D E", "E F"]);
        for chunk in &chunks {
            assert_eq!(chunk.source_doc_indices, vec![0]);
        }
        assert_eq!(chunks[0].token_count, Some(3));
        assert_eq!(chunks[2].token_count, Some(2));
    }

    #[test]
    fn test_windows_straddle_documents() {
        let docs = ["A B", "C D E"];
        let chunks = chunker(&docs, 3, 0).chunk(&docs, &NoProgress).unwrap();

        assert_eq!(texts(&chunks), vec!["A B C", "D E"]);
        assert_eq!(chunks[0].source_doc_indices, vec![0, 1]);
        assert_eq!(chunks[1].source_doc_indices, vec![1]);
    }

    #[test]
    fn test_empty_input() {
        let chunks = chunker(&[], 3, 1).chunk(&[], &NoProgress).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_empty_documents_contribute_nothing() {
        let docs = ["", "A B", "", "C"];
        let chunks = chunker(&docs, 2, 0).chunk(&docs, &NoProgress).unwrap();

        assert_eq!(texts(&chunks), vec!["A B", "C"]);
        assert_eq!(chunks[0].source_doc_indices, vec![1]);
        assert_eq!(chunks[1].source_doc_indices, vec![3]);
    }

    #[test]
    fn test_no_trailing_window_inside_previous() {
        // 5 tokens, step 2: the window starting at 4 would only repeat "E".
        let docs = ["A B C D E"];
        let chunks = chunker(&docs, 3, 1).chunk(&docs, &NoProgress).unwrap();
        assert_eq!(texts(&chunks), vec!["A B C", "C D E"]);
    }

    #[test]
    fn test_window_spans_three_documents() {
        let docs = ["A", "B", "C D"];
        let chunks = chunker(&docs, 4, 0).chunk(&docs, &NoProgress).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source_doc_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_ticks_once_per_document() {
        let docs = ["A B", "C", "D E F"];
        let ticks = AtomicUsize::new(0);
        let ticker = |n: usize| {
            ticks.fetch_add(n, Ordering::Relaxed);
        };
        chunker(&docs, 2, 1).chunk(&docs, &ticker).unwrap();
        assert_eq!(ticks.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_rejects_non_advancing_window() {
        let tok: Arc<dyn Tokenizer> = Arc::new(WordTokenizer::default());
        let err = TokenWindowChunker::new(Arc::clone(&tok), 2, 2).err().unwrap();
        assert!(err.is_config_error());
        assert!(TokenWindowChunker::new(Arc::clone(&tok), 0, 0).is_err());
        assert!(TokenWindowChunker::new(tok, 2, 1).is_ok());
    }
}
