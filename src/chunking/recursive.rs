//! Hierarchical separator splitting for text without explicit word boundaries.
//!
//! Algorithm:
//! 1. Split a span on the coarsest separator that occurs in it, keeping each
//!    separator attached to the fragment before it
//! 2. Fragments within `size` tokens become leaves, larger ones are split again
//!    with the next separators
//! 3. Fragments no separator can split are cut at character boundaries
//! 4. Adjacent leaves are merged greedily up to `size` tokens, carrying the
//!    trailing `overlap` tokens of one chunk into the next
//!
//! Splitting uses an explicit work stack. Every push moves one separator level
//! down, so the stack depth never exceeds the number of separators.

use std::collections::VecDeque;
use std::sync::Arc;

use regex::Regex;

use super::chunker::Chunker;
use super::config::ChunkingConfig;
use super::error::{ChunkingError, ChunkingResult};
use super::progress::ProgressTicker;
use super::tokenizer::Tokenizer;
use super::types::Chunk;

/// Upper bound on characters per token when searching for a character cut.
const MAX_CHARS_PER_TOKEN: usize = 32;

/// A fragment of the source text with its measured token length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'t> {
    pub text: &'t str,
    pub tokens: usize,
}

/// A merged chunk of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedText {
    pub text: String,
    pub tokens: usize,
}

/// Splits a single document into token-bounded pieces.
pub struct RecursiveSplitter {
    tokenizer: Arc<dyn Tokenizer>,
    separators: Vec<Regex>,
    size: usize,
    overlap: usize,
}

impl RecursiveSplitter {
    /// Create a splitter. `separators` are ordered coarsest first.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        separators: Vec<Regex>,
        size: usize,
        overlap: usize,
    ) -> ChunkingResult<Self> {
        if size == 0 || overlap >= size {
            return Err(ChunkingError::invalid_config(format!(
                "overlap ({overlap}) must be less than size ({size})"
            )));
        }
        Ok(Self {
            tokenizer,
            separators,
            size,
            overlap,
        })
    }

    /// Build from a validated config, compiling its separator list.
    pub fn from_config(config: &ChunkingConfig, tokenizer: Arc<dyn Tokenizer>) -> ChunkingResult<Self> {
        Self::new(
            tokenizer,
            config.compile_separators()?,
            config.size,
            config.overlap,
        )
    }

    /// Split `text` into leaves of at most `size` tokens, except for single
    /// characters that are larger on their own.
    ///
    /// Concatenating the leaves reproduces `text` exactly.
    pub fn split_leaves<'t>(&self, text: &'t str) -> Vec<Leaf<'t>> {
        let mut leaves = Vec::new();
        let mut stack: Vec<(&'t str, usize)> = vec![(text, 0)];

        while let Some((span, level)) = stack.pop() {
            if span.is_empty() {
                continue;
            }

            let tokens = self.tokenizer.count(span);
            if tokens <= self.size {
                leaves.push(Leaf { text: span, tokens });
                continue;
            }

            match self.next_separator(span, level) {
                Some((found, separator)) => {
                    let fragments = split_keeping_separator(span, separator);
                    stack.extend(fragments.into_iter().rev().map(|f| (f, found + 1)));
                }
                None => {
                    tracing::trace!(
                        target: "chunking",
                        "character fallback for {tokens}-token fragment"
                    );
                    leaves.extend(self.split_chars(span));
                }
            }
        }

        leaves
    }

    /// Split and merge `text` into chunks with overlap. Whitespace-only
    /// chunks are dropped and chunk text is trimmed.
    pub fn split_text(&self, text: &str) -> Vec<MergedText> {
        let leaves = self.split_leaves(text);
        self.merge(&leaves)
    }

    /// First separator at or below `level` that occurs in `span`.
    fn next_separator(&self, span: &str, level: usize) -> Option<(usize, &Regex)> {
        self.separators
            .iter()
            .enumerate()
            .skip(level)
            .find(|(_, re)| re.is_match(span))
    }

    /// Cut `span` at character boundaries into the longest prefixes that fit.
    fn split_chars<'t>(&self, span: &'t str) -> Vec<Leaf<'t>> {
        let mut leaves = Vec::new();
        let mut rest = span;
        let window = self.size.saturating_mul(MAX_CHARS_PER_TOKEN);

        while !rest.is_empty() {
            let ends: Vec<usize> = rest
                .char_indices()
                .skip(1)
                .map(|(i, _)| i)
                .chain(std::iter::once(rest.len()))
                .take(window)
                .collect();

            // Largest prefix within `size`; one character is always taken.
            let (mut lo, mut hi) = (0, ends.len() - 1);
            while lo < hi {
                let mid = lo + (hi - lo).div_ceil(2);
                if self.tokenizer.count(&rest[..ends[mid]]) <= self.size {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }

            let (piece, tail) = rest.split_at(ends[lo]);
            leaves.push(Leaf {
                text: piece,
                tokens: self.tokenizer.count(piece),
            });
            rest = tail;
        }

        leaves
    }

    /// Greedily merge adjacent leaves up to `size` tokens.
    fn merge(&self, leaves: &[Leaf<'_>]) -> Vec<MergedText> {
        let mut merged = Vec::new();
        let mut window: VecDeque<Leaf<'_>> = VecDeque::new();
        let mut total = 0;

        for &leaf in leaves {
            if !window.is_empty() && !self.fits(&window, total, leaf) {
                self.emit(&window, &mut merged);

                // Keep at least `overlap` tokens of trailing context, as long
                // as the next leaf still fits behind it once joined.
                while let Some(front) = window.front() {
                    let remaining = total - front.tokens;
                    if remaining >= self.overlap || !self.fits(&window, total, leaf) {
                        total = remaining;
                        window.pop_front();
                    } else {
                        break;
                    }
                }
            }

            total += leaf.tokens;
            window.push_back(leaf);
        }

        self.emit(&window, &mut merged);
        merged
    }

    fn fits(&self, window: &VecDeque<Leaf<'_>>, total: usize, leaf: Leaf<'_>) -> bool {
        if total + leaf.tokens > self.size {
            return false;
        }
        // Token counts are not always additive across a join.
        let mut joined = concat(window);
        joined.push_str(leaf.text);
        self.tokenizer.count(&joined) <= self.size
    }

    fn emit(&self, window: &VecDeque<Leaf<'_>>, merged: &mut Vec<MergedText>) {
        let joined = concat(window);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            return;
        }

        let mut text = trimmed;
        let mut tokens = self.tokenizer.count(trimmed);
        // Stripping a leading space can split a merged BPE token in two
        if tokens > self.size && trimmed.len() < joined.len() {
            let untrimmed = self.tokenizer.count(&joined);
            if untrimmed < tokens {
                text = joined.as_str();
                tokens = untrimmed;
            }
        }

        merged.push(MergedText {
            text: text.to_string(),
            tokens,
        });
    }
}

fn concat(window: &VecDeque<Leaf<'_>>) -> String {
    window.iter().map(|l| l.text).collect()
}

/// Split `text` after every match of `separator`. Concatenating the result
/// reproduces `text`.
fn split_keeping_separator<'t>(text: &'t str, separator: &Regex) -> Vec<&'t str> {
    let mut fragments = Vec::new();
    let mut last = 0;
    for m in separator.find_iter(text) {
        if m.end() > last {
            fragments.push(&text[last..m.end()]);
            last = m.end();
        }
    }
    if last < text.len() {
        fragments.push(&text[last..]);
    }
    fragments
}

/// Runs a [`RecursiveSplitter`] over each document independently.
pub struct RecursiveChunker {
    splitter: RecursiveSplitter,
}

impl RecursiveChunker {
    pub fn new(splitter: RecursiveSplitter) -> Self {
        Self { splitter }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, documents: &[&str], ticker: &dyn ProgressTicker) -> ChunkingResult<Vec<Chunk>> {
        let mut chunks = Vec::new();
        for (doc, text) in documents.iter().enumerate() {
            chunks.extend(
                self.splitter
                    .split_text(text)
                    .into_iter()
                    .map(|m| Chunk::from_document(m.text, doc, Some(m.tokens))),
            );
            ticker.tick(1);
        }

        tracing::debug!(
            target: "chunking",
            "recursive: {} documents, {} chunks (size={}, overlap={})",
            documents.len(),
            chunks.len(),
            self.splitter.size,
            self.splitter.overlap
        );

        Ok(chunks)
    }
}
