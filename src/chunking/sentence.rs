//! Sentence-level chunking.
//!
//! Sentence boundaries come from Unicode Standard Annex #29, which already
//! handles CJK terminators, decimals and ellipses. UAX #29 does break after
//! abbreviations followed by a capitalised word ("Dr. Smith"), so splits
//! ending in a known abbreviation are joined back with the next sentence.

use super::chunker::Chunker;
use super::error::ChunkingResult;
use super::progress::ProgressTicker;
use super::types::Chunk;
use unicode_segmentation::UnicodeSegmentation;

/// Abbreviations that end with a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "gen", "gov", "sen", "rep", "capt",
    "col", "lt", "sgt", "rev", "fr", "vs", "etc", "e.g", "i.e", "cf", "al", "inc", "ltd", "co",
    "corp", "dept", "univ", "fig", "vol", "pp", "approx", "jan", "feb", "mar",
    "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "u.s", "u.k", "a.m", "p.m",
];

/// Splits a single text into sentences.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSegmenter;

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Iterate over the trimmed, non-empty sentences of `text` in order.
    pub fn sentences<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut bounds = text.split_sentence_bound_indices().peekable();

        std::iter::from_fn(move || {
            loop {
                let (start, first) = bounds.next()?;
                let mut end = start + first.len();

                while ends_with_abbreviation(&text[start..end]) {
                    match bounds.peek() {
                        Some(&(next_start, next)) if !next.trim().is_empty() => {
                            end = next_start + next.len();
                            bounds.next();
                        }
                        _ => break,
                    }
                }

                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    return Some(sentence);
                }
            }
        })
    }
}

/// Whether the last word of `sentence` is an abbreviation such as `Dr.` or `e.g.`.
fn ends_with_abbreviation(sentence: &str) -> bool {
    let Some(word) = sentence.trim_end().split_whitespace().next_back() else {
        return false;
    };
    let Some(stem) = word.strip_suffix('.') else {
        return false;
    };
    let stem = stem.trim_start_matches(['(', '"', '\'', '[']);

    // Single capital initials: "J. R. R. Tolkien". This also joins a sentence
    // ending in a lone capital ("plan A. Next"), which reads the same.
    if stem.chars().count() == 1 && stem.chars().all(char::is_uppercase) {
        return true;
    }

    let lower = stem.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Emits one chunk per sentence, in document order then sentence order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceChunker {
    segmenter: SentenceSegmenter,
}

impl SentenceChunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lazily produce sentence chunks.
    ///
    /// The ticker is advanced once per document, after its last sentence.
    pub fn iter_chunks<'a>(
        &'a self,
        documents: &'a [&'a str],
        ticker: &'a dyn ProgressTicker,
    ) -> impl Iterator<Item = Chunk> + 'a {
        documents.iter().enumerate().flat_map(move |(doc, text)| {
            self.segmenter
                .sentences(text)
                .map(move |sentence| Chunk::from_document(sentence.to_string(), doc, None))
                .chain(std::iter::from_fn(move || {
                    ticker.tick(1);
                    None
                }))
        })
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, documents: &[&str], ticker: &dyn ProgressTicker) -> ChunkingResult<Vec<Chunk>> {
        let chunks: Vec<Chunk> = self.iter_chunks(documents, ticker).collect();
        tracing::debug!(
            target: "chunking",
            "sentences: {} documents, {} chunks",
            documents.len(),
            chunks.len()
        );
        Ok(chunks)
    }
}
