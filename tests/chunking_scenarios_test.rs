//! End-to-end chunking scenarios through the public API.

mod common;

use common::WordTokenizer;
use ragchunk::chunking::{
    Chunker, ChunkingConfig, ChunkingEngine, ChunkingError, ChunkingStrategy, NoProgress,
    Tokenizer, load_tokenizer,
};
use ragchunk::chunk_documents;

fn word_engine(strategy: ChunkingStrategy, size: usize, overlap: usize) -> Result<ChunkingEngine, ChunkingError> {
    let config = ChunkingConfig {
        strategy,
        size,
        overlap,
        ..Default::default()
    };
    ChunkingEngine::new(config, WordTokenizer::shared())
}

#[test]
fn test_single_document_windows() {
    let chunks = word_engine(ChunkingStrategy::Tokens, 3, 1)
        .unwrap()
        .chunk(&["A B C D E F"], &NoProgress)
        .unwrap();

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["A B C", "C D E", "E F"]);
    assert!(chunks.iter().all(|c| c.source_doc_indices == vec![0]));
}

#[test]
fn test_window_crossing_document_boundary() {
    let chunks = word_engine(ChunkingStrategy::Tokens, 3, 0)
        .unwrap()
        .chunk(&["A B", "C D E"], &NoProgress)
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "A B C");
    assert_eq!(chunks[0].source_doc_indices, vec![0, 1]);
    assert_eq!(chunks[1].text, "D E");
    assert_eq!(chunks[1].source_doc_indices, vec![1]);
}

#[test]
fn test_overlap_equal_to_size_is_rejected() {
    for strategy in [ChunkingStrategy::Tokens, ChunkingStrategy::RecursiveMultilingual] {
        let err = word_engine(strategy, 2, 2).err().unwrap();
        assert!(matches!(err, ChunkingError::InvalidConfig { .. }), "{strategy}: {err}");
        assert!(err.to_string().contains("overlap (2) must be less than size (2)"));
    }
}

#[test]
fn test_empty_input_yields_no_chunks() {
    for strategy in ChunkingStrategy::ALL {
        let config = ChunkingConfig::with_strategy(strategy);
        let chunks = chunk_documents(&[], &config, None).unwrap();
        assert!(chunks.is_empty(), "{strategy}");
    }
}

#[test]
fn test_sentence_strategy_mixed_languages() {
    let docs = [
        "The first document has two sentences. Here is the second.",
        "中文文档。第二句！",
    ];
    let chunks = word_engine(ChunkingStrategy::Sentence, 8, 2)
        .unwrap()
        .chunk(&docs, &NoProgress)
        .unwrap();

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "The first document has two sentences.",
            "Here is the second.",
            "中文文档。",
            "第二句！",
        ]
    );
    assert_eq!(chunks[3].source_doc_indices, vec![1]);
}

#[test]
fn test_recursive_with_real_tokenizer() {
    let text = "检索增强生成需要把长文档切成小块。每一块都应该保持语义完整，\
                并且不能超过模型的上下文限制。\n\n第二段落讨论重叠；重叠可以保留上下文。"
        .repeat(6);
    let config = ChunkingConfig {
        strategy: ChunkingStrategy::RecursiveMultilingual,
        size: 40,
        overlap: 8,
        ..Default::default()
    };
    let tokenizer = load_tokenizer(&config.encoding_model).unwrap();
    let chunks = ChunkingEngine::new(config, tokenizer.clone())
        .unwrap()
        .chunk(&[text.as_str()], &NoProgress)
        .unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        let measured = tokenizer.count(&chunk.text);
        assert_eq!(chunk.token_count, Some(measured));
        assert!(measured <= 40, "chunk of {measured} tokens: {}", chunk.text);
        assert_eq!(chunk.source_doc_indices, vec![0]);
    }
}

#[test]
fn test_token_windows_with_real_tokenizer_reassemble() {
    let docs = ["Hello world, this is a short test.", " And a second document follows."];
    let config = ChunkingConfig {
        size: 4,
        overlap: 0,
        ..Default::default()
    };
    let chunks = chunk_documents(&docs, &config, None).unwrap();

    let rejoined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(rejoined, docs.concat());
    assert!(chunks.iter().all(|c| c.token_count.is_some_and(|n| n <= 4)));
    assert_eq!(chunks[0].source_doc_indices, vec![0]);
    assert_eq!(chunks.last().unwrap().source_doc_indices, vec![1]);
}

#[test]
fn test_token_windows_over_chinese_text() {
    let text = "检索增强生成需要把长文档切成小块，每一块都应该保持语义完整并且不能超过模型的上下文限制。";
    let tokenizer = load_tokenizer("cl100k_base").unwrap();
    let stream = tokenizer.count(text);

    for size in [3, 5, 7] {
        let config = ChunkingConfig {
            size,
            overlap: 1,
            ..Default::default()
        };
        let chunks = ChunkingEngine::new(config, tokenizer.clone())
            .unwrap()
            .chunk(&[text], &NoProgress)
            .unwrap();

        assert!(chunks.len() > 1, "size {size}");
        let covered: usize = chunks.iter().map(|c| c.token_count.unwrap()).sum();
        assert_eq!(covered - (chunks.len() - 1), stream, "size {size}");
        assert!(chunks.iter().all(|c| !c.text.is_empty()));
    }
}
