//! Chunk command.
//!
//! Every input path is one batch: a directory contributes its matching files
//! in sorted path order, a file contributes itself. Batches are chunked in
//! parallel and written as JSON Lines in input order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use crate::chunking::{Chunk, Chunker, ChunkingConfig, ChunkingEngine};
use crate::cli::ChunkArgs;
use crate::config::{InputConfig, Settings};

/// Documents read from one input path.
#[derive(Debug, Clone)]
pub struct Batch {
    pub path: PathBuf,
    /// File each document was read from, indexed like `documents`.
    pub sources: Vec<PathBuf>,
    pub documents: Vec<String>,
}

impl Batch {
    /// Read a batch from a file or directory.
    pub fn load(path: &Path, input: &InputConfig) -> Result<Self> {
        if !path.exists() {
            bail!("Path does not exist: {}", path.display());
        }

        let sources = if path.is_dir() {
            discover_files(path, input)
        } else {
            vec![path.to_path_buf()]
        };

        let documents = sources
            .iter()
            .map(|source| {
                std::fs::read_to_string(source)
                    .with_context(|| format!("Failed to read {}", source.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            target: "cli",
            "Loaded batch {} with {} documents",
            path.display(),
            documents.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            sources,
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Files under `dir` with a configured extension, sorted by path.
/// Hidden files and directories are skipped.
fn discover_files(dir: &Path, input: &InputConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && input.matches(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// One output line: a chunk plus the batch and files it came from.
#[derive(Debug, Serialize)]
pub struct ChunkRecord<'a> {
    pub batch: &'a Path,
    pub source_paths: Vec<&'a Path>,
    #[serde(flatten)]
    pub chunk: &'a Chunk,
}

impl<'a> ChunkRecord<'a> {
    pub fn new(batch: &'a Batch, chunk: &'a Chunk) -> Self {
        let source_paths = chunk
            .source_doc_indices
            .iter()
            .filter_map(|&doc| batch.sources.get(doc).map(PathBuf::as_path))
            .collect();

        Self {
            batch: &batch.path,
            source_paths,
            chunk,
        }
    }
}

/// Apply command-line overrides on top of the loaded chunking settings.
pub fn apply_overrides(mut config: ChunkingConfig, args: &ChunkArgs) -> ChunkingConfig {
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(overlap) = args.overlap {
        config.overlap = overlap;
    }
    if let Some(encoding_model) = &args.encoding_model {
        config.encoding_model = encoding_model.clone();
    }
    config
}

/// Chunk every batch on a pool of `threads` workers, preserving batch order.
pub fn chunk_batches(
    engine: &ChunkingEngine,
    batches: &[Batch],
    threads: usize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<Vec<Chunk>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .context("Failed to build thread pool")?;

    let ticker = |n: usize| {
        if let Some(bar) = progress {
            bar.inc(n as u64);
        }
    };

    pool.install(|| {
        batches
            .par_iter()
            .map(|batch| {
                let documents: Vec<&str> = batch.documents.iter().map(String::as_str).collect();
                engine
                    .chunk(&documents, &ticker)
                    .with_context(|| format!("Failed to chunk {}", batch.path.display()))
            })
            .collect()
    })
}

/// Write one JSON object per chunk. Returns the number of lines written.
pub fn write_records<W: Write>(
    writer: &mut W,
    batches: &[Batch],
    results: &[Vec<Chunk>],
) -> Result<usize> {
    let mut written = 0;
    for (batch, chunks) in batches.iter().zip(results) {
        for chunk in chunks {
            serde_json::to_writer(&mut *writer, &ChunkRecord::new(batch, chunk))?;
            writer.write_all(b"\n")?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}

fn progress_bar(total: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents {msg}")?
            .progress_chars("##-"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

/// Run the chunk command.
///
/// The configuration is validated and the tokenizer loaded before any input
/// is read, so a bad configuration never leaves partial output behind.
pub fn run(args: ChunkArgs, settings: &Settings) -> Result<()> {
    let config = apply_overrides(settings.chunking.clone(), &args);
    let engine = ChunkingEngine::from_config(config).context("Cannot start chunking")?;

    let batches = args
        .inputs
        .iter()
        .map(|path| Batch::load(path, &settings.input))
        .collect::<Result<Vec<_>>>()?;

    for batch in batches.iter().filter(|b| b.is_empty()) {
        tracing::warn!(
            target: "cli",
            "No files matching {:?} in {}",
            settings.input.extensions,
            batch.path.display()
        );
    }

    let total_documents: usize = batches.iter().map(Batch::len).sum();
    let threads = args.threads.unwrap_or(settings.input.parallel_threads);
    let show_progress = settings.input.show_progress && !args.no_progress;

    tracing::info!(
        target: "cli",
        "Chunking {} batches ({total_documents} documents) with strategy {} on {threads} threads",
        batches.len(),
        engine.strategy()
    );

    let bar = if show_progress {
        Some(progress_bar(total_documents)?)
    } else {
        None
    };

    let start = Instant::now();
    let results = chunk_batches(&engine, &batches, threads, bar.as_ref())?;

    if let Some(bar) = &bar {
        bar.finish_with_message("Complete");
    }

    let written = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_records(&mut BufWriter::new(file), &batches, &results)?
        }
        None => write_records(&mut std::io::stdout().lock(), &batches, &results)?,
    };

    tracing::info!(
        target: "cli",
        "Wrote {written} chunks in {:.2}s",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
