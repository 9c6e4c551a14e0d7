//! Configuration types for text chunking.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{ChunkingError, ChunkingResult};

/// Configuration for a chunking run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Chunking strategy to use.
    #[serde(default)]
    pub strategy: ChunkingStrategy,

    /// Target chunk size in tokens. Unused by the sentence strategy.
    #[serde(default = "default_size")]
    pub size: usize,

    /// Tokens repeated at the start of the next chunk.
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Tokenizer encoding (e.g. `cl100k_base`) or a model name it can be resolved from.
    #[serde(default = "default_encoding_model")]
    pub encoding_model: String,

    /// Regex separators for the recursive strategy, coarsest first.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

fn default_size() -> usize {
    1200
}

fn default_overlap() -> usize {
    100
}

fn default_encoding_model() -> String {
    "cl100k_base".to_string()
}

/// Paragraph, line, CJK sentence, Latin sentence, clause, comma, whitespace.
pub fn default_separators() -> Vec<String> {
    [
        r"\n\n",
        r"\n",
        r"[。！？]",
        r"[.!?]\s",
        r"[；;]\s?",
        r"[，,]\s?",
        r"\s+",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::default(),
            size: default_size(),
            overlap: default_overlap(),
            encoding_model: default_encoding_model(),
            separators: default_separators(),
        }
    }
}

impl ChunkingConfig {
    /// Config for the given strategy with default sizing.
    pub fn with_strategy(strategy: ChunkingStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Sliding step of the token window (`size - overlap`).
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn step(&self) -> usize {
        self.size.saturating_sub(self.overlap)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ChunkingResult<()> {
        if !self.strategy.is_token_aware() {
            return Ok(());
        }

        if self.size == 0 {
            return Err(ChunkingError::invalid_config(
                "size must be a positive number of tokens",
            ));
        }

        if self.overlap >= self.size {
            return Err(ChunkingError::invalid_config(format!(
                "overlap ({}) must be less than size ({})",
                self.overlap, self.size
            )));
        }

        if self.encoding_model.trim().is_empty() {
            return Err(ChunkingError::invalid_config("encoding_model is empty"));
        }

        if self.strategy == ChunkingStrategy::RecursiveMultilingual {
            self.compile_separators()?;
        }

        Ok(())
    }

    /// Compile the separator list, preserving priority order.
    pub fn compile_separators(&self) -> ChunkingResult<Vec<Regex>> {
        if self.separators.is_empty() {
            return Err(ChunkingError::invalid_config(
                "separators must contain at least one pattern",
            ));
        }

        self.separators
            .iter()
            .map(|pattern| {
                if pattern.is_empty() {
                    return Err(ChunkingError::InvalidSeparator {
                        pattern: pattern.clone(),
                        reason: "empty pattern (character fallback is implicit)".to_string(),
                    });
                }
                Regex::new(pattern).map_err(|e| ChunkingError::InvalidSeparator {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

/// Strategy for splitting documents into chunks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Fixed-size token windows over the flattened token stream of all documents.
    #[default]
    Tokens,
    /// One chunk per detected sentence.
    Sentence,
    /// Hierarchical separator splitting for text without explicit word boundaries.
    #[serde(alias = "chinese")]
    RecursiveMultilingual,
}

impl ChunkingStrategy {
    pub const ALL: [ChunkingStrategy; 3] = [
        ChunkingStrategy::Tokens,
        ChunkingStrategy::Sentence,
        ChunkingStrategy::RecursiveMultilingual,
    ];

    /// Identifier used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Sentence => "sentence",
            Self::RecursiveMultilingual => "recursive_multilingual",
        }
    }

    /// Whether chunk sizes are measured in tokens.
    pub fn is_token_aware(&self) -> bool {
        !matches!(self, Self::Sentence)
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "tokens" => Ok(Self::Tokens),
            "sentence" => Ok(Self::Sentence),
            "recursive_multilingual" | "chinese" => Ok(Self::RecursiveMultilingual),
            _ => Err(ChunkingError::UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.size, 1200);
        assert_eq!(config.overlap, 100);
        assert_eq!(config.step(), 1100);
        assert_eq!(config.encoding_model, "cl100k_base");
        assert_eq!(config.strategy, ChunkingStrategy::Tokens);
        assert_eq!(config.separators.len(), 7);
    }

    #[test]
    fn test_chunking_config_validation() {
        let mut config = ChunkingConfig::default();

        // Valid config
        assert!(config.validate().is_ok());

        // Invalid: overlap == size
        config.size = 2;
        config.overlap = 2;
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("overlap (2) must be less than size (2)"));

        // Invalid: overlap > size
        config.overlap = 5;
        assert!(config.validate().is_err());

        // Invalid: zero size
        config.size = 0;
        config.overlap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sentence_strategy_ignores_sizing() {
        let config = ChunkingConfig {
            strategy: ChunkingStrategy::Sentence,
            size: 1,
            overlap: 10,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_separator_rejected() {
        let config = ChunkingConfig {
            strategy: ChunkingStrategy::RecursiveMultilingual,
            separators: vec![r"\n".to_string(), "(".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ChunkingError::InvalidSeparator { ref pattern, .. } if pattern == "("));

        let empty = ChunkingConfig {
            strategy: ChunkingStrategy::RecursiveMultilingual,
            separators: Vec::new(),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("tokens".parse::<ChunkingStrategy>().unwrap(), ChunkingStrategy::Tokens);
        assert_eq!(
            "Sentence".parse::<ChunkingStrategy>().unwrap(),
            ChunkingStrategy::Sentence
        );
        assert_eq!(
            "recursive-multilingual".parse::<ChunkingStrategy>().unwrap(),
            ChunkingStrategy::RecursiveMultilingual
        );
        assert_eq!(
            "chinese".parse::<ChunkingStrategy>().unwrap(),
            ChunkingStrategy::RecursiveMultilingual
        );

        let err = "paragraph".parse::<ChunkingStrategy>().unwrap_err();
        assert_eq!(err, ChunkingError::UnknownStrategy("paragraph".to_string()));
    }

    #[test]
    fn test_strategy_serde_names() {
        for strategy in ChunkingStrategy::ALL {
            let toml_str = toml::to_string(&ChunkingConfig::with_strategy(strategy)).unwrap();
            assert!(toml_str.contains(&format!("strategy = \"{strategy}\"")));
        }

        let config: ChunkingConfig = toml::from_str("strategy = \"chinese\"").unwrap();
        assert_eq!(config.strategy, ChunkingStrategy::RecursiveMultilingual);

        assert!(toml::from_str::<ChunkingConfig>("strategy = \"paragraph\"").is_err());
    }
}
