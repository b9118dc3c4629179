//! newswire-engine: classification, threading and ranking of news documents
//!
//! This crate provides:
//! - A big-word filter and pluggable tokenizers
//! - An append-only TF-IDF model with a frozen, shareable form
//! - Remapped cosine similarity
//! - Category classification against per-language centroids
//! - Greedy story threading with local re-ranking
//! - Top-story ranking against category centroids
//! - Batched document and training-set loading
//!
//! ## Modules
//!
//! - [`tokenize`]: big-word rule and tokenizers
//! - [`tfidf`]: term-weight model and weight vectors
//! - [`similarity`]: cosine on the remapped [0, 1] scale
//! - [`classifier`]: centroids and the classifier context
//! - [`threads`]: greedy grouping and re-ranking per bucket
//! - [`ranking`]: top stories per category and overall
//! - [`pipeline`]: the end-to-end run
//! - [`ingest`]: document records and batched loading
//! - [`training`]: centroid training data
//! - [`config`]: engine tunables from the environment
//! - [`error`]: ingestion and engine errors
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use newswire_engine::{EngineConfig, Pipeline, TrainingSet, ingest};
//!
//! let config = EngineConfig::from_env()?;
//! let training = TrainingSet::load(Path::new("train"), config.batch_size).await?;
//! let documents = ingest::load_dir(Path::new("data"), config.batch_size).await?;
//!
//! let output = Pipeline::new(config, training).run(documents);
//! for thread in &output.threads {
//!     println!("{} ({} documents)", thread.title, thread.size());
//! }
//! ```

pub use newswire_core;

pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod ranking;
pub mod similarity;
pub mod tfidf;
pub mod threads;
pub mod tokenize;
pub mod training;

// Re-export main types for convenience
pub use classifier::{CategoryCentroid, Classification, ClassifierContext};
pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, EngineResult, IngestError};
pub use ingest::DocumentRecord;
pub use pipeline::{ClassifiedRun, Pipeline, PreparedDocument, RunOutput};
pub use ranking::{TopStories, TopStoryRanker};
pub use similarity::cosine;
pub use tfidf::{Fingerprint, FrozenModel, TermWeightModel, WeightVector};
pub use threads::{ThreadClusterer, ThreadingConfig};
pub use tokenize::{Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer, big_words};
pub use training::{TrainingEntry, TrainingSet};
