//! Engine configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Remapped cosine a document must exceed to receive a category.
pub const DEFAULT_CLASSIFICATION_THRESHOLD: f64 = 0.555;

/// Remapped cosine two documents must exceed to share a thread.
pub const DEFAULT_THREAD_THRESHOLD: f64 = 0.777;

/// Length of the global top-story list.
pub const DEFAULT_TOP_N: usize = 10;

/// Documents loaded concurrently per ingestion batch.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Keywords kept per thread.
pub const DEFAULT_KEYWORDS: usize = 10;

/// Tunables for a classification and threading run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Classification threshold on the remapped cosine scale.
    pub classification_threshold: f64,
    /// Thread-joining threshold on the remapped cosine scale.
    pub thread_threshold: f64,
    /// Number of threads in the global (`"any"`) top list.
    pub top_n: usize,
    /// Maximum documents in flight while loading.
    pub batch_size: usize,
    /// Number of keywords attached to each thread.
    pub keywords: usize,
    /// Emit unclaimed documents as single-member threads.
    pub singleton_threads: bool,
    /// Absorb the category centroid into each bucket model as background.
    pub seed_buckets_with_centroids: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classification_threshold: DEFAULT_CLASSIFICATION_THRESHOLD,
            thread_threshold: DEFAULT_THREAD_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            batch_size: DEFAULT_BATCH_SIZE,
            keywords: DEFAULT_KEYWORDS,
            singleton_threads: true,
            seed_buckets_with_centroids: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional, falling back to the defaults:
    /// - `NEWSWIRE_CLASSIFICATION_THRESHOLD` (default: 0.555)
    /// - `NEWSWIRE_THREAD_THRESHOLD` (default: 0.777)
    /// - `NEWSWIRE_TOP_N` (default: 10)
    /// - `NEWSWIRE_BATCH_SIZE` (default: 500)
    /// - `NEWSWIRE_KEYWORDS` (default: 10)
    /// - `NEWSWIRE_SINGLETON_THREADS` (default: true)
    /// - `NEWSWIRE_SEED_BUCKETS` (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables keep their default; set but unparseable ones are an
    /// error. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            classification_threshold: parse_var(
                &lookup,
                "NEWSWIRE_CLASSIFICATION_THRESHOLD",
                defaults.classification_threshold,
            )?,
            thread_threshold: parse_var(&lookup, "NEWSWIRE_THREAD_THRESHOLD", defaults.thread_threshold)?,
            top_n: parse_var(&lookup, "NEWSWIRE_TOP_N", defaults.top_n)?,
            batch_size: parse_var(&lookup, "NEWSWIRE_BATCH_SIZE", defaults.batch_size)?,
            keywords: parse_var(&lookup, "NEWSWIRE_KEYWORDS", defaults.keywords)?,
            singleton_threads: parse_var(
                &lookup,
                "NEWSWIRE_SINGLETON_THREADS",
                defaults.singleton_threads,
            )?,
            seed_buckets_with_centroids: parse_var(
                &lookup,
                "NEWSWIRE_SEED_BUCKETS",
                defaults.seed_buckets_with_centroids,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that thresholds lie in [0, 1] and the batch size is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("classification_threshold", self.classification_threshold)?;
        check_threshold("thread_threshold", self.thread_threshold)?;
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "batch_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<F, V>(lookup: &F, name: &str, default: V) -> Result<V, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    V: FromStr,
    V::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: V::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("{raw:?}: {e}"),
        }),
    }
}

fn check_threshold(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A setting has an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.classification_threshold, 0.555);
        assert_eq!(config.thread_threshold, 0.777);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.batch_size, 500);
        assert!(config.singleton_threads);
        assert!(config.seed_buckets_with_centroids);
    }

    #[test]
    fn overrides_from_variables() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("NEWSWIRE_THREAD_THRESHOLD", "0.8"),
            ("NEWSWIRE_TOP_N", " 5 "),
            ("NEWSWIRE_SINGLETON_THREADS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.thread_threshold, 0.8);
        assert_eq!(config.top_n, 5);
        assert!(!config.singleton_threads);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn unparseable_value_is_rejected() {
        let err = EngineConfig::from_lookup(lookup(&[("NEWSWIRE_BATCH_SIZE", "lots")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { name, .. } => assert_eq!(name, "NEWSWIRE_BATCH_SIZE"),
        }
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let result = EngineConfig::from_lookup(lookup(&[("NEWSWIRE_CLASSIFICATION_THRESHOLD", "1.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = EngineConfig {
            batch_size: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
