//! Command-line interface for the newswire story engine.
//!
//! Every command reads a directory of JSON document records (or a JSON-lines
//! file) and prints a JSON report on stdout:
//! - languages: document ids grouped by language
//! - news: ids of documents classified into a category
//! - categories: ids per category
//! - threads: story threads with their titles
//! - top: ranked threads, overall and per category
//!
//! Configuration via environment:
//! - NEWSWIRE_TRAINING_DIR: training data root (default: train)
//! - NEWSWIRE_*: engine tunables, see `EngineConfig::from_env`
//! - LOG_LEVEL / RUST_LOG: log filter (logs go to stderr)

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{
    Settings, categories::CategoriesArgs, languages::LanguagesArgs, news::NewsArgs,
    threads::ThreadsArgs, top::TopArgs,
};

/// Newswire story engine
///
/// Classify news documents, group them into story threads and rank the
/// threads. Prints JSON by default; pass --human for formatted output.
#[derive(Parser)]
#[command(name = "newswire")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Root of the training data (`{lang}/{1..7}/*`)
    #[arg(long, env = "NEWSWIRE_TRAINING_DIR", default_value = "train", global = true)]
    training_dir: std::path::PathBuf,

    /// Documents loaded concurrently per batch
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// Classification threshold on the remapped cosine scale
    #[arg(long, global = true)]
    classification_threshold: Option<f64>,

    /// Thread-joining threshold on the remapped cosine scale
    #[arg(long, global = true)]
    thread_threshold: Option<f64>,

    /// Length of the overall top-story list
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Drop documents that join no thread instead of reporting them alone
    #[arg(long, global = true)]
    no_singletons: bool,

    /// Cluster each bucket without its category centroid as background
    #[arg(long, global = true)]
    no_centroid_seed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group document ids by language
    Languages(LanguagesArgs),

    /// List documents classified as news
    News(NewsArgs),

    /// Group news documents by category
    Categories(CategoriesArgs),

    /// Group news documents into story threads
    Threads(ThreadsArgs),

    /// Rank story threads overall and per category
    Top(TopArgs),
}

impl Cli {
    /// Engine configuration: environment first, then command-line overrides.
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut config = newswire_engine::EngineConfig::from_env()?;
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(threshold) = self.classification_threshold {
            config.classification_threshold = threshold;
        }
        if let Some(threshold) = self.thread_threshold {
            config.thread_threshold = threshold;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if self.no_singletons {
            config.singleton_threads = false;
        }
        if self.no_centroid_seed {
            config.seed_buckets_with_centroids = false;
        }
        config.validate()?;

        Ok(Settings {
            config,
            training_dir: self.training_dir.clone(),
            human: self.human,
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let settings = match cli.settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Languages(args) => commands::languages::execute(&settings, args).await,
        Commands::News(args) => commands::news::execute(&settings, args).await,
        Commands::Categories(args) => commands::categories::execute(&settings, args).await,
        Commands::Threads(args) => commands::threads::execute(&settings, args).await,
        Commands::Top(args) => commands::top::execute(&settings, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = Cli::parse_from([
            "newswire",
            "--thread-threshold",
            "0.8",
            "--no-singletons",
            "threads",
            "data",
        ]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.config.thread_threshold, 0.8);
        assert!(!settings.config.singleton_threads);
        assert!(settings.config.seed_buckets_with_centroids);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli = Cli::parse_from(["newswire", "--batch-size", "0", "news", "data"]);
        assert!(cli.settings().is_err());
    }
}
