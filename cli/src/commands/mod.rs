//! Command implementations for the newswire CLI.

pub mod categories;
pub mod languages;
pub mod news;
pub mod threads;
pub mod top;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use newswire_core::Document;
use newswire_engine::{EngineConfig, Pipeline, ingest};
use serde::Serialize;

/// Resolved settings shared by every command.
pub struct Settings {
    pub config: EngineConfig,
    pub training_dir: PathBuf,
    pub human: bool,
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Output a value as pretty JSON, or human-readable when requested.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Load the documents under `source` (a directory or a JSON-lines file).
pub async fn load_documents(source: &Path, settings: &Settings) -> Result<Vec<Document>> {
    let documents = ingest::load_path(source, settings.config.batch_size)
        .await
        .with_context(|| format!("Failed to load documents from {}", source.display()))?;
    tracing::info!(source = %source.display(), count = documents.len(), "Loaded documents");
    Ok(documents)
}

/// Load the training data and build a pipeline from the settings.
pub async fn build_pipeline(settings: &Settings) -> Result<Pipeline> {
    Pipeline::load(settings.config.clone(), &settings.training_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to load training data from {}",
                settings.training_dir.display()
            )
        })
}

/// Print a section header.
pub(crate) fn print_header(title: &str) {
    println!("{}", title.green().bold());
    println!("{}", "=".repeat(80));
    println!();
}

/// Print a list of article ids, or a placeholder when there are none.
pub(crate) fn print_articles(articles: &[String], indent: usize) {
    let pad = " ".repeat(indent);
    if articles.is_empty() {
        println!("{pad}{}", "(none)".dimmed());
        return;
    }
    for article in articles {
        println!("{pad}{}", article.cyan());
    }
}
