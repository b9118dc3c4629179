//! CATEGORIES command - Group news documents by category.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use newswire_core::ByCategory;
use serde::Serialize;

use super::{
    HumanReadable, Settings, build_pipeline, load_documents, output, print_articles, print_header,
};

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Directory of JSON documents, or a JSON-lines file
    pub source: PathBuf,
}

/// Documents per category, every category listed.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CategoriesReport(pub Vec<ByCategory>);

impl HumanReadable for CategoriesReport {
    fn print_human(&self) {
        print_header("Documents by Category");

        for entry in &self.0 {
            println!(
                "{} {}",
                entry.category.yellow().bold(),
                format!("({} documents)", entry.articles.len()).dimmed()
            );
            print_articles(&entry.articles, 2);
            println!();
        }
    }
}

/// Execute the categories command.
pub async fn execute(settings: &Settings, args: CategoriesArgs) -> Result<()> {
    let pipeline = build_pipeline(settings).await?;
    let documents = load_documents(&args.source, settings).await?;

    let run = pipeline.classify(documents);
    output(&CategoriesReport(run.categories()), settings.human)
}
