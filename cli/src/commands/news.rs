//! NEWS command - List documents classified into a category.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use newswire_core::ByNews;

use super::{
    HumanReadable, Settings, build_pipeline, load_documents, output, print_articles, print_header,
};

/// Arguments for the news command.
#[derive(Args)]
pub struct NewsArgs {
    /// Directory of JSON documents, or a JSON-lines file
    pub source: PathBuf,
}

impl HumanReadable for ByNews {
    fn print_human(&self) {
        print_header("News Documents");
        print_articles(&self.articles, 2);
        println!();
        println!(
            "{}",
            format!("{} documents classified as news", self.articles.len()).dimmed()
        );
    }
}

/// Execute the news command.
pub async fn execute(settings: &Settings, args: NewsArgs) -> Result<()> {
    let pipeline = build_pipeline(settings).await?;
    let documents = load_documents(&args.source, settings).await?;

    let run = pipeline.classify(documents);
    output(&run.news(), settings.human)
}
