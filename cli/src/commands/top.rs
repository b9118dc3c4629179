//! TOP command - Rank story threads overall and per category.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use newswire_core::ByTop;
use serde::Serialize;

use super::threads::print_thread;
use super::{HumanReadable, Settings, build_pipeline, load_documents, output, print_header};

/// Arguments for the top command.
#[derive(Args)]
pub struct TopArgs {
    /// Directory of JSON documents, or a JSON-lines file
    pub source: PathBuf,
}

/// Ranked threads: `"any"` first, then each category.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TopReport(pub Vec<ByTop>);

impl HumanReadable for TopReport {
    fn print_human(&self) {
        print_header("Top Stories");

        for entry in &self.0 {
            println!("{}", entry.category.yellow().bold());
            println!("{}", "-".repeat(40));
            if entry.threads.is_empty() {
                println!("  {}", "(No threads)".dimmed());
            }
            for (rank, thread) in entry.threads.iter().enumerate() {
                print!("{} ", format!("{:>3}.", rank + 1).cyan());
                print_thread(thread, 0);
            }
            println!();
        }
    }
}

/// Execute the top command.
pub async fn execute(settings: &Settings, args: TopArgs) -> Result<()> {
    let pipeline = build_pipeline(settings).await?;
    let documents = load_documents(&args.source, settings).await?;

    let output_run = pipeline.run(documents);
    tracing::info!(
        threads = output_run.threads.len(),
        ranked = output_run.top.global.len(),
        "Ranked threads"
    );

    output(&TopReport(output_run.top.report()), settings.human)
}
