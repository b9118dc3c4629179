//! THREADS command - Group news documents into story threads.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use newswire_core::ByThread;
use serde::Serialize;

use super::{
    HumanReadable, Settings, build_pipeline, load_documents, output, print_articles, print_header,
};

/// Arguments for the threads command.
#[derive(Args)]
pub struct ThreadsArgs {
    /// Directory of JSON documents, or a JSON-lines file
    pub source: PathBuf,
}

/// Every thread with its lead title.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ThreadsReport(pub Vec<ByThread>);

/// Print one thread: title line, then member ids.
pub(crate) fn print_thread(thread: &ByThread, indent: usize) {
    let pad = " ".repeat(indent);
    println!(
        "{pad}{} {}",
        thread.title.bold(),
        format!("[{}]", thread.articles.len()).dimmed()
    );
    print_articles(&thread.articles, indent + 2);
}

impl HumanReadable for ThreadsReport {
    fn print_human(&self) {
        print_header("Story Threads");

        if self.0.is_empty() {
            println!("  {}", "(No threads)".dimmed());
            return;
        }

        for thread in &self.0 {
            print_thread(thread, 0);
            println!();
        }
        println!("{}", format!("{} threads", self.0.len()).dimmed());
    }
}

/// Execute the threads command.
pub async fn execute(settings: &Settings, args: ThreadsArgs) -> Result<()> {
    let pipeline = build_pipeline(settings).await?;
    let documents = load_documents(&args.source, settings).await?;

    let run = pipeline.classify(documents);
    let threads = pipeline.threads(&run);
    tracing::info!(threads = threads.len(), "Clustered threads");

    let report = ThreadsReport(threads.iter().map(ByThread::from).collect());
    output(&report, settings.human)
}
