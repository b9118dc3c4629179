//! LANGUAGES command - Group document ids by language.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use newswire_core::ByLang;
use serde::Serialize;

use super::{HumanReadable, Settings, load_documents, output, print_articles, print_header};

/// Arguments for the languages command.
#[derive(Args)]
pub struct LanguagesArgs {
    /// Directory of JSON documents, or a JSON-lines file
    pub source: PathBuf,
}

/// Documents per supported language.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LanguagesReport(pub Vec<ByLang>);

impl HumanReadable for LanguagesReport {
    fn print_human(&self) {
        print_header("Documents by Language");

        for entry in &self.0 {
            println!(
                "{} {}",
                entry.lang_code.yellow().bold(),
                format!("({} documents)", entry.articles.len()).dimmed()
            );
            print_articles(&entry.articles, 2);
            println!();
        }
    }
}

/// Execute the languages command.
///
/// Only ingestion runs; no training data is needed.
pub async fn execute(settings: &Settings, args: LanguagesArgs) -> Result<()> {
    let documents = load_documents(&args.source, settings).await?;
    let report = LanguagesReport(ByLang::from_documents(&documents));
    output(&report, settings.human)
}
