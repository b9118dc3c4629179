//! Document loading.
//!
//! Each input file holds one JSON document record. Files are loaded in
//! batches: every file in a batch gets its own task, and the next batch only
//! starts once the whole current batch has finished. Results are slotted by
//! input position, so the returned order matches the order of the paths
//! regardless of which task finishes first.
//!
//! Unreadable or undecodable files are logged and skipped. Only failing to
//! list the input directory is an error.

use crate::error::IngestError;
use newswire_core::{Document, DocumentId, Language};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

/// A raw news document as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Identifier; the file name is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lang_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub text: String,
}

impl DocumentRecord {
    /// Title, description, body and site name as one normalized payload.
    #[must_use]
    pub fn normalized_text(&self) -> String {
        normalize_text(&[&self.title, &self.description, &self.text, &self.site_name])
    }

    /// Converts the record into a document.
    ///
    /// Returns `None` for records in an unsupported language or without a
    /// title.
    #[must_use]
    pub fn into_document(self, fallback_id: &str) -> Option<Document> {
        let language: Language = match self.lang_code.parse() {
            Ok(language) => language,
            Err(e) => {
                tracing::debug!(id = fallback_id, error = %e, "skipping record");
                return None;
            }
        };
        let title = self.title.trim();
        if title.is_empty() {
            tracing::debug!(id = fallback_id, "skipping record without title");
            return None;
        }

        let text = self.normalized_text();
        let id = self
            .name
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| DocumentId::from(fallback_id), DocumentId::from);

        Some(Document::builder(id, language).title(title).text(text).build())
    }
}

/// Joins text fragments, collapses whitespace and removes `,` and `.`.
#[must_use]
pub fn normalize_text(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .map(|word| word.replace([',', '.'], ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lists every file under a directory, recursively, in path order.
///
/// Nested directories that cannot be listed are logged and skipped.
///
/// # Errors
///
/// Fails if `root` is missing, is not a directory or cannot be listed.
pub async fn collect_files(root: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| IngestError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(IngestError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(IngestError::io(&dir, e)),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) if dir == root => return Err(IngestError::io(&dir, e)),
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "directory listing cut short");
                    break;
                }
            };
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => pending.push(entry.path()),
                Ok(_) => files.push(entry.path()),
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "skipping entry");
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Reads and decodes one record file.
pub async fn read_record(path: &Path) -> Result<DocumentRecord, IngestError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IngestError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| IngestError::decode(path, e))
}

/// Loads record files in batches of at most `batch_size` concurrent tasks.
///
/// # Returns
///
/// The successfully decoded records paired with their path, in input order.
pub async fn load_records(paths: &[PathBuf], batch_size: usize) -> Vec<(PathBuf, DocumentRecord)> {
    let batch_size = batch_size.max(1);
    let mut slots: Vec<Option<DocumentRecord>> = Vec::new();
    slots.resize_with(paths.len(), || None);
    let mut skipped = 0usize;

    for (batch_index, batch) in paths.chunks(batch_size).enumerate() {
        let offset = batch_index * batch_size;
        let mut tasks = JoinSet::new();
        for (i, path) in batch.iter().enumerate() {
            let path = path.clone();
            tasks.spawn(async move { (offset + i, read_record(&path).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(record))) => slots[index] = Some(record),
                Ok((_, Err(e))) => {
                    skipped += 1;
                    tracing::warn!(error = %e, "skipping unreadable document");
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(error = %e, "document loading task failed");
                }
            }
        }
        tracing::debug!(batch = batch_index, size = batch.len(), "batch loaded");
    }

    tracing::info!(loaded = paths.len() - skipped, skipped, "records loaded");
    paths
        .iter()
        .zip(slots)
        .filter_map(|(path, record)| record.map(|r| (path.clone(), r)))
        .collect()
}

/// Loads documents from record files.
///
/// Records are converted with [`DocumentRecord::into_document`]; the file
/// name stands in for a missing record name.
pub async fn load_documents(paths: &[PathBuf], batch_size: usize) -> Vec<Document> {
    let records = load_records(paths, batch_size).await;
    let total = records.len();
    let documents: Vec<Document> = records
        .into_iter()
        .filter_map(|(path, record)| record.into_document(&file_name(&path)))
        .collect();

    tracing::info!(
        documents = documents.len(),
        rejected = total - documents.len(),
        "documents prepared"
    );
    documents
}

/// Loads every document under a directory.
pub async fn load_dir(root: &Path, batch_size: usize) -> Result<Vec<Document>, IngestError> {
    let files = collect_files(root).await?;
    tracing::info!(root = %root.display(), files = files.len(), "loading documents");
    Ok(load_documents(&files, batch_size).await)
}

/// Loads documents from a JSON-lines file, one record per line.
///
/// Blank lines are ignored. Lines that fail to decode are logged and
/// skipped. Records without a name are identified as `<file>:<line>`.
pub async fn load_json_lines(path: &Path) -> Result<Vec<Document>, IngestError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IngestError::io(path, e))?;
    let base = file_name(path);

    let documents: Vec<Document> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(n, line)| match serde_json::from_str::<DocumentRecord>(line) {
            Ok(record) => record.into_document(&format!("{base}:{}", n + 1)),
            Err(e) => {
                tracing::warn!(line = n + 1, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect();

    tracing::info!(path = %path.display(), documents = documents.len(), "json lines loaded");
    Ok(documents)
}

/// Loads documents from a path: a directory of record files or a
/// JSON-lines file.
pub async fn load_path(path: &Path, batch_size: usize) -> Result<Vec<Document>, IngestError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| IngestError::io(path, e))?;
    if metadata.is_dir() {
        load_dir(path, batch_size).await
    } else {
        load_json_lines(path).await
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
