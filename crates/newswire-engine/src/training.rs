//! Category training data.
//!
//! Training documents are already-classified records laid out as
//! `{root}/{lang}/{n}/*`, where `n` runs from 1 (society) to 7 (other). The
//! big words of every training document in a directory are concatenated into
//! one word list per (language, category).

use crate::error::IngestError;
use crate::ingest::{collect_files, load_records};
use crate::tokenize::big_words;
use newswire_core::{Category, Language};
use std::path::Path;

/// Number of (language, category) pairs.
pub const CENTROID_COUNT: usize = Language::ALL.len() * Category::ALL.len();

/// Position of a (language, category) pair in centroid order: every `en`
/// category in id order, then every `ru` category.
#[must_use]
pub fn centroid_slot(language: Language, category: Category) -> usize {
    let offset = match language {
        Language::En => 0,
        Language::Ru => Category::ALL.len(),
    };
    offset + usize::from(category.id())
}

/// Training words for one (language, category) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEntry {
    pub language: Language,
    pub category: Category,
    pub words: Vec<String>,
}

impl TrainingEntry {
    /// The word list as one whitespace-separated text.
    #[must_use]
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Training words for all 14 (language, category) pairs, in centroid order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    entries: Vec<TrainingEntry>,
}

impl Default for TrainingSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl TrainingSet {
    /// Creates a set where every word list is empty.
    #[must_use]
    pub fn empty() -> Self {
        let entries = Language::ALL
            .iter()
            .flat_map(|&language| {
                Category::ALL.iter().map(move |&category| TrainingEntry {
                    language,
                    category,
                    words: Vec::new(),
                })
            })
            .collect();
        Self { entries }
    }

    /// All entries in centroid order.
    #[must_use]
    pub fn entries(&self) -> &[TrainingEntry] {
        &self.entries
    }

    /// The entry for one (language, category) pair.
    #[must_use]
    pub fn entry(&self, language: Language, category: Category) -> &TrainingEntry {
        &self.entries[centroid_slot(language, category)]
    }

    /// Appends words verbatim to a word list.
    pub fn insert_words<I, S>(&mut self, language: Language, category: Category, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = &mut self.entries[centroid_slot(language, category)];
        entry.words.extend(words.into_iter().map(Into::into));
    }

    /// Appends the big words of a training text to a word list.
    pub fn add_text(&mut self, language: Language, category: Category, text: &str) {
        self.insert_words(language, category, big_words(text));
    }

    /// Total number of training words across all entries.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.entries.iter().map(|e| e.words.len()).sum()
    }

    /// Loads training data from `{root}/{lang}/{n}/*`.
    ///
    /// A missing category directory leaves that word list empty; such a
    /// centroid never matches anything. Records without a title are ignored,
    /// as are unreadable files.
    ///
    /// # Errors
    ///
    /// Fails if `root` itself cannot be read or is not a directory.
    pub async fn load(root: &Path, batch_size: usize) -> Result<Self, IngestError> {
        let metadata = tokio::fs::metadata(root)
            .await
            .map_err(|e| IngestError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(IngestError::NotADirectory(root.to_path_buf()));
        }

        let mut set = Self::empty();
        for language in Language::ALL {
            for category in Category::ALL {
                let dir = root
                    .join(language.code())
                    .join((category.id() + 1).to_string());

                let files = match collect_files(&dir).await {
                    Ok(files) => files,
                    Err(e) => {
                        tracing::warn!(%language, %category, error = %e, "no training data");
                        continue;
                    }
                };

                for (_, record) in load_records(&files, batch_size).await {
                    if record.title.trim().is_empty() {
                        continue;
                    }
                    set.add_text(language, category, &record.normalized_text());
                }
                tracing::debug!(
                    %language,
                    %category,
                    words = set.entry(language, category).words.len(),
                    "training words loaded"
                );
            }
        }

        tracing::info!(words = set.word_count(), "training set loaded");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn slots_follow_centroid_order() {
        assert_eq!(centroid_slot(Language::En, Category::Society), 0);
        assert_eq!(centroid_slot(Language::En, Category::Other), 6);
        assert_eq!(centroid_slot(Language::Ru, Category::Society), 7);
        assert_eq!(centroid_slot(Language::Ru, Category::Sports), 10);
        assert_eq!(CENTROID_COUNT, 14);
    }

    #[test]
    fn empty_set_has_fourteen_entries() {
        let set = TrainingSet::empty();
        assert_eq!(set.entries().len(), 14);
        assert_eq!(set.entries()[9].language, Language::Ru);
        assert_eq!(set.entries()[9].category, Category::Technology);
        assert_eq!(set.word_count(), 0);
    }

    #[test]
    fn add_text_applies_big_word_rule() {
        let mut set = TrainingSet::empty();
        set.add_text(Language::En, Category::Sports, "The penalty was scored");
        set.insert_words(Language::En, Category::Sports, ["goal"]);

        let entry = set.entry(Language::En, Category::Sports);
        assert_eq!(entry.words, vec!["penalt", "scored", "goal"]);
        assert_eq!(entry.text(), "penalt scored goal");
    }

    #[tokio::test]
    async fn load_reads_numbered_directories() {
        let root = TempDir::new().unwrap();
        let sports = root.path().join("en").join("4");
        std::fs::create_dir_all(&sports).unwrap();
        std::fs::write(
            sports.join("a.json"),
            r#"{"lang_code":"en","title":"Final","text":"match goal score team"}"#,
        )
        .unwrap();
        std::fs::write(sports.join("b.json"), r#"{"title":"","text":"ignored words"}"#).unwrap();

        let set = TrainingSet::load(root.path(), 10).await.unwrap();

        assert_eq!(
            set.entry(Language::En, Category::Sports).words,
            vec!["final", "match", "goal", "score", "team"]
        );
        assert!(set.entry(Language::Ru, Category::Sports).words.is_empty());
        assert!(set.entry(Language::En, Category::Society).words.is_empty());
    }

    #[tokio::test]
    async fn load_requires_root_directory() {
        let root = TempDir::new().unwrap();
        let result = TrainingSet::load(&root.path().join("missing"), 10).await;
        assert!(result.is_err());
    }
}
