//! End-to-end run: prepare, classify, thread, rank.
//!
//! Every stage produces a new view of the documents; nothing flows back
//! upstream. The run model absorbs every document's big words followed by
//! every centroid's training words, and is frozen before any weight is
//! computed, so each document's classification vector is computed exactly
//! once against a fixed corpus.

use crate::classifier::ClassifierContext;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::ranking::{TopStories, TopStoryRanker};
use crate::tfidf::{TermWeightModel, WeightVector};
use crate::threads::ThreadClusterer;
use crate::tokenize::{Tokenizer, WhitespaceTokenizer, big_word_text};
use crate::training::TrainingSet;
use newswire_core::{ByCategory, ByNews, ByThread, Category, Document, Thread};
use rayon::prelude::*;
use std::path::Path;

/// A document with its derived term views.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDocument {
    pub document: Document,
    /// Big words of the document text, space-separated.
    pub words: String,
    /// Weights against the frozen run model; empty until classified.
    pub weights: WeightVector,
}

impl PreparedDocument {
    /// Derives the big-word view of a document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        let words = big_word_text(&document.text);
        Self {
            document,
            words,
            weights: WeightVector::new(),
        }
    }
}

/// The output of the classification stage.
#[derive(Debug, Clone)]
pub struct ClassifiedRun {
    /// Documents in input order, with categories assigned.
    pub documents: Vec<PreparedDocument>,
    /// Centroids used for classification.
    pub context: ClassifierContext,
}

impl ClassifiedRun {
    /// Number of documents that received a category.
    #[must_use]
    pub fn classified_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.document.category.is_some())
            .count()
    }

    /// Ids of every document classified as news.
    #[must_use]
    pub fn news(&self) -> ByNews {
        ByNews::from_documents(&self.plain_documents())
    }

    /// Ids per category, all seven categories present.
    #[must_use]
    pub fn categories(&self) -> Vec<ByCategory> {
        ByCategory::from_documents(&self.plain_documents())
    }

    /// Category of a document by id, if it is part of the run.
    #[must_use]
    pub fn category_of(&self, id: &str) -> Option<Option<Category>> {
        self.documents
            .iter()
            .find(|d| d.document.id.as_str() == id)
            .map(|d| d.document.category)
    }

    fn plain_documents(&self) -> Vec<Document> {
        self.documents.iter().map(|d| d.document.clone()).collect()
    }
}

/// Everything a full run produces.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub classified: ClassifiedRun,
    pub threads: Vec<Thread>,
    pub top: TopStories,
}

impl RunOutput {
    /// Threads in report form.
    #[must_use]
    pub fn thread_report(&self) -> Vec<ByThread> {
        self.threads.iter().map(ByThread::from).collect()
    }
}

/// Runs the classification, threading and ranking stages.
#[derive(Debug, Clone)]
pub struct Pipeline<T: Tokenizer + Clone = WhitespaceTokenizer> {
    config: EngineConfig,
    training: TrainingSet,
    tokenizer: T,
}

impl Pipeline<WhitespaceTokenizer> {
    /// Creates a pipeline with the whitespace tokenizer.
    #[must_use]
    pub fn new(config: EngineConfig, training: TrainingSet) -> Self {
        Self::with_tokenizer(config, training, WhitespaceTokenizer)
    }

    /// Validates the configuration and loads training data from disk.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`](crate::EngineError::Config) for an
    /// invalid configuration and [`EngineError::Ingest`](crate::EngineError::Ingest)
    /// if the training root cannot be read.
    pub async fn load(config: EngineConfig, training_dir: &Path) -> EngineResult<Self> {
        config.validate()?;
        let training = TrainingSet::load(training_dir, config.batch_size).await?;
        tracing::info!(
            training_dir = %training_dir.display(),
            words = training.word_count(),
            "training data loaded"
        );
        Ok(Self::new(config, training))
    }
}

impl<T: Tokenizer + Clone> Pipeline<T> {
    /// Creates a pipeline with a custom tokenizer.
    ///
    /// The tokenizer is used by every model of the run: classification,
    /// bucket clustering, re-ranking and top-story ranking.
    pub fn with_tokenizer(config: EngineConfig, training: TrainingSet, tokenizer: T) -> Self {
        Self {
            config,
            training,
            tokenizer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn training(&self) -> &TrainingSet {
        &self.training
    }

    /// Assigns a category to every document.
    ///
    /// Any category already set on an input document is replaced.
    pub fn classify(&self, documents: Vec<Document>) -> ClassifiedRun {
        let mut prepared: Vec<PreparedDocument> =
            documents.into_par_iter().map(PreparedDocument::new).collect();

        let mut model = TermWeightModel::with_tokenizer(self.tokenizer.clone());
        let absorbed = model.extend(prepared.iter().map(|d| d.words.as_str()));
        let centroid_texts: Vec<String> = self.training.entries().iter().map(|e| e.text()).collect();
        model.extend(centroid_texts.iter().map(String::as_str));
        let model = model.freeze();
        tracing::debug!(
            documents = prepared.len(),
            distinct = absorbed,
            corpus = model.document_count(),
            vocabulary = model.vocabulary_size(),
            "run model frozen"
        );

        let context = ClassifierContext::with_threshold(
            &self.training,
            &model,
            self.config.classification_threshold,
        );

        prepared.par_iter_mut().for_each(|doc| {
            doc.weights = model.weights(&doc.words);
            let classification = context.classify(&doc.weights, doc.document.language);
            doc.document.category = classification.map(|c| c.category);
        });

        let run = ClassifiedRun {
            documents: prepared,
            context,
        };
        tracing::info!(
            documents = run.documents.len(),
            classified = run.classified_count(),
            "documents classified"
        );
        run
    }

    /// Groups classified documents into threads.
    pub fn threads(&self, run: &ClassifiedRun) -> Vec<Thread> {
        ThreadClusterer::with_tokenizer((&self.config).into(), self.tokenizer.clone())
            .cluster(&run.documents, Some(&run.context))
    }

    /// Ranks threads against their category centroids.
    pub fn top(&self, run: &ClassifiedRun, threads: &[Thread]) -> TopStories {
        TopStoryRanker::with_tokenizer(&self.training, self.config.top_n, self.tokenizer.clone())
            .rank(threads, &run.documents)
    }

    /// Runs every stage.
    pub fn run(&self, documents: Vec<Document>) -> RunOutput {
        let classified = self.classify(documents);
        let threads = self.threads(&classified);
        let top = self.top(&classified, &threads);
        RunOutput {
            classified,
            threads,
            top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, IngestError};
    use newswire_core::Language;
    use tempfile::TempDir;

    fn training() -> TrainingSet {
        let mut set = TrainingSet::empty();
        set.insert_words(Language::En, Category::Sports, ["match", "goal", "score", "team"]);
        set
    }

    fn doc(id: &str, text: &str) -> Document {
        Document::builder(id, Language::En).title(id).text(text).build()
    }

    #[test]
    fn prepared_document_uses_big_words() {
        let prepared = PreparedDocument::new(doc("a", "The penalty decided the match"));
        assert_eq!(prepared.words, "penalt decide match");
        assert!(prepared.weights.is_empty());
    }

    #[test]
    fn short_token_document_is_unclassified() {
        let pipeline = Pipeline::new(EngineConfig::default(), training());
        let run = pipeline.classify(vec![
            doc("short", "a an the of it is"),
            doc("sports", "match goal team final"),
            doc("weather", "rain cloud storm"),
        ]);

        let short = &run.documents[0];
        assert!(short.words.is_empty());
        assert!(short.weights.is_empty());
        assert_eq!(short.document.category_code(), -1);
        assert_eq!(run.category_of("sports"), Some(Some(Category::Sports)));
    }

    #[test]
    fn preset_category_is_replaced() {
        let mut preset = doc("weather", "rain cloud storm");
        preset.category = Some(Category::Science);
        let run = Pipeline::new(EngineConfig::default(), training())
            .classify(vec![preset, doc("sports", "match goal team final")]);

        assert_eq!(run.category_of("weather"), Some(None));
    }

    #[test]
    fn news_lists_only_classified() {
        let run = Pipeline::new(EngineConfig::default(), training()).classify(vec![
            doc("sports", "match goal team final"),
            doc("weather", "rain cloud storm"),
        ]);

        assert_eq!(run.news().articles, vec!["sports"]);
        assert_eq!(run.categories()[3].articles, vec!["sports"]);
        assert_eq!(run.classified_count(), 1);
    }

    #[tokio::test]
    async fn load_rejects_invalid_config() {
        let config = EngineConfig {
            batch_size: 0,
            ..EngineConfig::default()
        };
        let err = Pipeline::load(config, Path::new("train")).await.unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[tokio::test]
    async fn load_reports_missing_training_root() {
        let dir = TempDir::new().unwrap();
        let err = Pipeline::load(EngineConfig::default(), &dir.path().join("absent"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Ingest(IngestError::Io { .. })));
    }

    #[tokio::test]
    async fn load_reads_training_tree() {
        let dir = TempDir::new().unwrap();
        let sports = dir.path().join("en").join("4");
        std::fs::create_dir_all(&sports).unwrap();
        let record = serde_json::json!({
            "lang_code": "en",
            "title": "Match",
            "text": "goal score team",
        });
        std::fs::write(sports.join("t.json"), record.to_string()).unwrap();

        let pipeline = Pipeline::load(EngineConfig::default(), dir.path()).await.unwrap();
        let run = pipeline.classify(vec![
            doc("sports", "match goal team final"),
            doc("weather", "rain cloud storm"),
        ]);

        assert_eq!(
            pipeline.training().entry(Language::En, Category::Sports).words,
            vec!["match", "goal", "score", "team"]
        );
        assert_eq!(run.category_of("sports"), Some(Some(Category::Sports)));
    }
}
