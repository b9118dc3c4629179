//! Category classification against per-language centroids.
//!
//! Each of the 14 (language, category) pairs has a centroid: its training
//! words weighted against the shared run model. A document is scored against
//! every centroid of its own language in parallel, one result slot per
//! centroid, and the best score wins if it clears the threshold. Ties keep
//! the earlier centroid.

use crate::config::DEFAULT_CLASSIFICATION_THRESHOLD;
use crate::similarity::cosine;
use crate::tfidf::{FrozenModel, WeightVector};
use crate::tokenize::Tokenizer;
use crate::training::{TrainingSet, centroid_slot};
use newswire_core::{Category, Language};
use rayon::prelude::*;

/// A category's training words and their weights in the run model.
#[derive(Debug, Clone)]
pub struct CategoryCentroid {
    pub language: Language,
    pub category: Category,
    /// Training words joined by spaces.
    pub words: String,
    pub weights: WeightVector,
}

impl CategoryCentroid {
    /// Builds all centroids, in centroid order, against a frozen model.
    pub fn build_all<T: Tokenizer>(training: &TrainingSet, model: &FrozenModel<T>) -> Vec<Self> {
        training
            .entries()
            .iter()
            .map(|entry| {
                let words = entry.text();
                let weights = model.weights(&words);
                Self {
                    language: entry.language,
                    category: entry.category,
                    words,
                    weights,
                }
            })
            .collect()
    }
}

/// The outcome of classifying one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: Category,
    /// Remapped cosine against the winning centroid.
    pub score: f64,
}

/// Centroids and threshold for one run.
///
/// Built once after the run model is frozen and passed to whatever needs to
/// classify; nothing about it is global.
#[derive(Debug, Clone)]
pub struct ClassifierContext {
    centroids: Vec<CategoryCentroid>,
    threshold: f64,
}

impl ClassifierContext {
    /// Builds the context with the default threshold.
    pub fn new<T: Tokenizer>(training: &TrainingSet, model: &FrozenModel<T>) -> Self {
        Self::with_threshold(training, model, DEFAULT_CLASSIFICATION_THRESHOLD)
    }

    /// Builds the context with a custom threshold.
    pub fn with_threshold<T: Tokenizer>(
        training: &TrainingSet,
        model: &FrozenModel<T>,
        threshold: f64,
    ) -> Self {
        let centroids = CategoryCentroid::build_all(training, model);
        tracing::debug!(
            centroids = centroids.len(),
            empty = centroids.iter().filter(|c| c.weights.is_empty()).count(),
            "classifier context built"
        );
        Self {
            centroids,
            threshold,
        }
    }

    /// All centroids in centroid order.
    #[must_use]
    pub fn centroids(&self) -> &[CategoryCentroid] {
        &self.centroids
    }

    /// The centroid for one (language, category) pair.
    #[must_use]
    pub fn centroid(&self, language: Language, category: Category) -> &CategoryCentroid {
        &self.centroids[centroid_slot(language, category)]
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores a weight vector against every centroid.
    ///
    /// # Returns
    ///
    /// One slot per centroid, in centroid order. Centroids of another
    /// language are `None`.
    #[must_use]
    pub fn scores(&self, weights: &WeightVector, language: Language) -> Vec<Option<f64>> {
        self.centroids
            .par_iter()
            .map(|centroid| (centroid.language == language).then(|| cosine(weights, &centroid.weights)))
            .collect()
    }

    /// Assigns a category to a weight vector.
    ///
    /// # Returns
    ///
    /// The best-scoring centroid of the document's language if its score
    /// exceeds the threshold, otherwise `None`. On equal scores the earlier
    /// centroid wins.
    #[must_use]
    pub fn classify(&self, weights: &WeightVector, language: Language) -> Option<Classification> {
        let scores = self.scores(weights, language);

        let mut best: Option<Classification> = None;
        let mut best_score = 0.0;
        for (centroid, score) in self.centroids.iter().zip(scores) {
            let Some(score) = score else { continue };
            if score > self.threshold && score > best_score {
                best_score = score;
                best = Some(Classification {
                    category: centroid.category,
                    score,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfidf::TermWeightModel;

    fn context(training: &TrainingSet, documents: &[&str]) -> (ClassifierContext, FrozenModel) {
        let mut model = TermWeightModel::new();
        for doc in documents {
            model.add(doc);
        }
        for entry in training.entries() {
            model.add(&entry.text());
        }
        let frozen = model.freeze();
        (ClassifierContext::new(training, &frozen), frozen)
    }

    fn training() -> TrainingSet {
        let mut set = TrainingSet::empty();
        set.insert_words(Language::En, Category::Sports, ["match", "goal", "score", "team"]);
        set.insert_words(Language::En, Category::Economy, ["market", "shares", "bank", "profit"]);
        set
    }

    #[test]
    fn centroids_in_fixed_order() {
        let (ctx, _) = context(&training(), &[]);
        assert_eq!(ctx.centroids().len(), 14);
        assert_eq!(ctx.centroid(Language::En, Category::Sports).words, "match goal score team");
        assert!(ctx.centroid(Language::Ru, Category::Sports).weights.is_empty());
    }

    #[test]
    fn sports_document_classified_as_sports() {
        let doc = "match goal team final";
        let (ctx, model) = context(&training(), &[doc, "weather rain cloud"]);

        let result = ctx.classify(&model.weights(doc), Language::En).unwrap();
        assert_eq!(result.category, Category::Sports);
        assert!(result.score > 0.555);
    }

    #[test]
    fn other_language_centroids_are_skipped() {
        let doc = "match goal team final";
        let (ctx, model) = context(&training(), &[doc, "weather rain cloud"]);

        let scores = ctx.scores(&model.weights(doc), Language::Ru);
        assert!(scores[..7].iter().all(Option::is_none));
        assert!(scores[7..].iter().all(Option::is_some));
        assert_eq!(ctx.classify(&model.weights(doc), Language::Ru), None);
    }

    #[test]
    fn unrelated_vocabulary_is_unclassified() {
        let doc = "weather rain cloud";
        let (ctx, model) = context(&training(), &["match goal team final", doc]);
        assert_eq!(ctx.classify(&model.weights(doc), Language::En), None);
    }

    #[test]
    fn empty_vector_is_unclassified() {
        let (ctx, _) = context(&training(), &[]);
        assert_eq!(ctx.classify(&WeightVector::new(), Language::En), None);
    }

    #[test]
    fn ties_keep_first_centroid() {
        let mut set = TrainingSet::empty();
        set.insert_words(Language::En, Category::Society, ["vote", "poll"]);
        set.insert_words(Language::En, Category::Other, ["vote", "poll"]);
        let doc = "vote poll";
        let (ctx, model) = context(&set, &[doc, "rain cloud"]);

        let result = ctx.classify(&model.weights(doc), Language::En).unwrap();
        assert_eq!(result.category, Category::Society);
    }

    #[test]
    fn classification_is_repeatable() {
        let doc = "match goal team final";
        let (ctx, model) = context(&training(), &[doc, "weather rain cloud"]);
        let weights = model.weights(doc);
        assert_eq!(ctx.classify(&weights, Language::En), ctx.classify(&weights, Language::En));
    }
}
