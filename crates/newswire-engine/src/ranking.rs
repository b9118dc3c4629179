//! Top-story ranking.
//!
//! A thread's score is the similarity between its lead document and the
//! centroid of the thread's (language, category). Both sides are weighted by
//! a dedicated model that holds only the 14 centroid word lists, so scores
//! measure how typical a story is for its category, independent of the rest
//! of the run.

use crate::classifier::CategoryCentroid;
use crate::config::DEFAULT_TOP_N;
use crate::pipeline::PreparedDocument;
use crate::similarity::cosine;
use crate::tfidf::{FrozenModel, TermWeightModel};
use crate::tokenize::{Tokenizer, WhitespaceTokenizer};
use crate::training::{TrainingSet, centroid_slot};
use newswire_core::{ByTop, Category, DocumentId, RankedThread, Thread};
use rayon::prelude::*;
use std::collections::HashMap;

/// Ranked threads: the global list and every category's list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopStories {
    /// The highest-scoring threads across all categories.
    pub global: Vec<RankedThread>,
    /// Every thread of each category, all seven categories in id order.
    pub by_category: Vec<(Category, Vec<RankedThread>)>,
}

impl TopStories {
    /// The report form: `"any"` first, then each category.
    #[must_use]
    pub fn report(&self) -> Vec<ByTop> {
        ByTop::from_ranked(&self.global, &self.by_category)
    }
}

/// Scores threads against centroids weighted by a centroid-only model.
#[derive(Debug, Clone)]
pub struct TopStoryRanker<T: Tokenizer = WhitespaceTokenizer> {
    model: FrozenModel<T>,
    centroids: Vec<CategoryCentroid>,
    top_n: usize,
}

impl TopStoryRanker<WhitespaceTokenizer> {
    /// Builds the ranker with the default global list length.
    #[must_use]
    pub fn new(training: &TrainingSet) -> Self {
        Self::with_top_n(training, DEFAULT_TOP_N)
    }

    /// Builds the ranker with a custom global list length.
    #[must_use]
    pub fn with_top_n(training: &TrainingSet, top_n: usize) -> Self {
        Self::with_tokenizer(training, top_n, WhitespaceTokenizer)
    }
}

impl<T: Tokenizer> TopStoryRanker<T> {
    /// Builds the ranker with a custom tokenizer for the centroid model.
    #[must_use]
    pub fn with_tokenizer(training: &TrainingSet, top_n: usize, tokenizer: T) -> Self {
        let mut model = TermWeightModel::with_tokenizer(tokenizer);
        for entry in training.entries() {
            model.add(&entry.text());
        }
        let model = model.freeze();
        let centroids = CategoryCentroid::build_all(training, &model);

        Self {
            model,
            centroids,
            top_n,
        }
    }

    /// Scores a thread given its lead document's words.
    #[must_use]
    pub fn score(&self, thread: &Thread, lead_words: &str) -> f64 {
        let centroid = &self.centroids[centroid_slot(thread.language, thread.category)];
        cosine(&centroid.weights, &self.model.weights(lead_words))
    }

    /// Ranks threads.
    ///
    /// # Arguments
    ///
    /// * `threads` - Threads to rank, in clustering order
    /// * `documents` - Prepared documents supplying each lead's words
    ///
    /// A thread whose lead is not among `documents` scores 0. Sorting is
    /// stable, so equal scores keep clustering order.
    #[must_use]
    pub fn rank(&self, threads: &[Thread], documents: &[PreparedDocument]) -> TopStories {
        let words: HashMap<&DocumentId, &str> = documents
            .iter()
            .map(|doc| (&doc.document.id, doc.words.as_str()))
            .collect();

        let mut ranked: Vec<RankedThread> = threads
            .par_iter()
            .map(|thread| {
                let score = thread
                    .lead()
                    .and_then(|lead| words.get(lead))
                    .map_or(0.0, |lead_words| self.score(thread, lead_words));
                RankedThread {
                    thread: thread.clone(),
                    score,
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let by_category = Category::ALL
            .iter()
            .map(|&category| {
                let threads = ranked
                    .iter()
                    .filter(|r| r.thread.category == category)
                    .cloned()
                    .collect();
                (category, threads)
            })
            .collect();
        let global = ranked.into_iter().take(self.top_n).collect();

        tracing::info!(threads = threads.len(), top_n = self.top_n, "threads ranked");
        TopStories {
            global,
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfidf::WeightVector;
    use crate::tokenize::UnicodeWordTokenizer;
    use newswire_core::{ANY_CATEGORY, Document, Language};

    fn training() -> TrainingSet {
        let mut set = TrainingSet::empty();
        set.insert_words(Language::En, Category::Sports, ["match", "goal", "score", "team"]);
        set.insert_words(Language::En, Category::Society, ["vote", "poll", "ballot"]);
        set
    }

    fn prepared(id: &str, category: Category, words: &str) -> PreparedDocument {
        PreparedDocument {
            document: Document::builder(id, Language::En)
                .title(id.to_uppercase())
                .category(category)
                .build(),
            words: words.to_string(),
            weights: WeightVector::new(),
        }
    }

    fn thread_of(doc: &PreparedDocument) -> Thread {
        Thread {
            language: doc.document.language,
            category: doc.document.category.unwrap(),
            title: doc.document.title.clone(),
            members: vec![doc.document.id.clone()],
            keywords: vec![],
        }
    }

    #[test]
    fn typical_lead_scores_higher() {
        let ranker = TopStoryRanker::new(&training());
        let typical = prepared("a", Category::Sports, "match goal score team");
        let partial = prepared("b", Category::Sports, "match final");

        let high = ranker.score(&thread_of(&typical), &typical.words);
        let low = ranker.score(&thread_of(&partial), &partial.words);

        assert!((high - 1.0).abs() < 1e-12);
        assert!(low > 0.5 && low < high);
    }

    #[test]
    fn rank_sorts_and_truncates() {
        let docs = vec![
            prepared("partial", Category::Sports, "match final"),
            prepared("typical", Category::Sports, "match goal score team"),
            prepared("vote", Category::Society, "vote poll ballot"),
        ];
        let threads: Vec<Thread> = docs.iter().map(thread_of).collect();

        let top = TopStoryRanker::with_top_n(&training(), 2).rank(&threads, &docs);

        assert_eq!(top.global.len(), 2);
        assert!(top.global.iter().all(|r| r.thread.title != "PARTIAL"));

        assert_eq!(top.by_category.len(), 7);
        let (category, sports) = &top.by_category[3];
        assert_eq!(*category, Category::Sports);
        let titles: Vec<&str> = sports.iter().map(|r| r.thread.title.as_str()).collect();
        assert_eq!(titles, vec!["TYPICAL", "PARTIAL"]);
        assert!(top.by_category[1].1.is_empty());
    }

    #[test]
    fn centroid_model_uses_ranker_tokenizer() {
        let doc = prepared("a", Category::Sports, "match! goal! score! team!");
        let thread = thread_of(&doc);

        let plain = TopStoryRanker::new(&training()).score(&thread, &doc.words);
        let unicode = TopStoryRanker::with_tokenizer(&training(), DEFAULT_TOP_N, UnicodeWordTokenizer)
            .score(&thread, &doc.words);

        assert_eq!(plain, 0.5);
        assert!((unicode - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_lead_scores_zero() {
        let doc = prepared("a", Category::Sports, "match goal");
        let top = TopStoryRanker::new(&training()).rank(&[thread_of(&doc)], &[]);
        assert_eq!(top.global[0].score, 0.0);
    }

    #[test]
    fn report_starts_with_any() {
        let docs = vec![prepared("typical", Category::Sports, "match goal score team")];
        let threads: Vec<Thread> = docs.iter().map(thread_of).collect();

        let report = TopStoryRanker::new(&training()).rank(&threads, &docs).report();

        assert_eq!(report.len(), 8);
        assert_eq!(report[0].category, ANY_CATEGORY);
        assert_eq!(report[0].threads[0].articles, vec!["typical"]);
        assert_eq!(report[4].category, "sports");
    }
}
