//! Story threading within (language, category) buckets.
//!
//! Clustering a bucket takes two steps:
//!
//! 1. **Greedy grouping.** Documents are visited in input order. An unclaimed
//!    anchor scans every other unclaimed document; each one scoring above the
//!    threshold joins the anchor's group and is claimed. The anchor itself is
//!    claimed only once it gains a member. Vectors come from a model built
//!    over the bucket alone, so the grouping is order-dependent by nature.
//! 2. **Re-ranking.** Each group gets a fresh local model holding every
//!    member's words plus one synthetic document of all their words combined.
//!    Members are sorted by similarity to that aggregate; the most central
//!    member leads the thread and supplies its title.
//!
//! Similarities for one anchor are computed in parallel, but claims are
//! applied sequentially in index order.

use crate::classifier::ClassifierContext;
use crate::config::{DEFAULT_KEYWORDS, DEFAULT_THREAD_THRESHOLD, EngineConfig};
use crate::pipeline::PreparedDocument;
use crate::similarity::cosine;
use crate::tfidf::{TermWeightModel, WeightVector};
use crate::tokenize::{Tokenizer, WhitespaceTokenizer};
use newswire_core::{BucketKey, Thread};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Threading parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadingConfig {
    /// Remapped cosine a document must exceed to join an anchor.
    pub threshold: f64,
    /// Keywords kept per thread.
    pub keywords: usize,
    /// Emit unclaimed documents as single-member threads.
    pub singletons: bool,
    /// Absorb the bucket's centroid words into the bucket model.
    pub seed_with_centroid: bool,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THREAD_THRESHOLD,
            keywords: DEFAULT_KEYWORDS,
            singletons: true,
            seed_with_centroid: true,
        }
    }
}

impl From<&EngineConfig> for ThreadingConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            threshold: config.thread_threshold,
            keywords: config.keywords,
            singletons: config.singleton_threads,
            seed_with_centroid: config.seed_buckets_with_centroids,
        }
    }
}

/// Greedy claim-based grouping.
///
/// # Returns
///
/// Groups of indices into `vectors`, each starting with its anchor, in
/// anchor order. Documents never claimed appear in no group.
#[must_use]
pub fn greedy_groups(vectors: &[WeightVector], threshold: f64) -> Vec<Vec<usize>> {
    let mut claimed = vec![false; vectors.len()];
    let mut groups = Vec::new();

    for anchor in 0..vectors.len() {
        if claimed[anchor] {
            continue;
        }

        let candidates: Vec<usize> = (0..vectors.len())
            .filter(|&j| j != anchor && !claimed[j])
            .collect();
        let matches: Vec<usize> = candidates
            .par_iter()
            .filter(|&&j| cosine(&vectors[anchor], &vectors[j]) > threshold)
            .copied()
            .collect();

        if matches.is_empty() {
            continue;
        }

        let mut group = Vec::with_capacity(matches.len() + 1);
        group.push(anchor);
        claimed[anchor] = true;
        for j in matches {
            claimed[j] = true;
            group.push(j);
        }
        groups.push(group);
    }

    groups
}

/// The result of re-ranking one group.
#[derive(Debug, Clone)]
pub struct Reranked {
    /// Positions into the input, most central first.
    pub order: Vec<usize>,
    /// Relevance of each position in `order`.
    pub scores: Vec<f64>,
    /// Weights of the synthetic all-words document.
    pub aggregate: WeightVector,
}

/// Re-ranks a group by similarity to its aggregate.
///
/// Equal scores keep input order.
#[must_use]
pub fn rerank(member_words: &[&str]) -> Reranked {
    rerank_with(member_words, WhitespaceTokenizer)
}

/// Re-ranks a group with a local model using the given tokenizer.
#[must_use]
pub fn rerank_with<T: Tokenizer>(member_words: &[&str], tokenizer: T) -> Reranked {
    let mut local = TermWeightModel::with_tokenizer(tokenizer);
    for words in member_words {
        local.add(words);
    }
    let all_words = member_words.join(" ");
    local.add(&all_words);
    let local = local.freeze();

    let aggregate = local.weights(&all_words);
    let mut scored: Vec<(usize, f64)> = member_words
        .iter()
        .enumerate()
        .map(|(i, words)| (i, cosine(&aggregate, &local.weights(words))))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (order, scores) = scored.into_iter().unzip();
    Reranked {
        order,
        scores,
        aggregate,
    }
}

/// Groups classified documents into threads.
///
/// Bucket and re-ranking models use the clusterer's tokenizer, which should
/// match the one the documents were classified with.
#[derive(Debug, Clone)]
pub struct ThreadClusterer<T: Tokenizer + Clone = WhitespaceTokenizer> {
    config: ThreadingConfig,
    tokenizer: T,
}

impl ThreadClusterer<WhitespaceTokenizer> {
    #[must_use]
    pub fn new(config: ThreadingConfig) -> Self {
        Self::with_tokenizer(config, WhitespaceTokenizer)
    }
}

impl Default for ThreadClusterer<WhitespaceTokenizer> {
    fn default() -> Self {
        Self::new(ThreadingConfig::default())
    }
}

impl<T: Tokenizer + Clone> ThreadClusterer<T> {
    #[must_use]
    pub fn with_tokenizer(config: ThreadingConfig, tokenizer: T) -> Self {
        Self { config, tokenizer }
    }

    #[must_use]
    pub fn config(&self) -> &ThreadingConfig {
        &self.config
    }

    /// Clusters every bucket of the given documents.
    ///
    /// Unclassified documents are ignored. Buckets are processed in
    /// (language, category) order and documents keep their relative input
    /// order within a bucket. When a classifier context is given and
    /// centroid seeding is on, each bucket model also absorbs that bucket's
    /// centroid words.
    pub fn cluster(
        &self,
        documents: &[PreparedDocument],
        context: Option<&ClassifierContext>,
    ) -> Vec<Thread> {
        let mut buckets: BTreeMap<BucketKey, Vec<&PreparedDocument>> = BTreeMap::new();
        for doc in documents {
            if let Some(bucket) = doc.document.bucket() {
                buckets.entry(bucket).or_default().push(doc);
            }
        }

        let mut threads = Vec::new();
        for (bucket, members) in &buckets {
            let background = context
                .filter(|_| self.config.seed_with_centroid)
                .map(|ctx| ctx.centroid(bucket.language, bucket.category).words.as_str());
            threads.extend(self.cluster_bucket(*bucket, members, background));
        }

        tracing::info!(
            buckets = buckets.len(),
            threads = threads.len(),
            "threads built"
        );
        threads
    }

    /// Clusters one bucket.
    ///
    /// # Arguments
    ///
    /// * `bucket` - The (language, category) pair every member belongs to
    /// * `members` - The bucket's documents, in input order
    /// * `background` - Extra text absorbed into the bucket model only
    ///
    /// # Returns
    ///
    /// Threads in order of their first member's input position.
    pub fn cluster_bucket(
        &self,
        bucket: BucketKey,
        members: &[&PreparedDocument],
        background: Option<&str>,
    ) -> Vec<Thread> {
        let mut model = TermWeightModel::with_tokenizer(self.tokenizer.clone());
        if let Some(text) = background {
            model.add(text);
        }
        for member in members {
            model.add(&member.words);
        }
        let model = model.freeze();

        let vectors: Vec<WeightVector> = members
            .par_iter()
            .map(|member| model.weights(&member.words))
            .collect();

        let mut groups = greedy_groups(&vectors, self.config.threshold);
        let grouped = groups.len();
        if self.config.singletons {
            let mut claimed = vec![false; members.len()];
            for &i in groups.iter().flatten() {
                claimed[i] = true;
            }
            groups.extend((0..members.len()).filter(|&i| !claimed[i]).map(|i| vec![i]));
            groups.sort_by_key(|group| group[0]);
        }

        tracing::debug!(
            %bucket,
            documents = members.len(),
            groups = grouped,
            singletons = groups.len() - grouped,
            "bucket clustered"
        );

        groups
            .into_iter()
            .map(|group| self.build_thread(bucket, members, &vectors, &group))
            .collect()
    }

    fn build_thread(
        &self,
        bucket: BucketKey,
        members: &[&PreparedDocument],
        vectors: &[WeightVector],
        group: &[usize],
    ) -> Thread {
        let (ordered, mut keywords) = if group.len() > 1 {
            let words: Vec<&str> = group.iter().map(|&i| members[i].words.as_str()).collect();
            let reranked = rerank_with(&words, self.tokenizer.clone());
            let ordered: Vec<usize> = reranked.order.iter().map(|&pos| group[pos]).collect();
            (ordered, reranked.aggregate.top_terms(self.config.keywords))
        } else {
            (group.to_vec(), Vec::new())
        };

        let lead = ordered[0];
        if keywords.is_empty() {
            keywords = vectors[lead].top_terms(self.config.keywords);
        }

        Thread {
            language: bucket.language,
            category: bucket.category,
            title: members[lead].document.title.clone(),
            members: ordered
                .iter()
                .map(|&i| members[i].document.id.clone())
                .collect(),
            keywords,
        }
    }
}
