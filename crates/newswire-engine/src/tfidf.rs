//! TF-IDF term weighting over an append-only corpus.
//!
//! A [`TermWeightModel`] absorbs documents one at a time and answers weight
//! queries against whatever it has absorbed so far:
//!
//! - Duplicate text (same fingerprint) is absorbed once
//! - Text that tokenizes to nothing is never absorbed
//! - Weights use smoothed IDF: `tf × ln((1 + N) / (1 + df))`
//!
//! Because N and df keep moving as documents are added, two weight queries
//! for the same text can disagree if a document was added in between. Call
//! [`TermWeightModel::freeze`] once the corpus is complete; the resulting
//! [`FrozenModel`] has no `add` and gives stable answers for the rest of the
//! run.

use crate::tokenize::{Tokenizer, WhitespaceTokenizer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Content fingerprint used as the corpus deduplication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprints the exact text (no normalization).
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self(*blake3::hash(text.as_bytes()).as_bytes())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Raw term counts for one document.
#[derive(Debug, Clone, Default)]
struct TermCounts {
    counts: HashMap<String, usize>,
    total: usize,
}

impl TermCounts {
    fn from_terms(terms: Vec<String>) -> Self {
        let total = terms.len();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for term in terms {
            *counts.entry(term).or_insert(0) += 1;
        }
        Self { counts, total }
    }

    fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// A sparse TF-IDF weighted vector.
///
/// Terms are kept sorted, so iteration, the dot product and the magnitude
/// are computed in the same order every time. Terms whose weight is exactly
/// zero are not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

impl WeightVector {
    /// Creates an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the weight of a term, if present.
    #[must_use]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    /// Iterates over (term, weight) pairs in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(term, weight)| (term.as_str(), *weight))
    }

    /// Number of terms with a non-zero weight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Checks if the vector has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Computes the L2 norm (magnitude) of the vector.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Computes the dot product with another vector.
    ///
    /// Walks both sorted term lists together; terms missing on one side
    /// contribute zero. The summation order depends only on the union of
    /// terms, so `a.dot(b)` and `b.dot(a)` are bit-identical.
    #[must_use]
    pub fn dot(&self, other: &WeightVector) -> f64 {
        let mut left = self.weights.iter().peekable();
        let mut right = other.weights.iter().peekable();
        let mut sum = 0.0;

        while let (Some(&(lt, lw)), Some(&(rt, rw))) = (left.peek(), right.peek()) {
            match lt.cmp(rt) {
                std::cmp::Ordering::Less => {
                    left.next();
                }
                std::cmp::Ordering::Greater => {
                    right.next();
                }
                std::cmp::Ordering::Equal => {
                    sum += lw * rw;
                    left.next();
                    right.next();
                }
            }
        }

        sum
    }

    /// Returns the top N terms by weight.
    ///
    /// Equal weights keep term order, so the result is deterministic.
    #[must_use]
    pub fn top_terms(&self, n: usize) -> Vec<String> {
        let mut terms: Vec<_> = self.weights.iter().collect();
        terms.sort_by(|a, b| b.1.total_cmp(a.1));
        terms
            .into_iter()
            .take(n)
            .map(|(term, _)| term.clone())
            .collect()
    }
}

impl FromIterator<(String, f64)> for WeightVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// An append-only TF-IDF corpus.
///
/// # Weight drift
///
/// [`weights`](Self::weights) reflects the corpus at the moment of the call.
/// Adding documents changes N and document frequencies, and therefore every
/// weight computed afterwards. Freeze the model before scoring.
#[derive(Debug, Clone)]
pub struct TermWeightModel<T: Tokenizer = WhitespaceTokenizer> {
    tokenizer: T,
    /// Fingerprint → position in `documents`.
    index: HashMap<Fingerprint, usize>,
    documents: Vec<TermCounts>,
    /// Term → number of absorbed documents containing it.
    document_frequencies: HashMap<String, usize>,
}

impl TermWeightModel<WhitespaceTokenizer> {
    /// Creates an empty model with the whitespace tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tokenizer(WhitespaceTokenizer)
    }
}

impl Default for TermWeightModel<WhitespaceTokenizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tokenizer> TermWeightModel<T> {
    /// Creates an empty model with a custom tokenizer.
    pub fn with_tokenizer(tokenizer: T) -> Self {
        Self {
            tokenizer,
            index: HashMap::new(),
            documents: Vec::new(),
            document_frequencies: HashMap::new(),
        }
    }

    /// Absorbs a document into the corpus.
    ///
    /// # Returns
    ///
    /// `true` if the document was absorbed, `false` if the same text was
    /// already present or the text produced no terms.
    pub fn add(&mut self, text: &str) -> bool {
        let fingerprint = Fingerprint::of(text);
        if self.index.contains_key(&fingerprint) {
            return false;
        }

        let counts = TermCounts::from_terms(self.tokenizer.tokenize(text));
        if counts.is_empty() {
            return false;
        }

        for term in counts.counts.keys() {
            *self.document_frequencies.entry(term.clone()).or_insert(0) += 1;
        }
        self.index.insert(fingerprint, self.documents.len());
        self.documents.push(counts);
        true
    }

    /// Absorbs every text in order, returning how many were new.
    pub fn extend<'a, I>(&mut self, texts: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().filter(|text| self.add(text)).count()
    }

    /// Computes the weight vector of a text against the current corpus.
    ///
    /// Absorbed text reuses its stored term counts; anything else is
    /// tokenized on the fly (and not absorbed). Subject to drift, see the
    /// type-level docs.
    #[must_use]
    pub fn weights(&self, text: &str) -> WeightVector {
        match self.index.get(&Fingerprint::of(text)) {
            Some(&position) => self.weigh(&self.documents[position]),
            None => self.weigh(&TermCounts::from_terms(self.tokenizer.tokenize(text))),
        }
    }

    /// Number of distinct documents absorbed (N).
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of absorbed documents containing a term.
    #[must_use]
    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequencies.get(term).copied().unwrap_or(0)
    }

    /// Checks whether this exact text has been absorbed.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.index.contains_key(&Fingerprint::of(text))
    }

    /// Number of distinct terms across the corpus.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.document_frequencies.len()
    }

    /// Smoothed inverse document frequency: `ln((1 + N) / (1 + df))`.
    #[must_use]
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.documents.len() as f64;
        let df = self.document_frequency(term) as f64;
        ((1.0 + n) / (1.0 + df)).ln()
    }

    /// Stops absorption and returns a model with stable weights.
    #[must_use]
    pub fn freeze(self) -> FrozenModel<T> {
        FrozenModel { inner: self }
    }

    fn weigh(&self, counts: &TermCounts) -> WeightVector {
        if counts.is_empty() {
            return WeightVector::new();
        }

        let total = counts.total as f64;
        counts
            .counts
            .iter()
            .map(|(term, &count)| (term.clone(), count as f64 / total * self.idf(term)))
            .filter(|(_, weight)| *weight != 0.0)
            .collect()
    }
}

/// A term-weight model that can no longer absorb documents.
///
/// Safe to share across threads; every query over the same text returns the
/// same vector.
#[derive(Debug, Clone)]
pub struct FrozenModel<T: Tokenizer = WhitespaceTokenizer> {
    inner: TermWeightModel<T>,
}

impl<T: Tokenizer> FrozenModel<T> {
    /// Computes the weight vector of a text against the frozen corpus.
    #[must_use]
    pub fn weights(&self, text: &str) -> WeightVector {
        self.inner.weights(text)
    }

    /// Number of distinct documents in the frozen corpus.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.inner.document_count()
    }

    /// Number of documents in the frozen corpus containing a term.
    #[must_use]
    pub fn document_frequency(&self, term: &str) -> usize {
        self.inner.document_frequency(term)
    }

    /// Checks whether this exact text is part of the frozen corpus.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.inner.contains(text)
    }

    /// Number of distinct terms across the frozen corpus.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.inner.vocabulary_size()
    }
}
