//! Core data types for the newswire story engine.
//!
//! This module defines the fundamental types shared by every stage of the
//! pipeline:
//!
//! - Documents are plain-text news articles tagged with a language
//! - Each document is assigned at most one of seven fixed categories
//! - Documents sharing a (language, category) bucket are grouped into threads
//! - Threads are ranked against their category centroid
//!
//! All types derive `Debug`, `Clone`, `Serialize`, and `Deserialize` for
//! inspection, copying, and JSON serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Parse Errors
// ============================================================================

/// Error type for parsing languages and categories from strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The language code is not one of the supported languages.
    #[error("unsupported language code: {0}")]
    UnknownLanguage(String),

    /// The category name is not one of the seven categories.
    #[error("unknown category name: {0}")]
    UnknownCategory(String),
}

// ============================================================================
// ID Types
// ============================================================================

/// Stable identifier for a document.
///
/// In practice this is the base name of the file the document was read from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Creates a DocumentId from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Language and Category
// ============================================================================

/// The languages the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (`en`).
    En,
    /// Russian (`ru`).
    Ru,
}

impl Language {
    /// Every supported language, in centroid order.
    pub const ALL: [Language; 2] = [Language::En, Language::Ru];

    /// Returns the two-letter language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(ParseError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Topical category of a news document.
///
/// The numeric id (0..=6) is stable and used in reports; `-1` is reserved for
/// documents that were not classified as news (see [`Category::code_of`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Politics, elections, legislation, incidents, crime.
    Society,
    /// Markets, finance, business.
    Economy,
    /// Gadgets, auto, apps, internet services.
    Technology,
    /// Sports, including e-sports.
    Sports,
    /// Movies, music, games, books, arts.
    Entertainment,
    /// Health, biology, physics, genetics.
    Science,
    /// News that fits none of the above.
    Other,
}

impl Category {
    /// Every category in id order.
    pub const ALL: [Category; 7] = [
        Category::Society,
        Category::Economy,
        Category::Technology,
        Category::Sports,
        Category::Entertainment,
        Category::Science,
        Category::Other,
    ];

    /// Code used for documents without a category.
    pub const UNCLASSIFIED: i8 = -1;

    /// Returns the numeric id (0..=6).
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a category by its numeric id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Returns the lowercase report name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Society => "society",
            Self::Economy => "economy",
            Self::Technology => "technology",
            Self::Sports => "sports",
            Self::Entertainment => "entertainment",
            Self::Science => "science",
            Self::Other => "other",
        }
    }

    /// Maps an optional category to its report code, `-1` for `None`.
    #[must_use]
    pub fn code_of(category: Option<Self>) -> i8 {
        category.map_or(Self::UNCLASSIFIED, |c| c.id() as i8)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or(ParseError::UnknownCategory(lower))
    }
}

/// A (language, category) pair: the unit of thread clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    pub language: Language,
    pub category: Category,
}

impl BucketKey {
    #[must_use]
    pub const fn new(language: Language, category: Category) -> Self {
        Self { language, category }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.category)
    }
}

// ============================================================================
// Core Domain Types
// ============================================================================

/// A news document.
///
/// `text` is the normalized payload: title, description, body and source
/// name concatenated, whitespace-collapsed, with commas and periods removed.
/// The category starts out unset and is assigned once by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier (usually the source file name).
    pub id: DocumentId,

    /// Language of the document.
    pub language: Language,

    /// Display title, used as the thread title when this document leads.
    pub title: String,

    /// Normalized text payload.
    pub text: String,

    /// Assigned category, `None` while unclassified or below threshold.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Document {
    /// Creates a builder for constructing a Document.
    #[must_use]
    pub fn builder(id: impl Into<DocumentId>, language: Language) -> DocumentBuilder {
        DocumentBuilder {
            id: id.into(),
            language,
            title: String::new(),
            text: String::new(),
            category: None,
        }
    }

    /// Returns the report code of the category (`-1` when unclassified).
    #[must_use]
    pub fn category_code(&self) -> i8 {
        Category::code_of(self.category)
    }

    /// Returns the bucket this document clusters in, if it has a category.
    #[must_use]
    pub fn bucket(&self) -> Option<BucketKey> {
        self.category.map(|c| BucketKey::new(self.language, c))
    }
}

/// Builder for constructing Document instances.
#[derive(Debug)]
pub struct DocumentBuilder {
    id: DocumentId,
    language: Language,
    title: String,
    text: String,
    category: Option<Category>,
}

impl DocumentBuilder {
    /// Sets the display title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the normalized text payload.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Presets the category (mostly useful in tests).
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Builds the Document.
    #[must_use]
    pub fn build(self) -> Document {
        Document {
            id: self.id,
            language: self.language,
            title: self.title,
            text: self.text,
            category: self.category,
        }
    }
}

/// A group of documents reporting the same story.
///
/// Members are ordered by relevance; the first member is the lead and
/// supplies the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    /// Language of every member.
    pub language: Language,

    /// Category of every member.
    pub category: Category,

    /// Title of the lead document.
    pub title: String,

    /// Member identifiers, lead first.
    pub members: Vec<DocumentId>,

    /// Top terms of the thread's aggregate vector, most important first.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Thread {
    /// Returns the lead document id.
    #[must_use]
    pub fn lead(&self) -> Option<&DocumentId> {
        self.members.first()
    }

    /// Returns the number of member documents.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Checks if the thread has a single member.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Checks if the thread contains a specific document.
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.members.contains(id)
    }

    /// Returns the bucket this thread belongs to.
    #[must_use]
    pub fn bucket(&self) -> BucketKey {
        BucketKey::new(self.language, self.category)
    }
}

/// A thread annotated with its relevance to its category centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedThread {
    pub thread: Thread,

    /// Remapped cosine similarity in [0, 1].
    pub score: f64,
}

// ============================================================================
// Tests
// ============================================================================
