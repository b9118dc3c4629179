//! newswire-core: shared types for the newswire story engine
//!
//! - [`types`]: documents, languages, categories, threads
//! - [`report`]: serialisable report shapes for each run mode

pub mod report;
pub mod types;

pub use report::{ANY_CATEGORY, ByCategory, ByLang, ByNews, ByThread, ByTop};
pub use types::{
    BucketKey, Category, Document, DocumentBuilder, DocumentId, Language, ParseError,
    RankedThread, Thread,
};
