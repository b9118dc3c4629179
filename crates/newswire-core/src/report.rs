//! Report shapes produced by each run mode.
//!
//! These mirror the JSON layout consumers expect: documents grouped by
//! language, the list of news documents, documents per category, threads, and
//! ranked threads per category (with `"any"` for the global top list).

use crate::types::{Category, Document, Language, RankedThread, Thread};
use serde::{Deserialize, Serialize};

/// Category label used for the global top-story list.
pub const ANY_CATEGORY: &str = "any";

/// Document ids for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByLang {
    pub lang_code: String,
    pub articles: Vec<String>,
}

impl ByLang {
    /// Groups document ids by language, one entry per supported language.
    pub fn from_documents(documents: &[Document]) -> Vec<Self> {
        Language::ALL
            .iter()
            .map(|&language| Self {
                lang_code: language.code().to_string(),
                articles: documents
                    .iter()
                    .filter(|d| d.language == language)
                    .map(|d| d.id.to_string())
                    .collect(),
            })
            .collect()
    }
}

/// Ids of every document classified as news.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByNews {
    pub articles: Vec<String>,
}

impl ByNews {
    pub fn from_documents(documents: &[Document]) -> Self {
        Self {
            articles: documents
                .iter()
                .filter(|d| d.category.is_some())
                .map(|d| d.id.to_string())
                .collect(),
        }
    }
}

/// Document ids for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByCategory {
    pub category: String,
    pub articles: Vec<String>,
}

impl ByCategory {
    /// Groups classified documents by category.
    ///
    /// All seven categories are present, in id order, even when empty.
    /// Unclassified documents are left out.
    pub fn from_documents(documents: &[Document]) -> Vec<Self> {
        Category::ALL
            .iter()
            .map(|&category| Self {
                category: category.name().to_string(),
                articles: documents
                    .iter()
                    .filter(|d| d.category == Some(category))
                    .map(|d| d.id.to_string())
                    .collect(),
            })
            .collect()
    }
}

/// One thread: the lead's title and every member id, lead first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByThread {
    pub title: String,
    pub articles: Vec<String>,
}

impl From<&Thread> for ByThread {
    fn from(thread: &Thread) -> Self {
        Self {
            title: thread.title.clone(),
            articles: thread.members.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Ranked threads for one category, or for `"any"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByTop {
    pub category: String,
    pub threads: Vec<ByThread>,
}

impl ByTop {
    /// Builds the top-story report.
    ///
    /// The first entry is the global list (`"any"`); the remaining seven are
    /// the per-category lists in category id order. Both inputs are expected
    /// to be sorted already.
    pub fn from_ranked(global: &[RankedThread], by_category: &[(Category, Vec<RankedThread>)]) -> Vec<Self> {
        let mut report = Vec::with_capacity(1 + by_category.len());
        report.push(Self {
            category: ANY_CATEGORY.to_string(),
            threads: global.iter().map(|r| ByThread::from(&r.thread)).collect(),
        });
        for (category, ranked) in by_category {
            report.push(Self {
                category: category.name().to_string(),
                threads: ranked.iter().map(|r| ByThread::from(&r.thread)).collect(),
            });
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;

    fn doc(id: &str, language: Language, category: Option<Category>) -> Document {
        let mut d = Document::builder(id, language).build();
        d.category = category;
        d
    }

    fn thread(title: &str, members: &[&str], category: Category) -> Thread {
        Thread {
            language: Language::En,
            category,
            title: title.into(),
            members: members.iter().map(|m| DocumentId::from(*m)).collect(),
            keywords: vec![],
        }
    }

    #[test]
    fn by_lang_groups_both_languages() {
        let docs = vec![
            doc("a", Language::En, None),
            doc("b", Language::Ru, None),
            doc("c", Language::En, None),
        ];
        let report = ByLang::from_documents(&docs);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].lang_code, "en");
        assert_eq!(report[0].articles, vec!["a", "c"]);
        assert_eq!(report[1].articles, vec!["b"]);
    }

    #[test]
    fn by_news_skips_unclassified() {
        let docs = vec![
            doc("a", Language::En, Some(Category::Society)),
            doc("b", Language::En, None),
        ];
        assert_eq!(ByNews::from_documents(&docs).articles, vec!["a"]);
    }

    #[test]
    fn by_category_has_all_seven() {
        let docs = vec![
            doc("a", Language::En, Some(Category::Sports)),
            doc("b", Language::Ru, Some(Category::Sports)),
            doc("c", Language::En, None),
        ];
        let report = ByCategory::from_documents(&docs);

        assert_eq!(report.len(), 7);
        assert_eq!(report[3].category, "sports");
        assert_eq!(report[3].articles, vec!["a", "b"]);
        assert!(report[0].articles.is_empty());
    }

    #[test]
    fn by_top_puts_any_first() {
        let ranked = RankedThread {
            thread: thread("Cup final", &["x", "y"], Category::Sports),
            score: 0.8,
        };
        let report = ByTop::from_ranked(
            &[ranked.clone()],
            &[(Category::Sports, vec![ranked])],
        );

        assert_eq!(report[0].category, ANY_CATEGORY);
        assert_eq!(report[0].threads[0].title, "Cup final");
        assert_eq!(report[1].category, "sports");
        assert_eq!(report[1].threads[0].articles, vec!["x", "y"]);
    }

    #[test]
    fn json_field_names() {
        let json = serde_json::to_value(ByLang {
            lang_code: "en".into(),
            articles: vec!["a".into()],
        })
        .unwrap();
        assert_eq!(json["lang_code"], "en");
        assert_eq!(json["articles"][0], "a");
    }
}
