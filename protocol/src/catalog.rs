use serde::Deserialize;
use serde::Serialize;

/// Opaque key of a document record. Identity equality is the only thing
/// retrieval relies on.
pub type DocumentId = i64;

pub type CategoryId = i64;

pub type KeywordId = i64;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Keyword {
    pub id: KeywordId,
    pub name: String,
}

/// A catalog document as stored by the relational store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub category_id: CategoryId,
    /// Sorted ascending.
    #[serde(default)]
    pub keyword_ids: Vec<KeywordId>,
}

/// Insert payload for [`Document`]; the store assigns the identifier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub keyword_ids: Vec<KeywordId>,
}

impl NewDocument {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
        category_id: CategoryId,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            link: link.into(),
            category_id,
            keyword_ids: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keyword_ids: Vec<KeywordId>) -> Self {
        self.keyword_ids = keyword_ids;
        self
    }
}
