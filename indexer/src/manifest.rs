use crate::error::{IndexerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One document to ingest, naming its category and keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ManifestEntry {
    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        let required = [
            ("title", &self.title),
            ("link", &self.link),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(IndexerError::InvalidEntry {
                    index,
                    reason: format!("{field} is empty"),
                });
            }
        }

        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(IndexerError::InvalidEntry {
                index,
                reason: "keywords must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Read a JSON array of [`ManifestEntry`]
pub async fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let content = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&content)?)
}
