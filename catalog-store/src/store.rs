use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::schema;
use crate::textual;
use catalog_protocol::{
    Category, CategoryId, Document, DocumentId, Keyword, KeywordId, NewDocument,
};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params, params_from_iter};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Keeps `IN (...)` lists well under SQLite's bound-parameter limit.
const ID_BATCH: usize = 500;

const DOCUMENT_COLUMNS: &str = "id, title, summary, link, category_id";

/// SQLite-backed catalog of categories, keywords and documents.
///
/// Every operation runs in its own [`CatalogStore::session`].
#[derive(Clone)]
pub struct CatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// Open (and bootstrap if needed) the database at `config.path`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.path.as_path();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening catalog store at {}", path.display());
        let conn = Connection::open(path)?;
        schema::configure(&conn, true)?;
        Ok(Self::from_connection(conn))
    }

    /// Fresh private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::configure(&conn, false)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` inside a transaction holding the connection. The transaction
    /// commits when `f` returns `Ok` and rolls back otherwise; the connection
    /// is released on every path.
    pub fn session<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    // Categories

    /// Get-or-create a category by name
    pub fn create_category(&self, name: &str) -> Result<Category> {
        self.session(|tx| {
            tx.execute("INSERT OR IGNORE INTO categories (name) VALUES (?1)", [name])?;
            let category = tx.query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                [name],
                category_from_row,
            )?;
            Ok(category)
        })
    }

    pub fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.session(|tx| {
            Ok(tx
                .query_row(
                    "SELECT id, name FROM categories WHERE name = ?1",
                    [name],
                    category_from_row,
                )
                .optional()?)
        })
    }

    pub fn get_category_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        self.session(|tx| {
            Ok(tx
                .query_row(
                    "SELECT id, name FROM categories WHERE id = ?1",
                    [id],
                    category_from_row,
                )
                .optional()?)
        })
    }

    pub fn get_categories(&self) -> Result<Vec<Category>> {
        self.session(|tx| {
            let mut stmt = tx.prepare("SELECT id, name FROM categories ORDER BY id")?;
            let categories = stmt
                .query_map([], category_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories)
        })
    }

    // Keywords

    /// Get-or-create a keyword by name
    pub fn create_keyword(&self, name: &str) -> Result<Keyword> {
        self.session(|tx| {
            tx.execute("INSERT OR IGNORE INTO keywords (name) VALUES (?1)", [name])?;
            let keyword = tx.query_row(
                "SELECT id, name FROM keywords WHERE name = ?1",
                [name],
                keyword_from_row,
            )?;
            Ok(keyword)
        })
    }

    pub fn get_keyword_by_name(&self, name: &str) -> Result<Option<Keyword>> {
        self.session(|tx| {
            Ok(tx
                .query_row(
                    "SELECT id, name FROM keywords WHERE name = ?1",
                    [name],
                    keyword_from_row,
                )
                .optional()?)
        })
    }

    pub fn get_keyword_by_id(&self, id: KeywordId) -> Result<Option<Keyword>> {
        self.session(|tx| {
            Ok(tx
                .query_row(
                    "SELECT id, name FROM keywords WHERE id = ?1",
                    [id],
                    keyword_from_row,
                )
                .optional()?)
        })
    }

    pub fn get_keywords(&self) -> Result<Vec<Keyword>> {
        self.session(|tx| {
            let mut stmt = tx.prepare("SELECT id, name FROM keywords ORDER BY id")?;
            let keywords = stmt
                .query_map([], keyword_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(keywords)
        })
    }

    /// All requested keywords, ascending by id. Fails with
    /// [`StoreError::KeywordsNotFound`] if any id is unknown.
    pub fn get_keywords_by_ids(&self, ids: &[KeywordId]) -> Result<Vec<Keyword>> {
        let wanted: BTreeSet<KeywordId> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        self.session(|tx| {
            let wanted: Vec<KeywordId> = wanted.into_iter().collect();
            let mut keywords = Vec::with_capacity(wanted.len());
            for batch in wanted.chunks(ID_BATCH) {
                let sql = format!(
                    "SELECT id, name FROM keywords WHERE id IN ({}) ORDER BY id",
                    placeholders(batch.len())
                );
                let mut stmt = tx.prepare(&sql)?;
                let found = stmt
                    .query_map(params_from_iter(batch.iter()), keyword_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                keywords.extend(found);
            }

            if keywords.len() != wanted.len() {
                let found: BTreeSet<KeywordId> = keywords.iter().map(|k| k.id).collect();
                let missing = wanted
                    .into_iter()
                    .filter(|id| !found.contains(id))
                    .collect();
                return Err(StoreError::KeywordsNotFound(missing));
            }
            Ok(keywords)
        })
    }

    // Documents

    /// Insert a document and its keyword links. The category and every
    /// keyword must already exist.
    pub fn create_document(&self, new: &NewDocument) -> Result<Document> {
        let keyword_ids: BTreeSet<KeywordId> = new.keyword_ids.iter().copied().collect();

        self.session(|tx| {
            let category_exists = tx
                .query_row(
                    "SELECT 1 FROM categories WHERE id = ?1",
                    [new.category_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !category_exists {
                return Err(StoreError::CategoryNotFound(new.category_id));
            }

            let mut missing = Vec::new();
            for keyword_id in &keyword_ids {
                let exists = tx
                    .query_row("SELECT 1 FROM keywords WHERE id = ?1", [keyword_id], |_| {
                        Ok(())
                    })
                    .optional()?
                    .is_some();
                if !exists {
                    missing.push(*keyword_id);
                }
            }
            if !missing.is_empty() {
                return Err(StoreError::KeywordsNotFound(missing));
            }

            tx.execute(
                "INSERT INTO documents (title, summary, link, category_id) VALUES (?1, ?2, ?3, ?4)",
                params![new.title, new.summary, new.link, new.category_id],
            )?;
            let id = tx.last_insert_rowid();

            let mut link_stmt = tx.prepare(
                "INSERT INTO document_keywords (document_id, keyword_id) VALUES (?1, ?2)",
            )?;
            for keyword_id in &keyword_ids {
                link_stmt.execute(params![id, keyword_id])?;
            }

            debug!("Created document {id} '{}'", new.title);
            Ok(Document {
                id,
                title: new.title.clone(),
                summary: new.summary.clone(),
                link: new.link.clone(),
                category_id: new.category_id,
                keyword_ids: keyword_ids.into_iter().collect(),
            })
        })
    }

    /// Delete a document; its keyword links go with it
    pub fn delete_document(&self, id: DocumentId) -> Result<()> {
        self.session(|tx| {
            let deleted = tx.execute("DELETE FROM documents WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::DocumentNotFound(id));
            }
            Ok(())
        })
    }

    pub fn get_document(&self, id: DocumentId) -> Result<Option<Document>> {
        let mut documents = self.get_documents_by_ids(&[id])?;
        Ok(documents.pop())
    }

    /// Documents of one category, ascending by id
    pub fn get_documents_by_category(&self, category_id: CategoryId) -> Result<Vec<Document>> {
        self.session(|tx| {
            let sql =
                format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE category_id = ?1 ORDER BY id");
            let mut stmt = tx.prepare(&sql)?;
            let documents = stmt
                .query_map([category_id], document_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            attach_keywords(tx, documents)
        })
    }

    /// Batch fetch by identifier. Unknown identifiers are skipped and the
    /// result order is unspecified.
    pub fn get_documents_by_ids(&self, ids: &[DocumentId]) -> Result<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.session(|tx| {
            let mut documents = Vec::with_capacity(ids.len());
            for batch in ids.chunks(ID_BATCH) {
                let sql = format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id IN ({})",
                    placeholders(batch.len())
                );
                let mut stmt = tx.prepare(&sql)?;
                let found = stmt
                    .query_map(params_from_iter(batch.iter()), document_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                documents.extend(found);
            }
            attach_keywords(tx, documents)
        })
    }

    /// Every document, ascending by id
    pub fn all_documents(&self) -> Result<Vec<Document>> {
        self.session(|tx| {
            let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id");
            let mut stmt = tx.prepare(&sql)?;
            let documents = stmt
                .query_map([], document_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            attach_keywords(tx, documents)
        })
    }

    pub fn count_documents(&self) -> Result<usize> {
        self.session(|tx| {
            let count: i64 = tx.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
    }

    /// Case-insensitive substring search; see [`crate::DocumentStore`]
    pub fn search_documents_textual(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<DocumentId>> {
        if tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let ids = self.session(|tx| textual::search(tx, tokens, limit))?;
        debug!("Textual match for {tokens:?} returned {} ids", ids.len());
        Ok(ids)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn keyword_from_row(row: &Row<'_>) -> rusqlite::Result<Keyword> {
    Ok(Keyword {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        link: row.get(3)?,
        category_id: row.get(4)?,
        keyword_ids: Vec::new(),
    })
}

fn attach_keywords(tx: &Transaction<'_>, mut documents: Vec<Document>) -> Result<Vec<Document>> {
    if documents.is_empty() {
        return Ok(documents);
    }

    let ids: Vec<DocumentId> = documents.iter().map(|d| d.id).collect();
    let mut links: HashMap<DocumentId, Vec<KeywordId>> = HashMap::new();
    for batch in ids.chunks(ID_BATCH) {
        let sql = format!(
            "SELECT document_id, keyword_id FROM document_keywords \
             WHERE document_id IN ({}) ORDER BY document_id, keyword_id",
            placeholders(batch.len())
        );
        let mut stmt = tx.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(batch.iter()), |row| {
            Ok((row.get::<_, DocumentId>(0)?, row.get::<_, KeywordId>(1)?))
        })?;
        for row in rows {
            let (document_id, keyword_id) = row?;
            links.entry(document_id).or_default().push(keyword_id);
        }
    }

    for document in &mut documents {
        if let Some(keyword_ids) = links.remove(&document.id) {
            document.keyword_ids = keyword_ids;
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_rolls_back_on_error() {
        let store = CatalogStore::open_in_memory().unwrap();

        let result: Result<()> = store.session(|tx| {
            tx.execute("INSERT INTO categories (name) VALUES ('History')", [])?;
            Err(StoreError::CategoryNotFound(42))
        });
        assert!(result.is_err());

        assert_eq!(store.get_categories().unwrap(), vec![]);
        // the connection was released and is usable again
        assert_eq!(store.create_category("History").unwrap().name, "History");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(1), "?");
    }
}
