//! Schema bootstrap and connection setup.

use crate::error::Result;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS keywords (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS documents (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    summary     TEXT NOT NULL,
    link        TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id)
);

CREATE INDEX IF NOT EXISTS idx_documents_category ON documents(category_id);

CREATE TABLE IF NOT EXISTS document_keywords (
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    keyword_id  INTEGER NOT NULL REFERENCES keywords(id),
    PRIMARY KEY (document_id, keyword_id)
);

CREATE INDEX IF NOT EXISTS idx_document_keywords_keyword ON document_keywords(keyword_id);
";

/// Name of the SQL function used for case-insensitive matching. SQLite's own
/// `lower()` and `LIKE` only fold ASCII.
pub(crate) const CASEFOLD_FN: &str = "casefold";

pub(crate) fn configure(conn: &Connection, file_backed: bool) -> Result<()> {
    if file_backed {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
    }
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;

    conn.execute_batch(SCHEMA)?;
    Ok(())
}
