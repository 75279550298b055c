//! Substring matching over title, summary and keyword names.

use crate::error::Result;
use crate::schema::CASEFOLD_FN;
use catalog_protocol::DocumentId;
use rusqlite::Transaction;
use rusqlite::params;
use std::collections::HashSet;

/// Match query over a JSON array of folded tokens bound to `?1`, limit
/// bound to `?2`. Tokens are rows of `json_each`, so the expression depth
/// stays the same for any token count. `instr()` makes every token a
/// literal, so `%`, `_` and `\` need no escaping.
fn match_sql() -> String {
    format!(
        "SELECT d.id FROM documents d \
         WHERE EXISTS ( \
             SELECT 1 FROM json_each(?1) t \
             WHERE instr({CASEFOLD_FN}(d.title), t.value) > 0 \
                OR instr({CASEFOLD_FN}(d.summary), t.value) > 0 \
                OR EXISTS ( \
                    SELECT 1 FROM document_keywords dk \
                    JOIN keywords k ON k.id = dk.keyword_id \
                    WHERE dk.document_id = d.id \
                      AND instr({CASEFOLD_FN}(k.name), t.value) > 0)) \
         ORDER BY d.id ASC \
         LIMIT ?2"
    )
}

/// Lowercased tokens, first occurrence kept.
fn fold_tokens(tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .map(|token| token.to_lowercase())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Identifiers of documents where any token occurs in any field, ascending,
/// each at most once, at most `limit` of them.
pub(crate) fn search(
    tx: &Transaction<'_>,
    tokens: &[String],
    limit: usize,
) -> Result<Vec<DocumentId>> {
    if tokens.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let folded = serde_json::to_string(&fold_tokens(tokens))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut stmt = tx.prepare(&match_sql())?;
    let ids = stmt
        .query_map(params![folded, limit], |row| row.get::<_, DocumentId>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_sql_does_not_grow_with_tokens() {
        let sql = match_sql();
        assert!(sql.contains("json_each(?1)"));
        assert!(sql.ends_with("LIMIT ?2"));
    }

    #[test]
    fn test_fold_tokens_lowercases_and_dedups() {
        let tokens: Vec<String> = ["Fox", "fox", "FOX", "Dynasty", "fox"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(fold_tokens(&tokens), vec!["fox".to_string(), "dynasty".to_string()]);
    }
}
