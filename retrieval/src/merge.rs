//! Priority merge of semantic and textual identifier lists.
//!
//! Semantic ids come first in their own order, then textual ids that were
//! not seen yet, then the whole list is cut to `limit`. Nothing is scored or
//! interleaved, so identical inputs always give identical output.

use crate::result::SearchSource;
use catalog_protocol::DocumentId;
use log::debug;
use std::collections::HashSet;

/// Merge two ranked id lists, remembering which list each id came from
pub fn merge_ranked(
    semantic: &[DocumentId],
    textual: &[DocumentId],
    limit: usize,
) -> Vec<(DocumentId, SearchSource)> {
    if limit == 0 {
        return Vec::new();
    }

    let mut seen: HashSet<DocumentId> = HashSet::with_capacity(semantic.len() + textual.len());
    let mut merged = Vec::with_capacity(limit.min(semantic.len() + textual.len()));

    let candidates = semantic
        .iter()
        .map(|id| (*id, SearchSource::Semantic))
        .chain(textual.iter().map(|id| (*id, SearchSource::Textual)));

    for (id, source) in candidates {
        if merged.len() == limit {
            break;
        }
        if seen.insert(id) {
            merged.push((id, source));
        }
    }

    debug!(
        "Merged {} semantic + {} textual into {} ids (limit {limit})",
        semantic.len(),
        textual.len(),
        merged.len()
    );
    merged
}

/// Merge two ranked id lists into one deduplicated list of at most `limit`
pub fn merge(semantic: &[DocumentId], textual: &[DocumentId], limit: usize) -> Vec<DocumentId> {
    merge_ranked(semantic, textual, limit)
        .into_iter()
        .map(|(id, _)| id)
        .collect()
}
