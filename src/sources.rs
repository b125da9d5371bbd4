//! Citation formatting over retrieved source documents.

use std::collections::BTreeSet;

use crate::protocol::SourceDocument;

/// Reduce retrieved documents to a deterministic citation block.
///
/// Duplicate source identifiers collapse to one entry and the result is
/// ordered lexicographically, independent of retrieval order. Documents
/// without a source identifier contribute nothing. Returns the empty string
/// when no identifiers remain.
pub fn format_citations(documents: &[SourceDocument]) -> String {
    let sources: BTreeSet<&str> = documents
        .iter()
        .enumerate()
        .filter_map(|(index, doc)| match doc.metadata.source.as_deref() {
            Some(source) => Some(source),
            None => {
                tracing::warn!(index, "Retrieved document has no source identifier, skipped");
                None
            }
        })
        .collect();

    if sources.is_empty() {
        return String::new();
    }

    let mut block = String::from("sources:\n");
    for (i, source) in sources.iter().enumerate() {
        block.push_str(&format!("{}. {}\n", i + 1, source));
    }
    block
}
