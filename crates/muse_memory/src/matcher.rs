//! Keyword-overlap recall over stored records.
//!
//! Linear scan, no index: every record is scored against the query on every call.

use muse_core::Record;
use std::collections::BTreeSet;

/// Distinct lower-cased whitespace-separated words of `query`.
fn query_words(query: &str) -> BTreeSet<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of query words that occur (as substrings) in the record's prompt+output.
pub fn score(record: &Record, query: &str) -> usize {
    score_words(&record.haystack(), &query_words(query))
}

fn score_words(haystack: &str, words: &BTreeSet<String>) -> usize {
    words.iter().filter(|w| haystack.contains(w.as_str())).count()
}

/// Outputs of the `top_k` best-matching records, highest score first.
///
/// Records with no shared word are dropped. Equal scores keep insertion order.
pub fn search(records: &[Record], query: &str, top_k: usize) -> Vec<String> {
    let words = query_words(query);
    if words.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &Record)> = records
        .iter()
        .map(|r| (score_words(&r.haystack(), &words), r))
        .filter(|(s, _)| *s > 0)
        .collect();

    // sort_by is stable, so ties stay in insertion order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(top_k)
        .map(|(_, r)| r.output.clone())
        .collect()
}
