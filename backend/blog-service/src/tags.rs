//! Tag sequence helpers
//!
//! A post's tags keep insertion order and hold each value once (exact,
//! case-sensitive match). The global view across posts is a sorted set.

use std::collections::BTreeSet;

/// Append `tag` unless already present. Returns whether the sequence changed.
pub fn add_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    if tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Remove every occurrence of `tag`, keeping the order of the rest.
/// Returns whether the sequence changed.
pub fn remove_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

/// Union of all tag sequences, deduplicated and sorted lexicographically
pub fn union_sorted<'a, I>(sequences: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    sequences
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
