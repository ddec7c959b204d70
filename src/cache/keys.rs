//! Cache Key Policy
//!
//! Deterministic key construction for the two cache key families: single
//! documents and parameterized list queries.

/// Key for a single cached document.
pub fn doc_key(id: &str) -> String {
    format!("doc:{}", id)
}

/// Key for a cached list query.
///
/// Components are joined with `:` and empty components are kept as empty
/// strings, so distinct requester/filter/limit tuples never collide. The
/// requester comes first, which puts every list key for a requester under
/// [`list_prefix`].
pub fn list_key(
    requester: &str,
    filter_login: &str,
    filter_key: &str,
    filter_value: &str,
    limit: usize,
) -> String {
    format!(
        "list:{}:{}:{}:{}:{}",
        requester, filter_login, filter_key, filter_value, limit
    )
}

/// Shared prefix of every list key produced for `requester`.
///
/// Deleting this prefix drops all of the requester's cached listings
/// without touching other requesters' entries or any `doc:` key.
pub fn list_prefix(requester: &str) -> String {
    format!("list:{}", requester)
}
