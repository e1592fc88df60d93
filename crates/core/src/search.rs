//! Post search terms.
//!
//! User input is reduced to plain word terms before it becomes a PostgreSQL
//! `tsquery`, so operators typed by the user (`|`, `!`, `:*`, quotes) cannot
//! alter the query.

/// Alphanumeric runs of `query`; everything else separates terms.
fn terms(query: &str) -> Vec<&str> {
    query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|word| !word.is_empty())
        .collect()
}

/// Build a `tsquery` that requires every term, the last one as a prefix.
///
/// Returns `None` when the input holds no searchable word.
///
/// ```
/// use forum_core::search::post_tsquery;
/// assert_eq!(post_tsquery("rust"), Some("rust:*".to_string()));
/// assert_eq!(post_tsquery("borrow check"), Some("borrow & check:*".to_string()));
/// assert_eq!(post_tsquery(" !! "), None);
/// ```
pub fn post_tsquery(query: &str) -> Option<String> {
    let terms = terms(query);
    let (last, rest) = terms.split_last()?;
    let mut parts: Vec<String> = rest.iter().map(|term| term.to_string()).collect();
    parts.push(format!("{last}:*"));
    Some(parts.join(" & "))
}
