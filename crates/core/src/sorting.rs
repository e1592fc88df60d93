//! Client-chosen listing order (`?order_by=&order_dir=`).
//!
//! Each resource publishes the columns it may be ordered by. A [`Sort`] can
//! only be built from one of those names, which is what lets repositories
//! splice it into an `ORDER BY` clause.

use serde::Deserialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A validated ordering over a whitelisted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl Sort {
    /// `ORDER BY` body with `id` as tie-breaker in the same direction.
    pub fn to_sql(&self) -> String {
        let dir = self.direction.as_sql();
        if self.column == "id" {
            format!("id {dir}")
        } else {
            format!("{} {dir}, id {dir}", self.column)
        }
    }
}

/// Resolve the requested ordering against `sortable`.
///
/// No `order_by` keeps the listing's default order (`Ok(None)`), whatever
/// `direction` says. The direction defaults to descending.
pub fn resolve_sort(
    order_by: Option<&str>,
    direction: Option<SortDirection>,
    sortable: &[&'static str],
) -> Result<Option<Sort>, CoreError> {
    let Some(requested) = order_by else {
        return Ok(None);
    };

    let column = sortable
        .iter()
        .copied()
        .find(|column| *column == requested)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Cannot order by '{requested}'; expected one of: {}",
                sortable.join(", ")
            ))
        })?;

    Ok(Some(Sort {
        column,
        direction: direction.unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const COLUMNS: &[&str] = &["id", "title", "created_at"];

    #[test]
    fn absent_order_keeps_default() {
        assert_eq!(resolve_sort(None, Some(SortDirection::Asc), COLUMNS).unwrap(), None);
    }

    #[test]
    fn whitelisted_column_defaults_to_descending() {
        let sort = resolve_sort(Some("title"), None, COLUMNS).unwrap().unwrap();
        assert_eq!(sort.column, "title");
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(sort.to_sql(), "title DESC, id DESC");
    }

    #[test]
    fn id_ordering_has_no_tie_breaker() {
        let sort = resolve_sort(Some("id"), Some(SortDirection::Asc), COLUMNS)
            .unwrap()
            .unwrap();
        assert_eq!(sort.to_sql(), "id ASC");
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert_matches!(
            resolve_sort(Some("title; DROP TABLE forum_posts"), None, COLUMNS),
            Err(CoreError::Validation(msg)) if msg.contains("id, title, created_at")
        );
    }

    #[test]
    fn direction_parses_lowercase_only() {
        let asc: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(asc, SortDirection::Asc);
        assert!(serde_json::from_str::<SortDirection>("\"sideways\"").is_err());
    }
}
