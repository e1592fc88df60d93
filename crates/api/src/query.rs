//! Shared query parameter types for API handlers.

use forum_core::error::CoreError;
use forum_core::sorting::{resolve_sort, Sort, SortDirection};
use serde::Deserialize;
use validator::Validate;

/// Listing parameters (`?page=&with_trashed=&order_by=&order_dir=`).
///
/// The page size is not client-controlled; it comes from configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    /// Include soft-deleted rows (requires the `restore` ability).
    #[serde(default)]
    pub with_trashed: bool,
    /// Column to order by; must be one of the resource's sortable columns.
    pub order_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order_dir: Option<SortDirection>,
}

impl ListParams {
    /// The requested ordering, checked against `sortable`.
    pub fn sort(&self, sortable: &[&'static str]) -> Result<Option<Sort>, CoreError> {
        resolve_sort(self.order_by.as_deref(), self.order_dir, sortable)
    }
}

/// Plain pagination (`?page=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

/// Post search parameters (`?q=&page=`).
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, max = 255))]
    pub q: String,
    pub page: Option<i64>,
}

/// Single-resource lookup parameters (`?with_trashed=`).
#[derive(Debug, Default, Deserialize)]
pub struct TrashedParams {
    #[serde(default)]
    pub with_trashed: bool,
}

/// Parameters for `DELETE /{resource}/{id}` (`?force=1`).
#[derive(Debug, Default, Deserialize)]
pub struct DestroyParams {
    pub force: Option<String>,
}

impl DestroyParams {
    /// `force=1` or `force=true` requests a permanent delete.
    pub fn is_forced(&self) -> bool {
        matches!(self.force.as_deref(), Some("1") | Some("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_flag_values() {
        let forced = |v: Option<&str>| DestroyParams {
            force: v.map(str::to_string),
        }
        .is_forced();
        assert!(forced(Some("1")));
        assert!(forced(Some("true")));
        assert!(!forced(Some("0")));
        assert!(!forced(Some("yes")));
        assert!(!forced(None));
    }

    #[test]
    fn sort_is_checked_against_columns() {
        let params = ListParams {
            order_by: Some("title".to_string()),
            order_dir: Some(SortDirection::Asc),
            ..ListParams::default()
        };
        let sort = params.sort(&["id", "title"]).unwrap().unwrap();
        assert_eq!(sort.to_sql(), "title ASC, id ASC");
        assert!(params.sort(&["id"]).is_err());
    }

    #[test]
    fn search_term_length_is_bounded() {
        let search = |q: &str| SearchParams {
            q: q.to_string(),
            page: None,
        };
        assert!(search("rust").validate().is_ok());
        assert!(search("").validate().is_err());
        assert!(search(&"x".repeat(256)).validate().is_err());
    }
}
