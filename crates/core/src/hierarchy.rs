//! Category hierarchy validation.
//!
//! Categories nest through a nullable parent reference. The parent chain of
//! every category must end at a root; a parent assignment that would make a
//! category its own ancestor is rejected.

use crate::error::CoreError;
use crate::types::DbId;

/// Deepest parent chain the repository walks before giving up.
pub const MAX_CATEGORY_DEPTH: i32 = 64;

/// Validate moving `category_id` under `proposed_parent`.
///
/// `parent_chain` is the chain of ids starting at the proposed parent and
/// walking up towards the root (as returned by the ancestor query). Moving to
/// the root (`None`) is always allowed.
pub fn validate_parent(
    category_id: DbId,
    proposed_parent: Option<DbId>,
    parent_chain: &[DbId],
) -> Result<(), CoreError> {
    let Some(parent_id) = proposed_parent else {
        return Ok(());
    };

    if parent_id == category_id {
        return Err(CoreError::Validation(
            "A category cannot be its own parent".into(),
        ));
    }

    if parent_chain.contains(&category_id) {
        return Err(CoreError::Validation(format!(
            "Category {parent_id} is a descendant of category {category_id}; \
             moving would create a cycle"
        )));
    }

    if parent_chain.len() >= MAX_CATEGORY_DEPTH as usize {
        return Err(CoreError::Validation(format!(
            "Category nesting may not exceed {MAX_CATEGORY_DEPTH} levels"
        )));
    }

    Ok(())
}
