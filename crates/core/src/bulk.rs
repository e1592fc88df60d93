//! Bulk operations over a list of ids.
//!
//! A bulk request names one action from a closed set and the ids to apply it
//! to. Items are processed one at a time through the single-item operation;
//! an item the operation refuses (missing, forbidden, in conflict, invalid
//! for that item) is left out of the result instead of failing the whole
//! batch. Nothing is rolled back.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Request body for `POST /{resource}/bulk`.
///
/// ```json
/// { "action": "destroy", "items": [1, 2, 3], "force": false }
/// { "action": "restore", "items": [1, 2] }
/// { "action": "update",  "items": [4], "attributes": { "pinned": true } }
/// ```
#[derive(Debug, Deserialize)]
pub struct BulkRequest<U> {
    pub items: Vec<DbId>,
    #[serde(flatten)]
    pub action: BulkAction<U>,
}

impl<U> BulkRequest<U> {
    /// A bulk request must name at least one item.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.items.is_empty() {
            return Err(CoreError::Validation(
                "items must contain at least one id".into(),
            ));
        }
        Ok(())
    }
}

/// The operation applied to every item of a bulk request.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BulkAction<U> {
    Destroy {
        #[serde(default)]
        force: bool,
    },
    Restore,
    Update {
        attributes: U,
    },
}

impl<U> BulkAction<U> {
    /// Past-tense verb used in the summary message.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Destroy { force: true } => "permanently deleted",
            Self::Destroy { force: false } => "deleted",
            Self::Restore => "restored",
            Self::Update { .. } => "updated",
        }
    }
}

/// Whether a per-item failure is dropped from the result rather than
/// aborting the batch. Only internal failures abort.
pub fn is_skippable(err: &CoreError) -> bool {
    !matches!(err, CoreError::Internal(_))
}

/// Summary such as `"2 threads deleted"`.
pub fn summary(count: usize, singular: &str, plural: &str, verb: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun} {verb}")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    type Request = BulkRequest<serde_json::Value>;

    #[test]
    fn parses_destroy_with_default_force() {
        let req: Request = serde_json::from_value(json!({
            "action": "destroy",
            "items": [1, 2]
        }))
        .unwrap();
        assert_eq!(req.items, vec![1, 2]);
        assert_matches!(req.action, BulkAction::Destroy { force: false });
    }

    #[test]
    fn parses_forced_destroy() {
        let req: Request = serde_json::from_value(json!({
            "action": "destroy",
            "items": [3],
            "force": true
        }))
        .unwrap();
        assert_matches!(req.action, BulkAction::Destroy { force: true });
        assert_eq!(req.action.verb(), "permanently deleted");
    }

    #[test]
    fn parses_update_attributes() {
        let req: Request = serde_json::from_value(json!({
            "action": "update",
            "items": [4],
            "attributes": { "pinned": true }
        }))
        .unwrap();
        assert_matches!(req.action, BulkAction::Update { ref attributes } if attributes["pinned"] == true);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result: Result<Request, _> = serde_json::from_value(json!({
            "action": "explode",
            "items": [1]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_items_fail_validation() {
        let req: Request = serde_json::from_value(json!({
            "action": "restore",
            "items": []
        }))
        .unwrap();
        assert_matches!(req.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn skippable_errors() {
        assert!(is_skippable(&CoreError::NotFound {
            entity: "Thread",
            id: 1
        }));
        assert!(is_skippable(&CoreError::Forbidden("no".into())));
        assert!(is_skippable(&CoreError::Conflict("parent trashed".into())));
        assert!(is_skippable(&CoreError::Validation("own ancestor".into())));
        assert!(!is_skippable(&CoreError::Internal("boom".into())));
    }

    #[test]
    fn summary_pluralizes() {
        assert_eq!(summary(1, "thread", "threads", "deleted"), "1 thread deleted");
        assert_eq!(summary(0, "thread", "threads", "restored"), "0 threads restored");
        assert_eq!(summary(2, "post", "posts", "updated"), "2 posts updated");
    }
}
