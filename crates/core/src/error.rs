//! Domain errors raised by forum operations.
//!
//! The HTTP layer maps each variant to one status code; callers pick the
//! variant by what went wrong, not by the response they want.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The row does not exist, was force-deleted, or is trashed and the
    /// caller did not ask for trashed rows.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that is well-formed but breaks a domain rule (e.g. a category
    /// parent cycle, an empty bulk item list).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation clashes with the state of a related row (e.g. restoring
    /// a thread whose category is still trashed).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No identity was presented, or the token did not verify.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The access policy refused the actor.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Thread",
            id: 12,
        };
        assert_eq!(err.to_string(), "Entity not found: Thread with id 12");
    }
}
