//! Access-control predicate.
//!
//! Handlers never inspect roles directly; they ask an [`AccessPolicy`]
//! whether an actor may perform an [`Ability`] on a resource, passing the
//! resource owner when the resource has one. Deployments may supply their
//! own policy; [`RolePolicy`] is the built-in default.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The user a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

/// Things an actor may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    View,
    CreateCategory,
    CreateThread,
    ReplyToThread,
    Edit,
    Delete,
    Restore,
    ForceDelete,
    /// Pin threads and move them between categories.
    Moderate,
}

impl Ability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::CreateCategory => "create_category",
            Self::CreateThread => "create_thread",
            Self::ReplyToThread => "reply_to_thread",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::ForceDelete => "force_delete",
            Self::Moderate => "moderate",
        }
    }
}

/// Permission predicate consulted before every guarded operation.
pub trait AccessPolicy: Send + Sync {
    /// `owner_id` is the author of the resource, or `None` for resources
    /// without an owner (categories) and for creation checks.
    fn allows(&self, actor: Option<&Actor>, ability: Ability, owner_id: Option<DbId>) -> bool;
}

/// Default role-based policy.
///
/// | Actor       | Abilities |
/// |-------------|-----------|
/// | anonymous   | view |
/// | member      | view, create_thread, reply_to_thread, edit/delete own content |
/// | moderator   | member abilities + edit, delete, restore, force_delete, moderate on anything |
/// | admin       | everything |
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl AccessPolicy for RolePolicy {
    fn allows(&self, actor: Option<&Actor>, ability: Ability, owner_id: Option<DbId>) -> bool {
        let Some(actor) = actor else {
            return ability == Ability::View;
        };

        if actor.role == Role::Admin {
            return true;
        }

        let is_owner = owner_id == Some(actor.user_id);
        let is_moderator = actor.role == Role::Moderator;

        match ability {
            Ability::View | Ability::CreateThread | Ability::ReplyToThread => true,
            Ability::Edit | Ability::Delete => is_owner || is_moderator,
            Ability::Restore | Ability::ForceDelete | Ability::Moderate => is_moderator,
            Ability::CreateCategory => false,
        }
    }
}

/// Turn a policy decision into a result: anonymous denials are
/// `Unauthorized`, authenticated denials are `Forbidden`.
pub fn authorize(
    policy: &dyn AccessPolicy,
    actor: Option<&Actor>,
    ability: Ability,
    owner_id: Option<DbId>,
) -> Result<(), CoreError> {
    if policy.allows(actor, ability, owner_id) {
        return Ok(());
    }
    match actor {
        None => Err(CoreError::Unauthorized(format!(
            "Authentication required to {}",
            ability.as_str()
        ))),
        Some(_) => Err(CoreError::Forbidden(format!(
            "Not permitted to {}",
            ability.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    fn actor(user_id: DbId, role: Role) -> Actor {
        Actor { user_id, role }
    }

    #[test]
    fn anonymous_may_only_view() {
        let policy = RolePolicy;
        assert!(policy.allows(None, Ability::View, None));
        assert!(!policy.allows(None, Ability::ReplyToThread, None));
        assert!(!policy.allows(None, Ability::Edit, Some(1)));
    }

    #[test]
    fn member_edits_only_own_content() {
        let policy = RolePolicy;
        let member = actor(7, Role::Member);
        assert!(policy.allows(Some(&member), Ability::Edit, Some(7)));
        assert!(policy.allows(Some(&member), Ability::Delete, Some(7)));
        assert!(!policy.allows(Some(&member), Ability::Edit, Some(8)));
        assert!(!policy.allows(Some(&member), Ability::Edit, None));
        assert!(!policy.allows(Some(&member), Ability::Restore, Some(7)));
        assert!(!policy.allows(Some(&member), Ability::ForceDelete, Some(7)));
    }

    #[test]
    fn member_may_post() {
        let policy = RolePolicy;
        let member = actor(7, Role::Member);
        assert!(policy.allows(Some(&member), Ability::CreateThread, None));
        assert!(policy.allows(Some(&member), Ability::ReplyToThread, Some(99)));
        assert!(!policy.allows(Some(&member), Ability::CreateCategory, None));
    }

    #[test]
    fn moderator_manages_any_content_but_not_categories_creation() {
        let policy = RolePolicy;
        let moderator = actor(2, Role::Moderator);
        assert!(policy.allows(Some(&moderator), Ability::Edit, None));
        assert!(policy.allows(Some(&moderator), Ability::Restore, Some(9)));
        assert!(policy.allows(Some(&moderator), Ability::ForceDelete, Some(9)));
        assert!(!policy.allows(Some(&moderator), Ability::CreateCategory, None));
    }

    #[test]
    fn only_staff_may_moderate_threads() {
        let policy = RolePolicy;
        let owner = actor(7, Role::Member);
        assert!(!policy.allows(Some(&owner), Ability::Moderate, Some(7)));
        assert!(!policy.allows(None, Ability::Moderate, None));
        assert!(policy.allows(Some(&actor(2, Role::Moderator)), Ability::Moderate, Some(7)));
        assert!(policy.allows(Some(&actor(1, Role::Admin)), Ability::Moderate, None));
    }

    #[test]
    fn admin_may_do_everything() {
        let policy = RolePolicy;
        let admin = actor(1, Role::Admin);
        assert!(policy.allows(Some(&admin), Ability::CreateCategory, None));
        assert!(policy.allows(Some(&admin), Ability::ForceDelete, None));
    }

    #[test]
    fn authorize_distinguishes_anonymous_from_forbidden() {
        let policy = RolePolicy;
        assert_matches!(
            authorize(&policy, None, Ability::Edit, Some(1)),
            Err(CoreError::Unauthorized(_))
        );
        let member = actor(7, Role::Member);
        assert_matches!(
            authorize(&policy, Some(&member), Ability::Edit, Some(1)),
            Err(CoreError::Forbidden(msg)) if msg.contains("edit")
        );
        assert!(authorize(&policy, Some(&member), Ability::Edit, Some(7)).is_ok());
    }
}
