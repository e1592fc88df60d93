//! Forum roles carried in the identity token's `role` claim.
//!
//! Tokens naming any other role do not deserialize, so an unknown role never
//! reaches the access policy.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_MEMBER: &str = "member";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Moderator => ROLE_MODERATOR,
            Self::Member => ROLE_MEMBER,
        }
    }

    /// Admins and moderators.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Moderator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_claim_names() {
        assert_eq!(serde_json::to_string(&Role::Moderator).unwrap(), "\"moderator\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
        assert!(serde_json::from_str::<Role>("\"Admin\"").is_err());
    }

    #[test]
    fn staff_roles() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Moderator.is_staff());
        assert!(!Role::Member.is_staff());
    }
}
