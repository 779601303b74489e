//! Role and ownership rules for profile operations.
//!
//! | Operation | Allowed for |
//! |-----------|-------------|
//! | list      | admin |
//! | view(id)  | admin, or the caller whose `user_id == id` |
//! | create    | admin |
//! | update(id)| admin, or owner |
//! | delete(id)| admin, or owner |

use crate::error::AccessError;
use gatehouse_core::{Identity, Role, UserId};
use std::fmt;

/// An operation on the profile collection, with its target where it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOperation {
    List,
    View(UserId),
    Create,
    Update(UserId),
    Delete(UserId),
}

impl fmt::Display for ProfileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileOperation::List => write!(f, "LIST"),
            ProfileOperation::View(id) => write!(f, "VIEW({id})"),
            ProfileOperation::Create => write!(f, "CREATE"),
            ProfileOperation::Update(id) => write!(f, "UPDATE({id})"),
            ProfileOperation::Delete(id) => write!(f, "DELETE({id})"),
        }
    }
}

/// Require `identity` to hold `role`.
pub fn require_role(identity: &Identity, role: Role) -> Result<&Identity, AccessError> {
    if identity.role == role {
        Ok(identity)
    } else {
        Err(AccessError::forbidden(format!(
            "Operation requires the {role} role"
        )))
    }
}

/// Allow admins, or the caller acting on their own record.
pub fn authorize_owner_or_admin(identity: &Identity, target: UserId) -> Result<(), AccessError> {
    if identity.is_admin() || identity.owns(target) {
        Ok(())
    } else {
        Err(AccessError::forbidden(
            "Not authorized to access this user's data",
        ))
    }
}

/// Apply the rule for `operation`.
pub fn authorize(identity: &Identity, operation: ProfileOperation) -> Result<(), AccessError> {
    let result = match operation {
        ProfileOperation::List => require_role(identity, Role::Admin)
            .map(|_| ())
            .map_err(|_| AccessError::forbidden("Only admins can list all users")),
        ProfileOperation::Create => require_role(identity, Role::Admin)
            .map(|_| ())
            .map_err(|_| AccessError::forbidden("Only admins can create users")),
        ProfileOperation::View(id) => authorize_owner_or_admin(identity, id),
        ProfileOperation::Update(id) => authorize_owner_or_admin(identity, id).map_err(|_| {
            AccessError::forbidden("Not authorized to update this user")
        }),
        ProfileOperation::Delete(id) => authorize_owner_or_admin(identity, id).map_err(|_| {
            AccessError::forbidden("Not authorized to delete this user")
        }),
    };

    if let Err(ref err) = result {
        tracing::warn!(
            subject = %identity.subject,
            user_id = identity.user_id,
            role = %identity.role,
            operation = %operation,
            reason = %err,
            "access denied"
        );
    }
    result
}
