//! Account-management invariants.
//!
//! Role edits and account deletion are management-only operations elsewhere;
//! these checks protect the club from locking itself out regardless of who
//! calls them.

use crate::error::{CoreError, CoreResult};
use crate::roles::Role;

/// Validate replacing a user's role set with `new_roles`.
///
/// - the new set must be non-empty and free of duplicates;
/// - `management` can never be removed from a holder.
pub fn validate_role_update(current_roles: &[Role], new_roles: &[Role]) -> CoreResult<()> {
    if new_roles.is_empty() {
        return Err(CoreError::Validation(
            "a user must hold at least one role".into(),
        ));
    }
    for (i, role) in new_roles.iter().enumerate() {
        if new_roles[..i].contains(role) {
            return Err(CoreError::Validation(format!(
                "duplicate role '{role}' in role set"
            )));
        }
    }
    if current_roles.contains(&Role::Management) && !new_roles.contains(&Role::Management) {
        return Err(CoreError::Forbidden(
            "the management role cannot be removed from a management account".into(),
        ));
    }
    Ok(())
}

/// Validate deleting a user account. Management holders cannot be deleted.
pub fn validate_user_delete(target_roles: &[Role]) -> CoreResult<()> {
    if target_roles.contains(&Role::Management) {
        return Err(CoreError::Forbidden(
            "management accounts cannot be deleted".into(),
        ));
    }
    Ok(())
}
