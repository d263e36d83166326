//! Role model and authorization predicates.
//!
//! Roles are a closed enum rather than free-form strings so that every
//! permission check is exhaustive and a typo cannot silently grant or deny
//! access. An actor may hold several roles at once (e.g. both `management`
//! and `trainer`); predicates therefore operate on role slices.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A role held by a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Customer / club member.
    User,
    /// Applied as a trainer, awaiting management approval.
    TrainerPending,
    /// Approved coach who can own bookings.
    Trainer,
    /// Front-desk staff who settle payments.
    Cashier,
    /// Admin console access.
    Admin,
    /// Superuser. Can assign and revoke any role, but `management` can
    /// never be stripped from a holder (lockout protection).
    Management,
}

impl Role {
    /// Canonical wire/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::TrainerPending => "trainer_pending",
            Role::Trainer => "trainer",
            Role::Cashier => "cashier",
            Role::Admin => "admin",
            Role::Management => "management",
        }
    }

    /// Parse a stored role name. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "trainer_pending" => Some(Role::TrainerPending),
            "trainer" => Some(Role::Trainer),
            "cashier" => Some(Role::Cashier),
            "admin" => Some(Role::Admin),
            "management" => Some(Role::Management),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor attempting an operation.
///
/// Roles must come from the latest fetched user record, never from a cached
/// session snapshot or token claims.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: DbId,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: DbId, roles: Vec<Role>) -> Self {
        Self { id, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        has_role(&self.roles, role)
    }
}

/// True if `role` is in the role set.
pub fn has_role(roles: &[Role], role: Role) -> bool {
    roles.contains(&role)
}

/// Role assignment and revocation, and hard-deleting bookings, require
/// management.
pub fn can_manage_roles(roles: &[Role]) -> bool {
    has_role(roles, Role::Management)
}

/// Admin console access.
pub fn can_access_admin_console(roles: &[Role]) -> bool {
    has_role(roles, Role::Admin) || has_role(roles, Role::Management)
}

/// Settling a booking's payment at the front desk.
pub fn can_settle_payment(roles: &[Role]) -> bool {
    has_role(roles, Role::Cashier) || can_access_admin_console(roles)
}

/// True if the actor is the approved trainer who owns the booking.
pub fn can_act_as_trainer_for(actor: &Actor, booking_trainer_id: DbId) -> bool {
    actor.has_role(Role::Trainer) && actor.id == booking_trainer_id
}
