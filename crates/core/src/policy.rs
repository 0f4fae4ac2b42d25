//! Access policy.
//!
//! The single permit/deny decision for a (role, allowed-role set) pair.
//! Pure and deterministic; everything else in the crate defers to this.

use crate::models::Role;

/// Returns whether a user with `role` may access a file restricted to
/// `allowed_roles`.
///
/// Admin is always permitted, including for an empty set. Every other role
/// must appear in the set.
pub fn permit(role: Role, allowed_roles: &[Role]) -> bool {
    match role {
        Role::Admin => true,
        Role::Manager | Role::Employee => allowed_roles.contains(&role),
    }
}
