//! Settings access rule

use crate::domain::Principal;

/// Whether `acting` may view or change the settings of `target_username`:
/// users may edit themselves, elevated roles may edit anyone.
pub fn can_edit(acting: &Principal, target_username: &str) -> bool {
    acting.username == target_username || acting.role.is_elevated()
}
