//! Role-based access policy
//!
//! Status reports are open to every signed-in role. Structural changes to
//! the bus list are reserved for admins and conductors.

use crate::core::data::Role;
use crate::utils::error::{AppError, AppResult};
use std::fmt;

/// Mutating operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateBus,
    EditBus,
    DeleteBus,
    UpdateStatus,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::CreateBus => "add buses",
            Action::EditBus => "edit buses",
            Action::DeleteBus => "delete buses",
            Action::UpdateStatus => "update bus status",
        };
        f.write_str(name)
    }
}

pub struct AccessPolicy;

impl AccessPolicy {
    pub fn can_mutate_bus_list(role: Role) -> bool {
        matches!(role, Role::Admin | Role::Conductor)
    }

    pub fn can_update_status(_role: Role) -> bool {
        true
    }

    pub fn permits(role: Role, action: Action) -> bool {
        match action {
            Action::CreateBus | Action::EditBus | Action::DeleteBus => {
                Self::can_mutate_bus_list(role)
            }
            Action::UpdateStatus => Self::can_update_status(role),
        }
    }

    pub fn authorize(role: Role, action: Action) -> AppResult<()> {
        if Self::permits(role, action) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "{} accounts cannot {}",
                role, action
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURAL: [Action; 3] = [Action::CreateBus, Action::EditBus, Action::DeleteBus];

    #[test]
    fn test_structural_edits_are_gated() {
        for action in STRUCTURAL {
            assert!(AccessPolicy::permits(Role::Admin, action));
            assert!(AccessPolicy::permits(Role::Conductor, action));
            assert!(!AccessPolicy::permits(Role::Passenger, action));
        }
    }

    #[test]
    fn test_everyone_reports_status() {
        for role in [Role::Admin, Role::Conductor, Role::Passenger] {
            assert!(AccessPolicy::can_update_status(role));
            assert!(AccessPolicy::authorize(role, Action::UpdateStatus).is_ok());
        }
    }

    #[test]
    fn test_authorize_message() {
        let err = AccessPolicy::authorize(Role::Passenger, Action::DeleteBus).unwrap_err();
        assert_eq!(
            err,
            AppError::Unauthorized("Passenger accounts cannot delete buses".to_string())
        );
    }
}
