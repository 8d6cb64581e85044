use std::fmt;

use serde::{Deserialize, Serialize};

/// Access tier assigned to a user account. Stored as a plain string column;
/// anything that does not parse into this enum carries zero permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Normal,
    Admin,
}

/// Named capability checked before an action proceeds. Closed vocabulary;
/// unknown permission strings are denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    UpdateOwnPassword,
    UpdateUserPassword,
    AccessAdmin,
    AccessItdb,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "normal" => Some(Role::Normal),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::Admin => "admin",
        }
    }

    /// Decides whether this role may perform the given action.
    /// Total over the role x permission product.
    #[must_use]
    pub const fn authorize(self, permission: Permission) -> bool {
        match (self, permission) {
            (Role::Normal, Permission::UpdateOwnPassword) => true,
            (Role::Normal, _) => false,
            (Role::Admin, _) => true,
        }
    }

    /// Brief description of the tier, shown on the account page.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Role::Normal => {
                "Common user, allowed to access most features that do not involve user or system management"
            }
            Role::Admin => {
                "Powerful user with extended privileges, able to manage other users and subsystems"
            }
        }
    }
}

impl Permission {
    pub fn parse(s: &str) -> Option<Permission> {
        match s {
            "update_own_password" => Some(Permission::UpdateOwnPassword),
            "update_user_password" => Some(Permission::UpdateUserPassword),
            "access_admin" => Some(Permission::AccessAdmin),
            "access_itdb" => Some(Permission::AccessItdb),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::UpdateOwnPassword => "update_own_password",
            Permission::UpdateUserPassword => "update_user_password",
            Permission::AccessAdmin => "access_admin",
            Permission::AccessItdb => "access_itdb",
        }
    }
}

/// String front door for the policy table. Both sides are parsed first, so
/// an unrecognized permission or usergroup denies rather than panics.
#[must_use]
pub fn authorize(permission: &str, usergroup: &str) -> bool {
    match (Permission::parse(permission), Role::parse(usergroup)) {
        (Some(permission), Some(role)) => role.authorize(permission),
        _ => false,
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
