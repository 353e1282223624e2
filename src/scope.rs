use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Smartsheet OAuth2 permission scope.
///
/// The set is defined by the Smartsheet API; the wire name is the
/// upper-case form (`READ_SHEETS`, `ADMIN_USERS`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    ReadSheets,
    WriteSheets,
    ShareSheets,
    DeleteSheets,
    CreateSheets,
    ReadUsers,
    AdminUsers,
    AdminSheets,
    AdminWorkspaces,
    AdminWebhooks,
    ReadContacts,
    ReadEvents,
    CreateSights,
    ShareSights,
    DeleteSights,
    AdminSights,
}

impl Scope {
    /// Every scope, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::ReadSheets,
        Self::WriteSheets,
        Self::ShareSheets,
        Self::DeleteSheets,
        Self::CreateSheets,
        Self::ReadUsers,
        Self::AdminUsers,
        Self::AdminSheets,
        Self::AdminWorkspaces,
        Self::AdminWebhooks,
        Self::ReadContacts,
        Self::ReadEvents,
        Self::CreateSights,
        Self::ShareSights,
        Self::DeleteSights,
        Self::AdminSights,
    ];

    /// Wire name sent in the `scope` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadSheets => "READ_SHEETS",
            Self::WriteSheets => "WRITE_SHEETS",
            Self::ShareSheets => "SHARE_SHEETS",
            Self::DeleteSheets => "DELETE_SHEETS",
            Self::CreateSheets => "CREATE_SHEETS",
            Self::ReadUsers => "READ_USERS",
            Self::AdminUsers => "ADMIN_USERS",
            Self::AdminSheets => "ADMIN_SHEETS",
            Self::AdminWorkspaces => "ADMIN_WORKSPACES",
            Self::AdminWebhooks => "ADMIN_WEBHOOKS",
            Self::ReadContacts => "READ_CONTACTS",
            Self::ReadEvents => "READ_EVENTS",
            Self::CreateSights => "CREATE_SIGHTS",
            Self::ShareSights => "SHARE_SIGHTS",
            Self::DeleteSights => "DELETE_SIGHTS",
            Self::AdminSights => "ADMIN_SIGHTS",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown scope: {s}")))
    }
}
