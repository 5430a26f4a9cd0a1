//! Authenticated identity and the closed role set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Closed set. Behaviour never branches on the concrete role beyond
/// [`Role::is_privileged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(alias = "user")]
    Member,
    Admin,
}

impl Role {
    /// Single source of truth for elevated access.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user's profile, held for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account id (`_id` on the wire for some backends).
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}
