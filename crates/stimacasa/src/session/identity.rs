use std::fmt;

use serde::{Deserialize, Serialize};

/// Back-office role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
        }
    }

    fn from_backend_name(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match name {
            "ADMIN" | "AMMINISTRATORE" => Some(Role::Admin),
            "AGENT" | "AGENTE" => Some(Role::Agent),
            _ => None,
        }
    }

    /// Pick the role granted by the backend's role list; admin outranks agent.
    pub fn from_backend(roles: &[String]) -> Option<Self> {
        let granted: Vec<Role> = roles
            .iter()
            .filter_map(|role| Self::from_backend_name(role))
            .collect();
        if granted.contains(&Role::Admin) {
            Some(Role::Admin)
        } else {
            granted.first().copied()
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Logged-in user as mirrored into durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}
