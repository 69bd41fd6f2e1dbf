use serde::{Deserialize, Serialize};

/// Coarse authorization label attached to every principal.
///
/// Currently informational: both roles may run any read query. The role
/// travels inside the session token so per-role statement restrictions
/// can be added later without changing the token format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Analyst,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Analyst => write!(f, "analyst"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// A principal in the credential directory.
///
/// Static, externally owned data: the directory is immutable for the
/// process lifetime and the secret is compared by exact equality at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalRecord {
    /// The principal's username.
    pub username: String,
    /// The principal's secret.
    pub password: String,
    /// The principal's role.
    pub role: Role,
}
