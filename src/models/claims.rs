use serde::{Deserialize, Serialize};

use crate::models::principal::Role;

/// The signed payload of a session token.
///
/// Timestamps are Unix seconds. A token is valid only while `now < exp`;
/// there is no revoked state, so compromise mitigation relies solely on
/// the expiry window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the authenticated username).
    pub sub: String,
    /// The subject's role at issuance.
    pub role: Role,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expires at (Unix timestamp).
    pub exp: i64,
}
