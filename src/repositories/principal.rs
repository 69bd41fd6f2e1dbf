use std::collections::HashMap;

use subtle::ConstantTimeEq;

use crate::models::principal::{PrincipalRecord, Role};

/// The credential directory: username to principal record.
///
/// Built once at startup from configuration and read-only afterwards.
/// Replaceable by any identity provider that can answer `lookup`.
pub struct CredentialDirectory {
    principals: HashMap<String, PrincipalRecord>,
}

impl CredentialDirectory {
    /// Builds a directory from configured principal records.
    pub fn from_records(records: Vec<PrincipalRecord>) -> Self {
        let principals = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();
        Self { principals }
    }

    /// Looks up a principal by username.
    pub fn lookup(&self, username: &str) -> Option<&PrincipalRecord> {
        self.principals.get(username)
    }

    /// Verifies a presented secret and returns the principal's role.
    ///
    /// Returns `None` both for an unknown username and for a secret
    /// mismatch; the caller cannot tell which half failed. The comparison
    /// runs in constant time.
    pub fn verify(&self, username: &str, password: &str) -> Option<Role> {
        let record = self.lookup(username)?;
        let matches: bool = record
            .password
            .as_bytes()
            .ct_eq(password.as_bytes())
            .into();
        matches.then_some(record.role)
    }
}
