use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

use crate::models::principal::{PrincipalRecord, Role};

/// Default session token lifetime, in minutes.
const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 120;

/// The application's configuration.
///
/// Immutable after startup; everything the gateway holds across requests
/// is constructed from this.
#[derive(Clone)]
pub struct Config {
    /// Path to the SQLite database holding the survey dataset.
    pub database_path: PathBuf,
    /// The lifetime of an issued session token, in minutes.
    pub token_lifetime_minutes: i64,
    /// The secret used to sign session tokens.
    pub signing_secret: Zeroizing<Vec<u8>>,
    /// The credential directory contents.
    pub principals: Vec<PrincipalRecord>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let mut signing_secret_hex = env::var("SIGNING_SECRET")
            .context("SIGNING_SECRET must be set (generate with: openssl rand -hex 32)")?;

        let signing_secret_bytes = hex::decode(&signing_secret_hex)
            .context("SIGNING_SECRET must be valid hexadecimal")?;

        signing_secret_hex.zeroize();

        if signing_secret_bytes.len() < 32 {
            anyhow::bail!("SIGNING_SECRET must be at least 32 bytes (64 hex characters)");
        }

        Ok(Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "survey.db".to_string())
                .into(),
            token_lifetime_minutes: env::var("TOKEN_LIFETIME_MINUTES")
                .unwrap_or_else(|_| DEFAULT_TOKEN_LIFETIME_MINUTES.to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME_MINUTES")?,
            signing_secret: Zeroizing::new(signing_secret_bytes),
            principals: load_principals()?,
        })
    }
}

/// Loads the credential directory from `PRINCIPALS_FILE`, falling back to
/// the built-in demo directory.
fn load_principals() -> Result<Vec<PrincipalRecord>> {
    match env::var("PRINCIPALS_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read PRINCIPALS_FILE at {}", path))?;
            let principals: Vec<PrincipalRecord> = sonic_rs::from_str(&raw)
                .with_context(|| format!("PRINCIPALS_FILE at {} is not a valid principal list", path))?;
            if principals.is_empty() {
                anyhow::bail!("PRINCIPALS_FILE must contain at least one principal");
            }
            Ok(principals)
        }
        Err(_) => Ok(demo_principals()),
    }
}

/// The demo credential directory the service ships with.
pub fn demo_principals() -> Vec<PrincipalRecord> {
    vec![
        PrincipalRecord {
            username: "analyst".to_string(),
            password: "analyst123".to_string(),
            role: Role::Analyst,
        },
        PrincipalRecord {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
        },
    ]
}
