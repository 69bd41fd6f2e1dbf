use std::sync::Arc;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::Result;
use crate::repositories::principal::CredentialDirectory;
use crate::services::sandbox::QuerySandbox;
use crate::services::token::TokenService;

/// The application's state.
///
/// Everything here is immutable after startup. The gateway is a stateless
/// request/response service with no cross-request session state, so clones
/// are cheap and no locking is needed.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The credential directory.
    pub directory: Arc<CredentialDirectory>,
    /// The session token service.
    pub tokens: TokenService,
    /// The query sandbox.
    pub sandbox: QuerySandbox,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let directory = Arc::new(CredentialDirectory::from_records(config.principals.clone()));
        tracing::info!("✅ Credential directory loaded");

        let tokens = TokenService::new(
            config.signing_secret.clone(),
            config.token_lifetime_minutes,
            Arc::new(SystemClock),
        );
        tracing::info!(
            "✅ Token service initialized (lifetime: {} minutes)",
            config.token_lifetime_minutes
        );

        let sandbox = QuerySandbox::new(&config.database_path);
        tracing::info!(
            "✅ Query sandbox initialized over {}",
            config.database_path.display()
        );

        Ok(AppState {
            config: config.clone(),
            directory,
            tokens,
            sandbox,
        })
    }
}
