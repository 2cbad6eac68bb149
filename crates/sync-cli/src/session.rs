//! Resolved configuration shared by every command.

use sync_core::{Environment, SyncConfig};
use sync_fs::NormalizedPath;
use sync_store::{GistClient, GistConfig};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Tool configuration merged with command-line overrides.
pub struct Session {
    pub config_path: NormalizedPath,
    pub config: SyncConfig,
    pub env: Environment,
}

impl Session {
    /// Load `config.toml` and apply flags and environment variables on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => NormalizedPath::new(path),
            None => SyncConfig::default_path()?,
        };
        let mut config = SyncConfig::load(&config_path)?;
        debug!(path = %config_path, "loaded tool configuration");

        if let Some(token) = &cli.token {
            config.token = Some(token.clone());
        }
        if let Some(gist) = &cli.gist {
            config.gist = Some(gist.clone());
        }
        if let Some(dir) = &cli.user_dir {
            config.user_dir = Some(dir.clone());
        }

        let env = Environment::detect(config.user_dir.as_deref(), config.extensions_dir.as_deref())?;
        Ok(Self {
            config_path,
            config,
            env,
        })
    }

    pub fn save_config(&self) -> Result<()> {
        Ok(self.config.save(&self.config_path)?)
    }

    fn token(&self) -> Result<&str> {
        self.config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CliError::user(
                    "No GitHub token configured; run `settings-sync init --token <TOKEN>` or set SETTINGS_SYNC_TOKEN",
                )
            })
    }

    /// The gist id, or a user error explaining how to set one.
    pub fn require_gist(&self) -> Result<String> {
        self.config.gist_id().map(str::to_string).ok_or_else(|| {
            CliError::user("No gist configured; upload once or pass --gist <ID>")
        })
    }

    /// Build a Gist client from the configured token and endpoint.
    pub fn store(&self) -> Result<GistClient> {
        let mut gist_config = GistConfig::new(self.token()?);
        if let Some(url) = &self.config.github_enterprise_url {
            gist_config = gist_config.with_base_url(url);
        }
        Ok(GistClient::new(gist_config)?)
    }

    /// Login the token belongs to; `None` when it cannot be resolved.
    pub async fn identity(&self, client: &GistClient) -> Option<String> {
        match client.authenticated_user().await {
            Ok(login) => Some(login),
            Err(e) => {
                warn!(error = %e, "could not resolve the authenticated user; skipping ownership check");
                None
            }
        }
    }
}
