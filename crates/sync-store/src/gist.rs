//! GitHub Gist implementation of [`DocumentStore`].
//!
//! Uses the Gist REST API v3. A custom base URL covers GitHub Enterprise
//! installations (`https://host/api/v3`).

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::document::{RemoteDocument, RemoteFile};
use crate::error::{Error, Result};
use crate::store::DocumentStore;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// File used to seed a newly created gist; the store rejects empty gists.
const PLACEHOLDER_FILE: &str = "cloudSettings";

/// Connection settings for the Gist API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistConfig {
    /// Personal access token with the `gist` scope.
    pub token: String,
    /// API base URL without a trailing slash.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl GistConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
        }
    }

    /// Point the client at a self-hosted installation.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        let url = url.as_ref().trim().trim_end_matches('/');
        if !url.is_empty() {
            self.api_base_url = url.to_string();
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct GistOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    id: String,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    owner: Option<GistOwner>,
    #[serde(default)]
    files: BTreeMap<String, Option<RemoteFile>>,
}

#[derive(Debug, Deserialize)]
struct CreatedGist {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

/// Gist-backed document store.
pub struct GistClient {
    config: GistConfig,
    client: Client,
}

impl GistClient {
    /// Creates a new client. No request is made until the first call.
    pub fn new(config: GistConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("settings-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Resolve the login the token belongs to.
    pub async fn authenticated_user(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url("/user"))
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let user: UserResponse = check(response, None).await?.json().await?;
        info!(user = %user.login, "authenticated against gist store");
        Ok(user.login)
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        Ok(check(response, None).await?.text().await?)
    }
}

/// Map non-success statuses onto store errors.
async fn check(response: Response, id: Option<&str>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(Error::NotFound { id: id.to_string() }),
        (StatusCode::UNAUTHORIZED, _) => Err(Error::Unauthorized),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl DocumentStore for GistClient {
    async fn create_document(&self, public: bool, description: &str) -> Result<String> {
        let body = json!({
            "description": description,
            "public": public,
            "files": { PLACEHOLDER_FILE: { "content": "// Empty" } },
        });

        let response = self
            .client
            .post(self.url("/gists"))
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let created: CreatedGist = check(response, None).await?.json().await?;
        info!(gist = %created.id, public, "created gist");
        Ok(created.id)
    }

    async fn read_document(&self, id: &str) -> Result<RemoteDocument> {
        let response = self
            .client
            .get(self.url(&format!("/gists/{id}")))
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let gist: GistResponse = check(response, Some(id)).await?.json().await?;

        let mut files = BTreeMap::new();
        for (key, file) in gist.files {
            // Deleted slots come back as null
            let Some(mut file) = file else { continue };
            if file.truncated {
                if let Some(raw_url) = file.raw_url.clone() {
                    debug!(key = %key, "fetching truncated file body");
                    file.content = self.fetch_raw(&raw_url).await?;
                    file.truncated = false;
                }
            }
            files.insert(key, file);
        }

        debug!(gist = %gist.id, files = files.len(), "read gist");
        Ok(RemoteDocument {
            id: gist.id,
            owner: gist.owner.map(|o| o.login),
            public: gist.public,
            description: gist.description,
            files,
        })
    }

    async fn write_document(&self, id: &str, files: &BTreeMap<String, String>) -> Result<()> {
        let payload: serde_json::Map<String, serde_json::Value> = files
            .iter()
            .map(|(key, content)| (key.clone(), json!({ "content": content })))
            .collect();
        let body = json!({ "files": payload });

        let response = self
            .client
            .patch(self.url(&format!("/gists/{id}")))
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        check(response, Some(id)).await?;
        info!(gist = %id, files = files.len(), "saved gist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let config = GistConfig::new("t").with_base_url("https://ghe.local/api/v3/");
        assert_eq!(config.api_base_url, "https://ghe.local/api/v3");
    }

    #[test]
    fn blank_base_url_keeps_default() {
        let config = GistConfig::new("t").with_base_url("  ");
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }
}
