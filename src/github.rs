//! GitHub repository access
//!
//! Downloads repository contents through the GitHub REST contents API and
//! retrieves README text through the dedicated readme endpoint. Every
//! failure is a `GithubError`; callers treat them per-repository rather
//! than as fatal.

use crate::config::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

const API_BASE: &str = "https://api.github.com";

/// Errors that can occur during GitHub operations
#[derive(Debug, Error)]
pub enum GithubError {
    /// URL is not of the form https://github.com/{owner}/{repo}
    #[error("Invalid GitHub repository URL format: {0}")]
    InvalidUrl(String),

    /// Token validation or repository lookup failed
    #[error("Repository access failed: {0}")]
    AccessFailed(String),

    /// Content listing or file download failed
    #[error("Repository download failed: {0}")]
    DownloadFailed(String),

    /// Transport-level failure
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local filesystem failure while writing contents
    #[error("Failed to write repository contents: {0}")]
    Io(#[from] std::io::Error),
}

/// Identifies a resolved repository
#[derive(Debug, Clone)]
pub struct RepoHandle {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One entry of a contents API listing
#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    login: String,
}

/// GitHub API client scoped to a download directory
pub struct GithubService {
    http: reqwest::Client,
    base_dir: PathBuf,
    api_base: String,
}

impl GithubService {
    /// Creates a service from the loaded configuration
    pub fn new(config: &Config) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.github_token))
            .map_err(|e| GithubError::AccessFailed(format!("invalid token value: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("repobuild"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_dir: config.base_directory.clone(),
            api_base: API_BASE.to_string(),
        })
    }

    /// Checks that the configured token resolves to a user
    pub async fn validate_token(&self) -> Result<(), GithubError> {
        let response = self
            .http
            .get(format!("{}/user", self.api_base))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::AccessFailed(format!(
                "invalid GitHub token (status {})",
                response.status()
            )));
        }

        let user: AuthenticatedUser = response.json().await?;
        info!("GitHub token validated successfully for {}", user.login);
        Ok(())
    }

    /// Extracts (owner, name) from a repository URL
    pub fn parse_repo_url(url: &str) -> Result<(String, String), GithubError> {
        let rest = url
            .strip_prefix("https://github.com/")
            .ok_or_else(|| GithubError::InvalidUrl(url.to_string()))?;

        let parts: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok((owner.to_string(), name.to_string()))
            }
            _ => Err(GithubError::InvalidUrl(url.to_string())),
        }
    }

    /// Downloads a repository's full file tree under the base directory
    ///
    /// An existing download of the same repository is removed first. Returns
    /// the local checkout path and a handle for follow-up API calls.
    pub async fn download_repository(
        &self,
        repo_url: &str,
    ) -> Result<(PathBuf, RepoHandle), GithubError> {
        let (owner, name) = Self::parse_repo_url(repo_url)?;
        let handle = RepoHandle { owner, name };
        info!("Attempting to download repository: {}", handle);

        let response = self
            .http
            .get(format!("{}/repos/{}", self.api_base, handle))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GithubError::AccessFailed(format!(
                "{} (status {})",
                handle,
                response.status()
            )));
        }

        let repo_path = self.base_dir.join(&handle.name);
        if repo_path.exists() {
            info!("Removing existing repository at {}", repo_path.display());
            std::fs::remove_dir_all(&repo_path)?;
        }
        std::fs::create_dir_all(&repo_path)?;
        debug!("Created directory: {}", repo_path.display());

        // Iterative walk over the contents listing, directories first
        let mut pending = vec![String::new()];
        while let Some(dir) = pending.pop() {
            let listing = self
                .http
                .get(format!(
                    "{}/repos/{}/contents/{}",
                    self.api_base, handle, dir
                ))
                .send()
                .await?;
            if !listing.status().is_success() {
                return Err(GithubError::DownloadFailed(format!(
                    "listing {} failed (status {})",
                    dir,
                    listing.status()
                )));
            }

            let items: Vec<ContentItem> = listing.json().await?;
            for item in items {
                let local = repo_path.join(&item.path);
                match item.kind.as_str() {
                    "dir" => {
                        std::fs::create_dir_all(&local)?;
                        pending.push(item.path);
                    }
                    "file" => {
                        let url = match item.download_url {
                            Some(url) => url,
                            None => {
                                debug!("Skipping {} (no download URL)", item.path);
                                continue;
                            }
                        };
                        let file = self.http.get(&url).send().await?;
                        if !file.status().is_success() {
                            return Err(GithubError::DownloadFailed(format!(
                                "{} (status {})",
                                item.path,
                                file.status()
                            )));
                        }
                        let bytes = file.bytes().await?;
                        if let Some(parent) = local.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(&local, &bytes)?;
                        debug!("Downloaded file: {}", local.display());
                    }
                    other => {
                        debug!("Skipping {} (unsupported content type {})", item.path, other);
                    }
                }
            }
        }

        info!(
            "Repository downloaded successfully to {}",
            repo_path.display()
        );
        Ok((repo_path, handle))
    }

    /// Fetches the repository README as raw text
    ///
    /// Returns `None` when the repository has no README; other failures are
    /// logged and also yield `None`, since a missing README is never fatal.
    pub async fn get_readme(&self, repo: &RepoHandle) -> Option<String> {
        let response = self
            .http
            .get(format!("{}/repos/{}/readme", self.api_base, repo))
            .header(ACCEPT, "application/vnd.github.raw")
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(text) => {
                    info!("README file found and retrieved");
                    Some(text)
                }
                Err(e) => {
                    warn!("Error reading README body: {}", e);
                    None
                }
            },
            Ok(resp) if resp.status() == StatusCode::NOT_FOUND => {
                warn!("README not found for {}", repo);
                None
            }
            Ok(resp) => {
                warn!("Error retrieving README: status {}", resp.status());
                None
            }
            Err(e) => {
                warn!("Error retrieving README: {}", e);
                None
            }
        }
    }
}
