//! The persisted settings this tool owns, all stored through `git config`.
//!
//! Global scope: `gerrit.<name>.host`, `gerrit.<name>.user`,
//! `gerrit.<name>.port` — one group per named endpoint.
//! Repository scope: `remote.<remote>.gerrit` (the endpoint a clone is bound
//! to) and repeated `gerrit.reviewers` entries (assignment history).

use anyhow::Context;
use anyhow::Result;

use crate::ops::git::ConfigScope;
use crate::ops::git::GitOps;
use crate::resolve::Connection;

/// Gerrit's conventional SSH port.
pub const DEFAULT_PORT: u16 = 29418;

/// Key under which a repository records its bound endpoint name.
pub fn binding_key(remote: &str) -> String {
    format!("remote.{}.gerrit", remote)
}

const REVIEWERS_KEY: &str = "gerrit.reviewers";

// -----------------------------------------------------------------------------
// Endpoint

/// A named Gerrit server from the global config store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub user: Option<String>,
    pub port: u16,
}

impl Endpoint {
    pub fn into_connection(self) -> Connection {
        Connection {
            user: self.user,
            host: self.host,
            port: self.port,
            project: None,
        }
    }
}

fn host_key(name: &str) -> String {
    format!("gerrit.{}.host", name)
}

fn user_key(name: &str) -> String {
    format!("gerrit.{}.user", name)
}

fn port_key(name: &str) -> String {
    format!("gerrit.{}.port", name)
}

/// Load the endpoint stored under `name`.
///
/// Returns `None` when no host is stored — an endpoint without a host does
/// not exist as far as resolution is concerned.
pub async fn load_endpoint(git: &impl GitOps, name: &str) -> Result<Option<Endpoint>> {
    let Some(host) = git.config_get(ConfigScope::Global, &host_key(name)).await? else {
        return Ok(None);
    };

    let user = git.config_get(ConfigScope::Global, &user_key(name)).await?;
    let port = match git.config_get(ConfigScope::Global, &port_key(name)).await? {
        Some(raw) => raw
            .parse()
            .context(format!("invalid port in gerrit.{}.port: {}", name, raw))?,
        None => DEFAULT_PORT,
    };

    Ok(Some(Endpoint { host, user, port }))
}

/// Persist all three fields of an endpoint under `name`.
pub async fn save_endpoint(git: &impl GitOps, name: &str, endpoint: &Endpoint) -> Result<()> {
    git.config_set(ConfigScope::Global, &host_key(name), &endpoint.host)
        .await?;
    git.config_set(
        ConfigScope::Global,
        &user_key(name),
        endpoint.user.as_deref().unwrap_or(""),
    )
    .await?;
    git.config_set(
        ConfigScope::Global,
        &port_key(name),
        &endpoint.port.to_string(),
    )
    .await?;

    Ok(())
}

// -----------------------------------------------------------------------------
// Reviewer history

/// Previously assigned reviewers, oldest first.
pub async fn reviewer_history(git: &impl GitOps) -> Result<Vec<String>> {
    git.config_get_all(ConfigScope::Local, REVIEWERS_KEY).await
}

/// Record a reviewer, skipping ones already remembered.
pub async fn remember_reviewer(git: &impl GitOps, reviewer: &str) -> Result<()> {
    let known = reviewer_history(git).await?;
    if known.iter().any(|existing| existing == reviewer) {
        return Ok(());
    }
    git.config_add(ConfigScope::Local, REVIEWERS_KEY, reviewer)
        .await
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::git::MockGitOps;

    #[tokio::test]
    async fn test_load_endpoint_missing_host_is_none() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_config_get().returning(|_, _| Ok(None));

        let endpoint = load_endpoint(&mock_git, "review").await.unwrap();
        assert_eq!(endpoint, None);
    }

    #[tokio::test]
    async fn test_load_endpoint_defaults_port() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_config_get().returning(|_, key| match key {
            "gerrit.review.host" => Ok(Some("gerrit.example.com".to_string())),
            _ => Ok(None),
        });

        let endpoint = load_endpoint(&mock_git, "review").await.unwrap().unwrap();
        assert_eq!(
            endpoint,
            Endpoint {
                host: "gerrit.example.com".to_string(),
                user: None,
                port: DEFAULT_PORT,
            }
        );
    }

    #[tokio::test]
    async fn test_load_endpoint_reads_all_fields() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_config_get().returning(|_, key| match key {
            "gerrit.review.host" => Ok(Some("gerrit.example.com".to_string())),
            "gerrit.review.user" => Ok(Some("committer".to_string())),
            "gerrit.review.port" => Ok(Some("2222".to_string())),
            _ => Ok(None),
        });

        let endpoint = load_endpoint(&mock_git, "review").await.unwrap().unwrap();
        assert_eq!(endpoint.host, "gerrit.example.com");
        assert_eq!(endpoint.user.as_deref(), Some("committer"));
        assert_eq!(endpoint.port, 2222);
    }

    #[tokio::test]
    async fn test_load_endpoint_rejects_bad_port() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_config_get().returning(|_, key| match key {
            "gerrit.review.host" => Ok(Some("gerrit.example.com".to_string())),
            "gerrit.review.port" => Ok(Some("not-a-port".to_string())),
            _ => Ok(None),
        });

        assert!(load_endpoint(&mock_git, "review").await.is_err());
    }

    #[tokio::test]
    async fn test_save_endpoint_writes_three_keys() {
        let mut mock_git = MockGitOps::new();
        mock_git
            .expect_config_set()
            .withf(|scope, key, value| {
                *scope == ConfigScope::Global
                    && matches!(
                        (key, value),
                        ("gerrit.review.host", "gerrit.example.com")
                            | ("gerrit.review.user", "committer")
                            | ("gerrit.review.port", "29418")
                    )
            })
            .times(3)
            .returning(|_, _, _| Ok(()));

        let endpoint = Endpoint {
            host: "gerrit.example.com".to_string(),
            user: Some("committer".to_string()),
            port: DEFAULT_PORT,
        };
        save_endpoint(&mock_git, "review", &endpoint).await.unwrap();
    }

    #[tokio::test]
    async fn test_remember_reviewer_skips_known() {
        let mut mock_git = MockGitOps::new();
        mock_git
            .expect_config_get_all()
            .returning(|_, _| Ok(vec!["alice".to_string()]));
        // No expect_config_add: adding would panic the mock.

        remember_reviewer(&mock_git, "alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_remember_reviewer_appends_new() {
        let mut mock_git = MockGitOps::new();
        mock_git
            .expect_config_get_all()
            .returning(|_, _| Ok(vec!["alice".to_string()]));
        mock_git
            .expect_config_add()
            .withf(|scope, key, value| {
                *scope == ConfigScope::Local && key == "gerrit.reviewers" && value == "bob"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        remember_reviewer(&mock_git, "bob").await.unwrap();
    }
}
