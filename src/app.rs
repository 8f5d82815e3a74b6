use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;

use crate::config;
use crate::config::DEFAULT_PORT;
use crate::config::Endpoint;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::ConfigScope;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;
use crate::query;
use crate::resolve::Aborted;
use crate::resolve::Connection;
use crate::resolve::ResolveError;
use crate::resolve::parse_remote_url;
use crate::ssh_config::SshAliases;

/// The branch commands resolve against when none is given.
pub const DEFAULT_BRANCH: &str = "master";

pub struct App<G: GitOps, R: GerritOps, P: PromptOps> {
    pub git: G,
    pub gerrit: R,
    pub prompt: P,
    pub aliases: SshAliases,
}

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    pub fn new(git: G, gerrit: R, prompt: P, aliases: SshAliases) -> Self {
        Self {
            git,
            gerrit,
            prompt,
            aliases,
        }
    }
}

/// Endpoint resolution: shared by every command that needs a remote.
impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    pub(crate) async fn ensure_repository(&self) -> Result<()> {
        if self.git.is_inside_work_tree().await? {
            Ok(())
        } else {
            Err(ResolveError::NotARepository.into())
        }
    }

    /// The remote `branch` tracks, falling back to `origin`.
    pub(crate) async fn branch_remote(&self, branch: &str) -> Result<String> {
        let key = format!("branch.{}.remote", branch);
        let remote = self.git.config_get(ConfigScope::Local, &key).await?;
        Ok(remote.unwrap_or_else(|| "origin".to_string()))
    }

    /// The endpoint name this repository was bound to at clone time.
    pub(crate) async fn bound_endpoint_name(&self, branch: &str) -> Result<String> {
        self.ensure_repository().await?;
        let remote = self.branch_remote(branch).await?;
        self.git
            .config_get(ConfigScope::Local, &config::binding_key(&remote))
            .await?
            .ok_or_else(|| ResolveError::NoBoundEndpoint.into())
    }

    /// Resolve a named endpoint from the global store.
    ///
    /// A name without a stored host routes through the interactive create
    /// flow; declining that is a benign abort, not an error.
    pub async fn resolve_named(&self, name: &str) -> Result<Connection> {
        if let Some(endpoint) = config::load_endpoint(&self.git, name).await? {
            return Ok(endpoint.into_connection());
        }

        let create = self.prompt.confirm(
            &format!("No gerrit config named '{}'. Create it now?", name),
            true,
        )?;
        if !create {
            return Err(Aborted.into());
        }

        self.edit_endpoint(name).await?;

        match config::load_endpoint(&self.git, name).await? {
            Some(endpoint) => Ok(endpoint.into_connection()),
            None => Err(ResolveError::MissingConfig(name.to_string()).into()),
        }
    }

    /// Resolve the connection for this repository from `branch`'s remote URL
    /// and the SSH alias table.
    pub async fn resolve_from_repository(&self, branch: &str) -> Result<Connection> {
        self.ensure_repository().await?;

        let remote = self.branch_remote(branch).await?;
        let key = format!("remote.{}.url", remote);
        let url = self
            .git
            .config_get(ConfigScope::Local, &key)
            .await?
            .ok_or_else(|| anyhow!("remote '{}' has no url", remote))?;

        Ok(parse_remote_url(&url)?.into_connection(&self.aliases))
    }

    /// Interactive create/edit flow for a named endpoint.
    ///
    /// All answers are collected before anything is written, so a failed or
    /// declined prompt leaves the store untouched.
    pub async fn edit_endpoint(&self, name: &str) -> Result<()> {
        let existing = config::load_endpoint(&self.git, name).await?;

        if existing.is_some() {
            let overwrite = self.prompt.confirm(
                &format!("Gerrit config '{}' already exists. Overwrite?", name),
                true,
            )?;
            if !overwrite {
                return Err(Aborted.into());
            }
        }

        let current = existing.unwrap_or_else(|| Endpoint {
            host: String::new(),
            user: std::env::var("USER").ok(),
            port: DEFAULT_PORT,
        });

        let host = self.prompt.input("Host", &current.host)?;
        let user = self
            .prompt
            .input("User", current.user.as_deref().unwrap_or(""))?;
        let port_raw = self.prompt.input("Port", &current.port.to_string())?;

        let port = match port_raw.trim() {
            "" => DEFAULT_PORT,
            raw => raw
                .parse()
                .context(format!("invalid port: {}", raw))?,
        };
        let user = match user.trim() {
            "" => None,
            trimmed => Some(trimmed.to_string()),
        };

        let endpoint = Endpoint {
            host: host.trim().to_string(),
            user,
            port,
        };
        config::save_endpoint(&self.git, name, &endpoint).await
    }

    /// Ask the server for the current patchset number of a change.
    pub(crate) async fn current_patchset(&self, conn: &Connection, number: u64) -> Result<u64> {
        let args = vec![
            "query".to_string(),
            "--format=JSON".to_string(),
            "--current-patch-set".to_string(),
            format!("change:{}", number),
        ];
        let raw = self.gerrit.run(conn, &args).await?;

        let changes = query::parse_query_output(&raw)?;
        let change = changes
            .first()
            .context(format!("change {} not found", number))?;
        let patch_set = change
            .current_patch_set
            .as_ref()
            .context(format!("change {} has no current patchset", number))?;

        Ok(patch_set.number)
    }
}

// -----------------------------------------------------------------------------
// Tests
