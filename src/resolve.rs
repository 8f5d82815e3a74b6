//! Turning remote URLs and stored endpoint configs into connection
//! descriptors.

use anyhow::Result;
use anyhow::bail;
use thiserror::Error;

use crate::config::DEFAULT_PORT;
use crate::ssh_config::SshAliases;

// -----------------------------------------------------------------------------
// Types

/// How to reach a Gerrit server, and (when derived from a repository) which
/// project it serves. Derived on every command, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub user: Option<String>,
    pub host: String,
    pub port: u16,
    pub project: Option<String>,
}

/// The distinct ways resolution can fail.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not inside a git repository")]
    NotARepository,
    #[error("this repository is not bound to a gerrit config (remote.<remote>.gerrit is unset)")]
    NoBoundEndpoint,
    #[error("no gerrit config named '{0}' (gerrit.{0}.host is unset)")]
    MissingConfig(String),
    #[error("the remote url does not name a project")]
    MissingProject,
}

/// The operator declined a confirmation prompt. Not a failure: commands
/// catching this terminate silently with a zero exit status.
#[derive(Debug, Error)]
#[error("aborted")]
pub struct Aborted;

/// Parsed form of a Gerrit-style remote URL:
///
/// ```text
/// [ssh://][user@]host[:port][/project[.git]]
/// ```
///
/// `host_relative` keeps the raw text after the first `:` because a URL
/// written against an SSH alias reads `user@alias:project` — the remainder
/// after the alias token is host-relative, not port-relative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteUrl {
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub host_relative: Option<String>,
}

// -----------------------------------------------------------------------------
// Parsing

pub fn parse_remote_url(url: &str) -> Result<RemoteUrl> {
    let trimmed = url.trim();
    let rest = trimmed.strip_prefix("ssh://").unwrap_or(trimmed);

    let (user, rest) = match rest.split_once('@') {
        Some((user, rest)) if !user.is_empty() => (Some(user.to_string()), rest),
        Some((_, rest)) => (None, rest),
        None => (None, rest),
    };

    let host = rest.split([':', '/']).next().unwrap_or("");
    if host.is_empty() {
        bail!("remote url '{}' has no host", url);
    }

    let host_relative = rest.split_once(':').map(|(_, tail)| tail.to_string());
    let path = rest.split_once('/').map(|(_, tail)| tail.to_string());
    let port = host_relative
        .as_deref()
        .and_then(|tail| tail.split('/').next())
        .and_then(|token| token.parse::<u16>().ok());

    Ok(RemoteUrl {
        user,
        host: host.to_string(),
        port,
        path,
        host_relative,
    })
}

fn project_path(raw: &str) -> Option<String> {
    let stripped = raw.strip_suffix(".git").unwrap_or(raw);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

// -----------------------------------------------------------------------------
// RemoteUrl impl

impl RemoteUrl {
    /// Resolve against the SSH alias table.
    ///
    /// With an alias for the host token, the alias's host/user/port take
    /// precedence over anything embedded in the URL and the project is the
    /// host-relative remainder (after `:`). Without one, the URL is read as
    /// `user@host:port/project` and the project starts after the first `/`.
    pub fn into_connection(self, aliases: &SshAliases) -> Connection {
        match aliases.lookup(&self.host) {
            Some(alias) => Connection {
                user: alias.user.clone().or(self.user),
                host: alias.host_name.clone().unwrap_or(self.host),
                port: alias.port.unwrap_or(DEFAULT_PORT),
                project: self.host_relative.as_deref().and_then(project_path),
            },
            None => Connection {
                user: self.user,
                host: self.host,
                port: self.port.unwrap_or(DEFAULT_PORT),
                project: self.path.as_deref().and_then(project_path),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Connection impl

impl Connection {
    /// `user@host`, or just the host when no user is known.
    pub fn ssh_destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }

    pub fn project(&self) -> Result<&str, ResolveError> {
        self.project.as_deref().ok_or(ResolveError::MissingProject)
    }

    /// Full `ssh://` URL for the project this connection serves.
    pub fn url(&self) -> Result<String, ResolveError> {
        let project = self.project()?;
        Ok(format!(
            "ssh://{}:{}/{}",
            self.ssh_destination(),
            self.port,
            project
        ))
    }
}

// -----------------------------------------------------------------------------
// Tests
