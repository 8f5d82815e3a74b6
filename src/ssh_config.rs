//! Read-only view of the SSH client's host alias table.
//!
//! Only the three keywords that affect how we address a Gerrit server are
//! read: `HostName`, `User` and `Port`. Everything else in the file is
//! ignored, as are `Host` patterns containing wildcards (those are not
//! aliases for a single host).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;

// -----------------------------------------------------------------------------
// Types

/// A single `Host` entry from the SSH client configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SshAlias {
    pub host_name: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
}

/// Alias-name keyed table of SSH host entries.
#[derive(Debug, Default)]
pub struct SshAliases {
    entries: HashMap<String, SshAlias>,
}

// -----------------------------------------------------------------------------
// SshAliases impl

impl SshAliases {
    /// Load `$HOME/.ssh/config`. A missing file yields an empty table.
    pub async fn load() -> Result<Self> {
        let Some(home) = std::env::var_os("HOME") else {
            return Ok(Self::default());
        };
        Self::load_from(&Path::new(&home).join(".ssh").join("config")).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).context(format!("Failed to read ssh config {}", path.display()))
            }
        }
    }

    /// Parse ssh_config text. First-obtained value wins, as in ssh itself.
    pub fn parse(text: &str) -> Self {
        let mut entries: HashMap<String, SshAlias> = HashMap::new();
        let mut current: Vec<String> = Vec::new();

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("");
            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };

            match keyword.to_ascii_lowercase().as_str() {
                "host" => {
                    current = parts
                        .filter(|pattern| !pattern.contains(['*', '?', '!']))
                        .map(|pattern| pattern.to_string())
                        .collect();
                    for name in &current {
                        entries.entry(name.clone()).or_default();
                    }
                }
                "hostname" => {
                    if let Some(value) = parts.next() {
                        for name in &current {
                            let entry = entries.entry(name.clone()).or_default();
                            entry.host_name.get_or_insert_with(|| value.to_string());
                        }
                    }
                }
                "user" => {
                    if let Some(value) = parts.next() {
                        for name in &current {
                            let entry = entries.entry(name.clone()).or_default();
                            entry.user.get_or_insert_with(|| value.to_string());
                        }
                    }
                }
                "port" => {
                    if let Some(port) = parts.next().and_then(|value| value.parse().ok()) {
                        for name in &current {
                            let entry = entries.entry(name.clone()).or_default();
                            entry.port.get_or_insert(port);
                        }
                    }
                }
                _ => {}
            }
        }

        Self { entries }
    }

    pub fn lookup(&self, host: &str) -> Option<&SshAlias> {
        self.entries.get(host)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry (for building tables by hand in tests).
    pub fn with_alias(mut self, name: &str, alias: SshAlias) -> Self {
        self.entries.insert(name.to_string(), alias);
        self
    }
}

// -----------------------------------------------------------------------------
// Tests
