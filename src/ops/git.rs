#![allow(async_fn_in_trait)]

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;

// -----------------------------------------------------------------------------
// Types

/// Which git configuration file an entry lives in.
///
/// `Local` is git's default scope: the repository's own config, falling back
/// to the user-wide file on reads, which matches plain `git config` behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigScope {
    Global,
    Local,
}

impl ConfigScope {
    fn flag(self) -> Option<&'static str> {
        match self {
            ConfigScope::Global => Some("--global"),
            ConfigScope::Local => None,
        }
    }
}

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations for interacting with Git
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Read a single config value. Returns `None` when the key is unset.
    async fn config_get(&self, scope: ConfigScope, key: &str) -> Result<Option<String>>;

    /// Read all values of a multi-valued config key.
    async fn config_get_all(&self, scope: ConfigScope, key: &str) -> Result<Vec<String>>;

    async fn config_set(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()>;

    /// Append a value to a multi-valued config key.
    async fn config_add(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()>;

    /// Set a repository-scope config value in a repository other than the
    /// current directory (used right after cloning).
    async fn config_set_in(&self, dir: &Path, key: &str, value: &str) -> Result<()>;

    async fn is_inside_work_tree(&self) -> Result<bool>;

    /// Fetch a single refspec from a remote (name or URL).
    async fn fetch(&self, remote: &str, refspec: &str) -> Result<()>;

    /// Create `branch` at `start` and check it out.
    async fn checkout_new_branch(&self, branch: &str, start: &str) -> Result<()>;

    async fn push(&self, remote: &str, refspec: &str) -> Result<()>;

    async fn clone_repo(&self, url: &str, dir: &str) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit;

impl GitOps for RealGit {
    async fn config_get(&self, scope: ConfigScope, key: &str) -> Result<Option<String>> {
        let mut args = vec!["config"];
        args.extend(scope.flag());
        args.extend(["--get", key]);

        let output = Command::new("git")
            .args(&args)
            .output()
            .await
            .context("Failed to execute git command")?;

        // `git config --get` exits 1 with no stderr when the key is unset
        if !output.status.success() {
            if output.stderr.is_empty() {
                return Ok(None);
            }
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let value = String::from_utf8(output.stdout)?.trim().to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    async fn config_get_all(&self, scope: ConfigScope, key: &str) -> Result<Vec<String>> {
        let mut args = vec!["config"];
        args.extend(scope.flag());
        args.extend(["--get-all", key]);

        let output = Command::new("git")
            .args(&args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            if output.stderr.is_empty() {
                return Ok(Vec::new());
            }
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let values = String::from_utf8(output.stdout)?
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(values)
    }

    async fn config_set(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        let mut args = vec!["config"];
        args.extend(scope.flag());
        args.extend([key, value]);

        let output = Command::new("git")
            .args(&args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn config_add(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        let mut args = vec!["config"];
        args.extend(scope.flag());
        args.extend(["--add", key, value]);

        let output = Command::new("git")
            .args(&args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn config_set_in(&self, dir: &Path, key: &str, value: &str) -> Result<()> {
        let output = Command::new("git")
            .current_dir(dir)
            .args(["config", key, value])
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn is_inside_work_tree(&self) -> Result<bool> {
        let output = Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .output()
            .await
            .context("Failed to execute git command")?;

        // Prints "false" (exit 0) inside a bare repository
        Ok(output.status.success()
            && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    async fn fetch(&self, remote: &str, refspec: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["fetch", remote, refspec])
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn checkout_new_branch(&self, branch: &str, start: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["checkout", "-b", branch, start])
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["push", remote, refspec])
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }

    async fn clone_repo(&self, url: &str, dir: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["clone", url, dir])
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(())
    }
}
