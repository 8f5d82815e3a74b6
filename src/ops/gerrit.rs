#![allow(async_fn_in_trait)]

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

use crate::resolve::Connection;

// -----------------------------------------------------------------------------
// GerritOps trait

/// The command channel to a Gerrit server.
///
/// A single `gerrit <args...>` invocation over SSH: raw stdout on success,
/// stderr folded into the error on non-zero exit. Output is not interpreted
/// here; callers parse what they need.
#[cfg_attr(test, automock)]
pub trait GerritOps {
    async fn run(&self, conn: &Connection, args: &[String]) -> Result<String>;
}

// -----------------------------------------------------------------------------
// RealGerrit

/// Real implementation that shells out to the ssh client
pub struct RealGerrit;

impl GerritOps for RealGerrit {
    #[instrument(skip_all, fields(host = %conn.host))]
    async fn run(&self, conn: &Connection, args: &[String]) -> Result<String> {
        let output = Command::new("ssh")
            .arg("-p")
            .arg(conn.port.to_string())
            .arg(conn.ssh_destination())
            .arg("gerrit")
            .args(args)
            .output()
            .await
            .context("Failed to execute ssh command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "gerrit command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}
