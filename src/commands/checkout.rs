use anyhow::Result;

use crate::App;
use crate::app::DEFAULT_BRANCH;
use crate::change;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// Fetch a change's patchset and check it out as a local branch.
    ///
    /// When the patchset is omitted, the server is asked for the change's
    /// current one.
    pub async fn cmd_checkout(
        &self,
        change_arg: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let change = change::parse_change_arg(change_arg)?;
        let conn = self.resolve_from_repository(DEFAULT_BRANCH).await?;

        let patchset = match change.patchset {
            Some(patchset) => patchset,
            None => self.current_patchset(&conn, change.number).await?,
        };

        let refname = change::change_ref(change.number, patchset);
        let url = conn.url()?;

        writeln!(stdout, "Fetching {} from {}", refname, conn.host)?;
        self.git.fetch(&url, &refname).await?;

        let branch = format!("review/{}/{}", change.number, patchset);
        self.git.checkout_new_branch(&branch, "FETCH_HEAD").await?;
        writeln!(
            stdout,
            "Checked out change {} patchset {} as {}",
            change.number, patchset, branch
        )?;

        Ok(())
    }
}
