use anyhow::Result;

use crate::App;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// Push HEAD for review on `branch`.
    ///
    /// Gerrit turns a push to `refs/for/<branch>` into a change (or a new
    /// patchset of one); `refs/drafts/<branch>` does the same without
    /// notifying reviewers.
    pub async fn cmd_push(
        &self,
        branch: &str,
        draft: bool,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        self.ensure_repository().await?;

        let remote = self.branch_remote(branch).await?;
        let namespace = if draft { "drafts" } else { "for" };
        let refspec = format!("HEAD:refs/{}/{}", namespace, branch);

        self.git.push(&remote, &refspec).await?;
        writeln!(
            stdout,
            "Pushed HEAD to refs/{}/{} on {}",
            namespace, branch, remote
        )?;

        Ok(())
    }
}
