use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::app::DEFAULT_BRANCH;
use crate::change;
use crate::config;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// Add reviewers to a change. With no reviewers, list the ones assigned
    /// in the past instead.
    pub async fn cmd_assign(
        &self,
        change_arg: Option<&str>,
        reviewers: &[String],
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        if reviewers.is_empty() {
            self.ensure_repository().await?;
            let history = config::reviewer_history(&self.git).await?;
            if history.is_empty() {
                writeln!(stdout, "No remembered reviewers yet")?;
            } else {
                writeln!(stdout, "Previously assigned reviewers:")?;
                for reviewer in history {
                    writeln!(stdout, "  {}", reviewer.cyan())?;
                }
            }
            return Ok(());
        }

        let Some(change_arg) = change_arg else {
            anyhow::bail!("a change number is required when assigning reviewers");
        };
        let change = change::parse_change_arg(change_arg)?;
        let conn = self.resolve_from_repository(DEFAULT_BRANCH).await?;
        let project = conn.project()?.to_string();

        let mut args = vec![
            "set-reviewers".to_string(),
            "--project".to_string(),
            project,
        ];
        for reviewer in reviewers {
            args.push("--add".to_string());
            args.push(reviewer.clone());
        }
        args.push(change.number.to_string());

        self.gerrit.run(&conn, &args).await?;

        for reviewer in reviewers {
            config::remember_reviewer(&self.git, reviewer).await?;
        }

        writeln!(
            stdout,
            "Added {} reviewer(s) to change {}",
            reviewers.len(),
            change.number
        )?;

        Ok(())
    }
}
