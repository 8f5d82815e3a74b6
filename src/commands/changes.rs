use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::app::DEFAULT_BRANCH;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;
use crate::query;

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// List open changes.
    ///
    /// With a name, query a named endpoint across all its projects; without,
    /// query the repository's endpoint filtered to its own project.
    pub async fn cmd_changes(
        &self,
        name: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let conn = match name {
            Some(name) => self.resolve_named(name).await?,
            None => self.resolve_from_repository(DEFAULT_BRANCH).await?,
        };

        let mut args = vec![
            "query".to_string(),
            "--format=JSON".to_string(),
            "--current-patch-set".to_string(),
            "status:open".to_string(),
        ];
        if let Some(project) = &conn.project {
            args.push(format!("project:{}", project));
        }

        let raw = self.gerrit.run(&conn, &args).await?;
        let changes = query::parse_query_output(&raw)?;

        if changes.is_empty() {
            writeln!(stdout, "No open changes")?;
            return Ok(());
        }

        for change in &changes {
            let number = change.number.to_string().cyan();
            let subject = change.subject.white();
            let owner = change
                .owner
                .as_ref()
                .map(|owner| owner.display_name())
                .unwrap_or("(unknown)");
            let line = format!("{} {} {}", number, subject, owner.dimmed());
            writeln!(stdout, "{}", line.trim_end())?;

            if let Some(url) = &change.url {
                let url_line = format!("  {}", url);
                writeln!(stdout, "{}", url_line.dimmed())?;
            }
        }

        Ok(())
    }
}
