use anyhow::Result;
use anyhow::bail;

use crate::App;
use crate::app::DEFAULT_BRANCH;
use crate::change;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;

/// What to do to a patchset.
#[derive(Clone, Debug, Default)]
pub struct ReviewOptions {
    pub code_review: Option<i8>,
    pub verified: Option<i8>,
    pub message: Option<String>,
    pub submit: bool,
    pub abandon: bool,
    pub restore: bool,
}

/// Single-quote a string for the remote shell ssh hands our arguments to.
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// Score, comment on, submit, abandon or restore a patchset.
    pub async fn cmd_review(
        &self,
        change_arg: &str,
        options: &ReviewOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let actions = [options.submit, options.abandon, options.restore];
        if actions.iter().filter(|&&flag| flag).count() > 1 {
            bail!("--submit, --abandon and --restore are mutually exclusive");
        }

        let change = change::parse_change_arg(change_arg)?;
        let conn = self.resolve_from_repository(DEFAULT_BRANCH).await?;
        let project = conn.project()?.to_string();

        let patchset = match change.patchset {
            Some(patchset) => patchset,
            None => self.current_patchset(&conn, change.number).await?,
        };

        let mut args = vec![
            "review".to_string(),
            "--project".to_string(),
            project,
        ];
        if let Some(score) = options.code_review {
            args.push(format!("--code-review={:+}", score));
        }
        if let Some(score) = options.verified {
            args.push(format!("--verified={:+}", score));
        }
        if let Some(message) = &options.message {
            args.push("--message".to_string());
            args.push(shell_quote(message));
        }
        if options.submit {
            args.push("--submit".to_string());
        }
        if options.abandon {
            args.push("--abandon".to_string());
        }
        if options.restore {
            args.push("--restore".to_string());
        }
        args.push(change::review_id(change.number, patchset));

        let output = self.gerrit.run(&conn, &args).await?;
        if !output.trim().is_empty() {
            writeln!(stdout, "{}", output.trim_end())?;
        }
        writeln!(stdout, "Reviewed change {},{}", change.number, patchset)?;

        Ok(())
    }
}
