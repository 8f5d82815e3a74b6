use std::path::Path;

use anyhow::Result;

use crate::App;
use crate::config;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;

/// Directory a project clones into when none is given: the last path
/// segment, `.git` suffix stripped.
fn default_clone_dir(project: &str) -> &str {
    let project = project.strip_suffix(".git").unwrap_or(project);
    project.rsplit('/').next().unwrap_or(project)
}

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// Clone `project` from a named endpoint and bind the fresh clone to it.
    pub async fn cmd_clone(
        &self,
        name: &str,
        project: &str,
        dir: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let conn = self.resolve_named(name).await?;

        let url = format!(
            "ssh://{}:{}/{}",
            conn.ssh_destination(),
            conn.port,
            project
        );
        let dir = dir.unwrap_or_else(|| default_clone_dir(project));

        writeln!(stdout, "Cloning {} from {}", project, conn.host)?;
        self.git.clone_repo(&url, dir).await?;

        self.git
            .config_set_in(Path::new(dir), &config::binding_key("origin"), name)
            .await?;
        writeln!(stdout, "Bound {} to gerrit config '{}'", dir, name)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::App;
    use crate::ops::gerrit::MockGerritOps;
    use crate::ops::git::MockGitOps;
    use crate::ops::prompt::MockPromptOps;
    use crate::ssh_config::SshAliases;

    #[test]
    fn test_default_clone_dir() {
        assert_eq!(default_clone_dir("teamA/proj"), "proj");
        assert_eq!(default_clone_dir("teamA/proj.git"), "proj");
        assert_eq!(default_clone_dir("proj"), "proj");
    }

    #[tokio::test]
    async fn test_cmd_clone_clones_and_binds() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_config_get().returning(|_, key| match key {
            "gerrit.review.host" => Ok(Some("gerrit.example.com".to_string())),
            "gerrit.review.user" => Ok(Some("committer".to_string())),
            _ => Ok(None),
        });
        mock_git
            .expect_clone_repo()
            .withf(|url, dir| {
                url == "ssh://committer@gerrit.example.com:29418/teamA/proj" && dir == "proj"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        mock_git
            .expect_config_set_in()
            .withf(|dir, key, value| {
                dir == Path::new("proj") && key == "remote.origin.gerrit" && value == "review"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let app = App::new(
            mock_git,
            MockGerritOps::new(),
            MockPromptOps::new(),
            SshAliases::default(),
        );

        let mut stdout = Vec::new();
        app.cmd_clone("review", "teamA/proj", None, &mut stdout)
            .await
            .unwrap();

        insta::assert_snapshot!(String::from_utf8(stdout).unwrap(), @r"
        Cloning teamA/proj from gerrit.example.com
        Bound proj to gerrit config 'review'
        ");
    }
}
