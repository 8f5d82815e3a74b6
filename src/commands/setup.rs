use anyhow::Result;

use crate::App;
use crate::app::DEFAULT_BRANCH;
use crate::ops::gerrit::GerritOps;
use crate::ops::git::GitOps;
use crate::ops::prompt::PromptOps;

impl<G: GitOps, R: GerritOps, P: PromptOps> App<G, R, P> {
    /// Create or edit a named gerrit config. With no name, edit the config
    /// this repository is bound to.
    pub async fn cmd_setup(
        &self,
        name: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.bound_endpoint_name(DEFAULT_BRANCH).await?,
        };

        self.edit_endpoint(&name).await?;
        writeln!(stdout, "Saved gerrit config '{}'", name)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::App;
    use crate::ops::gerrit::MockGerritOps;
    use crate::ops::git::MockGitOps;
    use crate::ops::prompt::MockPromptOps;
    use crate::resolve::ResolveError;
    use crate::ssh_config::SshAliases;

    #[tokio::test]
    async fn test_cmd_setup_without_name_needs_binding() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_is_inside_work_tree().returning(|| Ok(true));
        mock_git.expect_config_get().returning(|_, _| Ok(None));

        let app = App::new(
            mock_git,
            MockGerritOps::new(),
            MockPromptOps::new(),
            SshAliases::default(),
        );

        let mut stdout = Vec::new();
        let err = app.cmd_setup(None, &mut stdout).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::NoBoundEndpoint)
        ));
    }

    #[tokio::test]
    async fn test_cmd_setup_with_name_saves_config() {
        let mut mock_git = MockGitOps::new();
        mock_git.expect_config_get().returning(|_, _| Ok(None));
        mock_git
            .expect_config_set()
            .times(3)
            .returning(|_, _, _| Ok(()));

        let mut mock_prompt = MockPromptOps::new();
        mock_prompt.expect_input().returning(|prompt, _| match prompt {
            "Host" => Ok("gerrit.example.com".to_string()),
            "User" => Ok("committer".to_string()),
            "Port" => Ok("29418".to_string()),
            other => panic!("unexpected prompt: {}", other),
        });

        let app = App::new(
            mock_git,
            MockGerritOps::new(),
            mock_prompt,
            SshAliases::default(),
        );

        let mut stdout = Vec::new();
        app.cmd_setup(Some("review"), &mut stdout).await.unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "Saved gerrit config 'review'\n"
        );
    }
}
