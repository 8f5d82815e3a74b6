use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use colored::Colorize;
use gr::App;
use gr::commands::review::ReviewOptions;
use gr::ops::gerrit::RealGerrit;
use gr::ops::git::RealGit;
use gr::ops::prompt::RealPrompt;
use gr::resolve::Aborted;
use gr::ssh_config::SshAliases;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "gr")]
#[command(about = "Gerrit Review: manage Gerrit changes from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or edit a named gerrit config
    Setup {
        /// Config name (defaults to the one this repository is bound to)
        name: Option<String>,
    },
    /// Clone a project from a named gerrit config and bind the clone to it
    Clone {
        /// Config name
        name: String,
        /// Project path on the server
        project: String,
        /// Target directory (defaults to the project's basename)
        dir: Option<String>,
    },
    /// Push HEAD for review
    Push {
        /// Target branch on the server
        #[arg(default_value = "master")]
        branch: String,
        /// Push as a draft (reviewers are not notified)
        #[arg(long)]
        draft: bool,
    },
    /// Fetch a change and check it out as a local branch
    Checkout {
        /// Change to fetch, as N or N,P (patchset defaults to the current one)
        change: String,
    },
    /// Score, comment on, submit, abandon or restore a change
    Review {
        /// Change to review, as N or N,P
        change: String,
        /// Code-Review score
        #[arg(long, allow_hyphen_values = true)]
        code_review: Option<i8>,
        /// Verified score
        #[arg(long, allow_hyphen_values = true)]
        verified: Option<i8>,
        /// Review message
        #[arg(short, long)]
        message: Option<String>,
        /// Submit the change
        #[arg(long)]
        submit: bool,
        /// Abandon the change
        #[arg(long)]
        abandon: bool,
        /// Restore an abandoned change
        #[arg(long)]
        restore: bool,
    },
    /// Add reviewers to a change, or list previously assigned ones
    Assign {
        /// Change to assign reviewers to, as N or N,P
        change: Option<String>,
        /// Reviewer usernames
        reviewers: Vec<String>,
    },
    /// List open changes
    Changes {
        /// Named gerrit config to query instead of the current repository
        name: Option<String>,
    },
}

fn setup_logging() -> Result<()> {
    use tracing_subscriber::Layer as _;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

async fn run(command: Commands) -> Result<()> {
    let aliases = SshAliases::load().await.unwrap_or_else(|err| {
        log::warn!("Failed to load ssh config: {:#}", err);
        SshAliases::default()
    });
    let app = App::new(RealGit, RealGerrit, RealPrompt, aliases);
    let mut stdout = std::io::stdout();

    match command {
        Commands::Setup { name } => app.cmd_setup(name.as_deref(), &mut stdout).await,
        Commands::Clone { name, project, dir } => {
            app.cmd_clone(&name, &project, dir.as_deref(), &mut stdout)
                .await
        }
        Commands::Push { branch, draft } => app.cmd_push(&branch, draft, &mut stdout).await,
        Commands::Checkout { change } => app.cmd_checkout(&change, &mut stdout).await,
        Commands::Review {
            change,
            code_review,
            verified,
            message,
            submit,
            abandon,
            restore,
        } => {
            let options = ReviewOptions {
                code_review,
                verified,
                message,
                submit,
                abandon,
                restore,
            };
            app.cmd_review(&change, &options, &mut stdout).await
        }
        Commands::Assign { change, reviewers } => {
            app.cmd_assign(change.as_deref(), &reviewers, &mut stdout)
                .await
        }
        Commands::Changes { name } => app.cmd_changes(name.as_deref(), &mut stdout).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = setup_logging() {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        // The operator declined a prompt: not an error, nothing to report
        Err(err) if err.is::<Aborted>() => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
