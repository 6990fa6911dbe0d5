use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use zyppanel::application::UseCaseContainer;
use zyppanel::application::services::ChangeWatcher;
use zyppanel::domain::errors::RefreshFailure;
use zyppanel::domain::repositories::RepoRepository;
use zyppanel::infrastructure::ConfigRepository;
use zyppanel::infrastructure::zypper::{ZypperCommand, ZypperRepoRepository};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ConfigRepository::new().load()?;
    let repository: Arc<dyn RepoRepository> = Arc::new(ZypperRepoRepository::new(
        ZypperCommand::new(config.use_sudo),
    ));
    let use_cases = Arc::new(UseCaseContainer::new(Arc::clone(&repository)));

    let action = std::env::args().nth(1).unwrap_or_else(|| "list".to_string());
    match action.as_str() {
        "list" => print_repos(&use_cases).await,
        "refresh" => {
            let import_keys = std::env::args().any(|a| a == "--import-keys");
            refresh_repos(&use_cases, import_keys).await
        }
        "watch" => {
            let watcher = ChangeWatcher::spawn(
                Arc::clone(&repository),
                Duration::from_secs(config.poll_interval_secs),
            );
            let mut changes = watcher.subscribe();

            loop {
                changes.changed().await?;
                println!("-- repository set changed --");
                print_repos(&use_cases).await?;
            }
        }
        other => anyhow::bail!("unknown action: {other} (expected list, refresh or watch)"),
    }
}

async fn print_repos(use_cases: &UseCaseContainer) -> Result<()> {
    let repos = use_cases.list.execute().await?;

    println!(
        "{:<3} {:<24} {:<32} {:>4} {:^7} {:^7} {:^5} URI",
        "#", "Alias", "Name", "Prio", "Enabled", "Refresh", "GPG"
    );
    for repo in repos {
        println!(
            "{:<3} {:<24} {:<32} {:>4} {:^7} {:^7} {:^5} {}",
            repo.index,
            repo.alias,
            repo.name,
            repo.priority,
            if repo.enabled { "yes" } else { "no" },
            if repo.autorefresh { "yes" } else { "no" },
            if repo.gpgcheck { "yes" } else { "no" },
            repo.uri,
        );
    }

    Ok(())
}

async fn refresh_repos(use_cases: &UseCaseContainer, import_keys: bool) -> Result<()> {
    match use_cases.refresh.execute(None, import_keys).await {
        Ok(()) => {
            println!("Refreshing repos was successful");
            Ok(())
        }
        Err(RefreshFailure::Classified(error)) => {
            let message = use_cases.refresh.error_message(&error);

            eprintln!("{}", message.summary);
            for repo in &message.repos {
                eprintln!("  {repo}");
            }
            if let Some(detail) = &message.detail {
                eprintln!("For reason:\n{detail}");
            }
            if let Some(hint) = &message.hint {
                eprintln!("{hint}");
            }
            if error.is_recoverable_by_trust() {
                eprintln!("Re-run with --import-keys to trust the new signing keys.");
            }

            anyhow::bail!("refresh failed")
        }
        Err(RefreshFailure::Backend(error)) => Err(error.into()),
    }
}
