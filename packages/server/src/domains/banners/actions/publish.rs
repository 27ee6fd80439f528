//! Commit an approved banner to the app config file.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domains::banners::data::MAX_PUBLISH_ATTEMPTS;
use crate::domains::banners::models::{Banner, BannerConfigDocument};
use crate::kernel::{RepoWriteError, ServerDeps};

pub fn commit_message(banner: &Banner) -> String {
    format!("chore(banner): add banner \"{}\"", banner.title)
}

/// Append `banner` to the config file with a read-modify-write cycle.
///
/// Each write carries the sha read in the same attempt. When someone else
/// committed in between, the file is read again and the append redone.
/// Returns the number of attempts used.
pub async fn publish_banner(banner: &Banner, deps: &ServerDeps) -> Result<usize> {
    let path = deps.settings.app_config_path.as_str();
    let message = commit_message(banner);

    for attempt in 1..=MAX_PUBLISH_ATTEMPTS {
        let file = deps
            .repo
            .get_file(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?;

        let mut document = BannerConfigDocument::parse(&file.content)
            .with_context(|| format!("{} is not a valid app config", path))?;
        document
            .append_banner(banner)
            .context("Failed to append banner")?;

        match deps
            .repo
            .put_file(path, &message, &document.to_string(), &file.sha)
            .await
        {
            Ok(()) => {
                info!(title = %banner.title, attempt, "Banner published");
                return Ok(attempt);
            }
            Err(RepoWriteError::Conflict) => {
                warn!(
                    title = %banner.title,
                    attempt,
                    sha = %file.sha,
                    "App config changed while publishing, retrying"
                );
            }
            Err(RepoWriteError::Other(e)) => {
                return Err(e.context(format!("Failed to write {}", path)));
            }
        }
    }

    anyhow::bail!(
        "{} kept changing, gave up after {} attempts",
        path,
        MAX_PUBLISH_ATTEMPTS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;

    const CONFIG: &str = r#"user_agent = "DanXi"

[[banners]]
title = "Old"
action = "a"
button = "b"
"#;

    fn banner() -> Banner {
        Banner {
            title: "New".to_string(),
            action: "https://example.com".to_string(),
            button: "Go".to_string(),
        }
    }

    #[test]
    fn commit_message_names_the_banner() {
        assert_eq!(commit_message(&banner()), "chore(banner): add banner \"New\"");
    }

    #[tokio::test]
    async fn writes_with_the_sha_it_read() {
        let test_deps = TestDependencies::new().with_config_file(CONFIG);
        let deps = test_deps.server_deps();

        let attempts = publish_banner(&banner(), &deps).await.unwrap();

        assert_eq!(attempts, 1);
        let writes = test_deps.repo.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].sha, "sha-1");
        assert_eq!(writes[0].path, "public/app_config.toml");
        assert!(writes[0].content.starts_with(CONFIG));
        assert!(writes[0].content.contains("title = \"New\""));
    }

    #[tokio::test]
    async fn retries_on_conflict_and_keeps_the_other_edit() {
        let test_deps = TestDependencies::new().with_config_file(CONFIG);
        let other = format!(
            "{}\n[[banners]]\ntitle = \"Concurrent\"\naction = \"c\"\nbutton = \"d\"\n",
            CONFIG
        );
        test_deps.repo.push_concurrent_edit(&other);
        let deps = test_deps.server_deps();

        let attempts = publish_banner(&banner(), &deps).await.unwrap();

        assert_eq!(attempts, 2);
        assert_eq!(test_deps.repo.read_count(), 2);
        let current = test_deps.repo.current().unwrap().content;
        assert!(current.contains("Concurrent"));
        assert!(current.contains("title = \"New\""));
    }

    #[tokio::test]
    async fn gives_up_after_three_conflicts() {
        let test_deps = TestDependencies::new().with_config_file(CONFIG);
        for _ in 0..3 {
            test_deps.repo.push_concurrent_edit(CONFIG);
        }
        let deps = test_deps.server_deps();

        let err = publish_banner(&banner(), &deps).await.unwrap_err();

        assert!(err.to_string().contains("gave up after 3 attempts"));
        assert!(test_deps.repo.writes().is_empty());
        assert_eq!(test_deps.repo.read_count(), 3);
    }

    #[tokio::test]
    async fn invalid_config_is_not_written() {
        let test_deps = TestDependencies::new().with_config_file("banners = \"oops\"\n");
        let deps = test_deps.server_deps();

        assert!(publish_banner(&banner(), &deps).await.is_err());
        assert!(test_deps.repo.writes().is_empty());
    }
}
