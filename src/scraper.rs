use std::time::Duration;

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};
use webdriver::capabilities::Capabilities;

use crate::error::{AppError, Result};

pub const GITHUB_HOST: &str = "github.com";
pub const GITINGEST_HOST: &str = "gitingest.com";

// gitingest.com markup contract; a markup change on their side breaks extraction
const INPUT_SELECTOR: &str = "#input_text";
const SUBMIT_SELECTOR: &str = "button[type=submit]";
const LOADER_SELECTOR: &str = ".loader";
const DIRECTORY_SELECTOR: &str = "#directory-structure-container";
const CODE_SELECTOR: &str = ".result-text";

const FORM_TIMEOUT: Duration = Duration::from_secs(10);
const LOADER_TIMEOUT: Duration = Duration::from_secs(60);
const RESULT_TIMEOUT: Duration = Duration::from_secs(30);
const LOADER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The two text blocks gitingest renders for a repository.
#[derive(Debug, Clone)]
pub struct RepoSnapshot {
    pub directory_structure: String,
    pub code_content: String,
}

/// Rejects anything that is not recognizably a GitHub repository URL.
pub fn validate_repo_url(repo_url: &str) -> Result<()> {
    if repo_url.is_empty() || !repo_url.contains(GITHUB_HOST) {
        return Err(AppError::InvalidRepoUrl);
    }
    Ok(())
}

/// Swap the GitHub host for the gitingest one, keeping the rest of the URL.
pub fn to_gitingest_url(repo_url: &str) -> String {
    repo_url.replace(GITHUB_HOST, GITINGEST_HOST)
}

/// The owner/repo portion gitingest expects in its form field.
pub fn repo_slug(gitingest_url: &str) -> Result<&str> {
    gitingest_url
        .split_once("gitingest.com/")
        .map(|(_, rest)| rest)
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| AppError::Scrape("repository path missing from URL".to_string()))
}

/// Capability surface the handlers depend on, so tests can swap the engine.
#[async_trait]
pub trait RepoScraper: Send + Sync {
    async fn scrape(&self, repo_url: &str) -> Result<RepoSnapshot>;
}

/// Drives a headless browser session against gitingest.com through a
/// WebDriver endpoint (chromedriver by default).
pub struct GitingestScraper {
    webdriver_url: String,
}

impl GitingestScraper {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
        }
    }

    /// Start a fresh browser session owned by a single request.
    async fn new_session(&self) -> Result<Client> {
        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless", "--no-sandbox", "--disable-gpu"] }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.webdriver_url)
            .await?;
        Ok(client)
    }

    async fn drive(&self, client: &Client, gitingest_url: &str) -> Result<RepoSnapshot> {
        info!("Navigating to: {}", gitingest_url);
        client.goto(gitingest_url).await?;
        info!("Page loaded");

        info!("Filling and submitting form...");
        let input = client
            .wait()
            .at_most(FORM_TIMEOUT)
            .for_element(Locator::Css(INPUT_SELECTOR))
            .await?;
        input.send_keys(repo_slug(gitingest_url)?).await?;
        let submit = client.find(Locator::Css(SUBMIT_SELECTOR)).await?;
        submit.click().await?;

        info!("Waiting for loading to complete...");
        wait_for_detached(client, LOADER_SELECTOR, LOADER_TIMEOUT).await?;

        info!("Waiting for directory structure...");
        let directory_structure = client
            .wait()
            .at_most(RESULT_TIMEOUT)
            .for_element(Locator::Css(DIRECTORY_SELECTOR))
            .await?
            .text()
            .await?;

        info!("Waiting for code content...");
        let code_content = client
            .wait()
            .at_most(RESULT_TIMEOUT)
            .for_element(Locator::Css(CODE_SELECTOR))
            .await?
            .text()
            .await?;

        Ok(RepoSnapshot {
            directory_structure,
            code_content,
        })
    }
}

#[async_trait]
impl RepoScraper for GitingestScraper {
    async fn scrape(&self, repo_url: &str) -> Result<RepoSnapshot> {
        let gitingest_url = to_gitingest_url(repo_url);

        let client = self.new_session().await?;
        // The session must be released on every exit path
        let outcome = self.drive(&client, &gitingest_url).await;
        if let Err(e) = client.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        outcome
    }
}

/// Poll until no element matching `selector` remains in the DOM.
async fn wait_for_detached(client: &Client, selector: &str, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if client.find_all(Locator::Css(selector)).await?.is_empty() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AppError::Scrape(format!(
                "timed out after {}s waiting for {} to detach",
                timeout.as_secs(),
                selector
            )));
        }
        sleep(LOADER_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_url() {
        assert!(matches!(validate_repo_url(""), Err(AppError::InvalidRepoUrl)));
    }

    #[test]
    fn rejects_non_github_urls() {
        assert!(matches!(
            validate_repo_url("not-a-url"),
            Err(AppError::InvalidRepoUrl)
        ));
        assert!(matches!(
            validate_repo_url("https://gitlab.com/owner/repo"),
            Err(AppError::InvalidRepoUrl)
        ));
    }

    #[test]
    fn accepts_github_urls() {
        assert!(validate_repo_url("https://github.com/octocat/Hello-World").is_ok());
    }

    #[test]
    fn substitutes_host_and_preserves_path() {
        assert_eq!(
            to_gitingest_url("https://github.com/owner/repo"),
            "https://gitingest.com/owner/repo"
        );
        assert_eq!(
            to_gitingest_url("https://github.com/owner/repo/tree/main/src"),
            "https://gitingest.com/owner/repo/tree/main/src"
        );
    }

    #[test]
    fn slug_is_everything_after_the_host() {
        assert_eq!(
            repo_slug("https://gitingest.com/octocat/Hello-World").unwrap(),
            "octocat/Hello-World"
        );
        assert_eq!(
            repo_slug("https://gitingest.com/owner/repo/tree/main").unwrap(),
            "owner/repo/tree/main"
        );
    }

    #[test]
    fn slug_requires_a_path() {
        assert!(repo_slug("https://gitingest.com").is_err());
        assert!(repo_slug("https://gitingest.com/").is_err());
    }
}
