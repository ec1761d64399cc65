//! Code hosting API client
//!
//! Closes release milestones and files issues on GitHub.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[cfg(test)]
use mockall::automock;

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A filed issue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub html_url: String,
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CodeHostClient: Send + Sync {
    /// Close the open milestone titled `title` in `repo`
    async fn close_milestone(&self, repo: &str, title: &str) -> Result<(), HostError>;

    async fn create_issue(&self, repo: &str, title: &str, body: &str) -> Result<Issue, HostError>;
}

#[derive(Debug, Deserialize)]
struct Milestone {
    number: u64,
    title: String,
}

#[derive(Serialize)]
struct MilestoneUpdate<'a> {
    state: &'a str,
}

#[derive(Serialize)]
struct NewIssue<'a> {
    title: &'a str,
    body: &'a str,
}

/// [`CodeHostClient`] for the GitHub REST API
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    organization: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str, organization: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("release-train")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            organization: organization.to_string(),
            token,
        }
    }

    fn url(&self, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, self.organization, repo, path
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Map GitHub error statuses the same way for every call
fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response, HostError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(HostError::NotFound(what.to_string()));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(HostError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("GitHub API returned status {} for {}", status, what);
        return Err(HostError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

#[async_trait::async_trait]
impl CodeHostClient for GitHubClient {
    async fn close_milestone(&self, repo: &str, title: &str) -> Result<(), HostError> {
        let url = self.url(repo, "milestones?state=open&per_page=100");
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let milestones: Vec<Milestone> = check_status(response, repo)?
            .json()
            .await
            .map_err(|e| {
                warn!("Failed to parse GitHub milestones response: {}", e);
                HostError::InvalidResponse(e.to_string())
            })?;

        let milestone = milestones
            .into_iter()
            .find(|milestone| milestone.title == title)
            .ok_or_else(|| HostError::NotFound(format!("{} milestone {}", repo, title)))?;

        let url = self.url(repo, &format!("milestones/{}", milestone.number));
        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&MilestoneUpdate { state: "closed" })
            .send()
            .await?;
        check_status(response, repo)?;

        info!("Closed milestone {} of {}", title, repo);
        Ok(())
    }

    async fn create_issue(&self, repo: &str, title: &str, body: &str) -> Result<Issue, HostError> {
        let url = self.url(repo, "issues");
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&NewIssue { title, body })
            .send()
            .await?;

        let issue: Issue = check_status(response, repo)?.json().await.map_err(|e| {
            warn!("Failed to parse GitHub issue response: {}", e);
            HostError::InvalidResponse(e.to_string())
        })?;

        info!("Filed issue #{} in {}", issue.number, repo);
        Ok(issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn close_milestone_patches_matching_milestone() {
        let mut server = Server::new_async().await;

        let list = server
            .mock("GET", "/repos/spring-cloud/spring-cloud-sleuth/milestones")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("state".into(), "open".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"number": 7, "title": "2.2.1.RELEASE"},
                    {"number": 8, "title": "2.2.2.RELEASE"}
                ]"#,
            )
            .create_async()
            .await;
        let close = server
            .mock("PATCH", "/repos/spring-cloud/spring-cloud-sleuth/milestones/8")
            .match_body(Matcher::JsonString(r#"{"state": "closed"}"#.to_string()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "spring-cloud", Some("secret".to_string()));
        client
            .close_milestone("spring-cloud-sleuth", "2.2.2.RELEASE")
            .await
            .unwrap();

        list.assert_async().await;
        close.assert_async().await;
    }

    #[tokio::test]
    async fn close_milestone_returns_not_found_for_unknown_title() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/repos/spring-cloud/spring-cloud-sleuth/milestones")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"number": 7, "title": "2.2.1.RELEASE"}]"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "spring-cloud", None);
        let result = client
            .close_milestone("spring-cloud-sleuth", "2.2.2.RELEASE")
            .await;

        assert!(matches!(result, Err(HostError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_issue_returns_filed_issue() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/repos/spring-cloud/spring-cloud-release/issues")
            .match_body(Matcher::JsonString(
                r#"{"title": "Upgrade to Hoxton.SR2", "body": "Please upgrade"}"#.to_string(),
            ))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"number": 42, "html_url": "https://github.com/spring-cloud/spring-cloud-release/issues/42"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "spring-cloud", None);
        let issue = client
            .create_issue("spring-cloud-release", "Upgrade to Hoxton.SR2", "Please upgrade")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(issue.number, 42);
    }

    #[tokio::test]
    async fn rate_limited_response_carries_retry_after() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/repos/spring-cloud/spring-cloud-release/issues")
            .with_status(429)
            .with_header("retry-after", "60")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "spring-cloud", None);
        let result = client.create_issue("spring-cloud-release", "t", "b").await;

        assert!(matches!(
            result,
            Err(HostError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }

    #[tokio::test]
    async fn server_error_is_invalid_response() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/repos/spring-cloud/spring-cloud-release/issues")
            .with_status(500)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "spring-cloud", None);
        let result = client.create_issue("spring-cloud-release", "t", "b").await;

        assert!(matches!(result, Err(HostError::InvalidResponse(_))));
    }
}
