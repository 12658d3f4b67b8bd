use crate::error::{AppError, Result};
use crate::types::{
    AddStarData, GraphQlResponse, RateLimitState, RemoveStarData, StarStateData, Starrable,
    Viewer, ViewerNameData, ViewerReposData,
};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_REPO_COUNT: u32 = 10;

const VIEWER_NAME_QUERY: &str = r#"
query {
  viewer {
    name
  }
}
"#;

const VIEWER_REPOS_QUERY: &str = r#"
query ($first: Int!) {
  viewer {
    name
    login
    repos: repositories(first: $first, orderBy: {field: CREATED_AT, direction: DESC}) {
      totalCount
      nodes {
        id
        name
        viewerHasStarred
        issues(states: OPEN) {
          totalCount
        }
        pullRequests(states: OPEN) {
          totalCount
        }
        ...commitCount
      }
    }
  }
}

fragment commitCount on Repository {
  defaultBranchRef {
    target {
      ... on Commit {
        history {
          totalCount
        }
      }
    }
  }
}
"#;

const STAR_STATE_QUERY: &str = r#"
query ($id: ID!) {
  node(id: $id) {
    ... on Starrable {
      viewerHasStarred
    }
    ... on Repository {
      name
    }
  }
}
"#;

const ADD_STAR_MUTATION: &str = r#"
mutation ($id: ID!) {
  addStar(input: {starrableId: $id}) {
    starrable {
      viewerHasStarred
      ... on Repository {
        name
      }
    }
  }
}
"#;

const REMOVE_STAR_MUTATION: &str = r#"
mutation ($id: ID!) {
  removeStar(input: {starrableId: $id}) {
    starrable {
      viewerHasStarred
      ... on Repository {
        name
      }
    }
  }
}
"#;

/// Client for a GitHub-style GraphQL endpoint: one POST URL, bearer auth.
///
/// Failed requests are returned to the caller as-is; nothing is retried.
pub struct GitHubClient {
    client: Client,
    token: String,
    endpoint: Url,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_endpoint(token, GITHUB_GRAPHQL_URL)
    }

    pub fn with_endpoint(token: String, endpoint: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(AppError::AuthError("missing auth token".to_string()));
        }

        let endpoint = Url::parse(endpoint)?;

        let client = Client::builder()
            .user_agent("stars-and-shelves/0.1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            token,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post one GraphQL document and return its `data`
    pub async fn request<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        debug!(endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("bearer {}", self.token))
            .json(&json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        if let Some(rate_limit) = Self::rate_limit_state(response.headers()) {
            if rate_limit.remaining < 10 {
                warn!(
                    remaining = rate_limit.remaining,
                    reset_time = %rate_limit.reset_time,
                    "GitHub rate limit low"
                );
            }
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse<T> = response.json().await?;

        if !envelope.errors.is_empty() {
            for entry in &envelope.errors {
                error!(kind = ?entry.kind, "GraphQL error: {}", entry.message);
            }
            let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(AppError::GraphQl(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| AppError::NotFound("GraphQL response carried no data".to_string()))
    }

    /// Rate limit state carried by a response, if the endpoint reports one
    pub fn rate_limit_state(headers: &HeaderMap) -> Option<RateLimitState> {
        let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

        let remaining = header("x-ratelimit-remaining")?.parse::<u32>().ok()?;

        let limit = header("x-ratelimit-limit")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5000);

        let reset_time = header("x-ratelimit-reset")
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

        Some(RateLimitState {
            remaining,
            limit,
            reset_time,
            is_limited: remaining == 0,
        })
    }

    /// Display name of the token's owner
    pub async fn viewer_name(&self) -> Result<Option<String>> {
        let data: ViewerNameData = self.request(VIEWER_NAME_QUERY, json!({})).await?;
        Ok(data.viewer.name)
    }

    /// The viewer and their most recently created repositories
    pub async fn viewer_repositories(&self, first: u32) -> Result<Viewer> {
        let data: ViewerReposData = self
            .request(VIEWER_REPOS_QUERY, json!({ "first": first }))
            .await?;
        Ok(data.viewer)
    }

    pub async fn add_star(&self, starrable_id: &str) -> Result<Starrable> {
        let data: AddStarData = self
            .request(ADD_STAR_MUTATION, json!({ "id": starrable_id }))
            .await?;

        data.add_star
            .starrable
            .ok_or_else(|| AppError::NotFound(format!("Starrable not found: {}", starrable_id)))
    }

    pub async fn remove_star(&self, starrable_id: &str) -> Result<Starrable> {
        let data: RemoveStarData = self
            .request(REMOVE_STAR_MUTATION, json!({ "id": starrable_id }))
            .await?;

        data.remove_star
            .starrable
            .ok_or_else(|| AppError::NotFound(format!("Starrable not found: {}", starrable_id)))
    }

    /// Star the node if the viewer has not starred it yet, otherwise unstar it
    pub async fn toggle_star(&self, starrable_id: &str) -> Result<Starrable> {
        let data: StarStateData = self
            .request(STAR_STATE_QUERY, json!({ "id": starrable_id }))
            .await?;

        let current = data
            .node
            .ok_or_else(|| AppError::NotFound(format!("Starrable not found: {}", starrable_id)))?;

        if current.viewer_has_starred {
            self.remove_star(starrable_id).await
        } else {
            self.add_star(starrable_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn rate_limit_absent_without_headers() {
        assert!(GitHubClient::rate_limit_state(&HeaderMap::new()).is_none());
    }

    #[test]
    fn rate_limit_parsed_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("5000"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let state = GitHubClient::rate_limit_state(&headers).expect("rate limit state");
        assert_eq!(state.remaining, 0);
        assert_eq!(state.limit, 5000);
        assert_eq!(state.reset_time.timestamp(), 1_700_000_000);
        assert!(state.is_limited);
    }
}
