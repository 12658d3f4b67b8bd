use serde::{Deserialize, Serialize};

// GitHub GraphQL response structures

/// Envelope every GraphQL endpoint answers with
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerNameData {
    pub viewer: ViewerName,
}

#[derive(Debug, Deserialize)]
pub struct ViewerName {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerReposData {
    pub viewer: Viewer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Viewer {
    pub name: Option<String>,
    pub login: String,
    pub repos: RepositoryConnection,
}

impl Viewer {
    /// Display name, falling back to the login for accounts without one
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(self.login.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub total_count: u32,
    #[serde(default)]
    pub nodes: Vec<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub viewer_has_starred: bool,
    pub issues: TotalCount,
    pub pull_requests: TotalCount,
    pub default_branch_ref: Option<BranchRef>,
}

impl Repository {
    /// Commits on the default branch; `None` for empty repositories
    pub fn commit_count(&self) -> Option<u32> {
        self.default_branch_ref
            .as_ref()
            .and_then(|branch| branch.target.as_ref())
            .and_then(|target| target.history.as_ref())
            .map(|history| history.total_count)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    pub target: Option<CommitTarget>,
}

/// A ref target; only commits carry a history
#[derive(Debug, Clone, Deserialize)]
pub struct CommitTarget {
    #[serde(default)]
    pub history: Option<TotalCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStarData {
    pub add_star: StarPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveStarData {
    pub remove_star: StarPayload,
}

#[derive(Debug, Deserialize)]
pub struct StarPayload {
    pub starrable: Option<Starrable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Starrable {
    #[serde(default)]
    pub name: Option<String>,
    pub viewer_has_starred: bool,
}

#[derive(Debug, Deserialize)]
pub struct StarStateData {
    pub node: Option<Starrable>,
}

/// Rate limit state reported by the last GitHub response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: 5000,
            limit: 5000,
            reset_time: chrono::Utc::now() + chrono::Duration::hours(1),
            is_limited: false,
        }
    }
}
