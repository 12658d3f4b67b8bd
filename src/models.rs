use serde::{Deserialize, Serialize};

/// Role value that marks a user as an administrator
pub const ADMIN_ROLE: &str = "admin";

/// Page size used when a listing does not pass `first`
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// User row as read from the `user` table.
///
/// `id` is the record key rendered as a string, so it round-trips through
/// GraphQL `ID` arguments unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "recordKey")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserRecord {
    /// Admin status is derived from the role, never stored
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Book row as read from the `book` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "recordKey")]
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "publishedYear")]
    pub published_year: i64,
    pub fiction: bool,
}

/// A row of the `hasRead` join: one user's rating of one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub rating: i64,
}

/// Fields needed to insert a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Fields needed to insert a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "publishedYear")]
    pub published_year: i64,
    pub fiction: bool,
}

/// Offset/limit window over a listing.
///
/// A zero value means "not applied", matching how the listing arguments
/// have always behaved; negative values are handed to the store as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    pub fn new(first: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: first.filter(|n| *n != 0),
            offset: offset.filter(|n| *n != 0),
        }
    }

    /// Trailing `LIMIT`/`START` clauses; values are bound as `$limit`/`$offset`
    pub fn clause(&self) -> String {
        let mut clause = String::new();
        if self.limit.is_some() {
            clause.push_str(" LIMIT $limit");
        }
        if self.offset.is_some() {
            clause.push_str(" START $offset");
        }
        clause
    }
}
