use anyhow::{ Context, Result };
use futures::future::try_join_all;
use serde::{ Deserialize, Serialize };
use std::path::Path;
use tracing::info;

use crate::models::{ NewBook, NewUser, RatingRecord };
use crate::store::StoreClient;

const BUNDLED_FIXTURE: &str = include_str!("../data/seed.json");

/// Users, books and ratings to load into an empty store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<NewUser>,
    #[serde(default)]
    pub books: Vec<NewBook>,
    #[serde(default)]
    pub ratings: Vec<RatingRecord>,
}

impl SeedData {
    /// The demo fixture shipped with the binary
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(BUNDLED_FIXTURE).context("Bundled seed fixture is malformed")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read seed fixture {}", path.display()))?;
        serde_json
            ::from_str(&raw)
            .with_context(|| format!("Failed to parse seed fixture {}", path.display()))
    }
}

/// Define the store schema and load `data`. Safe to run repeatedly.
pub async fn seed_store(store: &StoreClient, data: &SeedData) -> Result<()> {
    store.define_schema().await.context("Failed to define store schema")?;

    try_join_all(data.users.iter().map(|user| store.upsert_user(user))).await.context(
        "Failed to load users"
    )?;
    try_join_all(data.books.iter().map(|book| store.upsert_book(book))).await.context(
        "Failed to load books"
    )?;
    try_join_all(
        data.ratings
            .iter()
            .map(|r| store.upsert_rating(&r.user_id, &r.book_id, r.rating))
    ).await.context("Failed to load ratings")?;

    info!(
        users = data.users.len(),
        books = data.books.len(),
        ratings = data.ratings.len(),
        "Seeded store"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fixture_parses() {
        let data = SeedData::bundled().expect("bundled fixture");
        assert!(data.users.len() >= 4);
        assert!(data.books.iter().any(|b| b.fiction));
        assert!(data.books.iter().any(|b| !b.fiction));
        assert!(
            data.ratings
                .iter()
                .all(|r| data.users.iter().any(|u| u.id == r.user_id))
        );
    }
}
