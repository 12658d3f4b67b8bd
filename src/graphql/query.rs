use async_graphql::{ Context, ErrorExtensions, Object, Result, ID };
use tracing::debug;

use super::store;
use super::types::{ Book, User };
use crate::models::{ Page, DEFAULT_PAGE_SIZE };

pub struct Query;

#[Object]
impl Query {
    /// List users by offset/limit window
    async fn users(
        &self,
        ctx: &Context<'_>,
        #[graphql(default_with = "Some(DEFAULT_PAGE_SIZE)")] first: Option<i64>,
        offset: Option<i64>
    ) -> Result<Vec<User>> {
        let page = Page::new(first, offset);
        debug!(?page, "Listing users");

        let conn = store(ctx).await?;
        let users = conn.list_users(page).await.map_err(|e| e.extend())?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Look up a single user
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        let conn = store(ctx).await?;
        let user = conn.get_user(id.as_str()).await.map_err(|e| e.extend())?;
        Ok(user.map(User::from))
    }

    /// List books, optionally only fiction or only non-fiction
    async fn books(
        &self,
        ctx: &Context<'_>,
        fiction: Option<bool>,
        #[graphql(default_with = "Some(DEFAULT_PAGE_SIZE)")] first: Option<i64>,
        offset: Option<i64>
    ) -> Result<Vec<Book>> {
        let page = Page::new(first, offset);
        debug!(?page, ?fiction, "Listing books");

        let conn = store(ctx).await?;
        let books = conn.list_books(fiction, page).await.map_err(|e| e.extend())?;
        Ok(books.into_iter().map(Book::from).collect())
    }
}
