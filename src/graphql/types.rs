use async_graphql::{ Context, ErrorExtensions, Object, Result, ID };

use super::store;
use crate::models::{ BookRecord, RatingRecord, UserRecord };
use crate::rating::RatingService;

/// A user in the system
#[derive(Clone, Debug)]
pub struct User(pub UserRecord);

/// A book that users can read and rate
#[derive(Clone, Debug)]
pub struct Book(pub BookRecord);

/// One user's rating of one book
#[derive(Clone, Debug)]
pub struct HasRead(pub RatingRecord);

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self(record)
    }
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self(record)
    }
}

impl From<RatingRecord> for HasRead {
    fn from(record: RatingRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Every rating this user has given
    async fn books_read(&self, ctx: &Context<'_>) -> Result<Vec<HasRead>> {
        let conn = store(ctx).await?;
        let ratings = conn.ratings_by_user(&self.0.id).await.map_err(|e| e.extend())?;
        Ok(ratings.into_iter().map(HasRead::from).collect())
    }

    /// Mean of this user's ratings, null when there are none
    async fn average_rating(&self, ctx: &Context<'_>) -> Result<Option<f64>> {
        let ratings = ctx.data::<RatingService>()?;
        ratings.average_rating(&self.0.id).await.map_err(|e| e.extend())
    }
}

#[Object]
impl Book {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn author(&self) -> &str {
        &self.0.author
    }

    async fn published_year(&self) -> i64 {
        self.0.published_year
    }

    async fn fiction(&self) -> bool {
        self.0.fiction
    }

    /// Every rating this book has received
    async fn read_by(&self, ctx: &Context<'_>) -> Result<Vec<HasRead>> {
        let conn = store(ctx).await?;
        let ratings = conn.ratings_for_book(&self.0.id).await.map_err(|e| e.extend())?;
        Ok(ratings.into_iter().map(HasRead::from).collect())
    }
}

#[Object]
impl HasRead {
    /// The rated book, null if it no longer exists
    async fn book(&self, ctx: &Context<'_>) -> Result<Option<Book>> {
        let conn = store(ctx).await?;
        let book = conn.get_book(&self.0.book_id).await.map_err(|e| e.extend())?;
        Ok(book.map(Book::from))
    }

    async fn rating(&self) -> i64 {
        self.0.rating
    }

    /// The rating user, null if it no longer exists
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let conn = store(ctx).await?;
        let user = conn.get_user(&self.0.user_id).await.map_err(|e| e.extend())?;
        Ok(user.map(User::from))
    }
}
