use async_graphql::{ Context, ErrorExtensions, Object, Result, ID };

use super::types::HasRead;
use crate::rating::RatingService;

pub struct Mutation;

#[Object]
impl Mutation {
    /// Rate a book or update a rating
    async fn rate_book(&self, ctx: &Context<'_>, user: ID, book: ID, rating: i64) -> Result<HasRead> {
        let ratings = ctx.data::<RatingService>()?;
        let record = ratings
            .rate_book(book.as_str(), user.as_str(), rating).await
            .map_err(|e| e.extend())?;
        Ok(HasRead::from(record))
    }

    /// Delete a book rating. True if a rating existed and was removed.
    async fn delete_rating(&self, ctx: &Context<'_>, user: ID, book: ID) -> Result<bool> {
        let ratings = ctx.data::<RatingService>()?;
        ratings.delete_rating(book.as_str(), user.as_str()).await.map_err(|e| e.extend())
    }
}
