//! GraphQL schema for the bookshelf: users, books and their ratings.
//!
//! Object types are thin wrappers over store records; every relation
//! (`booksRead`, `readBy`, `HasRead.book`, `HasRead.user`) is resolved on
//! demand through the pool injected as schema data.

mod mutation;
mod query;
mod types;

pub use mutation::Mutation;
pub use query::Query;
pub use types::{ Book, HasRead, User };

use async_graphql::{ Context, EmptySubscription, ErrorExtensions, Schema, SchemaBuilder };
use std::sync::Arc;

use crate::pool::{ acquire, StoreConnection, StorePool };
use crate::rating::RatingService;

pub type ShelfSchema = Schema<Query, Mutation, EmptySubscription>;

/// Schema without any data attached; enough for SDL export
pub fn schema_builder() -> SchemaBuilder<Query, Mutation, EmptySubscription> {
    Schema::build(Query, Mutation, EmptySubscription)
}

/// Build the executable schema around an already constructed store pool
pub fn build_schema(db_pool: Arc<StorePool>) -> ShelfSchema {
    schema_builder()
        .data(RatingService::new(db_pool.clone()))
        .data(db_pool)
        .finish()
}

pub fn schema_sdl() -> String {
    schema_builder().finish().sdl()
}

/// Check out a store connection for the current resolver
pub(crate) async fn store(ctx: &Context<'_>) -> async_graphql::Result<StoreConnection> {
    let pool = ctx.data::<Arc<StorePool>>()?;
    acquire(pool).await.map_err(|e| e.extend())
}
