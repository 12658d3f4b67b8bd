#![allow(dead_code)]

use stars_and_shelves::graphql::{ build_schema, ShelfSchema };
use stars_and_shelves::pool::{
    acquire,
    create_pool,
    PoolConfig,
    StoreConnection,
    StoreConnectionConfig,
    StorePool,
};
use stars_and_shelves::rating::RatingService;
use stars_and_shelves::seed::{ seed_store, SeedData };
use std::sync::Arc;

/// Every context owns its own embedded in-memory store, so tests never
/// see each other's rows.
pub struct TestContext {
    pub db_pool: Arc<StorePool>,
    pub schema: ShelfSchema,
    pub ratings: RatingService,
}

impl TestContext {
    /// Empty store with the schema defined
    pub async fn new() -> anyhow::Result<Self> {
        let config = StoreConnectionConfig::in_memory("test", "test");
        let db_pool = Arc::new(create_pool(config, PoolConfig::default()).await?);

        acquire(&db_pool).await?.define_schema().await?;

        Ok(TestContext {
            schema: build_schema(db_pool.clone()),
            ratings: RatingService::new(db_pool.clone()),
            db_pool,
        })
    }

    /// Store loaded with the bundled demo fixture
    pub async fn seeded() -> anyhow::Result<Self> {
        let ctx = Self::new().await?;
        let conn = ctx.store().await;
        seed_store(&conn, &SeedData::bundled()?).await?;
        Ok(ctx)
    }

    pub async fn store(&self) -> StoreConnection {
        acquire(&self.db_pool).await.expect("Failed to get connection from pool")
    }

    /// Run a GraphQL document and return its data, failing on any error
    pub async fn execute(&self, document: &str) -> serde_json::Value {
        let response = self.schema.execute(document).await;
        assert!(response.errors.is_empty(), "GraphQL errors: {:?}", response.errors);
        response.data.into_json().expect("GraphQL data is not valid JSON")
    }
}
