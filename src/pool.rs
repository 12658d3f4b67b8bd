use deadpool::{managed, Runtime};
use std::time::Duration;
use tracing::debug;

use crate::error::AppError;
use crate::store::StoreClient;

#[derive(Debug, Clone)]
pub struct StoreConnectionConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub namespace: String,
    pub database: String,
}

impl StoreConnectionConfig {
    /// Embedded, process-local store with no authentication
    pub fn in_memory(namespace: &str, database: &str) -> Self {
        Self {
            url: "mem://".to_string(),
            username: None,
            password: None,
            namespace: namespace.to_string(),
            database: database.to_string(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.url.starts_with("mem://")
    }

    async fn connect(&self) -> Result<StoreClient, AppError> {
        let credentials = match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        };

        StoreClient::new(&self.url, credentials, &self.namespace, &self.database).await
    }
}

#[derive(Debug)]
pub struct StoreConnectionManager {
    config: StoreConnectionConfig,
    // Every `mem://` connect opens a fresh datastore, so embedded pools hand
    // out clones of one handle instead.
    shared: Option<StoreClient>,
}

impl StoreConnectionManager {
    pub async fn new(config: StoreConnectionConfig) -> Result<Self, AppError> {
        let shared = if config.is_embedded() {
            Some(config.connect().await?)
        } else {
            None
        };

        Ok(Self { config, shared })
    }
}

impl managed::Manager for StoreConnectionManager {
    type Type = StoreClient;
    type Error = AppError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        if let Some(shared) = &self.shared {
            return Ok(shared.clone());
        }

        debug!("Opening new store connection to {}", self.config.url);
        self.config.connect().await
    }

    async fn recycle(
        &self,
        conn: &mut Self::Type,
        _: &managed::Metrics,
    ) -> managed::RecycleResult<Self::Error> {
        conn.ping().await.map_err(|e| {
            managed::RecycleError::Backend(AppError::Pool(format!(
                "Failed to recycle connection: {}",
                e
            )))
        })
    }
}

pub type StorePool = managed::Pool<StoreConnectionManager>;
pub type StoreConnection = managed::Object<StoreConnectionManager>;

#[derive(Clone)]
pub struct PoolConfig {
    pub max_size: usize,
    /// Upper bound on the liveness check of a returned connection
    pub recycle_timeout: Option<Duration>,
    pub connection_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            recycle_timeout: Some(Duration::from_secs(5)),
            connection_timeout: Duration::from_secs(30),
        }
    }
}

pub async fn create_pool(
    connection_config: StoreConnectionConfig,
    pool_config: PoolConfig,
) -> Result<StorePool, AppError> {
    let manager = StoreConnectionManager::new(connection_config).await?;

    let mut builder = managed::Pool::builder(manager)
        .max_size(pool_config.max_size)
        .runtime(Runtime::Tokio1)
        .create_timeout(Some(pool_config.connection_timeout));

    if let Some(recycle_timeout) = pool_config.recycle_timeout {
        builder = builder.recycle_timeout(Some(recycle_timeout));
    }

    builder
        .build()
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))
}

/// Check a connection out of the pool
pub async fn acquire(pool: &StorePool) -> Result<StoreConnection, AppError> {
    pool.get()
        .await
        .map_err(|e| AppError::Pool(format!("Failed to get connection from pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_config_is_embedded() {
        assert!(StoreConnectionConfig::in_memory("ns", "db").is_embedded());
    }

    #[tokio::test]
    async fn recycle_timeout_reaches_pool() {
        let pool_config = PoolConfig {
            max_size: 2,
            recycle_timeout: Some(Duration::from_secs(3)),
            connection_timeout: Duration::from_secs(5),
        };

        let pool = create_pool(StoreConnectionConfig::in_memory("ns", "db"), pool_config).await
            .expect("Failed to create pool");

        let timeouts = pool.timeouts();
        assert_eq!(timeouts.recycle, Some(Duration::from_secs(3)));
        assert_eq!(timeouts.create, Some(Duration::from_secs(5)));
    }
}
