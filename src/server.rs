use crate::graphql::ShelfSchema;
use crate::pool::{ acquire, StorePool };
use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::{ Html, IntoResponse, Json },
    routing::get,
    Router,
};
use serde::{ Deserialize, Serialize };
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: CheckResult,
}

/// Result of an individual check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared state of the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub schema: ShelfSchema,
    pub db_pool: Arc<StorePool>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(schema: ShelfSchema, db_pool: Arc<StorePool>) -> Self {
        Self {
            schema,
            db_pool,
            start_time: std::time::Instant::now(),
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health_check))
        .route("/healthz", get(health_check)) // Kubernetes convention
        .route("/livez", get(liveness_check)) // Kubernetes liveness probe
        .route("/readyz", get(readiness_check)) // Kubernetes readiness probe
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Start the GraphQL HTTP server and serve until the task is dropped
pub async fn start_server(app_state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_router(app_state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("GraphQL server listening on http://{}/graphql", listener.local_addr()?);

    axum::serve(listener, app).await
}

async fn graphql_handler(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>
) -> Json<async_graphql::Response> {
    Json(state.schema.execute(request).await)
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn database_check(db_pool: &StorePool) -> CheckResult {
    let conn = match acquire(db_pool).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
            };
        }
    };

    match conn.ping().await {
        Ok(()) => CheckResult {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => CheckResult {
            status: HealthStatus::Unhealthy,
            message: Some(format!("Database query failed: {}", e)),
        },
    }
}

/// Main health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = database_check(&state.db_pool).await;

    let status = database.status.clone();
    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        checks: HealthChecks { database },
    };

    (status_code, Json(response))
}

/// Kubernetes liveness probe - just checks if the process is alive
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}

/// Kubernetes readiness probe - ready once the store pool hands out connections
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let ready = acquire(&state.db_pool).await.is_ok();

    let response = ReadinessResponse {
        ready,
        message: if ready { None } else { Some("Not ready - DB: Failed".to_string()) },
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status_code, Json(response))
}
