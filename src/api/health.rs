use chrono::Utc;
use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;

use crate::types::dto::common::HealthResponse;

/// Liveness and database reachability
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Tags)]
enum HealthTags {
    /// Health check endpoints
    Health,
}

#[OpenApi(prefix_path = "/api")]
impl HealthApi {
    /// Service health
    ///
    /// Always answers 200; a failed database ping reports `degraded`.
    #[oai(path = "/health", method = "get", tag = "HealthTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let (status, database) = match self.db.ping().await {
            Ok(()) => ("healthy", "up"),
            Err(e) => {
                tracing::warn!("Health check database ping failed: {}", e);
                ("degraded", "down")
            }
        };

        Json(HealthResponse {
            status: status.to_string(),
            database: database.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
