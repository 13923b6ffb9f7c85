use super::AppState;
use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use shared_types::{HealthResponse, VersionResponse};
use tracing::error;

pub async fn health_check(data: web::Data<AppState>) -> Result<HttpResponse> {
    let timestamp = Utc::now().to_rfc3339();

    match data.database.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(HealthResponse {
            status: "ok".to_string(),
            database: "ok".to_string(),
            timestamp,
        })),
        Err(e) => {
            error!(error = %e, "Database health check failed");
            Ok(HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded".to_string(),
                database: "unavailable".to_string(),
                timestamp,
            }))
        }
    }
}

pub async fn version_info() -> Result<HttpResponse> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}
