//! Build and storage status endpoints

use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};

use crate::model::{AppState, ErrorResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub name: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

#[get("/version")]
pub async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(VersionInfo::current())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthInfo {
    pub status: String,
    pub storage: String,
}

#[get("/health")]
pub async fn get_health(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let storage = data.persistence.storage_mode().to_string();
    match data.persistence.health_check().await {
        Ok(()) => HttpResponse::Ok().json(HealthInfo {
            status: "UP".to_string(),
            storage,
        }),
        Err(e) => {
            tracing::warn!("Storage health check failed: {:#}", e);
            ErrorResult::http_response(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                &format!("{} storage unavailable", storage),
                req.path(),
            )
        }
    }
}
