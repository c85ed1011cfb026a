//! Configuration management API handlers
//!
//! - GET /v1/configs - List all configurations
//! - POST /v1/configs - Create a configuration
//! - GET /v1/configs/{id} - Get one configuration
//! - PUT /v1/configs/{id} - Replace a configuration
//! - DELETE /v1/configs/{id} - Delete a configuration and its asset identities

use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use coffeecloud_persistence::ConfigurationDraft;
use tracing::{error, info};

use crate::model::{AppState, ErrorResult};

fn store_failure(req: &HttpRequest, action: &str, e: anyhow::Error) -> HttpResponse {
    error!("Failed to {}: {:#}", action, e);
    ErrorResult::internal_error(&format!("failed to {}", action), req.path())
}

fn not_found(req: &HttpRequest, id: i64) -> HttpResponse {
    ErrorResult::not_found(&format!("configuration {} not found", id), req.path())
}

#[get("")]
pub async fn list_configurations(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    match data.configurations.configuration_find_all().await {
        Ok(configurations) => HttpResponse::Ok().json(configurations),
        Err(e) => store_failure(&req, "list configurations", e),
    }
}

/// New configurations always start inactive
#[post("")]
pub async fn create_configuration(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ConfigurationDraft>,
) -> impl Responder {
    let mut draft = body.into_inner();
    draft.active = Some(false);

    let configuration = match draft.validate(0) {
        Ok(configuration) => configuration,
        Err(e) => return ErrorResult::bad_request(&e.to_string(), req.path()),
    };

    match data.configurations.configuration_create(&configuration).await {
        Ok(created) => {
            info!(configuration_id = created.id, url = %created.url, "Configuration created");
            HttpResponse::Created().json(created)
        }
        Err(e) => store_failure(&req, "create configuration", e),
    }
}

#[get("/{id}")]
pub async fn get_configuration(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match data.configurations.configuration_get(id).await {
        Ok(Some(configuration)) => HttpResponse::Ok().json(configuration),
        Ok(None) => not_found(&req, id),
        Err(e) => store_failure(&req, "get configuration", e),
    }
}

/// The `active` flag belongs to the scheduler and is left unchanged
#[put("/{id}")]
pub async fn update_configuration(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ConfigurationDraft>,
) -> impl Responder {
    let id = path.into_inner();
    let configuration = match body.into_inner().validate(id) {
        Ok(configuration) => configuration,
        Err(e) => return ErrorResult::bad_request(&e.to_string(), req.path()),
    };

    match data.configurations.configuration_update(&configuration).await {
        Ok(false) => return not_found(&req, id),
        Ok(true) => info!(configuration_id = id, "Configuration updated"),
        Err(e) => return store_failure(&req, "update configuration", e),
    }

    match data.configurations.configuration_get(id).await {
        Ok(Some(updated)) => HttpResponse::Ok().json(updated),
        Ok(None) => not_found(&req, id),
        Err(e) => store_failure(&req, "get configuration", e),
    }
}

#[delete("/{id}")]
pub async fn delete_configuration(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match data.configurations.configuration_delete(id).await {
        Ok(true) => {
            info!(configuration_id = id, "Configuration deleted");
            HttpResponse::NoContent().finish()
        }
        Ok(false) => not_found(&req, id),
        Err(e) => store_failure(&req, "delete configuration", e),
    }
}
