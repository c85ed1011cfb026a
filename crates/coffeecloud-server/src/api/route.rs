//! API routing configuration

use actix_web::{Scope, web};

use super::{configuration, version};

/// Routes:
/// - GET|POST /v1/configs
/// - GET|PUT|DELETE /v1/configs/{id}
/// - GET /v1/version
/// - GET /v1/health
pub fn routes() -> Scope {
    web::scope("/v1")
        .service(
            web::scope("/configs")
                .service(configuration::list_configurations)
                .service(configuration::create_configuration)
                .service(configuration::get_configuration)
                .service(configuration::update_configuration)
                .service(configuration::delete_configuration),
        )
        .service(version::get_version)
        .service(version::get_health)
}
