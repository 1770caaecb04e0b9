use actix_web::{error::InternalError, web, HttpResponse, ResponseError};

use crate::error::ApiError;
use crate::{http, metrics};

/// Mount every HTTP sub-module, plus extractor configs that turn malformed
/// bodies / ids into the usual `{ "error": ... }` shape.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .configure(http::matches::init_routes)
        .configure(http::auth::init_routes)
        .configure(http::health::init_routes)
        .service(metrics::membership_metrics);
}

fn reject(err: impl Into<actix_web::Error>, api: ApiError) -> actix_web::Error {
    let response: HttpResponse = api.error_response();
    InternalError::from_response(err.into(), response).into()
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let msg = format!("Invalid request body: {err}");
        reject(err, ApiError::validation(msg))
    })
}

fn path_config() -> web::PathConfig {
    // An id that is not a UUID cannot name any match.
    web::PathConfig::default().error_handler(|err, _req| {
        reject(err, ApiError::not_found("Match not found"))
    })
}
