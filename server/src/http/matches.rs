//! Match endpoints (list / detail / create / join / leave / delete)

use actix_web::{delete, get, post, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::matches::types::{CreateMatchReq, JoinReq, LeaveReq};
use crate::matches::{aggregate, lifecycle, membership};
use crate::state::AppState;

/// GET /matches
#[get("/matches")]
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let views = aggregate::list_matches(state.matches.as_ref()).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// GET /matches/{id}
#[get("/matches/{id}")]
pub async fn detail(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let view = aggregate::get_match(state.matches.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /matches
#[post("/matches")]
pub async fn create(
    info: web::Json<CreateMatchReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let view = lifecycle::create_match(state.matches.as_ref(), info.into_inner()).await?;
    Ok(HttpResponse::Created().json(view))
}

/// POST /matches/{id}/join
#[post("/matches/{id}/join")]
pub async fn join(
    path: web::Path<Uuid>,
    info: web::Json<JoinReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let view =
        membership::join(state.matches.as_ref(), path.into_inner(), info.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /matches/{id}/leave
#[post("/matches/{id}/leave")]
pub async fn leave(
    path: web::Path<Uuid>,
    info: web::Json<LeaveReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    membership::leave(state.matches.as_ref(), path.into_inner(), info.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Left match" })))
}

/// DELETE /matches/{id}
#[delete("/matches/{id}")]
pub async fn remove(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    lifecycle::delete_match(state.matches.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Match deleted" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(detail)
        .service(create)
        .service(join)
        .service(leave)
        .service(remove);
}
