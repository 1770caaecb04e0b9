//! Account endpoints (signup / login / me / logout)

use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::accounts::{self, LoginReq, SignUpReq};
use crate::error::ApiError;
use crate::state::AppState;

//////////////////////////////////////////////////
// ─────────────  BearerToken extractor  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use actix_web::{dev::Payload, FromRequest, HttpRequest};
    use futures_util::future::{ready, Ready};
    use std::convert::Infallible;

    /// The raw token from `Authorization: Bearer <token>`, if any.
    ///
    /// Never rejects on its own; handlers decide whether a missing token
    /// is an error.
    #[derive(Debug, Clone)]
    pub struct BearerToken(pub Option<String>);

    impl BearerToken {
        pub fn as_deref(&self) -> Option<&str> {
            self.0.as_deref()
        }
    }

    impl FromRequest for BearerToken {
        type Error = Infallible;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            ready(Ok(BearerToken(token)))
        }
    }
}
pub use extractor::BearerToken;

//////////////////////////////////////////////////
// POST /auth/signup
//////////////////////////////////////////////////
#[post("/auth/signup")]
pub async fn signup(
    info: web::Json<SignUpReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let res = accounts::sign_up(
        state.users.as_ref(),
        state.sessions.as_ref(),
        info.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(res))
}

//////////////////////////////////////////////////
// POST /auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    info: web::Json<LoginReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let res = accounts::login(
        state.users.as_ref(),
        state.sessions.as_ref(),
        info.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(res))
}

//////////////////////////////////////////////////
// GET /auth/me
//////////////////////////////////////////////////
#[get("/auth/me")]
pub async fn me(token: BearerToken, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let user = accounts::current_user(
        state.users.as_ref(),
        state.sessions.as_ref(),
        token.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

//////////////////////////////////////////////////
// POST /auth/logout
//////////////////////////////////////////////////
#[post("/auth/logout")]
pub async fn logout(
    token: BearerToken,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    accounts::logout(state.sessions.as_ref(), token.as_deref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(me)
        .service(logout);
}
