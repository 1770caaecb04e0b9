//! Sign-up / login / logout / who-am-I.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{NewUser, UserRow};
use crate::error::{ApiError, ApiResult};
use crate::matches::types::required;
use crate::password;
use crate::session::SessionStore;
use crate::store::UserStore;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Debug, Default, Deserialize)]
pub struct SignUpReq {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginReq {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public face of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserView {
    fn from(row: UserRow) -> Self {
        UserView {
            id: row.id,
            username: row.username,
            name: row.name,
            contact: row.contact,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

//////////////////////////////////////////////////
// Operations
//////////////////////////////////////////////////

fn required_password(value: Option<String>) -> ApiResult<String> {
    value
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("password is required"))
}

pub async fn sign_up(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    req: SignUpReq,
) -> ApiResult<AuthResponse> {
    let username = required(req.username, "username")?;
    let plain = required_password(req.password)?;
    let name = required(req.name, "name")?;
    let contact = required(req.contact, "contact")?;

    // cheap pre-check; the store still enforces uniqueness on insert
    if users.user_by_username(&username).await?.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }

    let password_hash = hash_off_thread(plain).await?;
    let user = users
        .create_user(NewUser {
            username,
            password_hash,
            name,
            contact,
        })
        .await?;

    let token = sessions.issue(user.id).await?;
    log::info!("user {} signed up as {}", user.id, user.username);

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn login(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    req: LoginReq,
) -> ApiResult<AuthResponse> {
    let username = required(req.username, "username")?;
    let plain = required_password(req.password)?;

    let invalid = || ApiError::Unauthorized("Invalid username or password".into());

    let user = users.user_by_username(&username).await?.ok_or_else(invalid)?;
    if !verify_off_thread(plain, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = sessions.issue(user.id).await?;
    log::info!("user {} logged in", user.id);

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Drop the session behind `token`; no token is not an error.
pub async fn logout(sessions: &dyn SessionStore, token: Option<&str>) -> ApiResult<()> {
    if let Some(token) = token {
        sessions.revoke(token).await?;
    }
    Ok(())
}

pub async fn current_user(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    token: Option<&str>,
) -> ApiResult<UserView> {
    let token = token.ok_or(ApiError::Unauthenticated)?;
    let user_id = sessions
        .resolve(token)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    users
        .user_by_id(user_id)
        .await?
        .map(UserView::from)
        .ok_or(ApiError::Unauthenticated)
}

// Argon2 runs on the blocking pool, never on an async worker.

async fn hash_off_thread(plain: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash(&plain))
        .await
        .map_err(|e| ApiError::internal(format!("hashing task failed: {e}")))?
        .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))
}

async fn verify_off_thread(plain: String, stored: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify(&plain, &stored))
        .await
        .map_err(|e| ApiError::internal(format!("verify task failed: {e}")))
}
