use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewUser, UserRow};
use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::store::UserStore;

const USER_COLUMNS: &str = "id, username, password_hash, name, contact, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, new: NewUser) -> ApiResult<UserRow> {
        sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, username, password_hash, name, contact, created_at)
             VALUES ($1,$2,$3,$4,$5,$6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(&new.contact)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Username already taken")
            } else {
                e.into()
            }
        })
    }

    async fn user_by_username(&self, username: &str) -> ApiResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn user_by_id(&self, user_id: Uuid) -> ApiResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
