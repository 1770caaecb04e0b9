//! Redis-backed sessions, shared by every server instance.
//
//  Redis keys
//  ----------
//  session:<token>   – STRING user_id, EX = session TTL (re-armed by GETEX on resolve)

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient, Expiry};
use uuid::Uuid;

use super::{new_token, SessionStore};
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct RedisSessions {
    redis: RedisClient,
    ttl: u64,
}

impl RedisSessions {
    pub fn new(redis: RedisClient, ttl: u64) -> Self {
        Self { redis, ttl }
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessions {
    async fn issue(&self, user_id: Uuid) -> ApiResult<String> {
        let token = new_token();
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(Self::key(&token), user_id.to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> ApiResult<Option<Uuid>> {
        let key = Self::key(token);
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        // GETEX reads and slides the expiry in one step
        let raw: Option<String> = conn.get_ex(&key, Expiry::EX(self.ttl)).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let user_id = Uuid::parse_str(&raw)
            .map_err(|e| ApiError::internal(format!("corrupt session {key}: {e}")))?;
        Ok(Some(user_id))
    }

    async fn revoke(&self, token: &str) -> ApiResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::key(token)).await?;
        Ok(())
    }
}
