//! Opaque bearer tokens → user ids.
//!
//! Sessions expire after `SESSION_TTL` seconds of inactivity; every
//! successful `resolve` pushes the deadline out again.

mod memory;
mod redis_store;

pub use self::memory::MemorySessions;
pub use self::redis_store::RedisSessions;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiResult;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a fresh token bound to `user_id`.
    async fn issue(&self, user_id: Uuid) -> ApiResult<String>;

    /// The user behind `token`, if the session is still live.
    async fn resolve(&self, token: &str) -> ApiResult<Option<Uuid>>;

    /// Forget `token`. Unknown tokens are ignored.
    async fn revoke(&self, token: &str) -> ApiResult<()>;
}

/// Random, unguessable token string.
pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}
