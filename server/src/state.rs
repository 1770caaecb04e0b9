//! Shared handles injected into every handler via `web::Data<AppState>`.

use std::sync::Arc;
use std::time::Duration;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::db::match_repo::PgMatchStore;
use crate::db::memory::{MemoryMatchStore, MemoryUserStore};
use crate::db::user_repo::PgUserStore;
use crate::session::{MemorySessions, RedisSessions, SessionStore};
use crate::store::{MatchStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub matches: Arc<dyn MatchStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Present when running against Postgres; probed by `/healthz`.
    pub db: Option<PgPool>,
    /// Present when sessions live in Redis; probed by `/healthz`.
    pub redis: Option<RedisClient>,
}

impl AppState {
    /// Everything in-process.
    pub fn in_memory(session_ttl: Duration) -> Self {
        AppState {
            matches: Arc::new(MemoryMatchStore::new()),
            users: Arc::new(MemoryUserStore::new()),
            sessions: Arc::new(MemorySessions::new(session_ttl)),
            db: None,
            redis: None,
        }
    }

    /// Swap the match & user stores for Postgres.
    pub fn with_postgres(mut self, db: PgPool) -> Self {
        self.matches = Arc::new(PgMatchStore::new(db.clone()));
        self.users = Arc::new(PgUserStore::new(db.clone()));
        self.db = Some(db);
        self
    }

    /// Swap the session store for Redis.
    pub fn with_redis(mut self, redis: RedisClient, session_ttl: Duration) -> Self {
        self.sessions = Arc::new(RedisSessions::new(redis.clone(), session_ttl.as_secs()));
        self.redis = Some(redis);
        self
    }
}
