//! Process-local sessions for tests and single-instance dev runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use uuid::Uuid;

use super::{new_token, SessionStore};
use crate::error::ApiResult;

struct Session {
    user_id: Uuid,
    expires_at: Instant,
}

/// Every this many issues, expired sessions are swept out.
const SWEEP_EVERY: u64 = 64;

pub struct MemorySessions {
    sessions: DashMap<String, Session>,
    ttl: Duration,
    issued: AtomicU64,
}

impl MemorySessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            issued: AtomicU64::new(0),
        }
    }

    /// Live session count.
    pub fn len(&self) -> usize {
        self.sweep();
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.sessions.retain(|_, s| s.expires_at > now);
    }
}

#[async_trait]
impl SessionStore for MemorySessions {
    async fn issue(&self, user_id: Uuid) -> ApiResult<String> {
        // tokens nobody resolves again would otherwise stay forever
        if self.issued.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep();
        }

        let token = new_token();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> ApiResult<Option<Uuid>> {
        let now = Instant::now();
        let Some(mut session) = self.sessions.get_mut(token) else {
            return Ok(None);
        };
        if session.expires_at <= now {
            drop(session);
            self.sessions.remove(token);
            return Ok(None);
        }
        session.expires_at = now + self.ttl;
        Ok(Some(session.user_id))
    }

    async fn revoke(&self, token: &str) -> ApiResult<()> {
        self.sessions.remove(token);
        Ok(())
    }
}
