//! In-process stores with the same constraints as the SQL schema.
//!
//! Used by the test-suite and when the server starts without `DATABASE_URL`.
//! Each match's roster sits in its own `DashMap` entry, so holding that entry
//! mutably is the per-match lock `admit_player` needs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::db::models::{Admission, MatchRow, NewMatch, NewPlayer, NewUser, PlayerRow, UserRow};
use crate::error::{ApiError, ApiResult};
use crate::matches::membership::check_admission;
use crate::store::{MatchStore, UserStore};

struct MatchEntry {
    /// insertion order; breaks `created_at` ties
    seq: u64,
    row: MatchRow,
    players: Vec<PlayerRow>,
}

#[derive(Default)]
pub struct MemoryMatchStore {
    matches: DashMap<Uuid, MatchEntry>,
    next_seq: AtomicU64,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total membership rows across all matches.
    pub fn player_rows(&self) -> usize {
        self.matches.iter().map(|e| e.players.len()).sum()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn insert_match(&self, new: NewMatch) -> ApiResult<MatchRow> {
        if !(1..=20).contains(&new.players_needed) {
            return Err(ApiError::internal("players_needed violates check constraint"));
        }

        let row = MatchRow {
            id: Uuid::new_v4(),
            location: new.location,
            date: new.date,
            time: new.time,
            players_needed: new.players_needed,
            creator_name: new.creator_name,
            creator_contact: new.creator_contact,
            created_at: Utc::now(),
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.matches.insert(
            row.id,
            MatchEntry {
                seq,
                row: row.clone(),
                players: Vec::new(),
            },
        );
        Ok(row)
    }

    async fn delete_match(&self, match_id: Uuid) -> ApiResult<bool> {
        Ok(self.matches.remove(&match_id).is_some())
    }

    async fn matches(&self) -> ApiResult<Vec<MatchRow>> {
        let mut rows: Vec<(u64, MatchRow)> = self
            .matches
            .iter()
            .map(|e| (e.seq, e.row.clone()))
            .collect();
        rows.sort_by(|(sa, a), (sb, b)| b.created_at.cmp(&a.created_at).then(sb.cmp(sa)));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn match_by_id(&self, match_id: Uuid) -> ApiResult<Option<MatchRow>> {
        Ok(self.matches.get(&match_id).map(|e| e.row.clone()))
    }

    async fn players_of(&self, match_ids: &[Uuid]) -> ApiResult<Vec<PlayerRow>> {
        let mut rows: Vec<PlayerRow> = match_ids
            .iter()
            .filter_map(|id| self.matches.get(id))
            .flat_map(|e| e.players.clone())
            .collect();
        rows.sort_by_key(|p| p.joined_at);
        Ok(rows)
    }

    async fn admit_player(&self, match_id: Uuid, player: NewPlayer) -> ApiResult<Admission> {
        let mut entry = self
            .matches
            .get_mut(&match_id)
            .ok_or_else(|| ApiError::not_found("Match not found"))?;

        let already_joined = entry.players.iter().any(|p| p.name == player.name);
        check_admission(
            entry.row.players_needed,
            entry.players.len() as i64,
            already_joined,
        )?;

        let row = PlayerRow {
            id: Uuid::new_v4(),
            match_id,
            name: player.name,
            contact: player.contact,
            joined_at: Utc::now(),
        };
        entry.players.push(row.clone());
        Ok(Admission {
            player: row,
            game: entry.row.clone(),
            roster: entry.players.clone(),
        })
    }

    async fn remove_player(&self, match_id: Uuid, name: &str) -> ApiResult<bool> {
        let Some(mut entry) = self.matches.get_mut(&match_id) else {
            return Ok(false);
        };
        let before = entry.players.len();
        entry.players.retain(|p| p.name != name);
        Ok(entry.players.len() < before)
    }
}

/// Users keyed by username; the map key is the uniqueness constraint.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRow>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new: NewUser) -> ApiResult<UserRow> {
        match self.users.entry(new.username.clone()) {
            Entry::Occupied(_) => Err(ApiError::conflict("Username already taken")),
            Entry::Vacant(slot) => {
                let row = UserRow {
                    id: Uuid::new_v4(),
                    username: new.username,
                    password_hash: new.password_hash,
                    name: new.name,
                    contact: new.contact,
                    created_at: Utc::now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn user_by_username(&self, username: &str) -> ApiResult<Option<UserRow>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn user_by_id(&self, user_id: Uuid) -> ApiResult<Option<UserRow>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.value().clone()))
    }
}
