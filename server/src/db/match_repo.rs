//! Postgres-backed match & membership storage.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Admission, MatchRow, NewMatch, NewPlayer, PlayerRow};
use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::matches::membership::check_admission;
use crate::store::MatchStore;

const MATCH_COLUMNS: &str =
    "id, location, date, time, players_needed, creator_name, creator_contact, created_at";
const PLAYER_COLUMNS: &str = "id, match_id, name, contact, joined_at";

#[derive(Clone)]
pub struct PgMatchStore {
    db: PgPool,
}

impl PgMatchStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn insert_match(&self, new: NewMatch) -> ApiResult<MatchRow> {
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "INSERT INTO matches (id, location, date, time, players_needed,
                                  creator_name, creator_contact, created_at)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
             RETURNING {MATCH_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.location)
        .bind(new.date)
        .bind(new.time)
        .bind(new.players_needed)
        .bind(&new.creator_name)
        .bind(&new.creator_contact)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_match(&self, match_id: Uuid) -> ApiResult<bool> {
        // players go with it (ON DELETE CASCADE)
        let rows = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn matches(&self) -> ApiResult<Vec<MatchRow>> {
        let rows = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn match_by_id(&self, match_id: Uuid) -> ApiResult<Option<MatchRow>> {
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
        ))
        .bind(match_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn players_of(&self, match_ids: &[Uuid]) -> ApiResult<Vec<PlayerRow>> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS}
               FROM players
              WHERE match_id = ANY($1)
              ORDER BY joined_at, id"
        ))
        .bind(match_ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn admit_player(&self, match_id: Uuid, player: NewPlayer) -> ApiResult<Admission> {
        let mut tx = self.db.begin().await?;

        // 1) lock the match row; concurrent joins for this match queue here
        let game = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 FOR UPDATE"
        ))
        .bind(match_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(game) = game else {
            tx.rollback().await.ok();
            return Err(ApiError::not_found("Match not found"));
        };

        // 2) current roster
        let mut roster = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS}
               FROM players
              WHERE match_id = $1
              ORDER BY joined_at, id"
        ))
        .bind(match_id)
        .fetch_all(&mut *tx)
        .await?;

        let already_joined = roster.iter().any(|p| p.name == player.name);
        let current = roster.len() as i64;
        if let Err(e) = check_admission(game.players_needed, current, already_joined) {
            tx.rollback().await.ok();
            return Err(e);
        }

        // 3) insert
        let row = match sqlx::query_as::<_, PlayerRow>(&format!(
            "INSERT INTO players (id, match_id, name, contact, joined_at)
             VALUES ($1,$2,$3,$4,$5)
             RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(match_id)
        .bind(&player.name)
        .bind(&player.contact)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await.ok();
                return Err(ApiError::conflict("Player already joined this match"));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        // the row lock held the roster still; this is the post-insert state
        roster.push(row.clone());
        Ok(Admission {
            player: row,
            game,
            roster,
        })
    }

    async fn remove_player(&self, match_id: Uuid, name: &str) -> ApiResult<bool> {
        let rows = sqlx::query("DELETE FROM players WHERE match_id = $1 AND name = $2")
            .bind(match_id)
            .bind(name)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
