use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub location: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub players_needed: i32,
    pub creator_name: String,
    pub creator_contact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: Uuid,
    pub match_id: Uuid,
    pub name: String,
    pub contact: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new match row.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub location: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub players_needed: i32,
    pub creator_name: String,
    pub creator_contact: String,
}

/// Validated input for a membership row.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub contact: String,
}

/// Result of a successful join: the new membership plus the match and its
/// full roster as they stood when the join committed.
#[derive(Debug, Clone)]
pub struct Admission {
    pub player: PlayerRow,
    pub game: MatchRow,
    pub roster: Vec<PlayerRow>,
}
