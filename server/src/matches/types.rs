use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{MatchRow, PlayerRow};
use crate::error::{ApiError, ApiResult};

/// Upper bound on a match's player quota (mirrored by the schema CHECK).
pub const MAX_PLAYERS_NEEDED: i64 = 20;

//////////////////////////////////////////////////
// Aggregate (response) types
//////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub joined_at: DateTime<Utc>,
}

/// A match plus its players ordered by join time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: Uuid,
    pub location: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub players_needed: i32,
    pub creator: Creator,
    pub created_at: DateTime<Utc>,
    pub players: Vec<PlayerView>,
}

impl MatchView {
    pub fn new(row: MatchRow, players: Vec<PlayerView>) -> Self {
        MatchView {
            id: row.id,
            location: row.location,
            date: row.date,
            time: row.time,
            players_needed: row.players_needed,
            creator: Creator {
                name: row.creator_name,
                contact: row.creator_contact,
            },
            created_at: row.created_at,
            players,
        }
    }
}

impl From<PlayerRow> for PlayerView {
    fn from(row: PlayerRow) -> Self {
        PlayerView {
            id: row.id,
            name: row.name,
            contact: row.contact,
            joined_at: row.joined_at,
        }
    }
}

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

// Every field is optional on the wire so a missing one becomes a
// `Validation` error with a readable message instead of a serde failure.

#[derive(Debug, Default, Deserialize)]
pub struct CreatorReq {
    pub name: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchReq {
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub players_needed: Option<i64>,
    pub creator: Option<CreatorReq>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JoinReq {
    pub name: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaveReq {
    pub name: Option<String>,
}

/// Trimmed, non-empty value or `None`.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed, non-empty value or a `Validation` error naming the field.
pub fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    present(value).ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("date must be formatted YYYY-MM-DD"))
}

pub fn parse_time(raw: &str) -> ApiResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ApiError::validation("time must be formatted HH:MM"))
}
