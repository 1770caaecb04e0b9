//! Storage contracts.
//!
//! Two implementations live under `db/`: Postgres (`match_repo`, `user_repo`)
//! and the in-process store (`memory`) used by tests and database-less runs.
//! Both must honour the same constraints the SQL schema enforces.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Admission, MatchRow, NewMatch, NewPlayer, NewUser, PlayerRow, UserRow};
use crate::error::ApiResult;

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn insert_match(&self, new: NewMatch) -> ApiResult<MatchRow>;

    /// Deletes the match and, by cascade, its players. `false` if absent.
    async fn delete_match(&self, match_id: Uuid) -> ApiResult<bool>;

    /// All matches, newest `created_at` first.
    async fn matches(&self) -> ApiResult<Vec<MatchRow>>;

    async fn match_by_id(&self, match_id: Uuid) -> ApiResult<Option<MatchRow>>;

    /// Players of the given matches, ordered by `joined_at`.
    async fn players_of(&self, match_ids: &[Uuid]) -> ApiResult<Vec<PlayerRow>>;

    /// Admit a player into a match as one atomic step: lock the match, count
    /// its players, run [`check_admission`](crate::matches::membership::check_admission),
    /// insert, read back the roster. Two concurrent calls for the same match
    /// never both pass the capacity check, and the returned roster is the one
    /// this insert produced.
    async fn admit_player(&self, match_id: Uuid, player: NewPlayer) -> ApiResult<Admission>;

    /// Removes the `(match_id, name)` membership. `false` if absent.
    async fn remove_player(&self, match_id: Uuid, name: &str) -> ApiResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` if the username is taken.
    async fn create_user(&self, new: NewUser) -> ApiResult<UserRow>;

    async fn user_by_username(&self, username: &str) -> ApiResult<Option<UserRow>>;

    async fn user_by_id(&self, user_id: Uuid) -> ApiResult<Option<UserRow>>;
}
