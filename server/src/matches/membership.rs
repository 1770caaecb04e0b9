//! Join / leave with capacity and duplicate checks.
//!
//! The rule itself lives in [`check_admission`]; stores call it from inside
//! their per-match critical section (`MatchStore::admit_player`).

use uuid::Uuid;

use crate::db::models::NewPlayer;
use crate::error::{ApiError, ApiResult};
use crate::matches::aggregate;
use crate::matches::types::{required, JoinReq, LeaveReq, MatchView};
use crate::metrics;
use crate::store::MatchStore;

/// Decide whether one more player fits. Capacity is checked before
/// duplicates, so a member re-joining a full match sees `Full`.
pub fn check_admission(players_needed: i32, current: i64, already_joined: bool) -> ApiResult<()> {
    if current >= i64::from(players_needed) {
        return Err(ApiError::Full);
    }
    if already_joined {
        return Err(ApiError::conflict("Player already joined this match"));
    }
    Ok(())
}

/// Admit `name` into the match and return the aggregate as of that join.
pub async fn join(store: &dyn MatchStore, match_id: Uuid, req: JoinReq) -> ApiResult<MatchView> {
    let res = try_join(store, match_id, req).await;
    metrics::record_membership("join", &res);
    res
}

/// Remove `name` from the match.
pub async fn leave(store: &dyn MatchStore, match_id: Uuid, req: LeaveReq) -> ApiResult<()> {
    let res = try_leave(store, match_id, req).await;
    metrics::record_membership("leave", &res);
    res
}

async fn try_join(store: &dyn MatchStore, match_id: Uuid, req: JoinReq) -> ApiResult<MatchView> {
    let player = NewPlayer {
        name: required(req.name, "name")?,
        contact: required(req.contact, "contact")?,
    };

    let admitted = store.admit_player(match_id, player).await?;
    log::info!("{} joined match {match_id}", admitted.player.name);

    Ok(aggregate::single(admitted.game, admitted.roster))
}

async fn try_leave(store: &dyn MatchStore, match_id: Uuid, req: LeaveReq) -> ApiResult<()> {
    let name = required(req.name, "name")?;

    if !store.remove_player(match_id, &name).await? {
        return Err(ApiError::not_found("Player not found in this match"));
    }
    log::info!("{name} left match {match_id}");
    Ok(())
}
