//! Match creation / deletion.

use uuid::Uuid;

use crate::db::models::NewMatch;
use crate::error::{ApiError, ApiResult};
use crate::matches::types::{
    parse_date, parse_time, present, required, CreateMatchReq, MatchView, MAX_PLAYERS_NEEDED,
};
use crate::store::MatchStore;

/// Check a creation request and turn it into a row to insert.
pub fn validate(req: CreateMatchReq) -> ApiResult<NewMatch> {
    let location = required(req.location, "location")?;
    let date = parse_date(&required(req.date, "date")?)?;
    let time = present(req.time).as_deref().map(parse_time).transpose()?;

    let players_needed = req
        .players_needed
        .ok_or_else(|| ApiError::validation("playersNeeded is required"))?;
    if !(1..=MAX_PLAYERS_NEEDED).contains(&players_needed) {
        return Err(ApiError::validation(format!(
            "playersNeeded must be between 1 and {MAX_PLAYERS_NEEDED}"
        )));
    }

    let creator = req.creator.unwrap_or_default();
    let creator_name = required(creator.name, "creator name")?;
    let creator_contact = required(creator.contact, "creator contact")?;

    Ok(NewMatch {
        location,
        date,
        time,
        players_needed: players_needed as i32,
        creator_name,
        creator_contact,
    })
}

/// Insert a new match; it starts with no players.
pub async fn create_match(store: &dyn MatchStore, req: CreateMatchReq) -> ApiResult<MatchView> {
    let new = validate(req)?;
    let row = store.insert_match(new).await?;
    log::info!(
        "match {} created at {} for {} players",
        row.id,
        row.location,
        row.players_needed
    );
    Ok(MatchView::new(row, Vec::new()))
}

/// Delete a match together with its players.
pub async fn delete_match(store: &dyn MatchStore, match_id: Uuid) -> ApiResult<()> {
    if !store.delete_match(match_id).await? {
        return Err(ApiError::not_found("Match not found"));
    }
    log::info!("match {match_id} deleted");
    Ok(())
}
