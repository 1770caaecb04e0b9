//! Read side: matches joined with their players.

use std::collections::HashMap;

use uuid::Uuid;

use crate::db::models::{MatchRow, PlayerRow};
use crate::error::{ApiError, ApiResult};
use crate::matches::types::{MatchView, PlayerView};
use crate::store::MatchStore;

/// Every match, newest first, each with its players in join order.
pub async fn list_matches(store: &dyn MatchStore) -> ApiResult<Vec<MatchView>> {
    let rows = store.matches().await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|m| m.id).collect();
    let players = store.players_of(&ids).await?;
    Ok(assemble(rows, players))
}

/// One match aggregate, or `NotFound`.
pub async fn get_match(store: &dyn MatchStore, match_id: Uuid) -> ApiResult<MatchView> {
    let row = store
        .match_by_id(match_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Match not found"))?;

    let players = store.players_of(&[match_id]).await?;
    Ok(single(row, players))
}

/// Aggregate for one match from rows already in hand.
pub fn single(row: MatchRow, players: Vec<PlayerRow>) -> MatchView {
    assemble(vec![row], players).remove(0)
}

/// Group player rows under their matches.
///
/// Match order is preserved as given; players are sorted by `joined_at`
/// (stable, so equal timestamps keep store order). A match without players
/// gets an empty list.
pub fn assemble(matches: Vec<MatchRow>, players: Vec<PlayerRow>) -> Vec<MatchView> {
    let mut by_match: HashMap<Uuid, Vec<PlayerRow>> = HashMap::new();
    for p in players {
        by_match.entry(p.match_id).or_default().push(p);
    }

    matches
        .into_iter()
        .map(|m| {
            let mut rows = by_match.remove(&m.id).unwrap_or_default();
            rows.sort_by_key(|p| p.joined_at);
            let players = rows.into_iter().map(PlayerView::from).collect();
            MatchView::new(m, players)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn match_row(id: Uuid) -> MatchRow {
        MatchRow {
            id,
            location: "Park".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            time: None,
            players_needed: 4,
            creator_name: "Sam".into(),
            creator_contact: "sam@example.com".into(),
            created_at: Utc::now(),
        }
    }

    fn player_row(match_id: Uuid, name: &str, offset_secs: i64) -> PlayerRow {
        PlayerRow {
            id: Uuid::new_v4(),
            match_id,
            name: name.into(),
            contact: format!("{name}@example.com"),
            joined_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn players_are_grouped_and_ordered() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let players = vec![
            player_row(a, "late", 10),
            player_row(b, "other", 0),
            player_row(a, "early", -10),
        ];

        let views = assemble(vec![match_row(a), match_row(b)], players);

        assert_eq!(views[0].id, a);
        let names: Vec<_> = views[0].players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["early", "late"]);
        assert_eq!(views[1].players.len(), 1);
    }

    #[test]
    fn match_without_players_gets_empty_list() {
        let id = Uuid::new_v4();
        let views = assemble(vec![match_row(id)], Vec::new());
        assert!(views[0].players.is_empty());

        let json = serde_json::to_value(&views[0]).unwrap();
        assert_eq!(json["players"], serde_json::json!([]));
        assert_eq!(json["playersNeeded"], 4);
    }
}
