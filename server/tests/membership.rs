//! Join / leave / delete semantics against the in-process store.

use std::sync::Arc;

use async_trait::async_trait;
use pickup_server::db::memory::MemoryMatchStore;
use pickup_server::db::models::{Admission, MatchRow, NewMatch, NewPlayer, PlayerRow};
use pickup_server::error::{ApiError, ApiResult};
use pickup_server::matches::types::{CreateMatchReq, CreatorReq, JoinReq, LeaveReq, MatchView};
use pickup_server::matches::{aggregate, lifecycle, membership};
use pickup_server::store::MatchStore;
use uuid::Uuid;

async fn new_match(store: &dyn MatchStore, players_needed: i64) -> MatchView {
    lifecycle::create_match(
        store,
        CreateMatchReq {
            location: Some("Riverside court".into()),
            date: Some("2026-10-20".into()),
            time: None,
            players_needed: Some(players_needed),
            creator: Some(CreatorReq {
                name: Some("Alex".into()),
                contact: Some("alex@example.com".into()),
            }),
        },
    )
    .await
    .expect("create match")
}

fn join_req(name: &str) -> JoinReq {
    JoinReq {
        name: Some(name.into()),
        contact: Some(format!("{name}@example.com")),
    }
}

fn leave_req(name: &str) -> LeaveReq {
    LeaveReq {
        name: Some(name.into()),
    }
}

#[tokio::test]
async fn single_slot_match_admits_after_leave() {
    let store = MemoryMatchStore::new();
    let m = new_match(&store, 1).await;
    assert!(m.players.is_empty());

    let view = membership::join(&store, m.id, join_req("A")).await.unwrap();
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.players[0].name, "A");

    let err = membership::join(&store, m.id, join_req("B")).await.unwrap_err();
    assert!(matches!(err, ApiError::Full), "{err:?}");

    membership::leave(&store, m.id, leave_req("A")).await.unwrap();

    let view = membership::join(&store, m.id, join_req("B")).await.unwrap();
    let names: Vec<_> = view.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["B"]);
}

#[tokio::test]
async fn second_join_with_same_name_is_rejected() {
    let store = MemoryMatchStore::new();
    let m = new_match(&store, 5).await;

    membership::join(&store, m.id, join_req("Robin")).await.unwrap();
    let err = membership::join(&store, m.id, join_req("Robin"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Conflict(_)), "{err:?}");
    assert_eq!(store.player_rows(), 1);
}

#[tokio::test]
async fn leave_then_rejoin_same_name() {
    let store = MemoryMatchStore::new();
    let m = new_match(&store, 3).await;

    membership::join(&store, m.id, join_req("Kim")).await.unwrap();
    membership::leave(&store, m.id, leave_req("Kim")).await.unwrap();
    let view = membership::join(&store, m.id, join_req("Kim")).await.unwrap();

    assert_eq!(view.players.len(), 1);
}

#[tokio::test]
async fn leave_requires_existing_membership() {
    let store = MemoryMatchStore::new();
    let m = new_match(&store, 3).await;

    let err = membership::leave(&store, m.id, leave_req("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = membership::leave(&store, Uuid::new_v4(), leave_req("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn join_unknown_match_is_not_found() {
    let store = MemoryMatchStore::new();
    let err = membership::join(&store, Uuid::new_v4(), join_req("A"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn join_requires_name_and_contact() {
    let store = MemoryMatchStore::new();
    let m = new_match(&store, 3).await;

    let err = membership::join(
        &store,
        m.id,
        JoinReq {
            name: Some("A".into()),
            contact: Some("  ".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(store.player_rows(), 0);
}

#[tokio::test]
async fn deleting_a_match_removes_its_players() {
    let store = MemoryMatchStore::new();
    let keep = new_match(&store, 4).await;
    let doomed = new_match(&store, 4).await;

    for name in ["A", "B", "C"] {
        membership::join(&store, doomed.id, join_req(name)).await.unwrap();
    }
    membership::join(&store, keep.id, join_req("D")).await.unwrap();
    assert_eq!(store.player_rows(), 4);

    lifecycle::delete_match(&store, doomed.id).await.unwrap();

    assert_eq!(store.player_rows(), 1);
    assert!(store.players_of(&[doomed.id]).await.unwrap().is_empty());
    assert!(matches!(
        aggregate::get_match(&store, doomed.id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        lifecycle::delete_match(&store, doomed.id).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let store = MemoryMatchStore::new();
    let views = aggregate::list_matches(&store).await.unwrap();
    assert!(views.is_empty());
    assert_eq!(serde_json::to_string(&views).unwrap(), "[]");
}

#[tokio::test]
async fn unknown_match_is_not_found() {
    let store = MemoryMatchStore::new();
    let err = aggregate::get_match(&store, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn list_is_newest_first_with_players_in_join_order() {
    let store = MemoryMatchStore::new();
    let older = new_match(&store, 4).await;
    let newer = new_match(&store, 4).await;

    for name in ["first", "second", "third"] {
        membership::join(&store, older.id, join_req(name)).await.unwrap();
    }

    let views = aggregate::list_matches(&store).await.unwrap();
    let ids: Vec<_> = views.iter().map(|v| v.id).collect();
    assert_eq!(ids, [newer.id, older.id]);

    assert!(views[0].players.is_empty());
    let names: Vec<_> = views[1].players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_never_overbook() {
    let store = Arc::new(MemoryMatchStore::new());
    let m = new_match(&*store, 5).await;

    let match_id = m.id;
    let handles: Vec<_> = (0..40)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                membership::join(&*store, match_id, join_req(&format!("p{i}"))).await
            })
        })
        .collect();

    let mut admitted = 0;
    let mut full = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(view) => {
                assert!(view.players.len() <= 5);
                admitted += 1;
            }
            Err(ApiError::Full) => full += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(full, 35);
    let view = aggregate::get_match(&*store, m.id).await.unwrap();
    assert_eq!(view.players.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_joins_admit_once() {
    let store = Arc::new(MemoryMatchStore::new());
    let m = new_match(&*store, 10).await;

    let match_id = m.id;
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                membership::join(&*store, match_id, join_req("same")).await
            })
        })
        .collect();

    let mut ok = 0;
    for h in handles {
        if h.await.unwrap().is_ok() {
            ok += 1;
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(store.player_rows(), 1);
}

/// Deletes the match right after every successful admit, the way a
/// `DELETE /matches/:id` racing in behind the join would.
struct DeleteAfterAdmit(MemoryMatchStore);

#[async_trait]
impl MatchStore for DeleteAfterAdmit {
    async fn insert_match(&self, new: NewMatch) -> ApiResult<MatchRow> {
        self.0.insert_match(new).await
    }

    async fn delete_match(&self, match_id: Uuid) -> ApiResult<bool> {
        self.0.delete_match(match_id).await
    }

    async fn matches(&self) -> ApiResult<Vec<MatchRow>> {
        self.0.matches().await
    }

    async fn match_by_id(&self, match_id: Uuid) -> ApiResult<Option<MatchRow>> {
        self.0.match_by_id(match_id).await
    }

    async fn players_of(&self, match_ids: &[Uuid]) -> ApiResult<Vec<PlayerRow>> {
        self.0.players_of(match_ids).await
    }

    async fn admit_player(&self, match_id: Uuid, player: NewPlayer) -> ApiResult<Admission> {
        let admitted = self.0.admit_player(match_id, player).await?;
        self.0.delete_match(match_id).await?;
        Ok(admitted)
    }

    async fn remove_player(&self, match_id: Uuid, name: &str) -> ApiResult<bool> {
        self.0.remove_player(match_id, name).await
    }
}

#[tokio::test]
async fn join_reports_the_roster_it_committed() {
    let store = DeleteAfterAdmit(MemoryMatchStore::new());
    let m = new_match(&store, 3).await;
    membership::join(&store.0, m.id, join_req("A")).await.unwrap();

    // the match is gone by the time join returns, yet the answer reflects the write
    let view = membership::join(&store, m.id, join_req("B")).await.unwrap();
    assert_eq!(view.id, m.id);
    let names: Vec<_> = view.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);

    let err = aggregate::get_match(&store, m.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "{err:?}");
}
