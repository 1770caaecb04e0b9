// tests/redis_sessions.rs
//
// Session round-trips against a real Redis. Needs REDIS_URL (e.g. from
// .env); without it every test returns early.

use dotenvy::dotenv;
use pickup_server::session::{RedisSessions, SessionStore};
use redis::AsyncCommands;
use uuid::Uuid;

fn client() -> Option<redis::Client> {
    dotenv().ok();
    let url = std::env::var("REDIS_URL").ok()?;
    Some(redis::Client::open(url).expect("bad REDIS_URL"))
}

#[tokio::test]
async fn resolve_rearms_expiry_and_revoke_forgets() {
    let Some(client) = client() else { return };
    let sessions = RedisSessions::new(client.clone(), 600);
    let user = Uuid::new_v4();
    let token = sessions.issue(user).await.unwrap();

    let key = format!("session:{token}");
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: () = conn.expire(&key, 5).await.unwrap();

    assert_eq!(sessions.resolve(&token).await.unwrap(), Some(user));
    let ttl: i64 = conn.ttl(&key).await.unwrap();
    assert!(ttl > 5, "expiry not slid: {ttl}");

    sessions.revoke(&token).await.unwrap();
    assert_eq!(sessions.resolve(&token).await.unwrap(), None);
}
