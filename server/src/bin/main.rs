use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use pickup_server::config::settings;
use pickup_server::state::AppState;
use pickup_server::{http, metrics};
use redis::Client as RedisClient;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = settings();
    let session_ttl = Duration::from_secs(cfg.session_ttl);
    let mut state = AppState::in_memory(session_ttl);

    // Postgres pool + schema
    match &cfg.database_url {
        Some(url) => {
            let db_pool = PgPoolOptions::new()
                .max_connections(cfg.db_max_connections)
                .connect(url)
                .await
                .context("connecting to Postgres")?;
            sqlx::migrate!("./migrations")
                .run(&db_pool)
                .await
                .context("running migrations")?;
            state = state.with_postgres(db_pool);
        }
        None => log::warn!("DATABASE_URL not set; matches and users are kept in memory"),
    }

    // Redis sessions
    match &cfg.redis_url {
        Some(url) => {
            let redis_client = RedisClient::open(url.as_str()).context("invalid REDIS_URL")?;
            state = state.with_redis(redis_client, session_ttl);
        }
        None => log::warn!("REDIS_URL not set; sessions are lost on restart"),
    }

    log::info!("listening on {}", cfg.server_addr);

    let state = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(state.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&cfg.server_addr)?
    .run()
    .await?;

    Ok(())
}
