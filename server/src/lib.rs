//! Pickup: organise informal matches, join and leave them.

pub mod accounts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod password;
pub mod session;
pub mod state;
pub mod store;

pub mod db {
    pub mod match_repo;
    pub mod memory;
    pub mod models;
    pub mod user_repo;
}

pub mod matches {
    pub mod aggregate;
    pub mod lifecycle;
    pub mod membership;
    pub mod types;
}

pub mod http {
    pub mod auth;
    pub mod health;
    pub mod matches;
    pub mod routes;
}
