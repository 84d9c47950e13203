//! League portal API: events with shareable slugs, team rosters, public
//! event registration and an organizer notification feed, served over axum
//! and backed by Postgres.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "league_portal=info,tower_http=info";

/// Install the global tracing subscriber, honouring `RUST_LOG` when set.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
