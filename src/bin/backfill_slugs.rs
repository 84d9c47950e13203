//! One-off job: assign slugs to every event that is missing one.

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use league_portal::config::Config;
use league_portal::services::EventService;
use league_portal::store::PgStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    league_portal::init_tracing();

    let config = Config::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let events = EventService::new(Arc::new(PgStore::new(pool)), &config);

    match events.backfill_slugs().await {
        Ok(report) => {
            for row in &report.updated {
                println!("{}\t{}\t{}", row.id, row.slug, row.title);
            }
            for row in &report.failed {
                eprintln!("failed {}\t{}\t{}", row.id, row.title, row.error);
            }
            println!(
                "slug backfill: candidates={}, updated={}, skipped={}, failed={}",
                report.candidates,
                report.updated.len(),
                report.skipped.len(),
                report.failed.len()
            );
            if !report.failed.is_empty() {
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("slug backfill failed: {}", e);
            std::process::exit(1);
        }
    }
}
