//! Single binary web server for the tournament API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! CLEANUP_INTERVAL_SECS, RETENTION_HOURS. Log level via RUST_LOG.

use actix_web::{get, web::Data, App, HttpResponse, HttpServer};
use chrono::Utc;
use playcore_tournaments::{api, ServerConfig, TournamentStore};

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(TournamentStore::new());

    // Background task: close ended tournaments and delete those past retention
    let state_cleanup = state.clone();
    let cleanup_interval = config.cleanup_interval;
    let retention = config.retention;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            match state_cleanup.sweep_expired(Utc::now(), retention) {
                Ok(report) if !report.is_empty() => log::info!(
                    "Cleanup: {} completed, {} cancelled, {} deleted ({} busy, retried later)",
                    report.completed,
                    report.cancelled,
                    report.deleted,
                    report.skipped
                ),
                Ok(_) => {}
                Err(e) => log::error!("Cleanup failed: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(favicon)
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
