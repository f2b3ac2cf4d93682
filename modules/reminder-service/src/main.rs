//! Reminder Service — standalone binary storing reminders in a JSON file.
//!
//! Serves `GET /api/reminders`, `POST /api/add` and `POST /api/delete`.
//! Default: http://0.0.0.0:8080/

mod config;
mod id;
mod routes;
mod service;
mod store;

use config::Config;
use routes::AppState;
use service::ReminderService;
use std::sync::Arc;
use std::time::Instant;
use store::RecordStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Using reminder store at: {}", config.data_path.display());
    let store = Arc::new(RecordStore::new(&config.data_path));

    let state = Arc::new(AppState {
        reminders: ReminderService::new(store),
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    let addr = config.listen_addr();
    log::info!("Reminder Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
