mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;

use axum::{
    routing::{get, post},
    Router,
    middleware::from_fn_with_state,
};
use tower_http::services::ServeDir;
use crate::{
    services::{AuthService, FileStore, HabitService},
    config::Config,
};
use tracing_subscriber;

#[tokio::main]
async fn main() {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().expect("Failed to load configuration");
    let config_state = config.clone();

    // Open the persistent store
    let store = FileStore::open(&config.store.data_dir)
        .expect("Failed to open data directory");

    // Construct the two services; habits read the auth session to compute
    // the visible subset
    let auth_service = AuthService::new(store.clone());
    let habit_service = HabitService::new(store, auth_service.clone());

    // Create router with all routes
    let app = Router::new()
        // Auth routes
        .route("/", get(handlers::serve_login_page))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))

        // Habit routes
        .route("/habits/add", post(handlers::handle_add_habit))
        .route("/toggle/:habit_id/:day_index", get(handlers::handle_toggle_day))
        .route("/delete/:habit_id", get(handlers::handle_delete_habit))

        // Dashboard routes
        .route("/dashboard", get(handlers::serve_dashboard))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Add middleware
        .layer(from_fn_with_state(auth_service.clone(), middleware::require_auth))

        // Add state
        .with_state((auth_service, habit_service, config_state));

    println!("Server running");
    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", config.server.host, config.server.port)
    )
    .await
    .expect("Failed to bind server");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Failed to start server");
}
