pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Listings
        .route("/listings/create", post(handlers::create_listing))
        .route("/listings/get", get(handlers::search_listings))
        .route("/listings/get/{id}", get(handlers::get_listing))
        .route("/listings/update/{id}", post(handlers::update_listing))
        .route("/listings/delete/{id}", delete(handlers::delete_listing))
        // Users & favourites
        .route("/users/create", post(handlers::create_user))
        .route("/favourites/add", post(handlers::add_favourite))
        .route("/favourites/remove", post(handlers::remove_favourite))
        .route("/favourites/{user_id}", get(handlers::get_favourites))
        .route("/favourites/{user_id}/all", get(handlers::all_favourites))
        // Health check
        .route("/healthcheck", get(handlers::healthcheck))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
