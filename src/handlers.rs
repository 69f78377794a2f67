use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::*;
use crate::AppState;

// === Listing endpoints ===

pub async fn create_listing(
    State(state): State<AppState>,
    Json(req): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<Listing>)> {
    let listing = state.db.create_listing(req)?;
    Ok((StatusCode::CREATED, Json(listing)))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>> {
    let listing = state.db.get_listing(&id)?.ok_or(AppError::ListingNotFound)?;
    Ok(Json(listing))
}

pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateListingRequest>,
) -> Result<Json<Listing>> {
    let listing = state
        .db
        .update_listing(&id, &req)?
        .ok_or(AppError::ListingNotFound)?;
    Ok(Json(listing))
}

pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>> {
    if !state.db.delete_listing(&id)? {
        return Err(AppError::ListingNotFound);
    }
    Ok(Json("Listing has been deleted"))
}

pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Listing>>> {
    let query = params.normalize();
    let listings = state.db.search_listings(&query)?;
    Ok(Json(listings))
}

// === User endpoints ===

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.db.create_user(&req.username, &req.email)?;
    Ok((StatusCode::CREATED, Json(user)))
}

// === Favourites endpoints ===

pub async fn add_favourite(
    State(state): State<AppState>,
    Json(req): Json<FavouriteRequest>,
) -> Result<Json<FavouriteUpdateResponse>> {
    let user = state
        .db
        .add_favourite(&req.user_id, &req.property_id)?
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(FavouriteUpdateResponse { success: true, user }))
}

pub async fn remove_favourite(
    State(state): State<AppState>,
    Json(req): Json<FavouriteRequest>,
) -> Result<Json<FavouriteUpdateResponse>> {
    let user = state
        .db
        .remove_favourite(&req.user_id, &req.property_id)?
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(FavouriteUpdateResponse { success: true, user }))
}

pub async fn get_favourites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<FavouritesResponse>> {
    let user = state.db.get_user(&user_id)?.ok_or(AppError::UserNotFound)?;
    let favourites = state.db.favourite_listings(&user)?;
    Ok(Json(FavouritesResponse { success: true, favourites }))
}

pub async fn all_favourites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(scope): Query<FavouritesScope>,
) -> Result<Json<AllFavouritesResponse>> {
    let user = state.db.get_user(&user_id)?.ok_or(AppError::UserNotFound)?;

    let filter = ListingFilter {
        kind: scope.kind_filter(),
        ..ListingFilter::default()
    };
    let candidates = state.db.find_listings(&filter)?;
    let properties = flag_favourites(candidates, &user.favourites);

    Ok(Json(AllFavouritesResponse { success: true, properties }))
}

/// Marks each listing with whether its id appears in `favourite_ids`,
/// preserving the input order.
fn flag_favourites(listings: Vec<Listing>, favourite_ids: &[String]) -> Vec<FlaggedListing> {
    let favourites: HashSet<&str> = favourite_ids.iter().map(String::as_str).collect();
    listings
        .into_iter()
        .map(|listing| {
            let is_favourite = favourites.contains(listing.id.as_str());
            FlaggedListing { listing, is_favourite }
        })
        .collect()
}

// === Health check ===

pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "state": "OK" }))
}
