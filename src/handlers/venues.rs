use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{require_text, SearchRequest};
use crate::{
    db::entities::venue,
    directory::{CityGroup, SearchResults, VenueDetail, VenueFields},
    error::Result,
    state::AppState,
};

fn validate(fields: &VenueFields) -> Result<()> {
    require_text(&[
        ("name", fields.name.as_str()),
        ("city", fields.city.as_str()),
        ("state", fields.state.as_str()),
        ("address", fields.address.as_str()),
    ])
}

/// Venues grouped by city
pub async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<CityGroup>>> {
    Ok(Json(state.store.list_venues_grouped_by_city().await?))
}

pub async fn search_venues(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResults>> {
    Ok(Json(state.store.search_venues(&request.search_term).await?))
}

pub async fn get_venue_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetail>> {
    Ok(Json(state.store.get_venue_detail(id).await?))
}

/// Current values for the edit form
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<venue::Model>> {
    Ok(Json(state.store.get_venue(id).await?))
}

pub async fn create_venue(
    State(state): State<AppState>,
    Json(fields): Json<VenueFields>,
) -> Result<(StatusCode, Json<venue::Model>)> {
    validate(&fields)?;
    let venue = state.store.create_venue(fields).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

pub async fn update_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(fields): Json<VenueFields>,
) -> Result<Json<venue::Model>> {
    validate(&fields)?;
    Ok(Json(state.store.update_venue(id, fields).await?))
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.store.delete_venue(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
