use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{require_text, SearchRequest};
use crate::{
    db::entities::artist,
    directory::{ArtistDetail, ArtistFields, ArtistListing, SearchResults},
    error::Result,
    state::AppState,
};

fn validate(fields: &ArtistFields) -> Result<()> {
    require_text(&[
        ("name", fields.name.as_str()),
        ("city", fields.city.as_str()),
        ("state", fields.state.as_str()),
    ])
}

pub async fn list_artists(State(state): State<AppState>) -> Result<Json<Vec<ArtistListing>>> {
    Ok(Json(state.store.list_artists().await?))
}

pub async fn search_artists(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResults>> {
    Ok(Json(state.store.search_artists(&request.search_term).await?))
}

pub async fn get_artist_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetail>> {
    Ok(Json(state.store.get_artist_detail(id).await?))
}

pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<artist::Model>> {
    Ok(Json(state.store.get_artist(id).await?))
}

pub async fn create_artist(
    State(state): State<AppState>,
    Json(fields): Json<ArtistFields>,
) -> Result<(StatusCode, Json<artist::Model>)> {
    validate(&fields)?;
    let artist = state.store.create_artist(fields).await?;
    Ok((StatusCode::CREATED, Json(artist)))
}

pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(fields): Json<ArtistFields>,
) -> Result<Json<artist::Model>> {
    validate(&fields)?;
    Ok(Json(state.store.update_artist(id, fields).await?))
}
