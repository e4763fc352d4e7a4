use axum::{extract::State, http::StatusCode, Json};

use crate::{
    db::entities::show,
    directory::{NewShow, ShowListing},
    error::Result,
    state::AppState,
};

pub async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<ShowListing>>> {
    Ok(Json(state.store.list_shows().await?))
}

pub async fn create_show(
    State(state): State<AppState>,
    Json(new_show): Json<NewShow>,
) -> Result<(StatusCode, Json<show::Model>)> {
    let show = state.store.create_show(new_show).await?;
    Ok((StatusCode::CREATED, Json(show)))
}
