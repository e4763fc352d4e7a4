pub mod artists;
pub mod health;
pub mod shows;
pub mod venues;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Venue endpoints
        .route("/venues", get(venues::list_venues).post(venues::create_venue))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/:id",
            get(venues::get_venue_detail)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )
        .route("/venues/:id/edit", get(venues::get_venue))

        // Artist endpoints
        .route("/artists", get(artists::list_artists).post(artists::create_artist))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/:id",
            get(artists::get_artist_detail).put(artists::update_artist),
        )
        .route("/artists/:id/edit", get(artists::get_artist))

        // Show endpoints
        .route("/shows", get(shows::list_shows).post(shows::create_show))
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

/// Reject blank values for required text fields before touching the store.
fn require_text(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "required field(s) missing: {}",
            missing.join(", ")
        )))
    }
}
