//! Test utilities for Fyyur
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - A manually driven clock
//! - AppState factories
//! - Test data generators

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

use crate::{
    config::Config,
    db::{
        entities::{artist, show, venue},
        types::Genres,
    },
    directory::{ArtistFields, DirectoryStore, ManualClock, NewShow, VenueFields},
    state::AppState,
};

/// Fixed starting instant for tests that need a deterministic "now"
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap()
}

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // Run all migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a store over a fresh database, driven by a manual clock set to [`test_now`]
pub async fn setup_test_store() -> (DirectoryStore, Arc<ManualClock>) {
    let db = setup_test_db().await;
    let clock = Arc::new(ManualClock::new(test_now()));
    (DirectoryStore::new(db, clock.clone()), clock)
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
    }
}

/// Create a complete test AppState with an isolated database
pub async fn setup_test_app_state() -> (AppState, Arc<ManualClock>) {
    let db = setup_test_db().await;
    let clock = Arc::new(ManualClock::new(test_now()));
    (AppState::new(db, test_config(), clock.clone()), clock)
}

// ============================================================================
// Test Data Factories
// ============================================================================

pub fn venue_fields(name: &str, city: &str, state: &str) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: Some("123-123-1234".to_string()),
        website_link: Some("https://www.themusicalhop.com".to_string()),
        image_link: Some("https://images.example.com/venue.jpg".to_string()),
        facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
        genres: Genres::from(["Jazz", "Reggae", "Swing", "Classical", "Folk"]),
        seeking_talent: true,
        seeking_description: Some("We are on the lookout for a local artist".to_string()),
    }
}

pub fn artist_fields(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: Some("326-123-5000".to_string()),
        website_link: None,
        image_link: Some("https://images.example.com/artist.jpg".to_string()),
        facebook_link: None,
        genres: Genres::from(["Rock n Roll"]),
        seeking_venue: false,
        seeking_description: None,
    }
}

/// Create a test venue in the store
pub async fn create_test_venue(
    store: &DirectoryStore,
    name: &str,
    city: &str,
    state: &str,
) -> venue::Model {
    store
        .create_venue(venue_fields(name, city, state))
        .await
        .expect("Failed to insert test venue")
}

/// Create a test artist in the store
pub async fn create_test_artist(store: &DirectoryStore, name: &str) -> artist::Model {
    store
        .create_artist(artist_fields(name))
        .await
        .expect("Failed to insert test artist")
}

/// Create a show starting `offset` from [`test_now`] (negative for the past)
pub async fn create_test_show(
    store: &DirectoryStore,
    artist_id: i32,
    venue_id: i32,
    offset: Duration,
) -> show::Model {
    store
        .create_show(NewShow {
            artist_id,
            venue_id,
            start_time: Some(test_now() + offset),
        })
        .await
        .expect("Failed to insert test show")
}
