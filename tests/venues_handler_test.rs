//! Integration tests for venue handler routes
//!
//! Tests all venue-related API endpoints including:
//! - List venues grouped by city
//! - Search venues
//! - Venue detail and edit prefill
//! - Create, update and delete venue

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::json;
use tower::util::ServiceExt;

use fyyur::handlers;
use fyyur::state::AppState;
use fyyur::test_utils::*;

/// Helper to create a test router with API routes
fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .nest("/api", handlers::api_routes())
        .with_state(state.clone())
}

/// Helper to parse JSON response body
async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn musical_hop() -> serde_json::Value {
    json!({
        "name": "The Musical Hop",
        "city": "San Francisco",
        "state": "CA",
        "address": "1015 Folsom Street",
        "phone": "123-123-1234",
        "genres": ["Jazz", "Reggae", "Swing", "Classical", "Folk"],
        "website_link": "https://www.themusicalhop.com",
        "facebook_link": "https://www.facebook.com/TheMusicalHop",
        "seeking_talent": true,
        "seeking_description": "We are on the lookout for a local artist to play every two weeks. Please call us.",
        "image_link": "https://images.unsplash.com/photo-1543900694-133f37abaaa5"
    })
}

#[tokio::test]
async fn test_list_venues_empty() {
    let (state, _clock) = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/venues")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_venue() {
    let (state, _clock) = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(json_request("POST", "/api/venues", musical_hop()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "The Musical Hop");
    assert_eq!(body["genres"], json!(["Jazz", "Reggae", "Swing", "Classical", "Folk"]));
    assert_eq!(body["seeking_talent"], true);

    let stored = state.store.get_venue(1).await.unwrap();
    assert_eq!(stored.address, "1015 Folsom Street");
}

#[tokio::test]
async fn test_create_venue_rejects_blank_required_fields() {
    let (state, _clock) = setup_test_app_state().await;
    let app = create_test_router(&state);

    let mut payload = musical_hop();
    payload["name"] = json!("   ");
    payload["address"] = json!("");

    let response = app
        .oneshot(json_request("POST", "/api/venues", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = parse_json_response(response).await;
    assert!(body["details"].as_str().unwrap().contains("name, address"));

    assert!(state.store.list_venues_grouped_by_city().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_venues_grouped() {
    let (state, _clock) = setup_test_app_state().await;

    let hop = create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.store, "The Dueling Pianos Bar", "New York", "NY").await;
    let artist = create_test_artist(&state.store, "Guns N Petals").await;
    create_test_show(&state.store, artist.id, hop.id, Duration::hours(3)).await;

    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/venues")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body[0]["city"], "San Francisco");
    assert_eq!(body[0]["venues"][0]["name"], "The Musical Hop");
    assert_eq!(body[0]["venues"][0]["num_upcoming_shows"], 1);
    assert_eq!(body[1]["city"], "New York");
    assert_eq!(body[1]["venues"][0]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_search_venues() {
    let (state, _clock) = setup_test_app_state().await;

    create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.store, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    create_test_venue(&state.store, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/venues/search",
            json!({ "search_term": "Music" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "The Musical Hop");
    assert_eq!(body["data"][1]["name"], "Park Square Live Music & Coffee");
}

#[tokio::test]
async fn test_search_venues_missing_term_matches_all() {
    let (state, _clock) = setup_test_app_state().await;

    create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.store, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);

    let response = app
        .oneshot(json_request("POST", "/api/venues/search", json!({})))
        .await
        .unwrap();

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_get_venue_detail() {
    let (state, _clock) = setup_test_app_state().await;

    let venue = create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.store, "Guns N Petals").await;
    create_test_show(&state.store, artist.id, venue.id, Duration::days(-7)).await;
    create_test_show(&state.store, artist.id, venue.id, Duration::days(7)).await;

    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/venues/{}", venue.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["id"], venue.id);
    assert_eq!(body["name"], "The Musical Hop");
    assert_eq!(body["past_shows_count"], 1);
    assert_eq!(body["upcoming_shows_count"], 1);
    assert_eq!(body["past_shows"][0]["artist_name"], "Guns N Petals");
    assert_eq!(body["upcoming_shows"][0]["artist_id"], artist.id);
}

#[tokio::test]
async fn test_get_venue_detail_not_found() {
    let (state, _clock) = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/venues/99999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["entity"], "venue");
    assert_eq!(body["details"], "Venue 99999 not found");
}

#[tokio::test]
async fn test_get_venue_for_edit() {
    let (state, _clock) = setup_test_app_state().await;

    let venue = create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/venues/{}/edit", venue.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["address"], "1015 Folsom Street");
    assert!(body.get("past_shows").is_none());
}

#[tokio::test]
async fn test_update_venue() {
    let (state, _clock) = setup_test_app_state().await;

    let venue = create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    let app = create_test_router(&state);

    let mut payload = musical_hop();
    payload["name"] = json!("The Musical Hop (Renovated)");
    payload["seeking_talent"] = json!(false);
    payload["phone"] = json!(null);

    let response = app
        .oneshot(json_request("PUT", &format!("/api/venues/{}", venue.id), payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["name"], "The Musical Hop (Renovated)");
    assert_eq!(body["seeking_talent"], false);
    assert_eq!(body["phone"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_update_venue_not_found() {
    let (state, _clock) = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(json_request("PUT", "/api/venues/31", musical_hop()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_venue() {
    let (state, _clock) = setup_test_app_state().await;

    let venue = create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/venues/{}", venue.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/venues/{}", venue.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_venue_with_shows_conflicts() {
    let (state, _clock) = setup_test_app_state().await;

    let venue = create_test_venue(&state.store, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.store, "Guns N Petals").await;
    create_test_show(&state.store, artist.id, venue.id, Duration::days(1)).await;

    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/venues/{}", venue.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["entity"], "venue");
    assert!(state.store.get_venue(venue.id).await.is_ok());
}
