use crate::backend::BookingBackend;
use crate::booking_screen::{BookingScreen, SlotBoard};
use crate::configuration::Configuration;
use crate::resolver::SlotResolver;
use crate::types::TimeSlot;
use axum::extract::Query;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AppState<B> {
    screen: BookingScreen<B>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SlotsQuery {
    date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SelectDateRequest {
    date: Option<NaiveDate>,
}

pub fn create_app<B: BookingBackend, C: Configuration>(backend: B, configuration: &C) -> Router {
    let resolver = SlotResolver::new(
        backend,
        configuration.fetch_timeout(),
        configuration.check_timeout(),
    );
    let state = AppState {
        screen: BookingScreen::new(resolver),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/slots", get(get_slots::<B>))
        .route("/select_date", post(select_date::<B>))
        .route("/board", get(get_board::<B>))
        .route("/board/stream", get(board_stream::<B>))
        .with_state(state)
        .layer(cors)
}

/// An absent or blank date is not an error, there is just nothing to resolve.
fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>, (StatusCode, String)> {
    let Some(date) = date.filter(|date| !date.trim().is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map(Some).map_err(|err| {
        warn!(%date, %err, "Rejected slot request");
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid date {date}, expected YYYY-MM-DD"),
        )
    })
}

async fn get_slots<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<TimeSlot>>, (StatusCode, String)> {
    let Some(date) = parse_date(query.date.as_deref())? else {
        debug!("No date given, no slots resolved");
        return Ok(Json(vec![]));
    };
    Ok(Json(state.screen.resolver().resolve(date).await))
}

async fn select_date<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<SelectDateRequest>,
) -> impl IntoResponse {
    debug!(date = ?request.date, "select_date called");
    state.screen.select_date(request.date);
    (StatusCode::OK, "Date selected".to_string())
}

async fn get_board<B: BookingBackend>(State(state): State<AppState<B>>) -> Json<SlotBoard> {
    Json(state.screen.board())
}

async fn board_stream<B: BookingBackend>(
    State(state): State<AppState<B>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state
        .screen
        .board_stream()
        .map(|board| Event::default().event("board").json_data(&board));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
