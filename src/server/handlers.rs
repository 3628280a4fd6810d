use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{format_coords, CampusLocation, MatchRule};
use crate::meetup::{annotate_meetup, MeetupAnnotation, MeetupError};
use crate::points::{level_for, LevelInfo, PointClassification};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    let value = value.as_deref().unwrap_or("").trim();
    if value.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, format!("Missing '{}' parameter", name)));
    }
    Ok(value)
}

fn required_int(value: &Option<String>, name: &str) -> Result<i64, ApiError> {
    let raw = required(value, name)?;
    raw.parse()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("'{}' must be an integer, got '{}'", name, raw)))
}

// ─── Location payload ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub formatted_coords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchRule>,
}

impl LocationResponse {
    fn new(loc: &CampusLocation, rule: Option<MatchRule>) -> Self {
        Self {
            id: loc.id.clone(),
            name: loc.name.clone(),
            lat: loc.lat,
            lng: loc.lng,
            description: loc.description.clone(),
            formatted_coords: format_coords(loc.lat, loc.lng),
            rule,
        }
    }
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub query: Option<String>,
    /// Treat the query as an event description.
    #[serde(default)]
    pub description: bool,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<LocationResponse>, ApiError> {
    let start = Instant::now();
    let query = required(&params.query, "query")?;

    let resolver = state.resolver();
    let result = if params.description {
        resolver.resolve_description(query)
    } else {
        resolver.resolve(query)
    };

    let Some(location) = result.location() else {
        tracing::info!(query, elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "GET /api/resolve -> unresolved");
        return Err(api_error(StatusCode::NOT_FOUND, format!("Location unresolved: '{}'", query)));
    };

    tracing::info!(
        query,
        id = %location.id,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/resolve"
    );
    Ok(Json(LocationResponse::new(location, result.rule())))
}

// ─── GET /api/locations ──────────────────────────────────────────

pub async fn location_list(State(state): State<Arc<AppState>>) -> Json<Vec<CampusLocation>> {
    Json(state.gazetteer.locations().to_vec())
}

pub async fn location_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LocationResponse>, ApiError> {
    state
        .gazetteer
        .get_by_id(&id)
        .map(|loc| Json(LocationResponse::new(loc, None)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Location not found: '{}'", id)))
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<LocationResponse>> {
    let query = params.query.as_deref().unwrap_or("");
    let hits = state
        .gazetteer
        .search_prefix(query)
        .into_iter()
        .map(|loc| LocationResponse::new(loc, None))
        .collect();
    Json(hits)
}

// ─── GET /api/classify and /api/level ────────────────────────────

#[derive(Deserialize)]
pub struct ClassifyQuery {
    pub size: Option<String>,
}

pub async fn classify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClassifyQuery>,
) -> Result<Json<PointClassification>, ApiError> {
    let size = required_int(&params.size, "size")?;
    state
        .tiers
        .classify(size)
        .map(|tier| Json(tier.clone()))
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

#[derive(Deserialize)]
pub struct LevelQuery {
    pub points: Option<String>,
}

pub async fn level(Query(params): Query<LevelQuery>) -> Result<Json<LevelInfo>, ApiError> {
    level_for(required_int(&params.points, "points")?)
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

// ─── GET /api/meetup ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MeetupQuery {
    pub location: Option<String>,
    pub size: Option<String>,
}

pub async fn meetup(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MeetupQuery>,
) -> Result<Json<MeetupAnnotation>, ApiError> {
    let text = params.location.as_deref().unwrap_or("");
    let size = required_int(&params.size, "size")?;
    match annotate_meetup(&state.resolver(), &state.tiers, text, size) {
        Ok(annotation) => Ok(Json(annotation)),
        Err(e @ MeetupError::Points(_)) => Err(api_error(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e @ MeetupError::NoLocation(_)) => Err(api_error(StatusCode::NOT_FOUND, e.to_string())),
    }
}
