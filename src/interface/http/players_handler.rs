use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    application::dto::{
        CreatePlayerRequest, GetOptions, HealthResponse, PlayerResponse, UpdatePlayerRequest,
    },
    domain::errors::DomainError,
    interface::http::envelope::{ApiError, ApiResult, Envelope},
    state::AppState,
};

const SESSION_TICKET_HEADER: &str = "x-session-ticket";

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn create_player(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePlayerRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<PlayerResponse>>)> {
    require_session_ticket(&state, &headers)?;

    let created = state
        .player_service
        .create_player(request)
        .await
        .map_err(ApiError::from_domain)?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(created))))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let options = GetOptions {
        if_none_match: version_tag_header(&headers, header::IF_NONE_MATCH)?,
        consistent_read: true,
    };

    let player = state
        .player_service
        .get_player(&player_id, options)
        .await
        .map_err(ApiError::from_domain)?;

    let etag = player.version_tag.clone();
    let mut response = (StatusCode::OK, Json(Envelope::ok(player))).into_response();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("max-age=60"),
    );
    Ok(response)
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdatePlayerRequest>,
) -> ApiResult<Json<Envelope<PlayerResponse>>> {
    require_session_ticket(&state, &headers)?;
    let expected_version_tag = version_tag_header(&headers, header::IF_MATCH)?;

    let updated = state
        .player_service
        .update_player(&player_id, request, expected_version_tag)
        .await
        .map_err(ApiError::from_domain)?;

    Ok(Json(Envelope::ok(updated)))
}

/// Session-proof presence check, gated by configuration. Only the header's
/// presence is verified; ticket validation belongs to the platform.
fn require_session_ticket(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    if !state.require_session_ticket {
        return Ok(());
    }
    let present = headers
        .get(SESSION_TICKET_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| !value.trim().is_empty());
    if present {
        Ok(())
    } else {
        Err(ApiError::from_domain(DomainError::unauthorized(
            "missing session ticket",
        )))
    }
}

/// Extract a version tag from a conditional header, tolerating the usual
/// quoting and weak-validator prefix.
fn version_tag_header(headers: &HeaderMap, name: HeaderName) -> ApiResult<Option<String>> {
    let Some(raw) = headers.get(&name) else {
        return Ok(None);
    };
    let raw = raw.to_str().map_err(|_| {
        ApiError::from_domain(DomainError::validation(format!(
            "{name} header must be valid ASCII"
        )))
    })?;
    let normalized = raw.trim().trim_start_matches("W/").trim_matches('"');
    if normalized.is_empty() {
        return Err(ApiError::from_domain(DomainError::validation(format!(
            "{name} header must not be blank"
        ))));
    }
    Ok(Some(normalized.to_string()))
}
