use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::domain::errors::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Response envelope shared by every endpoint: `{success, data, error}`.
/// `data` is always present (null on failure); `error` only on failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Stable error code: the numeric HTTP status.
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Boundary-layer error: a status plus the message that goes on the wire.
/// Built from [`DomainError`] via the 1:1 mapping table; raw store internals
/// never reach here.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    correlation_id: Option<String>,
}

impl ApiError {
    pub fn from_domain(error: DomainError) -> Self {
        match error {
            DomainError::Validation(detail) => Self::new(StatusCode::BAD_REQUEST, detail),
            DomainError::Unauthorized(detail) => Self::new(StatusCode::UNAUTHORIZED, detail),
            DomainError::NotFound(player_id) => Self::new(
                StatusCode::NOT_FOUND,
                format!("player '{player_id}' not found"),
            ),
            DomainError::AlreadyExists(player_id) => Self::new(
                StatusCode::CONFLICT,
                format!("player '{player_id}' already exists"),
            ),
            DomainError::UpdateConflict(player_id) => Self::new(
                StatusCode::CONFLICT,
                format!("player '{player_id}' was modified concurrently, refetch and retry"),
            ),
            DomainError::NotModified => Self {
                status: StatusCode::NOT_MODIFIED,
                message: String::new(),
                correlation_id: None,
            },
            DomainError::Storage(detail) | DomainError::Internal(detail) => Self::internal(detail),
        }
    }

    /// 500 with a correlation id for support triage. The underlying cause is
    /// logged under that id and never echoed to the caller.
    pub fn internal(detail: impl Into<String>) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        let detail = detail.into();
        error!(correlation_id, detail, "request failed internally");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: default_message(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            correlation_id: Some(correlation_id),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            default_message(status).to_string()
        } else {
            message
        };
        Self {
            status,
            message,
            correlation_id: None,
        }
    }
}

/// Default human-readable message per status, used when no specific message
/// is supplied.
pub fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Invalid request",
        StatusCode::UNAUTHORIZED => "Missing session ticket",
        StatusCode::NOT_FOUND => "Resource not found",
        StatusCode::CONFLICT => "Conflict detected - please refresh and retry",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal server error",
        _ => "Request failed",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 304 carries no body at all.
        if self.status == StatusCode::NOT_MODIFIED {
            return StatusCode::NOT_MODIFIED.into_response();
        }

        let body: Envelope<serde_json::Value> = Envelope {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: self.status.as_u16(),
                message: self.message,
                correlation_id: self.correlation_id,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::ApiError;
    use crate::domain::errors::DomainError;

    #[test]
    fn domain_errors_map_one_to_one() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::unauthorized("no ticket"), StatusCode::UNAUTHORIZED),
            (DomainError::not_found("p1"), StatusCode::NOT_FOUND),
            (DomainError::already_exists("p1"), StatusCode::CONFLICT),
            (DomainError::update_conflict("p1"), StatusCode::CONFLICT),
            (DomainError::NotModified, StatusCode::NOT_MODIFIED),
            (DomainError::storage("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (domain, expected) in cases {
            assert_eq!(ApiError::from_domain(domain).status(), expected);
        }
    }

    #[test]
    fn blank_messages_fall_back_to_the_status_default() {
        let mapped = ApiError::from_domain(DomainError::validation(""));
        assert_eq!(mapped.message, "Invalid request");
    }

    #[test]
    fn internal_errors_carry_a_correlation_id_and_hide_the_cause() {
        let mapped = ApiError::from_domain(DomainError::storage("connection reset by peer"));
        assert!(mapped.correlation_id.is_some());
        assert_eq!(mapped.message, "Internal server error");
    }
}
