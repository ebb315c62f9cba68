//! Error types for the Observer API server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ward_types::PatientId;

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// No patient with the given id exists in the roster.
    #[error("no patient with id {0}")]
    PatientNotFound(PatientId),

    /// The session report has not been computed yet.
    #[error("session still running")]
    ReportNotReady,

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

impl ObserverError {
    /// The HTTP status code this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::PatientNotFound(_) | Self::ReportNotReady => StatusCode::NOT_FOUND,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidQuery(_) | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_not_found_maps_to_404_with_id_in_message() {
        let id = PatientId::new();
        let err = ObserverError::PatientNotFound(id);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn report_not_ready_maps_to_404() {
        assert_eq!(
            ObserverError::ReportNotReady.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn query_errors_map_to_400() {
        let err = ObserverError::InvalidQuery(String::from("unknown status: discharged"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
