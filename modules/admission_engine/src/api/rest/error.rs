//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::AdmissionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl From<AdmissionError> for Problem {
    fn from(error: AdmissionError) -> Self {
        map_domain_error(error)
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: AdmissionError) -> Problem {
    match error {
        AdmissionError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        AdmissionError::PromoNotFound { code } => Problem::new(
            StatusCode::NOT_FOUND,
            "Promo Code Not Found",
        )
        .with_detail(format!("Promo code '{code}' is not valid for this form")),

        AdmissionError::NotFound { resource, id } => Problem::new(
            StatusCode::NOT_FOUND,
            format!("{resource} Not Found"),
        )
        .with_detail(format!("{resource} with id '{id}' was not found")),

        AdmissionError::TableFull {
            primary_id,
            total_seats,
        } => Problem::new(StatusCode::CONFLICT, "Table Full").with_detail(format!(
            "All {total_seats} seats reserved by attendee '{primary_id}' are taken"
        )),

        AdmissionError::BrokenReferral { attendee_id } => Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Broken Referral",
        )
        .with_detail(format!(
            "Attendee '{attendee_id}' is not linked to a primary attendee"
        )),

        AdmissionError::InvalidReferral { reason } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid Referral").with_detail(reason)
        }

        AdmissionError::Persistence { .. } => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .with_detail("An unexpected error occurred"),
    }
}
