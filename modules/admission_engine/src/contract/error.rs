//! Contract error types for the admission engine
//!
//! These errors are transport-agnostic and used for inter-module communication.

use uuid::Uuid;

/// Admission engine domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    /// Missing required answer or ticket, or an invalid cart/donation
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Promo code text matched none of the form's codes
    #[error("Promo code not found: {code}")]
    PromoNotFound { code: String },

    /// Every seat behind the referral link is already taken
    #[error("All {total_seats} seats for attendee {primary_id} are taken")]
    TableFull { primary_id: Uuid, total_seats: u32 },

    /// Referral chain does not end at a primary attendee after one hop
    #[error("Broken referral chain at attendee {attendee_id}")]
    BrokenReferral { attendee_id: Uuid },

    /// Referral token is malformed or belongs to another form
    #[error("Invalid referral: {reason}")]
    InvalidReferral { reason: String },

    /// Form, configuration, table or attendee not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Storage failure, propagated without retry
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl AdmissionError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_referral(reason: impl Into<String>) -> Self {
        Self::InvalidReferral {
            reason: reason.into(),
        }
    }
}
