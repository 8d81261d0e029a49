//! Native client trait for inter-module communication
//!
//! Checkout, referral and seating front-ends call the engine through this
//! trait. NO HTTP - direct function calls.

use super::{
    error::AdmissionError,
    model::{
        Attendee, AutoAssignReport, CheckoutRequest, GuestDetails, PriceBreakdown, ReferralStatus,
        RegistrationOutcome, RegistrationRequest, SeatingConfiguration, SeatingPlan, SeatingTable,
        TicketForm,
    },
};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Admission engine API for inter-module communication
#[async_trait]
pub trait AdmissionApi: Send + Sync {
    // ===== Form Operations =====

    /// Get a form with its ticket items and promo codes
    async fn get_ticket_form(&self, form_id: Uuid) -> Result<TicketForm, AdmissionError>;

    /// Create or replace a form definition
    async fn save_ticket_form(&self, form: TicketForm) -> Result<TicketForm, AdmissionError>;

    /// Price item quantities with an optional promo code
    async fn price_cart(
        &self,
        form_id: Uuid,
        quantities: &HashMap<String, u32>,
        promo_code: Option<&str>,
    ) -> Result<PriceBreakdown, AdmissionError>;

    // ===== Registration Operations =====

    /// Create the primary attendee and its guest records
    async fn finalize_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, AdmissionError>;

    /// Build the cart, fit the guest slots to it and finalize in one call
    async fn checkout(&self, request: CheckoutRequest) -> Result<RegistrationOutcome, AdmissionError>;

    /// Capacity behind a referral token
    async fn resolve_referral(
        &self,
        form_id: Uuid,
        token: &str,
    ) -> Result<ReferralStatus, AdmissionError>;

    /// Register a guest through a referral token
    async fn submit_guest_registration(
        &self,
        form_id: Uuid,
        token: &str,
        details: GuestDetails,
    ) -> Result<Attendee, AdmissionError>;

    // ===== Seating Operations =====

    /// Create a named seating layout
    async fn create_configuration(
        &self,
        form_id: Uuid,
        name: Option<&str>,
    ) -> Result<SeatingConfiguration, AdmissionError>;

    /// List the seating layouts of a form
    async fn list_configurations(
        &self,
        form_id: Uuid,
    ) -> Result<Vec<SeatingConfiguration>, AdmissionError>;

    /// Make one layout active
    async fn activate_configuration(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingConfiguration, AdmissionError>;

    /// Load the tables and assignments of a layout
    async fn load_plan(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingPlan, AdmissionError>;

    /// Replace the tables of a layout
    async fn save_tables(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        tables: Vec<SeatingTable>,
    ) -> Result<SeatingPlan, AdmissionError>;

    /// Seat attendees at a table
    async fn assign_guests(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        table_id: Uuid,
        guest_ids: &[Uuid],
    ) -> Result<SeatingPlan, AdmissionError>;

    /// Remove an attendee's seat
    async fn unassign_guest(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        attendee_id: Uuid,
    ) -> Result<SeatingPlan, AdmissionError>;

    /// Seat every unassigned attendee first-fit
    async fn auto_assign(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<AutoAssignReport, AdmissionError>;
}
