//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AdmissionApi, AdmissionError, Attendee, AutoAssignReport, CheckoutRequest, GuestDetails,
    PriceBreakdown,
    ReferralStatus, RegistrationOutcome, RegistrationRequest, SeatingConfiguration, SeatingPlan,
    SeatingTable, TicketForm,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AdmissionApi for NativeClient {
    async fn get_ticket_form(&self, form_id: Uuid) -> Result<TicketForm, AdmissionError> {
        self.service.get_ticket_form(form_id).await
    }

    async fn save_ticket_form(&self, form: TicketForm) -> Result<TicketForm, AdmissionError> {
        self.service.save_ticket_form(form).await
    }

    async fn price_cart(
        &self,
        form_id: Uuid,
        quantities: &HashMap<String, u32>,
        promo_code: Option<&str>,
    ) -> Result<PriceBreakdown, AdmissionError> {
        self.service
            .price_cart(form_id, quantities, promo_code)
            .await
    }

    async fn finalize_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, AdmissionError> {
        self.service.finalize_registration(request).await
    }

    async fn checkout(&self, request: CheckoutRequest) -> Result<RegistrationOutcome, AdmissionError> {
        self.service.checkout(request).await
    }

    async fn resolve_referral(
        &self,
        form_id: Uuid,
        token: &str,
    ) -> Result<ReferralStatus, AdmissionError> {
        self.service.resolve_referral(form_id, token).await
    }

    async fn submit_guest_registration(
        &self,
        form_id: Uuid,
        token: &str,
        details: GuestDetails,
    ) -> Result<Attendee, AdmissionError> {
        self.service
            .submit_guest_registration(form_id, token, details)
            .await
    }

    async fn create_configuration(
        &self,
        form_id: Uuid,
        name: Option<&str>,
    ) -> Result<SeatingConfiguration, AdmissionError> {
        self.service.create_configuration(form_id, name).await
    }

    async fn list_configurations(
        &self,
        form_id: Uuid,
    ) -> Result<Vec<SeatingConfiguration>, AdmissionError> {
        self.service.list_configurations(form_id).await
    }

    async fn activate_configuration(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingConfiguration, AdmissionError> {
        self.service
            .activate_configuration(form_id, configuration_id)
            .await
    }

    async fn load_plan(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingPlan, AdmissionError> {
        self.service.load_plan(form_id, configuration_id).await
    }

    async fn save_tables(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        tables: Vec<SeatingTable>,
    ) -> Result<SeatingPlan, AdmissionError> {
        self.service
            .save_tables(form_id, configuration_id, tables)
            .await
    }

    async fn assign_guests(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        table_id: Uuid,
        guest_ids: &[Uuid],
    ) -> Result<SeatingPlan, AdmissionError> {
        self.service
            .assign_guests(form_id, configuration_id, table_id, guest_ids)
            .await
    }

    async fn unassign_guest(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        attendee_id: Uuid,
    ) -> Result<SeatingPlan, AdmissionError> {
        self.service
            .unassign_guest(form_id, configuration_id, attendee_id)
            .await
    }

    async fn auto_assign(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<AutoAssignReport, AdmissionError> {
        self.service.auto_assign(form_id, configuration_id).await
    }
}
