//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Attendee, SeatingAssignment, SeatingConfiguration, SeatingPlan, SeatingTable, TicketForm,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for registration forms and their ticket fields
#[async_trait]
pub trait TicketFormRepository: Send + Sync {
    /// Find a form by id
    async fn get_ticket_form(&self, form_id: Uuid) -> Result<Option<TicketForm>>;

    /// Create or replace a form definition
    async fn save_ticket_form(&self, form: &TicketForm) -> Result<TicketForm>;
}

/// Repository for attendee records
#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Find an attendee by id
    async fn get_attendee(&self, id: Uuid) -> Result<Option<Attendee>>;

    /// Guests linked to a primary, oldest first
    async fn list_guests_of(&self, primary_id: Uuid) -> Result<Vec<Attendee>>;

    /// All attendees of a form, in registration order
    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<Attendee>>;

    /// Insert or update one attendee
    async fn upsert_attendee(&self, attendee: &Attendee) -> Result<Attendee>;

    /// Insert a primary and its guests; either all rows are written or none
    async fn insert_registration(&self, primary: &Attendee, guests: &[Attendee]) -> Result<()>;
}

/// Repository for seating configurations, tables and assignments
#[async_trait]
pub trait SeatingRepository: Send + Sync {
    /// Create a new configuration
    async fn create_configuration(&self, configuration: &SeatingConfiguration) -> Result<SeatingConfiguration>;

    /// Find a configuration of a form
    async fn get_configuration(&self, form_id: Uuid, configuration_id: Uuid) -> Result<Option<SeatingConfiguration>>;

    /// All configurations of a form, oldest first
    async fn list_configurations(&self, form_id: Uuid) -> Result<Vec<SeatingConfiguration>>;

    /// Mark one configuration active and every other configuration of the form inactive
    async fn set_active_configuration(&self, form_id: Uuid, configuration_id: Uuid) -> Result<()>;

    /// Write a whole plan in one transaction.
    ///
    /// Tables are upserted, tables no longer listed are deleted with their
    /// assignments, and the configuration's assignments are replaced by
    /// `plan.assignments`. On error nothing is written.
    async fn save_plan(&self, plan: &SeatingPlan) -> Result<()>;

    /// Tables of a configuration in layout order
    async fn list_tables(&self, form_id: Uuid, configuration_id: Uuid) -> Result<Vec<SeatingTable>>;

    /// Assignments of a configuration
    async fn list_assignments(&self, form_id: Uuid, configuration_id: Uuid) -> Result<Vec<SeatingAssignment>>;
}
