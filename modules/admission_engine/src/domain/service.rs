//! Domain service - admission orchestration
//!
//! Loads forms and records through the repositories, runs the pure resolvers
//! and writes the results back. Notification failures never fail a call.

use super::locks::PrimaryLocks;
use super::notifications::{guest_message, registration_messages, Notification, NotificationDispatcher};
use super::pricing::{apply_promo, price_cart};
use super::referral::{parse_referral_token, referral_link, referral_status, RefTarget};
use super::registration::{build_guest, build_registration};
use super::repository::{AttendeeRepository, SeatingRepository, TicketFormRepository};
use super::seats::{expand_seats, mirror_purchaser, sync_guest_slots};
use crate::config::Config;
use crate::contract::{
    AdmissionError, Attendee, AutoAssignReport, Cart, CheckoutRequest, GuestDetails,
    PriceBreakdown, ReferralStatus, RegistrationOutcome, RegistrationRequest, SeatingConfiguration,
    SeatingPlan, SeatingTable, TicketForm,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Domain service for admission and seating
pub struct Service {
    forms: Arc<dyn TicketFormRepository>,
    attendees: Arc<dyn AttendeeRepository>,
    seating: Arc<dyn SeatingRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    config: Config,
    primary_locks: PrimaryLocks,
}

fn storage_error(err: anyhow::Error) -> AdmissionError {
    error!(error = ?err, "Storage operation failed");
    AdmissionError::Persistence {
        message: err.to_string(),
    }
}

/// Cart for `form` holding `quantities`, with `promo_code` applied when given
fn cart_for(
    form: &TicketForm,
    quantities: &HashMap<String, u32>,
    promo_code: Option<&str>,
) -> Result<Cart, AdmissionError> {
    let mut cart = Cart::for_form(form);
    for (item_id, quantity) in quantities {
        cart.set_quantity(item_id, *quantity)?;
    }
    if let Some(code) = promo_code.filter(|code| !code.trim().is_empty()) {
        apply_promo(&mut cart, &form.promo_codes, code)?;
    }
    Ok(cart)
}

impl Service {
    /// Create a new service instance
    pub fn new(
        forms: Arc<dyn TicketFormRepository>,
        attendees: Arc<dyn AttendeeRepository>,
        seating: Arc<dyn SeatingRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: Config,
    ) -> Self {
        Self {
            forms,
            attendees,
            seating,
            dispatcher,
            config,
            primary_locks: PrimaryLocks::new(),
        }
    }

    // ===== Forms =====

    /// Get a form with its ticket items and promo codes
    pub async fn get_ticket_form(&self, form_id: Uuid) -> Result<TicketForm, AdmissionError> {
        self.forms
            .get_ticket_form(form_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AdmissionError::not_found("form", form_id))
    }

    /// Create or replace a form definition
    pub async fn save_ticket_form(&self, form: TicketForm) -> Result<TicketForm, AdmissionError> {
        let mut seen = HashSet::new();
        for item in &form.ticket_items {
            if !seen.insert(item.id.as_str()) {
                return Err(AdmissionError::validation(format!(
                    "duplicate ticket item id '{}'",
                    item.id
                )));
            }
            if item.seats_per_unit == 0 {
                return Err(AdmissionError::validation(format!(
                    "ticket item '{}' must grant at least one seat",
                    item.name
                )));
            }
            if item.max_per_order == 0 {
                return Err(AdmissionError::validation(format!(
                    "ticket item '{}' must allow at least one unit per order",
                    item.name
                )));
            }
        }

        let saved = self
            .forms
            .save_ticket_form(&form)
            .await
            .map_err(storage_error)?;
        info!(form_id = %saved.id, items = saved.ticket_items.len(), "Ticket form saved");
        Ok(saved)
    }

    // ===== Pricing =====

    /// Build a cart for a form from requested quantities and an optional promo code
    pub async fn build_cart(
        &self,
        form_id: Uuid,
        quantities: &HashMap<String, u32>,
        promo_code: Option<&str>,
    ) -> Result<Cart, AdmissionError> {
        let form = self.get_ticket_form(form_id).await?;
        cart_for(&form, quantities, promo_code)
    }

    /// Price requested quantities for a form
    pub async fn price_cart(
        &self,
        form_id: Uuid,
        quantities: &HashMap<String, u32>,
        promo_code: Option<&str>,
    ) -> Result<PriceBreakdown, AdmissionError> {
        let cart = self.build_cart(form_id, quantities, promo_code).await?;
        Ok(price_cart(&cart))
    }

    // ===== Registration =====

    /// Build the cart, resize the guest slots to its seat count, bind the
    /// purchaser to slot 0 and finalize, reading the form once.
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<RegistrationOutcome, AdmissionError> {
        let form = self.get_ticket_form(request.form_id).await?;
        let cart = cart_for(&form, &request.quantities, request.promo_code.as_deref())?;

        let seats = usize::try_from(expand_seats(&cart)?)
            .map_err(|_| AdmissionError::validation("seat count is out of range"))?;
        let mut guest_slots = sync_guest_slots(request.guest_slots, seats);
        mirror_purchaser(&mut guest_slots, &form.fields, &request.answers);

        self.finalize_with_form(
            &form,
            RegistrationRequest {
                form_id: form.id,
                cart,
                donation: request.donation,
                guest_slots,
                answers: request.answers,
                payment: request.payment,
                is_test: request.is_test,
            },
        )
        .await
    }

    /// Create the primary attendee and its guests for a checked-out cart
    pub async fn finalize_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, AdmissionError> {
        let form = self.get_ticket_form(request.form_id).await?;
        self.finalize_with_form(&form, request).await
    }

    async fn finalize_with_form(
        &self,
        form: &TicketForm,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, AdmissionError> {
        let price = price_cart(&request.cart);

        if let Some(payment) = request.payment.as_ref().filter(|p| p.succeeded) {
            if payment.amount != price.total {
                warn!(
                    form_id = %form.id,
                    captured = %payment.amount,
                    expected = %price.total,
                    "Captured amount differs from cart total"
                );
            }
        }

        let draft = build_registration(form, &request, &price, Utc::now())?;

        self.attendees
            .insert_registration(&draft.primary, &draft.guests)
            .await
            .map_err(storage_error)?;

        info!(
            form_id = %form.id,
            attendee_id = %draft.primary.id,
            guests = draft.guests.len(),
            donated_seats = draft.primary.donated_seats,
            is_test = draft.primary.is_test,
            "Registration finalized"
        );

        if self.should_notify(&draft.primary) {
            let link = (!draft.guests.is_empty())
                .then(|| referral_link(&self.config.referral_base_url, draft.primary.id));
            let messages = registration_messages(
                &draft.primary,
                &draft.guests,
                &self.config.purchaser_subject,
                &self.config.guest_subject,
                link,
            );
            self.dispatch(&messages).await;
        }

        Ok(RegistrationOutcome {
            primary: draft.primary,
            guests: draft.guests,
            price,
        })
    }

    // ===== Referrals =====

    /// Capacity behind a referral token
    pub async fn resolve_referral(
        &self,
        form_id: Uuid,
        token: &str,
    ) -> Result<ReferralStatus, AdmissionError> {
        let target = self.resolve_target(form_id, token).await?;
        let form = self.get_ticket_form(form_id).await?;
        let primary = target.primary().clone();
        let guests = self.guests_of(primary.id).await?;
        Ok(referral_status(primary, &guests, &form.ticket_items))
    }

    /// Register a guest through a referral link.
    ///
    /// A placeholder's link updates that record in place so its id, QR payload
    /// and invoice stay valid. The purchaser's own link always adds a new guest.
    pub async fn submit_guest_registration(
        &self,
        form_id: Uuid,
        token: &str,
        details: GuestDetails,
    ) -> Result<Attendee, AdmissionError> {
        let details = GuestDetails {
            name: details.name.trim().to_string(),
            email: details.email.trim().to_string(),
            dietary_preference: details.dietary_preference,
        };
        if details.name.is_empty() || details.email.is_empty() {
            return Err(AdmissionError::validation("guest name and email are required"));
        }

        let primary_id = self.resolve_target(form_id, token).await?.primary().id;
        let _guard = self.primary_locks.acquire(primary_id).await;

        // Another submission may have claimed the slot while we waited.
        let target = self.resolve_target(form_id, token).await?;
        let form = self.get_ticket_form(form_id).await?;
        let guests = self.guests_of(primary_id).await?;
        let status = referral_status(target.primary().clone(), &guests, &form.ticket_items);
        if status.is_full {
            return Err(AdmissionError::TableFull {
                primary_id,
                total_seats: status.total_seats,
            });
        }

        let guest = match target {
            RefTarget::PlaceholderOf { mut placeholder, .. } => {
                placeholder.name = details.name;
                placeholder.email = details.email;
                placeholder.dietary_preference = details.dietary_preference;
                placeholder
            }
            RefTarget::Primary(primary) => build_guest(&primary, &details, Utc::now()),
        };

        let saved = self
            .attendees
            .upsert_attendee(&guest)
            .await
            .map_err(storage_error)?;

        info!(
            form_id = %form_id,
            primary_id = %primary_id,
            attendee_id = %saved.id,
            remaining_seats = status.remaining_seats - 1,
            "Guest registered through referral"
        );

        if self.should_notify(&saved) {
            self.dispatch(&[guest_message(&saved, &self.config.guest_subject)])
                .await;
        }

        Ok(saved)
    }

    async fn resolve_target(&self, form_id: Uuid, token: &str) -> Result<RefTarget, AdmissionError> {
        let attendee_id = parse_referral_token(token)?;
        let referred = self
            .attendees
            .get_attendee(attendee_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| {
                AdmissionError::invalid_referral(format!("no attendee {attendee_id}"))
            })?;

        let parent = match referred.primary_attendee_id {
            Some(parent_id) if !referred.is_primary => self
                .attendees
                .get_attendee(parent_id)
                .await
                .map_err(storage_error)?,
            _ => None,
        };

        RefTarget::resolve(referred, parent, form_id)
    }

    async fn guests_of(&self, primary_id: Uuid) -> Result<Vec<Attendee>, AdmissionError> {
        self.attendees
            .list_guests_of(primary_id)
            .await
            .map_err(storage_error)
    }

    fn should_notify(&self, attendee: &Attendee) -> bool {
        !attendee.is_test || self.config.notify_test_submissions
    }

    async fn dispatch(&self, messages: &[Notification]) {
        for message in messages {
            if let Err(e) = self.dispatcher.send(message).await {
                // Delivery is best effort; the registration already succeeded.
                warn!(
                    to = %message.to,
                    attendee_id = %message.context.attendee_id,
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        }
    }

    // ===== Seating configurations =====

    /// Create a named layout; the first layout of a form becomes active
    pub async fn create_configuration(
        &self,
        form_id: Uuid,
        name: Option<&str>,
    ) -> Result<SeatingConfiguration, AdmissionError> {
        self.get_ticket_form(form_id).await?;
        let existing = self.list_configurations(form_id).await?;

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.config.default_configuration_name);

        let configuration = SeatingConfiguration {
            id: Uuid::new_v4(),
            form_id,
            name: name.to_string(),
            is_active: existing.is_empty(),
            created_at: Utc::now(),
        };

        let created = self
            .seating
            .create_configuration(&configuration)
            .await
            .map_err(storage_error)?;
        info!(form_id = %form_id, config_id = %created.id, name = %created.name, "Seating configuration created");
        Ok(created)
    }

    /// All layouts of a form
    pub async fn list_configurations(
        &self,
        form_id: Uuid,
    ) -> Result<Vec<SeatingConfiguration>, AdmissionError> {
        self.seating
            .list_configurations(form_id)
            .await
            .map_err(storage_error)
    }

    /// Make a layout the one mirrored onto attendee records
    pub async fn activate_configuration(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingConfiguration, AdmissionError> {
        let mut configuration = self.get_configuration(form_id, configuration_id).await?;
        self.seating
            .set_active_configuration(form_id, configuration_id)
            .await
            .map_err(storage_error)?;
        configuration.is_active = true;

        let plan = self.load_plan(form_id, configuration_id).await?;
        self.sync_attendee_seats(&plan).await?;

        info!(form_id = %form_id, config_id = %configuration_id, "Seating configuration activated");
        Ok(configuration)
    }

    async fn get_configuration(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingConfiguration, AdmissionError> {
        self.seating
            .get_configuration(form_id, configuration_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AdmissionError::not_found("seating configuration", configuration_id))
    }

    // ===== Seating plans =====

    /// Tables and assignments of one layout
    pub async fn load_plan(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<SeatingPlan, AdmissionError> {
        self.get_configuration(form_id, configuration_id).await?;

        let tables = self
            .seating
            .list_tables(form_id, configuration_id)
            .await
            .map_err(storage_error)?;
        let assignments = self
            .seating
            .list_assignments(form_id, configuration_id)
            .await
            .map_err(storage_error)?;

        Ok(SeatingPlan {
            form_id,
            configuration_id,
            tables,
            assignments,
        })
    }

    /// Persist tables and assignments in one write.
    ///
    /// Assignments are a full replace: concurrent editors of one layout race
    /// and the last save wins.
    pub async fn save_plan(&self, plan: &SeatingPlan) -> Result<(), AdmissionError> {
        let configuration = self
            .get_configuration(plan.form_id, plan.configuration_id)
            .await?;

        self.seating.save_plan(plan).await.map_err(storage_error)?;

        if configuration.is_active {
            self.sync_attendee_seats(plan).await?;
        }

        info!(
            form_id = %plan.form_id,
            config_id = %plan.configuration_id,
            tables = plan.tables.len(),
            assignments = plan.assignments.len(),
            "Seating plan saved"
        );
        Ok(())
    }

    /// Replace a layout's tables; removed tables lose their assignments
    pub async fn save_tables(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        tables: Vec<SeatingTable>,
    ) -> Result<SeatingPlan, AdmissionError> {
        let mut plan = self.load_plan(form_id, configuration_id).await?;
        plan.replace_tables(tables)?;
        self.save_plan(&plan).await?;
        Ok(plan)
    }

    /// Seat attendees at a table in the given order, dropping any beyond capacity
    pub async fn assign_guests(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        table_id: Uuid,
        guest_ids: &[Uuid],
    ) -> Result<SeatingPlan, AdmissionError> {
        let known: HashSet<Uuid> = self
            .attendees
            .list_by_form(form_id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(|a| a.id)
            .collect();
        if let Some(unknown) = guest_ids.iter().find(|id| !known.contains(id)) {
            return Err(AdmissionError::not_found("attendee", unknown));
        }

        let mut plan = self.load_plan(form_id, configuration_id).await?;
        let placed = plan.assign(guest_ids, table_id)?;
        if placed.len() < guest_ids.len() {
            warn!(
                config_id = %configuration_id,
                table_id = %table_id,
                requested = guest_ids.len(),
                placed = placed.len(),
                "Table full, remaining guests not seated"
            );
        }

        self.save_plan(&plan).await?;
        Ok(plan)
    }

    /// Remove an attendee's seat in one layout
    pub async fn unassign_guest(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
        attendee_id: Uuid,
    ) -> Result<SeatingPlan, AdmissionError> {
        let mut plan = self.load_plan(form_id, configuration_id).await?;
        if plan.unassign(attendee_id).is_some() {
            self.save_plan(&plan).await?;
        }
        Ok(plan)
    }

    /// Greedily seat every unassigned, non-test attendee of the form
    pub async fn auto_assign(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<AutoAssignReport, AdmissionError> {
        let mut plan = self.load_plan(form_id, configuration_id).await?;
        let attendee_ids: Vec<Uuid> = self
            .attendees
            .list_by_form(form_id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .filter(|a| !a.is_test)
            .map(|a| a.id)
            .collect();

        let report = plan.auto_assign(&attendee_ids);
        self.save_plan(&plan).await?;

        info!(
            config_id = %configuration_id,
            seated = report.seated.len(),
            unassigned = report.unassigned.len(),
            "Auto-assignment finished"
        );
        Ok(report)
    }

    /// Mirror an active plan onto the attendees' assigned table and seat
    async fn sync_attendee_seats(&self, plan: &SeatingPlan) -> Result<(), AdmissionError> {
        let attendees = self
            .attendees
            .list_by_form(plan.form_id)
            .await
            .map_err(storage_error)?;

        for mut attendee in attendees {
            let seat = plan
                .assignment_for(attendee.id)
                .map(|a| (a.table_id, a.seat_number));
            let current = attendee.assigned_table_id.zip(attendee.assigned_seat);
            if seat == current {
                continue;
            }
            attendee.assigned_table_id = seat.map(|(table, _)| table);
            attendee.assigned_seat = seat.map(|(_, number)| number);
            self.attendees
                .upsert_attendee(&attendee)
                .await
                .map_err(storage_error)?;
        }
        Ok(())
    }
}
