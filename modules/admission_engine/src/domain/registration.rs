//! Registration resolver - turns a checked-out cart into attendee records
//!
//! Everything here is pure: the service layer loads the form, calls
//! [`build_registration`] and persists the resulting records in one call.

use super::donation::apply_donation;
use super::qr::QrPayload;
use super::seats::{has_table_item, purchaser_identity};
use crate::contract::{
    AdmissionError, Attendee, Cart, FormAnswers, FormField, GuestDetails, PaymentResult,
    PaymentStatus, PriceBreakdown, RegistrationRequest, TicketForm,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Records about to be written for one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub primary: Attendee,
    pub guests: Vec<Attendee>,
}

/// A field counts only while its visibility condition holds
pub fn is_field_visible(field: &FormField, answers: &FormAnswers) -> bool {
    match &field.visible_when {
        Some(condition) => answers
            .get(&condition.field_id)
            .is_some_and(|value| value.trim() == condition.equals),
        None => true,
    }
}

/// Check required answers and the ticket requirement
pub fn validate_submission(
    form: &TicketForm,
    cart: &Cart,
    answers: &FormAnswers,
) -> Result<(), AdmissionError> {
    let missing: Vec<&str> = form
        .fields
        .iter()
        .filter(|field| field.required && is_field_visible(field, answers))
        .filter(|field| {
            answers
                .get(&field.id)
                .map_or(true, |value| value.trim().is_empty())
        })
        .map(|field| field.label.as_str())
        .collect();

    if !missing.is_empty() {
        return Err(AdmissionError::validation(format!(
            "missing required answers: {}",
            missing.join(", ")
        )));
    }

    if form.ticket_required && cart.total_quantity()? == 0 {
        return Err(AdmissionError::validation("select at least one ticket"));
    }

    Ok(())
}

/// `"{name} x{qty}"` for every selected item, joined by `", "`
pub fn ticket_type_summary(cart: &Cart) -> String {
    cart.selected()
        .map(|line| format!("{} x{}", line.item.name, line.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Free when nothing is owed, otherwise paid only on a successful capture
pub fn payment_status(total: Decimal, payment: Option<&PaymentResult>) -> PaymentStatus {
    if total <= Decimal::ZERO {
        PaymentStatus::Free
    } else if payment.is_some_and(|p| p.succeeded) {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    }
}

/// Name given to an unclaimed guest record; `index` is the zero-based slot
pub fn placeholder_name(purchaser: &str, index: usize) -> String {
    format!("{} - Guest Ticket #{}", purchaser, index + 1)
}

fn issue_qr(id: Uuid, invoice_id: Uuid, form_id: Uuid) -> String {
    QrPayload {
        attendee_id: id,
        invoice_id,
        form_id,
    }
    .encode()
}

/// Build the primary and guest records for a validated request
pub fn build_registration(
    form: &TicketForm,
    request: &RegistrationRequest,
    price: &PriceBreakdown,
    now: DateTime<Utc>,
) -> Result<RegistrationDraft, AdmissionError> {
    validate_submission(form, &request.cart, &request.answers)?;
    let donation = apply_donation(&request.cart, request.donation)?;

    let (name, email) = purchaser_identity(&form.fields, &request.answers);
    if name.is_empty() || email.is_empty() {
        return Err(AdmissionError::validation(
            "purchaser name and email are required",
        ));
    }

    let primary_id = Uuid::new_v4();
    let invoice_id = Uuid::new_v4();
    let summary = ticket_type_summary(&request.cart);
    let status = payment_status(price.total, request.payment.as_ref());
    let transaction_id = request
        .payment
        .as_ref()
        .and_then(|p| p.transaction_id.clone());

    let primary = Attendee {
        id: primary_id,
        form_id: form.id,
        name: name.clone(),
        email: email.clone(),
        ticket_type_summary: summary.clone(),
        registered_at: now,
        payment_status: status,
        transaction_id: transaction_id.clone(),
        qr_payload: issue_qr(primary_id, invoice_id, form.id),
        is_primary: true,
        primary_attendee_id: None,
        invoice_id,
        total_seats: Some(donation.total_seats),
        donation_type: donation.donation_type,
        donated_seats: donation.donated_seats,
        donated_tables: donation.donated_tables,
        dietary_preference: request
            .guest_slots
            .first()
            .and_then(|slot| slot.dietary.clone()),
        answers: request.answers.clone(),
        assigned_table_id: None,
        assigned_seat: None,
        is_test: request.is_test,
    };

    if !has_table_item(&request.cart) {
        return Ok(RegistrationDraft {
            primary,
            guests: Vec::new(),
        });
    }

    let guests = (1..donation.effective_slots as usize)
        .map(|index| {
            let details = match request.guest_slots.get(index) {
                Some(slot) if slot.is_named() => GuestDetails {
                    name: slot.name.trim().to_string(),
                    email: slot.email.trim().to_string(),
                    dietary_preference: slot.dietary.clone(),
                },
                _ => GuestDetails {
                    name: placeholder_name(&name, index),
                    email: email.clone(),
                    dietary_preference: None,
                },
            };
            build_guest(&primary, &details, now)
        })
        .collect();

    Ok(RegistrationDraft { primary, guests })
}

/// New guest record linked to `primary`, sharing its invoice
pub fn build_guest(primary: &Attendee, details: &GuestDetails, now: DateTime<Utc>) -> Attendee {
    let id = Uuid::new_v4();
    Attendee {
        id,
        form_id: primary.form_id,
        name: details.name.clone(),
        email: details.email.clone(),
        ticket_type_summary: primary.ticket_type_summary.clone(),
        registered_at: now,
        payment_status: primary.payment_status,
        transaction_id: primary.transaction_id.clone(),
        qr_payload: issue_qr(id, primary.invoice_id, primary.form_id),
        is_primary: false,
        primary_attendee_id: Some(primary.id),
        invoice_id: primary.invoice_id,
        total_seats: None,
        donation_type: None,
        donated_seats: 0,
        donated_tables: 0,
        dietary_preference: details.dietary_preference.clone(),
        answers: FormAnswers::new(),
        assigned_table_id: None,
        assigned_seat: None,
        is_test: primary.is_test,
    }
}
