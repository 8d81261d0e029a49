//! HTTP request handlers - thin layer that delegates to domain service

use super::{dto::*, error::Problem};
use crate::contract::{CheckoutRequest, DonationChoice, GuestDetails};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

// ===== Form Handlers =====

/// Get a form definition
pub async fn get_ticket_form(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<TicketFormDto>, Problem> {
    let form = service.get_ticket_form(form_id).await?;
    Ok(Json(form.into()))
}

/// Create or replace a form definition
pub async fn save_ticket_form(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
    Json(req): Json<UpsertTicketFormRequest>,
) -> Result<Json<TicketFormDto>, Problem> {
    let form = service.save_ticket_form(req.into_form(form_id)).await?;
    Ok(Json(form.into()))
}

/// Price a cart without registering
pub async fn price_cart(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
    Json(req): Json<PriceCartRequest>,
) -> Result<Json<PriceBreakdownDto>, Problem> {
    let price = service
        .price_cart(form_id, &req.quantities, req.promo_code.as_deref())
        .await?;
    Ok(Json(price.into()))
}

// ===== Registration Handlers =====

/// Finalize a registration
pub async fn finalize_registration(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
    Json(req): Json<RegistrationRequestDto>,
) -> Result<(StatusCode, Json<RegistrationOutcomeDto>), Problem> {
    let donation = DonationChoice::try_from(req.donation)?;

    let outcome = service
        .checkout(CheckoutRequest {
            form_id,
            quantities: req.quantities,
            promo_code: req.promo_code,
            donation,
            guest_slots: req.guests.into_iter().map(Into::into).collect(),
            answers: req.answers,
            payment: req.payment.map(Into::into),
            is_test: req.is_test,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

// ===== Referral Handlers =====

/// Capacity behind a referral token
pub async fn resolve_referral(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
    Query(query): Query<ReferralQuery>,
) -> Result<Json<ReferralStatusDto>, Problem> {
    let status = service.resolve_referral(form_id, &query.reference).await?;
    Ok(Json(status.into()))
}

/// Register a guest through a referral token
pub async fn submit_guest_registration(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
    Json(req): Json<GuestRegistrationRequest>,
) -> Result<(StatusCode, Json<AttendeeDto>), Problem> {
    let details = GuestDetails {
        name: req.name,
        email: req.email,
        dietary_preference: req.dietary_preference,
    };
    let guest = service
        .submit_guest_registration(form_id, &req.reference, details)
        .await?;

    Ok((StatusCode::CREATED, Json(guest.into())))
}

// ===== Seating Handlers =====

/// List seating layouts of a form
pub async fn list_configurations(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<ConfigurationsListResponse>, Problem> {
    let configurations = service.list_configurations(form_id).await?;

    let items: Vec<SeatingConfigurationDto> =
        configurations.into_iter().map(Into::into).collect();
    let total = items.len();

    Ok(Json(ConfigurationsListResponse { items, total }))
}

/// Create a seating layout
pub async fn create_configuration(
    service: Arc<Service>,
    Path(form_id): Path<Uuid>,
    Json(req): Json<CreateConfigurationRequest>,
) -> Result<(StatusCode, Json<SeatingConfigurationDto>), Problem> {
    let configuration = service
        .create_configuration(form_id, req.name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(configuration.into())))
}

/// Make a layout active
pub async fn activate_configuration(
    service: Arc<Service>,
    Path((form_id, configuration_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SeatingConfigurationDto>, Problem> {
    let configuration = service
        .activate_configuration(form_id, configuration_id)
        .await?;
    Ok(Json(configuration.into()))
}

/// Load a layout's tables and assignments
pub async fn load_plan(
    service: Arc<Service>,
    Path((form_id, configuration_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    let plan = service.load_plan(form_id, configuration_id).await?;
    Ok(Json(plan.into()))
}

/// Replace a layout's tables
pub async fn save_tables(
    service: Arc<Service>,
    Path((form_id, configuration_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SaveTablesRequest>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    let tables = req
        .tables
        .into_iter()
        .map(|t| t.into_table(form_id, configuration_id))
        .collect();
    let plan = service
        .save_tables(form_id, configuration_id, tables)
        .await?;
    Ok(Json(plan.into()))
}

/// Seat attendees at a table
pub async fn assign_guests(
    service: Arc<Service>,
    Path((form_id, configuration_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AssignGuestsRequest>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    let plan = service
        .assign_guests(form_id, configuration_id, req.table_id, &req.attendee_ids)
        .await?;
    Ok(Json(plan.into()))
}

/// Remove an attendee's seat
pub async fn unassign_guest(
    service: Arc<Service>,
    Path((form_id, configuration_id, attendee_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    let plan = service
        .unassign_guest(form_id, configuration_id, attendee_id)
        .await?;
    Ok(Json(plan.into()))
}

/// Seat every unassigned attendee first-fit
pub async fn auto_assign(
    service: Arc<Service>,
    Path((form_id, configuration_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AutoAssignReportDto>, Problem> {
    let report = service.auto_assign(form_id, configuration_id).await?;
    Ok(Json(report.into()))
}
