//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Form endpoints
        .route("/forms/{form_id}", get(get_ticket_form_handler))
        .route("/forms/{form_id}", put(save_ticket_form_handler))
        .route("/forms/{form_id}/price", post(price_cart_handler))
        // Registration and referral endpoints
        .route("/forms/{form_id}/registrations", post(finalize_registration_handler))
        .route("/forms/{form_id}/referral", get(resolve_referral_handler))
        .route("/forms/{form_id}/referral/guests", post(submit_guest_handler))
        // Seating endpoints
        .route("/forms/{form_id}/seating", get(list_configurations_handler))
        .route("/forms/{form_id}/seating", post(create_configuration_handler))
        .route("/forms/{form_id}/seating/{config_id}", get(load_plan_handler))
        .route("/forms/{form_id}/seating/{config_id}/activate", post(activate_configuration_handler))
        .route("/forms/{form_id}/seating/{config_id}/tables", put(save_tables_handler))
        .route("/forms/{form_id}/seating/{config_id}/assignments", post(assign_guests_handler))
        .route(
            "/forms/{form_id}/seating/{config_id}/assignments/{attendee_id}",
            delete(unassign_guest_handler),
        )
        .route("/forms/{form_id}/seating/{config_id}/auto-assign", post(auto_assign_handler))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}

// ===== Handler wrappers that extract service from Extension =====

async fn get_ticket_form_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<TicketFormDto>, Problem> {
    handlers::get_ticket_form(service, path).await
}

async fn save_ticket_form_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<UpsertTicketFormRequest>,
) -> Result<Json<TicketFormDto>, Problem> {
    handlers::save_ticket_form(service, path, json).await
}

async fn price_cart_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<PriceCartRequest>,
) -> Result<Json<PriceBreakdownDto>, Problem> {
    handlers::price_cart(service, path, json).await
}

async fn finalize_registration_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<RegistrationRequestDto>,
) -> Result<(StatusCode, Json<RegistrationOutcomeDto>), Problem> {
    handlers::finalize_registration(service, path, json).await
}

async fn resolve_referral_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    query: Query<ReferralQuery>,
) -> Result<Json<ReferralStatusDto>, Problem> {
    handlers::resolve_referral(service, path, query).await
}

async fn submit_guest_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<GuestRegistrationRequest>,
) -> Result<(StatusCode, Json<AttendeeDto>), Problem> {
    handlers::submit_guest_registration(service, path, json).await
}

async fn list_configurations_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<ConfigurationsListResponse>, Problem> {
    handlers::list_configurations(service, path).await
}

async fn create_configuration_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<CreateConfigurationRequest>,
) -> Result<(StatusCode, Json<SeatingConfigurationDto>), Problem> {
    handlers::create_configuration(service, path, json).await
}

async fn load_plan_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    handlers::load_plan(service, path).await
}

async fn activate_configuration_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
) -> Result<Json<SeatingConfigurationDto>, Problem> {
    handlers::activate_configuration(service, path).await
}

async fn save_tables_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Json<SaveTablesRequest>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    handlers::save_tables(service, path, json).await
}

async fn assign_guests_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Json<AssignGuestsRequest>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    handlers::assign_guests(service, path, json).await
}

async fn unassign_guest_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<SeatingPlanDto>, Problem> {
    handlers::unassign_guest(service, path).await
}

async fn auto_assign_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
) -> Result<Json<AutoAssignReportDto>, Problem> {
    handlers::auto_assign(service, path).await
}
