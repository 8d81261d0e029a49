//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Form DTOs =====

/// Ticket item offered by a form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketItemDto {
    #[schema(example = "table-8")]
    pub id: String,

    #[schema(example = "Table of 8")]
    pub name: String,

    /// Price of one unit
    #[schema(value_type = String, example = "800.00")]
    pub unit_price: Decimal,

    /// Inventory cap, 0 for unlimited (advisory)
    #[serde(default)]
    pub inventory: u32,

    /// Maximum units per order, at least 1
    pub max_per_order: u32,

    /// Seats granted by one unit
    #[serde(default = "default_seats_per_unit")]
    pub seats_per_unit: u32,
}

fn default_seats_per_unit() -> u32 {
    1
}

/// Promo code
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromoCodeDto {
    #[schema(example = "EARLYBIRD")]
    pub code: String,

    /// PERCENT or FIXED
    #[schema(example = "PERCENT")]
    pub discount_type: String,

    #[schema(value_type = String, example = "10")]
    pub value: Decimal,
}

/// Visibility condition on another field's answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldConditionDto {
    pub field_id: String,
    pub equals: String,
}

/// Question on the registration form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormFieldDto {
    pub id: String,
    pub label: String,

    /// TEXT, EMAIL, PHONE, NUMBER, SELECT, CHECKBOX or TEXTAREA
    #[schema(example = "EMAIL")]
    pub field_type: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<FieldConditionDto>,
}

/// Registration form response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketFormDto {
    pub id: Uuid,
    pub title: String,
    pub fields: Vec<FormFieldDto>,
    pub ticket_items: Vec<TicketItemDto>,
    pub promo_codes: Vec<PromoCodeDto>,
    pub ticket_required: bool,
}

/// Create or replace a form definition
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertTicketFormRequest {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FormFieldDto>,
    #[serde(default)]
    pub ticket_items: Vec<TicketItemDto>,
    #[serde(default)]
    pub promo_codes: Vec<PromoCodeDto>,
    #[serde(default)]
    pub ticket_required: bool,
}

// ===== Pricing DTOs =====

/// Quantities per ticket item id and an optional promo code
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PriceCartRequest {
    #[serde(default)]
    pub quantities: HashMap<String, u32>,

    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Price breakdown response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceBreakdownDto {
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
}

// ===== Registration DTOs =====

/// Seats given back by the purchaser
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DonationDto {
    /// NONE, TABLES or SEATS
    #[serde(default = "default_donation_kind")]
    #[schema(example = "SEATS")]
    pub kind: String,

    #[serde(default)]
    pub count: u32,
}

fn default_donation_kind() -> String {
    "NONE".to_string()
}

/// Per-seat guest entry collected at checkout
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GuestSlotDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub dietary: Option<String>,

    /// Slot 0 only: copy name and email from the purchaser's answers
    #[serde(default)]
    pub is_purchaser: bool,
}

/// Payment capture signal
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub succeeded: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

/// Finalize a registration
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegistrationRequestDto {
    #[serde(default)]
    pub quantities: HashMap<String, u32>,

    #[serde(default)]
    pub promo_code: Option<String>,

    #[serde(default)]
    pub donation: DonationDto,

    /// Seat slots in order; slot 0 is the purchaser
    #[serde(default)]
    pub guests: Vec<GuestSlotDto>,

    /// Answers keyed by field id
    #[serde(default)]
    pub answers: HashMap<String, String>,

    #[serde(default)]
    pub payment: Option<PaymentDto>,

    /// Preview submission
    #[serde(default)]
    pub is_test: bool,
}

/// Attendee response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendeeDto {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "Table of 8 x1")]
    pub ticket_type_summary: String,
    pub registered_at: DateTime<Utc>,

    /// PAID, FREE or PENDING
    pub payment_status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    pub qr_payload: String,
    pub is_primary: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_attendee_id: Option<Uuid>,

    pub invoice_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_seats: Option<u32>,

    /// TABLES or SEATS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_type: Option<String>,

    pub donated_seats: u32,
    pub donated_tables: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_preference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_table_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_seat: Option<u32>,

    pub is_test: bool,
}

/// Records created by a registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationOutcomeDto {
    pub primary: AttendeeDto,
    pub guests: Vec<AttendeeDto>,
    pub price: PriceBreakdownDto,
}

// ===== Referral DTOs =====

/// Referral token: an attendee id or a full referral link
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReferralQuery {
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Capacity behind a referral link
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReferralStatusDto {
    pub primary_attendee_id: Uuid,
    pub primary_name: String,
    pub total_seats: u32,
    pub remaining_seats: i64,
    pub is_full: bool,
}

/// Guest self-registration through a referral link
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GuestRegistrationRequest {
    #[serde(rename = "ref")]
    pub reference: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub dietary_preference: Option<String>,
}

// ===== Seating DTOs =====

/// Create a seating layout
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateConfigurationRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Seating layout response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeatingConfigurationDto {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Table on the floor plan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeatingTableDto {
    /// Omit to create a new table
    #[serde(default)]
    pub id: Option<Uuid>,

    #[schema(example = "Table 1")]
    pub label: String,

    pub capacity: u32,

    /// ROUND, RECTANGLE or SQUARE
    #[serde(default = "default_shape")]
    pub shape: String,

    #[serde(default)]
    pub x: f64,

    #[serde(default)]
    pub y: f64,

    #[serde(default)]
    pub vip: bool,

    /// Highest seat number issued so far (read-only)
    #[serde(default)]
    pub issued_seats: u32,
}

fn default_shape() -> String {
    "ROUND".to_string()
}

/// Replace a layout's tables
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveTablesRequest {
    pub tables: Vec<SeatingTableDto>,
}

/// One seated attendee
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeatingAssignmentDto {
    pub attendee_id: Uuid,
    pub table_id: Uuid,
    pub seat_number: u32,
}

/// Tables and assignments of a layout
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeatingPlanDto {
    pub form_id: Uuid,
    pub configuration_id: Uuid,
    pub tables: Vec<SeatingTableDto>,
    pub assignments: Vec<SeatingAssignmentDto>,
}

/// Seat attendees at a table, in order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignGuestsRequest {
    pub table_id: Uuid,
    pub attendee_ids: Vec<Uuid>,
}

/// Result of auto-assignment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AutoAssignReportDto {
    pub seated: Vec<SeatingAssignmentDto>,
    pub unassigned: Vec<Uuid>,
}

// ===== List Response DTOs =====

/// List of seating layouts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfigurationsListResponse {
    pub items: Vec<SeatingConfigurationDto>,
    pub total: usize,
}
