//! Contract models for the admission engine
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

// ===== Ticket form =====

/// A purchasable ticket type offered by a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketItem {
    /// Stable item identifier within the form
    pub id: String,
    /// Display name, also used in ticket type summaries
    pub name: String,
    /// Price of one unit
    pub unit_price: Decimal,
    /// Inventory cap (0 = unlimited). Advisory only.
    pub inventory: u32,
    /// Maximum units per order
    pub max_per_order: u32,
    /// Seats granted by one unit (> 1 marks a table item)
    pub seats_per_unit: u32,
}

impl TicketItem {
    /// Whether one unit of this item seats more than one person
    pub fn is_table(&self) -> bool {
        self.seats_per_unit > 1
    }
}

/// Promo discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal
    Percent,
    /// `value` is an absolute amount
    Fixed,
}

/// Promo code configured on a form's ticket field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
}

/// Form field input type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Number,
    Select,
    Checkbox,
    Textarea,
}

/// Conditional visibility: the field is shown only when another answer matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCondition {
    pub field_id: String,
    pub equals: String,
}

/// A question on the registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub visible_when: Option<FieldCondition>,
}

/// Purchaser answers keyed by field id
pub type FormAnswers = HashMap<String, String>;

/// Registration form with its ticket field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketForm {
    pub id: Uuid,
    pub title: String,
    pub fields: Vec<FormField>,
    pub ticket_items: Vec<TicketItem>,
    pub promo_codes: Vec<PromoCode>,
    /// Whether at least one ticket unit must be selected
    pub ticket_required: bool,
}

impl TicketForm {
    /// Look up a ticket item by id
    pub fn item(&self, item_id: &str) -> Option<&TicketItem> {
        self.ticket_items.iter().find(|item| item.id == item_id)
    }
}

// ===== Cart =====

/// One ticket item and the quantity requested for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: TicketItem,
    pub quantity: u32,
}

/// Requested quantities in form item order, plus at most one promo code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub promo: Option<PromoCode>,
}

/// Result of pricing a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

// ===== Donation and guest slots =====

/// Purchaser's choice to give seats back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DonationChoice {
    #[default]
    None,
    /// Donate this many whole tables
    WholeTables(u32),
    /// Donate this many individual seats
    IndividualSeats(u32),
}

/// Stored donation kind on a primary attendee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationType {
    Tables,
    Seats,
}

/// Transient per-seat guest data collected before finalize
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestSlot {
    pub name: String,
    pub email: String,
    pub dietary: Option<String>,
    /// Slot mirrors the purchaser's own answers (slot 0 only)
    pub is_purchaser: bool,
}

impl GuestSlot {
    /// Both name and email filled in
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

// ===== Payment =====

/// Payment capture signal supplied by the payment collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    pub succeeded: bool,
    pub transaction_id: Option<String>,
    pub amount: Decimal,
}

/// Payment state of an attendee record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Free,
    Pending,
}

// ===== Attendees =====

/// Persistent attendee record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub email: String,
    /// Human readable summary, e.g. "Table x1, GA x2"
    pub ticket_type_summary: String,
    pub registered_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    /// Opaque check-in token, write-once
    pub qr_payload: String,
    pub is_primary: bool,
    /// Set iff `is_primary` is false
    pub primary_attendee_id: Option<Uuid>,
    /// Shared by a primary and all its guests
    pub invoice_id: Uuid,
    /// Seats purchased (primary only; `None` on records written before it was stored)
    pub total_seats: Option<u32>,
    pub donation_type: Option<DonationType>,
    pub donated_seats: u32,
    pub donated_tables: u32,
    pub dietary_preference: Option<String>,
    pub answers: FormAnswers,
    pub assigned_table_id: Option<Uuid>,
    pub assigned_seat: Option<u32>,
    /// Preview submission, not a committed registration
    pub is_test: bool,
}

/// Guest details submitted through a referral link
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestDetails {
    pub name: String,
    pub email: String,
    pub dietary_preference: Option<String>,
}

/// Everything needed to finalize one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub form_id: Uuid,
    pub cart: Cart,
    pub donation: DonationChoice,
    pub guest_slots: Vec<GuestSlot>,
    pub answers: FormAnswers,
    pub payment: Option<PaymentResult>,
    pub is_test: bool,
}

/// A checkout as submitted: raw quantities and guest slots as the client
/// last saw them. The engine builds the cart and resizes the slots itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub form_id: Uuid,
    pub quantities: HashMap<String, u32>,
    pub promo_code: Option<String>,
    pub donation: DonationChoice,
    pub guest_slots: Vec<GuestSlot>,
    pub answers: FormAnswers,
    pub payment: Option<PaymentResult>,
    pub is_test: bool,
}

/// Records created by a successful finalize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub primary: Attendee,
    pub guests: Vec<Attendee>,
    pub price: PriceBreakdown,
}

/// Capacity view of a referral link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralStatus {
    pub primary: Attendee,
    pub total_seats: u32,
    pub remaining_seats: i64,
    pub is_full: bool,
}

// ===== Seating =====

/// Table outline used by the floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    Round,
    Rectangle,
    Square,
}

/// Table position on the floor plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Physical table within one seating configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SeatingTable {
    pub id: Uuid,
    pub form_id: Uuid,
    pub configuration_id: Uuid,
    pub label: String,
    pub capacity: u32,
    pub shape: TableShape,
    pub position: Position,
    pub vip: bool,
    /// Highest seat number ever issued at this table
    pub issued_seats: u32,
}

/// One attendee seated at one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatingAssignment {
    pub configuration_id: Uuid,
    pub attendee_id: Uuid,
    pub table_id: Uuid,
    pub seat_number: u32,
}

/// Named, independent seating layout for a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingConfiguration {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a greedy auto-assignment pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoAssignReport {
    pub seated: Vec<SeatingAssignment>,
    pub unassigned: Vec<Uuid>,
}

/// Tables and assignments of one (form, configuration) pair, saved as a unit
#[derive(Debug, Clone, PartialEq)]
pub struct SeatingPlan {
    pub form_id: Uuid,
    pub configuration_id: Uuid,
    pub tables: Vec<SeatingTable>,
    pub assignments: Vec<SeatingAssignment>,
}
