//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{attendee, seating_assignment, seating_configuration, seating_table, ticket_form};
use crate::contract::{
    Attendee, DiscountType, DonationType, FieldCondition, FieldType, FormAnswers, FormField,
    PaymentStatus, Position, PromoCode, SeatingAssignment, SeatingConfiguration, SeatingTable,
    TableShape, TicketForm, TicketItem,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// Stored counts are `INTEGER` columns; values past `i32::MAX` are refused.
pub(crate) fn to_db(value: u32, column: &str) -> anyhow::Result<i32> {
    i32::try_from(value).map_err(|_| anyhow::anyhow!("{column} {value} exceeds the storable range"))
}

pub(crate) fn from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

// ===== Ticket Form Conversions =====

impl TryFrom<ticket_form::Model> for TicketForm {
    type Error = anyhow::Error;

    fn try_from(entity: ticket_form::Model) -> Result<Self, Self::Error> {
        let definition: FormDefinitionJson = serde_json::from_value(entity.definition)?;

        Ok(Self {
            id: entity.id,
            title: entity.title,
            fields: definition.fields.into_iter().map(Into::into).collect(),
            ticket_items: definition.ticket_items.into_iter().map(Into::into).collect(),
            promo_codes: definition.promo_codes.into_iter().map(Into::into).collect(),
            ticket_required: definition.ticket_required,
        })
    }
}

impl TryFrom<&TicketForm> for ticket_form::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &TicketForm) -> Result<Self, Self::Error> {
        let definition = FormDefinitionJson {
            fields: model.fields.iter().map(Into::into).collect(),
            ticket_items: model.ticket_items.iter().map(Into::into).collect(),
            promo_codes: model.promo_codes.iter().map(Into::into).collect(),
            ticket_required: model.ticket_required,
        };
        let now = chrono::Utc::now();

        Ok(Self {
            id: Set(model.id),
            title: Set(model.title.clone()),
            definition: Set(serde_json::to_value(definition)?),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }
}

// ===== Attendee Conversions =====

impl TryFrom<attendee::Model> for Attendee {
    type Error = anyhow::Error;

    fn try_from(entity: attendee::Model) -> Result<Self, Self::Error> {
        let answers: FormAnswers = serde_json::from_value(entity.answers)?;

        Ok(Self {
            id: entity.id,
            form_id: entity.form_id,
            name: entity.name,
            email: entity.email,
            ticket_type_summary: entity.ticket_type_summary,
            registered_at: entity.registered_at,
            payment_status: parse_payment_status(&entity.payment_status),
            transaction_id: entity.transaction_id,
            qr_payload: entity.qr_payload,
            is_primary: entity.is_primary,
            primary_attendee_id: entity.primary_attendee_id,
            invoice_id: entity.invoice_id,
            total_seats: entity.total_seats.map(from_db),
            donation_type: entity.donation_type.as_deref().and_then(parse_donation_type),
            donated_seats: from_db(entity.donated_seats),
            donated_tables: from_db(entity.donated_tables),
            dietary_preference: entity.dietary_preference,
            answers,
            assigned_table_id: entity.assigned_table_id,
            assigned_seat: entity.assigned_seat.map(from_db),
            is_test: entity.is_test,
        })
    }
}

impl TryFrom<&Attendee> for attendee::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Attendee) -> Result<Self, Self::Error> {
        let answers = model
            .answers
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
            .collect::<serde_json::Map<_, _>>();

        Ok(Self {
            id: Set(model.id),
            form_id: Set(model.form_id),
            name: Set(model.name.clone()),
            email: Set(model.email.clone()),
            ticket_type_summary: Set(model.ticket_type_summary.clone()),
            registered_at: Set(model.registered_at),
            slot_index: NotSet,
            payment_status: Set(format_payment_status(model.payment_status).to_string()),
            transaction_id: Set(model.transaction_id.clone()),
            qr_payload: Set(model.qr_payload.clone()),
            is_primary: Set(model.is_primary),
            primary_attendee_id: Set(model.primary_attendee_id),
            invoice_id: Set(model.invoice_id),
            total_seats: Set(model
                .total_seats
                .map(|seats| to_db(seats, "total_seats"))
                .transpose()?),
            donation_type: Set(model
                .donation_type
                .map(|d| format_donation_type(d).to_string())),
            donated_seats: Set(to_db(model.donated_seats, "donated_seats")?),
            donated_tables: Set(to_db(model.donated_tables, "donated_tables")?),
            dietary_preference: Set(model.dietary_preference.clone()),
            answers: Set(serde_json::Value::Object(answers)),
            assigned_table_id: Set(model.assigned_table_id),
            assigned_seat: Set(model
                .assigned_seat
                .map(|seat| to_db(seat, "assigned_seat"))
                .transpose()?),
            is_test: Set(model.is_test),
        })
    }
}

fn parse_payment_status(s: &str) -> PaymentStatus {
    match s {
        "PAID" => PaymentStatus::Paid,
        "FREE" => PaymentStatus::Free,
        _ => PaymentStatus::Pending,
    }
}

fn format_payment_status(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Paid => "PAID",
        PaymentStatus::Free => "FREE",
        PaymentStatus::Pending => "PENDING",
    }
}

fn parse_donation_type(s: &str) -> Option<DonationType> {
    match s {
        "TABLES" => Some(DonationType::Tables),
        "SEATS" => Some(DonationType::Seats),
        _ => None,
    }
}

fn format_donation_type(donation: DonationType) -> &'static str {
    match donation {
        DonationType::Tables => "TABLES",
        DonationType::Seats => "SEATS",
    }
}

// ===== Seating Conversions =====

impl From<seating_configuration::Model> for SeatingConfiguration {
    fn from(entity: seating_configuration::Model) -> Self {
        Self {
            id: entity.id,
            form_id: entity.form_id,
            name: entity.name,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

impl From<&SeatingConfiguration> for seating_configuration::ActiveModel {
    fn from(model: &SeatingConfiguration) -> Self {
        Self {
            id: Set(model.id),
            form_id: Set(model.form_id),
            name: Set(model.name.clone()),
            is_active: Set(model.is_active),
            created_at: Set(model.created_at),
        }
    }
}

impl From<seating_table::Model> for SeatingTable {
    fn from(entity: seating_table::Model) -> Self {
        Self {
            id: entity.id,
            form_id: entity.form_id,
            configuration_id: entity.configuration_id,
            label: entity.label,
            capacity: from_db(entity.capacity),
            shape: match entity.shape.as_str() {
                "RECTANGLE" => TableShape::Rectangle,
                "SQUARE" => TableShape::Square,
                _ => TableShape::Round,
            },
            position: Position {
                x: entity.pos_x,
                y: entity.pos_y,
            },
            vip: entity.vip,
            issued_seats: from_db(entity.issued_seats),
        }
    }
}

/// Table row for `table`, placed at `sort_order` within its layout
pub(crate) fn table_active_model(
    table: &SeatingTable,
    sort_order: usize,
) -> anyhow::Result<seating_table::ActiveModel> {
    Ok(seating_table::ActiveModel {
        id: Set(table.id),
        form_id: Set(table.form_id),
        configuration_id: Set(table.configuration_id),
        sort_order: Set(i32::try_from(sort_order)?),
        label: Set(table.label.clone()),
        capacity: Set(to_db(table.capacity, "capacity")?),
        shape: Set(match table.shape {
            TableShape::Round => "ROUND",
            TableShape::Rectangle => "RECTANGLE",
            TableShape::Square => "SQUARE",
        }
        .to_string()),
        pos_x: Set(table.position.x),
        pos_y: Set(table.position.y),
        vip: Set(table.vip),
        issued_seats: Set(to_db(table.issued_seats, "issued_seats")?),
    })
}

impl From<seating_assignment::Model> for SeatingAssignment {
    fn from(entity: seating_assignment::Model) -> Self {
        Self {
            configuration_id: entity.configuration_id,
            attendee_id: entity.attendee_id,
            table_id: entity.table_id,
            seat_number: from_db(entity.seat_number),
        }
    }
}

impl TryFrom<&SeatingAssignment> for seating_assignment::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &SeatingAssignment) -> Result<Self, Self::Error> {
        Ok(Self {
            configuration_id: Set(model.configuration_id),
            attendee_id: Set(model.attendee_id),
            table_id: Set(model.table_id),
            seat_number: Set(to_db(model.seat_number, "seat_number")?),
        })
    }
}

// ===== JSON Serialization Helpers =====

/// JSON representation of a form definition for database storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormDefinitionJson {
    #[serde(default)]
    fields: Vec<FormFieldJson>,
    #[serde(default)]
    ticket_items: Vec<TicketItemJson>,
    #[serde(default)]
    promo_codes: Vec<PromoCodeJson>,
    #[serde(default)]
    ticket_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormFieldJson {
    id: String,
    label: String,
    field_type: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    visible_when: Option<FieldConditionJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldConditionJson {
    field_id: String,
    equals: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TicketItemJson {
    id: String,
    name: String,
    unit_price: Decimal,
    #[serde(default)]
    inventory: u32,
    #[serde(default)]
    max_per_order: u32,
    #[serde(default = "one")]
    seats_per_unit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromoCodeJson {
    code: String,
    discount_type: String,
    value: Decimal,
}

fn one() -> u32 {
    1
}

impl From<FormFieldJson> for FormField {
    fn from(json: FormFieldJson) -> Self {
        Self {
            id: json.id,
            label: json.label,
            field_type: match json.field_type.as_str() {
                "EMAIL" => FieldType::Email,
                "PHONE" => FieldType::Phone,
                "NUMBER" => FieldType::Number,
                "SELECT" => FieldType::Select,
                "CHECKBOX" => FieldType::Checkbox,
                "TEXTAREA" => FieldType::Textarea,
                _ => FieldType::Text,
            },
            required: json.required,
            visible_when: json.visible_when.map(|c| FieldCondition {
                field_id: c.field_id,
                equals: c.equals,
            }),
        }
    }
}

impl From<&FormField> for FormFieldJson {
    fn from(field: &FormField) -> Self {
        Self {
            id: field.id.clone(),
            label: field.label.clone(),
            field_type: match field.field_type {
                FieldType::Text => "TEXT",
                FieldType::Email => "EMAIL",
                FieldType::Phone => "PHONE",
                FieldType::Number => "NUMBER",
                FieldType::Select => "SELECT",
                FieldType::Checkbox => "CHECKBOX",
                FieldType::Textarea => "TEXTAREA",
            }
            .to_string(),
            required: field.required,
            visible_when: field.visible_when.as_ref().map(|c| FieldConditionJson {
                field_id: c.field_id.clone(),
                equals: c.equals.clone(),
            }),
        }
    }
}

impl From<TicketItemJson> for TicketItem {
    fn from(json: TicketItemJson) -> Self {
        Self {
            id: json.id,
            name: json.name,
            unit_price: json.unit_price,
            inventory: json.inventory,
            max_per_order: json.max_per_order,
            seats_per_unit: json.seats_per_unit,
        }
    }
}

impl From<&TicketItem> for TicketItemJson {
    fn from(item: &TicketItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            inventory: item.inventory,
            max_per_order: item.max_per_order,
            seats_per_unit: item.seats_per_unit,
        }
    }
}

impl From<PromoCodeJson> for PromoCode {
    fn from(json: PromoCodeJson) -> Self {
        Self {
            code: json.code,
            discount_type: match json.discount_type.as_str() {
                "FIXED" => DiscountType::Fixed,
                _ => DiscountType::Percent,
            },
            value: json.value,
        }
    }
}

impl From<&PromoCode> for PromoCodeJson {
    fn from(promo: &PromoCode) -> Self {
        Self {
            code: promo.code.clone(),
            discount_type: match promo.discount_type {
                DiscountType::Percent => "PERCENT",
                DiscountType::Fixed => "FIXED",
            }
            .to_string(),
            value: promo.value,
        }
    }
}
