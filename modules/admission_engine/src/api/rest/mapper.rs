//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract::{self, AdmissionError};
use uuid::Uuid;

// ===== Form conversions =====

impl From<contract::TicketForm> for TicketFormDto {
    fn from(form: contract::TicketForm) -> Self {
        Self {
            id: form.id,
            title: form.title,
            fields: form.fields.into_iter().map(Into::into).collect(),
            ticket_items: form.ticket_items.into_iter().map(Into::into).collect(),
            promo_codes: form.promo_codes.into_iter().map(Into::into).collect(),
            ticket_required: form.ticket_required,
        }
    }
}

impl UpsertTicketFormRequest {
    /// Contract form with the id taken from the path
    pub fn into_form(self, id: Uuid) -> contract::TicketForm {
        contract::TicketForm {
            id,
            title: self.title,
            fields: self.fields.into_iter().map(Into::into).collect(),
            ticket_items: self.ticket_items.into_iter().map(Into::into).collect(),
            promo_codes: self.promo_codes.into_iter().map(Into::into).collect(),
            ticket_required: self.ticket_required,
        }
    }
}

impl From<contract::TicketItem> for TicketItemDto {
    fn from(item: contract::TicketItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            unit_price: item.unit_price,
            inventory: item.inventory,
            max_per_order: item.max_per_order,
            seats_per_unit: item.seats_per_unit,
        }
    }
}

impl From<TicketItemDto> for contract::TicketItem {
    fn from(dto: TicketItemDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            unit_price: dto.unit_price,
            inventory: dto.inventory,
            max_per_order: dto.max_per_order,
            seats_per_unit: dto.seats_per_unit,
        }
    }
}

impl From<contract::PromoCode> for PromoCodeDto {
    fn from(promo: contract::PromoCode) -> Self {
        Self {
            code: promo.code,
            discount_type: match promo.discount_type {
                contract::DiscountType::Percent => "PERCENT",
                contract::DiscountType::Fixed => "FIXED",
            }
            .to_string(),
            value: promo.value,
        }
    }
}

impl From<PromoCodeDto> for contract::PromoCode {
    fn from(dto: PromoCodeDto) -> Self {
        Self {
            code: dto.code,
            discount_type: match dto.discount_type.to_ascii_uppercase().as_str() {
                "FIXED" => contract::DiscountType::Fixed,
                _ => contract::DiscountType::Percent,
            },
            value: dto.value,
        }
    }
}

impl From<contract::FormField> for FormFieldDto {
    fn from(field: contract::FormField) -> Self {
        use contract::FieldType;

        Self {
            id: field.id,
            label: field.label,
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
            visible_when: field.visible_when.map(|c| FieldConditionDto {
                field_id: c.field_id,
                equals: c.equals,
            }),
        }
    }
}

impl From<FormFieldDto> for contract::FormField {
    fn from(dto: FormFieldDto) -> Self {
        use contract::FieldType;

        Self {
            id: dto.id,
            label: dto.label,
            field_type: match dto.field_type.to_ascii_uppercase().as_str() {
                "EMAIL" => FieldType::Email,
                "PHONE" => FieldType::Phone,
                "NUMBER" => FieldType::Number,
                "SELECT" => FieldType::Select,
                "CHECKBOX" => FieldType::Checkbox,
                "TEXTAREA" => FieldType::Textarea,
                _ => FieldType::Text,
            },
            required: dto.required,
            visible_when: dto.visible_when.map(|c| contract::FieldCondition {
                field_id: c.field_id,
                equals: c.equals,
            }),
        }
    }
}

// ===== Registration conversions =====

impl From<contract::PriceBreakdown> for PriceBreakdownDto {
    fn from(price: contract::PriceBreakdown) -> Self {
        Self {
            subtotal: price.subtotal,
            discount: price.discount,
            total: price.total,
        }
    }
}

impl TryFrom<DonationDto> for contract::DonationChoice {
    type Error = AdmissionError;

    fn try_from(dto: DonationDto) -> Result<Self, Self::Error> {
        match dto.kind.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "TABLES" => Ok(Self::WholeTables(dto.count)),
            "SEATS" => Ok(Self::IndividualSeats(dto.count)),
            other => Err(AdmissionError::validation(format!(
                "unknown donation kind '{other}'"
            ))),
        }
    }
}

impl From<GuestSlotDto> for contract::GuestSlot {
    fn from(dto: GuestSlotDto) -> Self {
        Self {
            name: dto.name,
            email: dto.email,
            dietary: dto.dietary,
            is_purchaser: dto.is_purchaser,
        }
    }
}

impl From<PaymentDto> for contract::PaymentResult {
    fn from(dto: PaymentDto) -> Self {
        Self {
            succeeded: dto.succeeded,
            transaction_id: dto.transaction_id,
            amount: dto.amount,
        }
    }
}

impl From<contract::Attendee> for AttendeeDto {
    fn from(attendee: contract::Attendee) -> Self {
        Self {
            id: attendee.id,
            form_id: attendee.form_id,
            name: attendee.name,
            email: attendee.email,
            ticket_type_summary: attendee.ticket_type_summary,
            registered_at: attendee.registered_at,
            payment_status: match attendee.payment_status {
                contract::PaymentStatus::Paid => "PAID",
                contract::PaymentStatus::Free => "FREE",
                contract::PaymentStatus::Pending => "PENDING",
            }
            .to_string(),
            transaction_id: attendee.transaction_id,
            qr_payload: attendee.qr_payload,
            is_primary: attendee.is_primary,
            primary_attendee_id: attendee.primary_attendee_id,
            invoice_id: attendee.invoice_id,
            total_seats: attendee.total_seats,
            donation_type: attendee.donation_type.map(|d| {
                match d {
                    contract::DonationType::Tables => "TABLES",
                    contract::DonationType::Seats => "SEATS",
                }
                .to_string()
            }),
            donated_seats: attendee.donated_seats,
            donated_tables: attendee.donated_tables,
            dietary_preference: attendee.dietary_preference,
            assigned_table_id: attendee.assigned_table_id,
            assigned_seat: attendee.assigned_seat,
            is_test: attendee.is_test,
        }
    }
}

impl From<contract::RegistrationOutcome> for RegistrationOutcomeDto {
    fn from(outcome: contract::RegistrationOutcome) -> Self {
        Self {
            primary: outcome.primary.into(),
            guests: outcome.guests.into_iter().map(Into::into).collect(),
            price: outcome.price.into(),
        }
    }
}

impl From<contract::ReferralStatus> for ReferralStatusDto {
    fn from(status: contract::ReferralStatus) -> Self {
        Self {
            primary_attendee_id: status.primary.id,
            primary_name: status.primary.name,
            total_seats: status.total_seats,
            remaining_seats: status.remaining_seats,
            is_full: status.is_full,
        }
    }
}

// ===== Seating conversions =====

impl From<contract::SeatingConfiguration> for SeatingConfigurationDto {
    fn from(configuration: contract::SeatingConfiguration) -> Self {
        Self {
            id: configuration.id,
            form_id: configuration.form_id,
            name: configuration.name,
            is_active: configuration.is_active,
            created_at: configuration.created_at,
        }
    }
}

impl From<contract::SeatingTable> for SeatingTableDto {
    fn from(table: contract::SeatingTable) -> Self {
        Self {
            id: Some(table.id),
            label: table.label,
            capacity: table.capacity,
            shape: match table.shape {
                contract::TableShape::Round => "ROUND",
                contract::TableShape::Rectangle => "RECTANGLE",
                contract::TableShape::Square => "SQUARE",
            }
            .to_string(),
            x: table.position.x,
            y: table.position.y,
            vip: table.vip,
            issued_seats: table.issued_seats,
        }
    }
}

impl SeatingTableDto {
    /// Contract table for a layout; new tables get a fresh id
    pub fn into_table(self, form_id: Uuid, configuration_id: Uuid) -> contract::SeatingTable {
        contract::SeatingTable {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            form_id,
            configuration_id,
            label: self.label,
            capacity: self.capacity,
            shape: match self.shape.to_ascii_uppercase().as_str() {
                "RECTANGLE" => contract::TableShape::Rectangle,
                "SQUARE" => contract::TableShape::Square,
                _ => contract::TableShape::Round,
            },
            position: contract::Position {
                x: self.x,
                y: self.y,
            },
            vip: self.vip,
            // The stored counter wins; clients cannot rewind it.
            issued_seats: 0,
        }
    }
}

impl From<contract::SeatingAssignment> for SeatingAssignmentDto {
    fn from(assignment: contract::SeatingAssignment) -> Self {
        Self {
            attendee_id: assignment.attendee_id,
            table_id: assignment.table_id,
            seat_number: assignment.seat_number,
        }
    }
}

impl From<contract::SeatingPlan> for SeatingPlanDto {
    fn from(plan: contract::SeatingPlan) -> Self {
        Self {
            form_id: plan.form_id,
            configuration_id: plan.configuration_id,
            tables: plan.tables.into_iter().map(Into::into).collect(),
            assignments: plan.assignments.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::AutoAssignReport> for AutoAssignReportDto {
    fn from(report: contract::AutoAssignReport) -> Self {
        Self {
            seated: report.seated.into_iter().map(Into::into).collect(),
            unassigned: report.unassigned,
        }
    }
}
