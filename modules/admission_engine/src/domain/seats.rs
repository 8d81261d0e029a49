//! Seat expansion and guest slot bookkeeping

use crate::contract::{AdmissionError, Cart, FieldType, FormAnswers, FormField, GuestSlot};

/// Total seats bought: sum of quantity times seats per unit.
///
/// A count that does not fit in `u32` is a validation error.
pub fn expand_seats(cart: &Cart) -> Result<u32, AdmissionError> {
    cart.lines.iter().try_fold(0u32, |total, line| {
        line.quantity
            .checked_mul(line.item.seats_per_unit.max(1))
            .and_then(|seats| total.checked_add(seats))
            .ok_or_else(|| {
                AdmissionError::validation(format!(
                    "seat count for '{}' is out of range",
                    line.item.name
                ))
            })
    })
}

/// Whether any multi-seat item has a non-zero quantity
pub fn has_table_item(cart: &Cart) -> bool {
    cart.selected().any(|line| line.item.is_table())
}

/// Resize the slot list to `count` entries.
///
/// Grows by appending empty slots and shrinks by truncating from the tail.
/// Slots are keyed by index, so shrinking drops the highest-indexed guest data.
pub fn sync_guest_slots(mut previous: Vec<GuestSlot>, count: usize) -> Vec<GuestSlot> {
    previous.resize_with(count, GuestSlot::default);
    previous
}

/// Copy the purchaser's name and email into slot 0 while it is bound
pub fn mirror_purchaser(slots: &mut [GuestSlot], fields: &[FormField], answers: &FormAnswers) {
    let Some(first) = slots.first_mut() else {
        return;
    };
    if !first.is_purchaser {
        return;
    }

    let (name, email) = purchaser_identity(fields, answers);
    first.name = name;
    first.email = email;
}

/// Unbind slot 0 from the purchaser; its current contents stay as typed
pub fn detach_purchaser(slots: &mut [GuestSlot]) {
    if let Some(first) = slots.first_mut() {
        first.is_purchaser = false;
    }
}

/// Purchaser name and email from the main form answers
pub(crate) fn purchaser_identity(fields: &[FormField], answers: &FormAnswers) -> (String, String) {
    let answer = |field: Option<&FormField>| {
        field
            .and_then(|f| answers.get(&f.id))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    let email_field = fields
        .iter()
        .find(|f| f.field_type == FieldType::Email)
        .or_else(|| fields.iter().find(|f| label_mentions(f, "email")));

    let name_field = fields
        .iter()
        .find(|f| f.field_type != FieldType::Email && label_mentions(f, "name"))
        .or_else(|| fields.iter().find(|f| f.field_type == FieldType::Text));

    (answer(name_field), answer(email_field))
}

fn label_mentions(field: &FormField, word: &str) -> bool {
    field.label.to_lowercase().contains(word)
}
