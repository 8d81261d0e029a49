//! Donation policy - seats handed back by the purchaser

use super::seats::{expand_seats, has_table_item};
use crate::contract::{AdmissionError, Cart, DonationChoice, DonationType};

/// Seat counts after applying a donation choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationOutcome {
    pub total_seats: u32,
    pub donated_seats: u32,
    pub donated_tables: u32,
    pub donation_type: Option<DonationType>,
    /// Slots that still need guest data, purchaser included
    pub effective_slots: u32,
}

/// Seats per unit of the first table item with a non-zero quantity.
///
/// Carts mixing table sizes use only this first item for whole-table donations.
pub fn seats_per_table_item(cart: &Cart) -> Option<u32> {
    cart.selected()
        .find(|line| line.item.is_table())
        .map(|line| line.item.seats_per_unit)
}

/// Number of seats a donation choice gives back
pub fn donated_seats(cart: &Cart, choice: DonationChoice) -> u32 {
    match choice {
        DonationChoice::None => 0,
        DonationChoice::WholeTables(count) => {
            count.saturating_mul(seats_per_table_item(cart).unwrap_or(0))
        }
        DonationChoice::IndividualSeats(count) => count,
    }
}

/// `max(1, total - donated)`: the purchaser's own seat is never donated away
pub fn effective_guest_slot_count(total_seats: u32, donated_seats: u32) -> u32 {
    total_seats.saturating_sub(donated_seats).max(1)
}

/// Apply a donation choice to a cart.
///
/// Donations are only offered for carts holding a table item.
pub fn apply_donation(cart: &Cart, choice: DonationChoice) -> Result<DonationOutcome, AdmissionError> {
    let total_seats = expand_seats(cart)?;

    if choice != DonationChoice::None && !has_table_item(cart) {
        return Err(AdmissionError::validation(
            "donations require a table ticket in the cart",
        ));
    }

    let donated = donated_seats(cart, choice);
    let (donation_type, donated_tables) = match choice {
        DonationChoice::None => (None, 0),
        DonationChoice::WholeTables(count) => (Some(DonationType::Tables), count),
        DonationChoice::IndividualSeats(_) => (Some(DonationType::Seats), 0),
    };

    Ok(DonationOutcome {
        total_seats,
        donated_seats: donated,
        donated_tables,
        donation_type,
        effective_slots: effective_guest_slot_count(total_seats, donated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{CartLine, TicketItem};
    use rust_decimal::Decimal;

    fn line(id: &str, seats: u32, quantity: u32) -> CartLine {
        CartLine {
            item: TicketItem {
                id: id.to_string(),
                name: id.to_string(),
                unit_price: Decimal::from(50),
                inventory: 0,
                max_per_order: 10,
                seats_per_unit: seats,
            },
            quantity,
        }
    }

    #[test]
    fn test_whole_table_donation_leaves_purchaser_seat() {
        let cart = Cart {
            lines: vec![line("table", 8, 1)],
            promo: None,
        };

        let outcome = apply_donation(&cart, DonationChoice::WholeTables(1)).unwrap();

        assert_eq!(outcome.total_seats, 8);
        assert_eq!(outcome.donated_seats, 8);
        assert_eq!(outcome.donated_tables, 1);
        assert_eq!(outcome.donation_type, Some(DonationType::Tables));
        assert_eq!(outcome.effective_slots, 1);
    }

    #[test]
    fn test_individual_seats_reduce_slots() {
        let cart = Cart {
            lines: vec![line("table", 10, 1)],
            promo: None,
        };

        let outcome = apply_donation(&cart, DonationChoice::IndividualSeats(3)).unwrap();

        assert_eq!(outcome.donated_seats, 3);
        assert_eq!(outcome.effective_slots, 7);
    }

    #[test]
    fn test_effective_slots_never_below_one() {
        for donated in [0, 5, 8, 9, 100, u32::MAX] {
            assert!(effective_guest_slot_count(8, donated) >= 1);
        }
        assert_eq!(effective_guest_slot_count(0, 0), 1);
    }

    #[test]
    fn test_mixed_table_sizes_use_first_table_item() {
        let cart = Cart {
            lines: vec![line("ga", 1, 2), line("small", 4, 0), line("big", 10, 1), line("medium", 6, 1)],
            promo: None,
        };

        assert_eq!(seats_per_table_item(&cart), Some(10));
        assert_eq!(donated_seats(&cart, DonationChoice::WholeTables(2)), 20);
    }

    #[test]
    fn test_donation_rejected_without_table_item() {
        let cart = Cart {
            lines: vec![line("ga", 1, 2)],
            promo: None,
        };

        assert!(matches!(
            apply_donation(&cart, DonationChoice::IndividualSeats(1)),
            Err(AdmissionError::Validation { .. })
        ));
        assert_eq!(
            apply_donation(&cart, DonationChoice::None).unwrap().effective_slots,
            2
        );
    }
}
