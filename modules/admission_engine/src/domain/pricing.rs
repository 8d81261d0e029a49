//! Cart construction and promo-aware pricing

use crate::contract::{AdmissionError, Cart, CartLine, DiscountType, PriceBreakdown, PromoCode, TicketForm};
use rust_decimal::Decimal;

impl Cart {
    /// Empty cart with one zero-quantity line per ticket item, in form order
    pub fn for_form(form: &TicketForm) -> Self {
        Self {
            lines: form
                .ticket_items
                .iter()
                .map(|item| CartLine {
                    item: item.clone(),
                    quantity: 0,
                })
                .collect(),
            promo: None,
        }
    }

    /// Set the requested quantity for one item
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> Result<(), AdmissionError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.item.id == item_id)
            .ok_or_else(|| AdmissionError::validation(format!("unknown ticket item '{item_id}'")))?;

        if quantity > line.item.max_per_order {
            return Err(AdmissionError::validation(format!(
                "at most {} of '{}' per order",
                line.item.max_per_order, line.item.name
            )));
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Requested quantity for one item (0 when unknown)
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.item.id == item_id)
            .map_or(0, |line| line.quantity)
    }

    /// Sum of all requested units
    pub fn total_quantity(&self) -> Result<u32, AdmissionError> {
        self.lines.iter().try_fold(0u32, |total, line| {
            total
                .checked_add(line.quantity)
                .ok_or_else(|| AdmissionError::validation("too many tickets in one order"))
        })
    }

    /// Lines with a non-zero quantity, in form order
    pub fn selected(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| line.quantity > 0)
    }
}

/// Compute subtotal, discount and total. Pure: same cart, same numbers.
pub fn price_cart(cart: &Cart) -> PriceBreakdown {
    let subtotal: Decimal = cart
        .lines
        .iter()
        .map(|line| line.item.unit_price * Decimal::from(line.quantity))
        .sum();

    let discount = match &cart.promo {
        Some(promo) => match promo.discount_type {
            DiscountType::Percent => (subtotal * promo.value / Decimal::ONE_HUNDRED).round_dp(2),
            DiscountType::Fixed => promo.value,
        },
        None => Decimal::ZERO,
    };

    let total = (subtotal - discount).max(Decimal::ZERO);

    PriceBreakdown {
        subtotal,
        discount,
        total,
    }
}

/// Bind the promo whose code matches `code_text` case-insensitively.
///
/// Replaces any previously applied code. On no match the cart is left untouched.
pub fn apply_promo<'a>(
    cart: &mut Cart,
    promos: &'a [PromoCode],
    code_text: &str,
) -> Result<&'a PromoCode, AdmissionError> {
    let wanted = code_text.trim();
    let promo = promos
        .iter()
        .find(|promo| promo.code.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| AdmissionError::PromoNotFound {
            code: wanted.to_string(),
        })?;

    cart.promo = Some(promo.clone());
    Ok(promo)
}

/// Clear any applied promo
pub fn remove_promo(cart: &mut Cart) {
    cart.promo = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::TicketItem;
    use uuid::Uuid;

    fn item(id: &str, price: i64, seats: u32) -> TicketItem {
        TicketItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            unit_price: Decimal::from(price),
            inventory: 0,
            max_per_order: 10,
            seats_per_unit: seats,
        }
    }

    fn form() -> TicketForm {
        TicketForm {
            id: Uuid::new_v4(),
            title: "Gala".to_string(),
            fields: vec![],
            ticket_items: vec![item("ga", 25, 1), item("table", 400, 8)],
            promo_codes: vec![
                PromoCode {
                    code: "SAVE10".to_string(),
                    discount_type: DiscountType::Percent,
                    value: Decimal::from(10),
                },
                PromoCode {
                    code: "BIGSPENDER".to_string(),
                    discount_type: DiscountType::Fixed,
                    value: Decimal::from(1000),
                },
            ],
            ticket_required: true,
        }
    }

    #[test]
    fn test_percent_promo_on_hundred() {
        let form = form();
        let mut cart = Cart::for_form(&form);
        cart.set_quantity("ga", 4).unwrap();

        apply_promo(&mut cart, &form.promo_codes, "save10").unwrap();
        let price = price_cart(&cart);

        assert_eq!(price.subtotal, Decimal::from(100));
        assert_eq!(price.discount, Decimal::from(10));
        assert_eq!(price.total, Decimal::from(90));
    }

    #[test]
    fn test_fixed_discount_clamps_total_to_zero() {
        let form = form();
        let mut cart = Cart::for_form(&form);
        cart.set_quantity("table", 1).unwrap();

        apply_promo(&mut cart, &form.promo_codes, "BigSpender").unwrap();
        let price = price_cart(&cart);

        assert_eq!(price.subtotal, Decimal::from(400));
        assert_eq!(price.discount, Decimal::from(1000));
        assert_eq!(price.total, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_promo_leaves_cart_unchanged() {
        let form = form();
        let mut cart = Cart::for_form(&form);
        cart.set_quantity("ga", 2).unwrap();
        apply_promo(&mut cart, &form.promo_codes, "SAVE10").unwrap();
        let before = cart.clone();

        let err = apply_promo(&mut cart, &form.promo_codes, "NOPE").unwrap_err();

        assert_eq!(err, AdmissionError::PromoNotFound { code: "NOPE".to_string() });
        assert_eq!(cart, before);
    }

    #[test]
    fn test_second_promo_replaces_first() {
        let form = form();
        let mut cart = Cart::for_form(&form);
        apply_promo(&mut cart, &form.promo_codes, "SAVE10").unwrap();
        apply_promo(&mut cart, &form.promo_codes, " bigspender ").unwrap();

        assert_eq!(cart.promo.as_ref().map(|p| p.code.as_str()), Some("BIGSPENDER"));

        remove_promo(&mut cart);
        assert!(cart.promo.is_none());
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let form = form();
        let mut cart = Cart::for_form(&form);
        cart.set_quantity("ga", 3).unwrap();
        cart.set_quantity("table", 2).unwrap();
        apply_promo(&mut cart, &form.promo_codes, "SAVE10").unwrap();

        assert_eq!(price_cart(&cart), price_cart(&cart));
    }

    #[test]
    fn test_quantity_above_max_per_order_rejected() {
        let form = form();
        let mut cart = Cart::for_form(&form);

        assert!(matches!(
            cart.set_quantity("ga", 11),
            Err(AdmissionError::Validation { .. })
        ));
        assert!(matches!(
            cart.set_quantity("vip", 1),
            Err(AdmissionError::Validation { .. })
        ));
        assert_eq!(cart.total_quantity().unwrap(), 0);
    }

    #[test]
    fn test_max_per_order_is_a_hard_cap() {
        let mut form = form();
        form.ticket_items[0].max_per_order = 0;
        let mut cart = Cart::for_form(&form);

        assert!(matches!(
            cart.set_quantity("ga", 1),
            Err(AdmissionError::Validation { .. })
        ));
        cart.set_quantity("ga", 0).unwrap();
        cart.set_quantity("table", 10).unwrap();
        assert_eq!(cart.total_quantity().unwrap(), 10);
    }

    #[test]
    fn test_total_quantity_overflow_is_rejected() {
        let form = form();
        let mut cart = Cart::for_form(&form);
        for line in &mut cart.lines {
            line.quantity = u32::MAX;
        }

        assert!(matches!(
            cart.total_quantity(),
            Err(AdmissionError::Validation { .. })
        ));
    }
}
