// src/orders/totals.rs
//
// Pure money math for orders. No I/O here; everything is recomputed from
// the caller-supplied items and payments, never trusted from client input.
// All arithmetic is fixed-point Decimal rounded to 2 places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Fixed,
    Percentage,
}

impl DiscountType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(DiscountType::Fixed),
            "percentage" => Some(DiscountType::Percentage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Fixed => "fixed",
            DiscountType::Percentage => "percentage",
        }
    }
}

/// Per-item amount: price x quantity. Quantity must be at least 1 and the
/// unit price non-negative.
pub fn line_total(price: Decimal, quantity: i32) -> Result<Decimal, AppError> {
    if quantity < 1 {
        return Err(AppError::validation("Quantity must be greater than 0"));
    }
    if price < Decimal::ZERO {
        return Err(AppError::validation("Unit price cannot be negative"));
    }
    Ok((price * Decimal::from(quantity)).round_dp(2))
}

/// Order total after discount. A fixed discount larger than the subtotal
/// floors the total at zero instead of going negative.
pub fn order_total(line_totals: &[Decimal], discount_amount: Decimal, discount_type: DiscountType) -> Decimal {
    let subtotal: Decimal = line_totals.iter().sum();
    let discount = match discount_type {
        DiscountType::Percentage => subtotal * discount_amount / Decimal::from(100),
        DiscountType::Fixed => discount_amount,
    };
    let total = subtotal - discount;
    if total < Decimal::ZERO {
        Decimal::ZERO
    } else {
        total.round_dp(2)
    }
}

/// Outstanding balance, signed. Overpayment is a legal state surfaced to
/// operators as a negative due, so this is deliberately not clamped.
pub fn due_amount(total: Decimal, total_paid: Decimal) -> Decimal {
    (total - total_paid).round_dp(2)
}

/// The three stored money fields of an order, derived together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Financials {
    pub total_amount: Decimal,
    pub advance_paid: Decimal,
    pub due_amount: Decimal,
}

/// Derive an order's money fields from the full item and payment sets.
/// Pure: feeding the same sets twice yields the same snapshot, which is
/// what makes the persisted recalculation idempotent.
pub fn recompute(
    line_totals: &[Decimal],
    payment_amounts: &[Decimal],
    discount_amount: Decimal,
    discount_type: DiscountType,
) -> Financials {
    let total = order_total(line_totals, discount_amount, discount_type);
    let paid: Decimal = payment_amounts.iter().sum::<Decimal>().round_dp(2);
    Financials {
        total_amount: total,
        advance_paid: paid,
        due_amount: due_amount(total, paid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(line_total(dec!(100.00), 2).unwrap(), dec!(200.00));
        assert_eq!(line_total(dec!(50.00), 1).unwrap(), dec!(50.00));
        assert_eq!(line_total(dec!(0), 3).unwrap(), dec!(0));
    }

    #[test]
    fn line_total_rejects_bad_input() {
        assert!(line_total(dec!(10), 0).is_err());
        assert!(line_total(dec!(10), -1).is_err());
        assert!(line_total(dec!(-0.01), 1).is_err());
    }

    #[test]
    fn fixed_discount_is_subtracted() {
        let totals = [dec!(200.00), dec!(50.00)];
        assert_eq!(order_total(&totals, dec!(10), DiscountType::Fixed), dec!(240.00));
    }

    #[test]
    fn oversized_fixed_discount_floors_at_zero() {
        let totals = [dec!(30.00)];
        assert_eq!(order_total(&totals, dec!(100), DiscountType::Fixed), dec!(0));
    }

    #[test]
    fn percentage_discount_boundaries() {
        let totals = [dec!(80.00), dec!(20.00)];
        assert_eq!(order_total(&totals, dec!(0), DiscountType::Percentage), dec!(100.00));
        assert_eq!(order_total(&totals, dec!(100), DiscountType::Percentage), dec!(0));
        assert_eq!(order_total(&totals, dec!(25), DiscountType::Percentage), dec!(75.00));
    }

    #[test]
    fn subtotal_is_order_independent() {
        let a = [dec!(200.00), dec!(50.00), dec!(12.34)];
        let b = [dec!(12.34), dec!(200.00), dec!(50.00)];
        assert_eq!(
            order_total(&a, dec!(10), DiscountType::Fixed),
            order_total(&b, dec!(10), DiscountType::Fixed)
        );
    }

    #[test]
    fn due_amount_goes_negative_on_overpayment() {
        assert_eq!(due_amount(dec!(240.00), dec!(100.00)), dec!(140.00));
        assert_eq!(due_amount(dec!(240.00), dec!(300.00)), dec!(-60.00));
        assert_eq!(due_amount(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn shop_abc_creation_scenario() {
        // Items 100.00 x 2 and 50.00 x 1 with a fixed discount of 10
        let line_totals = [
            line_total(dec!(100.00), 2).unwrap(),
            line_total(dec!(50.00), 1).unwrap(),
        ];
        assert_eq!(line_totals, [dec!(200.00), dec!(50.00)]);

        let snapshot = recompute(&line_totals, &[], dec!(10), DiscountType::Fixed);
        assert_eq!(snapshot.total_amount, dec!(240.00));
        assert_eq!(snapshot.advance_paid, dec!(0));
        assert_eq!(snapshot.due_amount, dec!(240.00));
    }

    #[test]
    fn recompute_uses_entire_payment_set() {
        let line_totals = [dec!(200.00), dec!(50.00)];

        let after_first = recompute(&line_totals, &[dec!(100.00)], dec!(10), DiscountType::Fixed);
        assert_eq!(after_first.advance_paid, dec!(100.00));
        assert_eq!(after_first.due_amount, dec!(140.00));

        // Second payment pushes the order into overpayment
        let after_second = recompute(
            &line_totals,
            &[dec!(100.00), dec!(200.00)],
            dec!(10),
            DiscountType::Fixed,
        );
        assert_eq!(after_second.advance_paid, dec!(300.00));
        assert_eq!(after_second.due_amount, dec!(-60.00));
    }

    #[test]
    fn recompute_is_idempotent() {
        let line_totals = [dec!(200.00), dec!(50.00)];
        let payments = [dec!(100.00)];

        let first = recompute(&line_totals, &payments, dec!(10), DiscountType::Fixed);
        let second = recompute(&line_totals, &payments, dec!(10), DiscountType::Fixed);
        assert_eq!(first, second);
    }

    #[test]
    fn item_replacement_leaves_no_stale_contribution() {
        let payments = [dec!(100.00)];
        let before = recompute(&[dec!(200.00), dec!(50.00)], &payments, dec!(10), DiscountType::Fixed);
        assert_eq!(before.total_amount, dec!(240.00));

        // Replaced with a smaller set: totals come from the new set only
        let after = recompute(&[dec!(50.00)], &payments, dec!(10), DiscountType::Fixed);
        assert_eq!(after.total_amount, dec!(40.00));
        assert_eq!(after.advance_paid, dec!(100.00));
        assert_eq!(after.due_amount, dec!(-60.00));
    }

    #[test]
    fn discount_type_round_trips_through_text() {
        assert_eq!(DiscountType::parse("fixed"), Some(DiscountType::Fixed));
        assert_eq!(DiscountType::parse("percentage"), Some(DiscountType::Percentage));
        assert_eq!(DiscountType::parse("half-off"), None);
        assert_eq!(DiscountType::Percentage.as_str(), "percentage");
    }
}
