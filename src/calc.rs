//! Invoice total calculation.
//!
//! Totals are always recomputed from scratch from the line items and the two
//! percentage rates; plain `f64` arithmetic, no rounding.

use serde::Serialize;

use crate::model::InvoiceItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub total: f64,
}

/// Computes subtotal, tax, discount and grand total.
///
/// `tax` and `discount` are percentages (`10.0` means 10%).
pub fn calculate_invoice(items: &[InvoiceItem], tax: f64, discount: f64) -> InvoiceTotals {
    let subtotal: f64 = items.iter().map(|i| i.total).sum();
    let tax_amount = subtotal * tax / 100.0;
    let discount_amount = subtotal * discount / 100.0;
    let total = subtotal + tax_amount - discount_amount;

    InvoiceTotals {
        subtotal,
        tax_amount,
        discount_amount,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, price: f64) -> InvoiceItem {
        InvoiceItem {
            id: String::new(),
            product_id: String::new(),
            description: String::new(),
            quantity,
            price,
            total: quantity * price,
        }
    }

    #[test]
    fn empty_items_yield_zero() {
        let totals = calculate_invoice(&[], 20.0, 15.0);
        assert_eq!(totals, InvoiceTotals::default());
    }

    #[test]
    fn tax_and_discount_scenario() {
        let totals = calculate_invoice(&[item(2.0, 100.0)], 10.0, 5.0);
        assert_eq!(totals.subtotal, 200.0);
        assert_eq!(totals.tax_amount, 20.0);
        assert_eq!(totals.discount_amount, 10.0);
        assert_eq!(totals.total, 210.0);
    }

    #[test]
    fn sums_stored_line_totals() {
        // Stored totals win over quantity * price if they disagree.
        let mut odd = item(1.0, 10.0);
        odd.total = 12.0;
        let totals = calculate_invoice(&[odd, item(3.0, 1.0)], 0.0, 0.0);
        assert_eq!(totals.subtotal, 15.0);
        assert_eq!(totals.total, 15.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn items_strategy() -> impl Strategy<Value = Vec<InvoiceItem>> {
            prop::collection::vec((0u32..1000, 0u32..100_000), 0..20).prop_map(|lines| {
                lines
                    .into_iter()
                    .map(|(q, cents)| item(q as f64, cents as f64 / 100.0))
                    .collect()
            })
        }

        proptest! {
            /// Property: subtotal is the sum of quantity * price.
            #[test]
            fn subtotal_is_sum_of_lines(items in items_strategy()) {
                let expected: f64 = items.iter().map(|i| i.quantity * i.price).sum();
                let totals = calculate_invoice(&items, 0.0, 0.0);
                prop_assert_eq!(totals.subtotal, expected);
            }

            /// Property: total = subtotal + tax share - discount share.
            #[test]
            fn total_applies_both_rates(
                items in items_strategy(),
                tax in 0.0f64..=100.0,
                discount in 0.0f64..=100.0,
            ) {
                let totals = calculate_invoice(&items, tax, discount);
                let s = totals.subtotal;
                let expected = s + s * tax / 100.0 - s * discount / 100.0;
                prop_assert!((totals.total - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            }

            /// Property: same input, same output.
            #[test]
            fn calculation_is_idempotent(
                items in items_strategy(),
                tax in 0.0f64..=100.0,
                discount in 0.0f64..=100.0,
            ) {
                prop_assert_eq!(
                    calculate_invoice(&items, tax, discount),
                    calculate_invoice(&items, tax, discount)
                );
            }
        }
    }
}
