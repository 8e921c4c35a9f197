//! Identifier and invoice number generation.

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use crate::model::{InvoiceItem, Product};

const DEFAULT_PAYMENT_TERM_DAYS: u64 = 30;

/// Random, collision-resistant record id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `INV-{YY}{MM}-{RRR}` for the given issue month.
///
/// The suffix is random and not checked against existing invoices.
pub fn generate_invoice_number(date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().as_u128() % 1000;
    format!(
        "INV-{:02}{:02}-{:03}",
        date.year().rem_euclid(100),
        date.month(),
        suffix
    )
}

pub fn default_due_date(issue_date: NaiveDate) -> NaiveDate {
    issue_date
        .checked_add_days(Days::new(DEFAULT_PAYMENT_TERM_DAYS))
        .unwrap_or(issue_date)
}

/// New line for the invoice form: quantity 1 at the product's price, or an
/// empty line when no product is chosen yet.
pub fn new_invoice_item(product: Option<&Product>) -> InvoiceItem {
    let mut item = InvoiceItem {
        id: generate_id(),
        product_id: String::new(),
        description: String::new(),
        quantity: 1.0,
        price: 0.0,
        total: 0.0,
    };
    if let Some(product) = product {
        item.select_product(product);
    }
    item
}
