//! Form validation for clients, products and invoices.
//!
//! Failures are collected per field and never reach storage.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{ClientDraft, InvoiceDraft, ProductDraft};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Field name -> message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn validate_client(client: &ClientDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if client.name.trim().is_empty() {
        errors.add("name", "Client name is required");
    }

    if client.email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(&client.email) {
        errors.add("email", "Please enter a valid email address");
    }

    if client.address.trim().is_empty() {
        errors.add("address", "Address is required");
    }

    errors.into_result()
}

pub fn validate_product(product: &ProductDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if product.name.trim().is_empty() {
        errors.add("name", "Product name is required");
    }

    // NaN fails too.
    if !(product.price > 0.0) {
        errors.add("price", "Price must be greater than zero");
    }

    errors.into_result()
}

/// Dates and item amounts are deliberately not checked.
pub fn validate_invoice(invoice: &InvoiceDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if invoice.client_id.is_empty() {
        errors.add("clientId", "Please select a client");
    }

    if invoice.items.is_empty() {
        errors.add("items", "Please add at least one item");
    }

    errors.into_result()
}
