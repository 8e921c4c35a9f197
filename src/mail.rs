//! Payment reminder emails, handed off to the system mail client.

use crate::format::{format_currency, format_date};
use crate::model::{Client, Invoice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

pub fn compose_reminder(invoice: &Invoice, client: &Client) -> MailDraft {
    MailDraft {
        to: client.email.clone(),
        subject: format!("Invoice {}", invoice.invoice_number),
        body: format!(
            "Dear {},\n\nPlease find attached invoice {} for {}.\n\nPayment is due by {}.\n\nThank you for your business.",
            client.name,
            invoice.invoice_number,
            format_currency(invoice.total),
            format_date(invoice.due_date),
        ),
    }
}
