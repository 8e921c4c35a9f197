use chrono::Utc;
use tracing::{info, warn};

use super::Store;
use crate::calc::{calculate_invoice, InvoiceTotals};
use crate::error::{Error, Result};
use crate::ids::generate_id;
use crate::lifecycle::InvoiceStatus;
use crate::model::{Invoice, InvoiceDraft, InvoiceItem, InvoicePatch};
use crate::storage::{Storage, INVOICES_KEY};
use crate::validation::validate_invoice;

impl<S: Storage> Store<S> {
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Looks an invoice up by id or by its invoice number.
    pub fn find_invoice(&self, key: &str) -> Option<&Invoice> {
        self.invoice(key)
            .or_else(|| self.invoices.iter().find(|i| i.invoice_number == key))
    }

    /// Totals for the current form state; nothing is stored.
    pub fn recalculate_invoice(&self, items: &[InvoiceItem], tax: f64, discount: f64) -> InvoiceTotals {
        calculate_invoice(items, tax, discount)
    }

    /// Validates the form, derives totals and stores the invoice.
    pub fn add_invoice(&mut self, draft: InvoiceDraft) -> Result<String> {
        validate_invoice(&draft)?;

        let invoice = draft.into_invoice(generate_id(), Utc::now());
        let id = invoice.id.clone();
        let number = invoice.invoice_number.clone();

        let mut next = self.invoices.clone();
        next.push(invoice);
        self.commit(INVOICES_KEY, next, |s, v| s.invoices = v)?;
        info!(invoice_id = %id, invoice_number = %number, "invoice created");
        Ok(id)
    }

    pub fn update_invoice(&mut self, id: &str, patch: InvoicePatch) -> Result<()> {
        let mut next = self.invoices.clone();
        let invoice = next
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::not_found("invoice", id))?;
        patch.apply(invoice);
        validate_invoice(&InvoiceDraft::from_invoice(invoice))?;

        self.commit(INVOICES_KEY, next, |s, v| s.invoices = v)?;
        info!(invoice_id = %id, "invoice updated");
        Ok(())
    }

    /// Assigns a status. Any status is accepted; moves outside the offered
    /// transitions are only logged. The rest of the invoice is not revalidated.
    pub fn set_invoice_status(&mut self, id: &str, status: InvoiceStatus) -> Result<()> {
        let mut next = self.invoices.clone();
        let invoice = next
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::not_found("invoice", id))?;
        let current = invoice.status;
        if current != status && !current.can_transition_to(status) {
            warn!(invoice_id = %id, from = %current, to = %status, "unusual status change");
        }
        InvoicePatch::status(status).apply(invoice);

        self.commit(INVOICES_KEY, next, |s, v| s.invoices = v)?;
        info!(invoice_id = %id, from = %current, to = %status, "invoice status changed");
        Ok(())
    }

    /// Unconditional removal, whatever the status.
    pub fn delete_invoice(&mut self, id: &str) -> Result<()> {
        if self.invoice(id).is_none() {
            return Err(Error::not_found("invoice", id));
        }
        let next: Vec<Invoice> = self.invoices.iter().filter(|i| i.id != id).cloned().collect();
        self.commit(INVOICES_KEY, next, |s, v| s.invoices = v)?;
        info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }
}
