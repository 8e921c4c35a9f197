//! Aggregate figures for the overview screen.

use serde::Serialize;

use crate::lifecycle::InvoiceStatus;
use crate::model::Invoice;
use crate::storage::Storage;
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Sum of paid invoice totals.
    pub total_revenue: f64,
    pub paid_invoices: usize,
    pub pending_amount: f64,
    pub overdue_amount: f64,
    pub average_invoice: f64,
    pub invoice_count: usize,
    pub client_count: usize,
    pub product_count: usize,
}

impl DashboardStats {
    pub fn collect<S: Storage>(store: &Store<S>) -> Self {
        let invoices = store.invoices();
        let sum_for = |status: InvoiceStatus| -> f64 {
            invoices
                .iter()
                .filter(|i| i.status == status)
                .map(|i| i.total)
                .sum()
        };

        let average_invoice = if invoices.is_empty() {
            0.0
        } else {
            invoices.iter().map(|i| i.total).sum::<f64>() / invoices.len() as f64
        };

        Self {
            total_revenue: sum_for(InvoiceStatus::Paid),
            paid_invoices: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Paid)
                .count(),
            pending_amount: sum_for(InvoiceStatus::Pending),
            overdue_amount: sum_for(InvoiceStatus::Overdue),
            average_invoice,
            invoice_count: invoices.len(),
            client_count: store.clients().len(),
            product_count: store.products().len(),
        }
    }
}

/// Newest first, by creation time.
pub fn recent_invoices(invoices: &[Invoice], limit: usize) -> Vec<&Invoice> {
    let mut sorted: Vec<&Invoice> = invoices.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Pending invoices, soonest due first.
pub fn upcoming_invoices(invoices: &[Invoice], limit: usize) -> Vec<&Invoice> {
    let mut pending: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Pending)
        .collect();
    pending.sort_by_key(|i| i.due_date);
    pending.truncate(limit);
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn invoice(n: i64, status: InvoiceStatus, total: f64) -> Invoice {
        let issue = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Invoice {
            id: format!("inv-{n}"),
            invoice_number: format!("INV-2501-{n:03}"),
            client_id: "client-1".into(),
            issue_date: issue,
            due_date: issue + Duration::days(30 - n),
            items: Vec::new(),
            tax: 0.0,
            discount: 0.0,
            subtotal: total,
            tax_amount: 0.0,
            discount_amount: 0.0,
            total,
            notes: None,
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n),
        }
    }

    fn sample() -> Vec<Invoice> {
        vec![
            invoice(1, InvoiceStatus::Paid, 100.0),
            invoice(2, InvoiceStatus::Pending, 50.0),
            invoice(3, InvoiceStatus::Pending, 25.0),
            invoice(4, InvoiceStatus::Overdue, 10.0),
            invoice(5, InvoiceStatus::Draft, 15.0),
        ]
    }

    #[test]
    fn recent_is_newest_first() {
        let invoices = sample();
        let ids: Vec<&str> = recent_invoices(&invoices, 3).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["inv-5", "inv-4", "inv-3"]);
    }

    #[test]
    fn upcoming_only_lists_pending_by_due_date() {
        let invoices = sample();
        let ids: Vec<&str> = upcoming_invoices(&invoices, 5).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["inv-3", "inv-2"]);
    }

    #[test]
    fn stats_on_store() {
        use crate::storage::{MemoryStorage, INVOICES_KEY};

        let storage = MemoryStorage::new();
        storage.save(INVOICES_KEY, &sample()).unwrap();
        let store = Store::open(storage).unwrap();

        let stats = DashboardStats::collect(&store);
        assert_eq!(stats.total_revenue, 100.0);
        assert_eq!(stats.paid_invoices, 1);
        assert_eq!(stats.pending_amount, 75.0);
        assert_eq!(stats.overdue_amount, 10.0);
        assert_eq!(stats.average_invoice, 40.0);
        assert_eq!(stats.invoice_count, 5);
        assert_eq!(stats.client_count, 0);
    }

    #[test]
    fn empty_store_has_zero_average() {
        let store = Store::open(crate::storage::MemoryStorage::new()).unwrap();
        assert_eq!(DashboardStats::collect(&store), DashboardStats::default());
    }
}
