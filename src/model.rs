use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calc::{calculate_invoice, InvoiceTotals};
use crate::lifecycle::InvoiceStatus;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>, // hour, item, project...
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String, // contact person
    pub email: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub product_id: String,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
}

impl InvoiceItem {
    /// Restores `total == quantity * price`.
    pub fn recompute_total(&mut self) {
        self.total = self.quantity * self.price;
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
        self.recompute_total();
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
        self.recompute_total();
    }

    /// Switches the line to another product, taking over its price and
    /// description.
    pub fn select_product(&mut self, product: &Product) {
        self.product_id = product.id.clone();
        self.price = product.price;
        self.description = product.description.clone().unwrap_or_default();
        self.recompute_total();
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    pub tax: f64,
    pub discount: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            discount_amount: self.discount_amount,
            total: self.total,
        }
    }

    /// Recomputes the stored totals from items, tax and discount.
    pub fn recalculate(&mut self) {
        let totals = calculate_invoice(&self.items, self.tax, self.discount);
        self.apply_totals(totals);
    }

    fn apply_totals(&mut self, totals: InvoiceTotals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.discount_amount = totals.discount_amount;
        self.total = totals.total;
    }
}

/// Issuing business profile, stored as a single record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Your Company".to_string(),
            address: "123 Business Street, City, Country".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            email: "contact@yourcompany.com".to_string(),
            website: None,
            logo: None,
        }
    }
}

// ==========================================
// Form input (records without generated fields)
// ==========================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Invoice form state. Totals are derived, never entered.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub client_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    pub tax: f64,
    pub discount: f64,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
}

impl InvoiceDraft {
    /// Empty form: fresh number, issued on `today`, due 30 days later.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            invoice_number: crate::ids::generate_invoice_number(today),
            client_id: String::new(),
            issue_date: today,
            due_date: crate::ids::default_due_date(today),
            items: Vec::new(),
            tax: 0.0,
            discount: 0.0,
            notes: None,
            status: InvoiceStatus::Draft,
        }
    }

    /// Pre-fills the form from an existing invoice for editing.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            client_id: invoice.client_id.clone(),
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            items: invoice.items.clone(),
            tax: invoice.tax,
            discount: invoice.discount,
            notes: invoice.notes.clone(),
            status: invoice.status,
        }
    }

    pub fn totals(&self) -> InvoiceTotals {
        calculate_invoice(&self.items, self.tax, self.discount)
    }

    pub fn into_invoice(self, id: String, created_at: DateTime<Utc>) -> Invoice {
        let mut invoice = Invoice {
            id,
            invoice_number: self.invoice_number,
            client_id: self.client_id,
            issue_date: self.issue_date,
            due_date: self.due_date,
            items: self.items,
            tax: self.tax,
            discount: self.discount,
            subtotal: 0.0,
            tax_amount: 0.0,
            discount_amount: 0.0,
            total: 0.0,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            status: self.status,
            created_at,
        };
        invoice.recalculate();
        invoice
    }
}

// ==========================================
// Field-level updates
// ==========================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<Option<String>>,
    pub unit: Option<Option<String>>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(unit) = self.unit {
            product.unit = unit;
        }
    }
}

impl From<ProductDraft> for ProductPatch {
    fn from(d: ProductDraft) -> Self {
        Self {
            name: Some(d.name),
            price: Some(d.price),
            description: Some(d.description),
            unit: Some(d.unit),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<Option<String>>,
    pub company: Option<Option<String>>,
}

impl ClientPatch {
    pub fn apply(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
        if let Some(address) = self.address {
            client.address = address;
        }
        if let Some(phone) = self.phone {
            client.phone = phone;
        }
        if let Some(company) = self.company {
            client.company = company;
        }
    }
}

impl From<ClientDraft> for ClientPatch {
    fn from(d: ClientDraft) -> Self {
        Self {
            name: Some(d.name),
            email: Some(d.email),
            address: Some(d.address),
            phone: Some(d.phone),
            company: Some(d.company),
        }
    }
}

/// Invoice update. Totals are not patchable; they follow from items, tax
/// and discount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicePatch {
    pub invoice_number: Option<String>,
    pub client_id: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub items: Option<Vec<InvoiceItem>>,
    pub tax: Option<f64>,
    pub discount: Option<f64>,
    pub notes: Option<Option<String>>,
    pub status: Option<InvoiceStatus>,
}

impl InvoicePatch {
    pub fn status(status: InvoiceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, invoice: &mut Invoice) {
        let reprice = self.items.is_some() || self.tax.is_some() || self.discount.is_some();
        if let Some(number) = self.invoice_number {
            invoice.invoice_number = number;
        }
        if let Some(client_id) = self.client_id {
            invoice.client_id = client_id;
        }
        if let Some(issue_date) = self.issue_date {
            invoice.issue_date = issue_date;
        }
        if let Some(due_date) = self.due_date {
            invoice.due_date = due_date;
        }
        if let Some(items) = self.items {
            invoice.items = items;
        }
        if let Some(tax) = self.tax {
            invoice.tax = tax;
        }
        if let Some(discount) = self.discount {
            invoice.discount = discount;
        }
        if let Some(notes) = self.notes {
            invoice.notes = notes.filter(|n| !n.trim().is_empty());
        }
        if let Some(status) = self.status {
            invoice.status = status;
        }
        if reprice {
            invoice.recalculate();
        }
    }
}

impl From<InvoiceDraft> for InvoicePatch {
    fn from(d: InvoiceDraft) -> Self {
        Self {
            invoice_number: Some(d.invoice_number),
            client_id: Some(d.client_id),
            issue_date: Some(d.issue_date),
            due_date: Some(d.due_date),
            items: Some(d.items),
            tax: Some(d.tax),
            discount: Some(d.discount),
            notes: Some(d.notes),
            status: Some(d.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, price: f64) -> InvoiceItem {
        InvoiceItem {
            id: "i1".into(),
            product_id: "p1".into(),
            description: String::new(),
            quantity,
            price,
            total: quantity * price,
        }
    }

    #[test]
    fn item_total_follows_quantity_and_price() {
        let mut line = item(1.0, 10.0);
        line.set_quantity(3.0);
        assert_eq!(line.total, 30.0);
        line.set_price(2.5);
        assert_eq!(line.total, 7.5);
    }

    #[test]
    fn selecting_product_copies_price_and_description() {
        let mut line = item(2.0, 10.0);
        let product = Product {
            id: "p2".into(),
            name: "Logo Design".into(),
            price: 500.0,
            description: Some("Custom logo".into()),
            unit: None,
        };
        line.select_product(&product);
        assert_eq!(line.product_id, "p2");
        assert_eq!(line.description, "Custom logo");
        assert_eq!(line.total, 1000.0);
    }

    #[test]
    fn invoice_serializes_with_camel_case_keys() {
        let draft = InvoiceDraft {
            client_id: "c1".into(),
            items: vec![item(2.0, 100.0)],
            tax: 10.0,
            discount: 5.0,
            ..InvoiceDraft::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        };
        let invoice = draft.into_invoice("inv1".into(), Utc::now());
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["invoiceNumber"].as_str().unwrap().len(), 12);
        assert_eq!(json["clientId"], "c1");
        assert_eq!(json["issueDate"], "2025-03-01");
        assert_eq!(json["dueDate"], "2025-03-31");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["taxAmount"], 20.0);
        assert_eq!(json["discountAmount"], 10.0);
        assert_eq!(json["total"], 210.0);
        assert_eq!(json["status"], "draft");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn reads_records_written_by_browser_build() {
        let raw = r#"{
            "id": "V1StGXR8_Z5jdHi6B-myT",
            "invoiceNumber": "INV-2405-042",
            "clientId": "client-1",
            "issueDate": "2024-05-02",
            "dueDate": "2024-06-01",
            "items": [{"id":"a","productId":"prod-3","description":"","quantity":4,"price":120,"total":480}],
            "tax": 0, "discount": 0,
            "subtotal": 480, "taxAmount": 0, "discountAmount": 0, "total": 480,
            "notes": "",
            "status": "pending",
            "createdAt": "2024-05-02T09:30:00.000Z"
        }"#;
        let invoice: Invoice = serde_json::from_str(raw).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.items[0].total, 480.0);
        assert_eq!(invoice.notes.as_deref(), Some(""));
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let mut client = Client {
            id: "c1".into(),
            name: "John Smith".into(),
            email: "john@example.com".into(),
            address: "123 Main St".into(),
            phone: Some("555".into()),
            company: None,
        };
        ClientPatch {
            email: Some("j@smith.io".into()),
            phone: Some(None),
            ..ClientPatch::default()
        }
        .apply(&mut client);
        assert_eq!(client.name, "John Smith");
        assert_eq!(client.email, "j@smith.io");
        assert_eq!(client.phone, None);
    }

    #[test]
    fn invoice_patch_reprices_when_items_change() {
        let draft = InvoiceDraft {
            client_id: "c1".into(),
            items: vec![item(1.0, 100.0)],
            ..InvoiceDraft::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        };
        let mut invoice = draft.into_invoice("x".into(), Utc::now());
        InvoicePatch {
            items: Some(vec![item(1.0, 100.0), item(2.0, 50.0)]),
            tax: Some(10.0),
            ..InvoicePatch::default()
        }
        .apply(&mut invoice);
        assert_eq!(invoice.subtotal, 200.0);
        assert_eq!(invoice.total, 220.0);
    }
}
