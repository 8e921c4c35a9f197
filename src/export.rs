//! Invoice PDF export.
//!
//! An invoice is flattened into an [`InvoiceDocument`], rendered through a
//! tera template into typst markup and compiled with the `typst` CLI.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Datelike;
use serde::Serialize;
use slug::slugify;
use tera::{Context, Tera, Value};
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::format::{format_currency, format_date};
use crate::model::{Client, CompanyInfo, Invoice};
use crate::storage::Storage;
use crate::store::Store;

const TEMPLATE_NAME: &str = "invoice.tera";

// Embedded so a fresh data directory can always export.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/invoice.tera");

#[derive(Debug, Clone, Serialize)]
pub struct DocumentInvoice {
    pub number: String,
    pub status: String,
    pub status_color: String,
    pub issue_date: String,
    pub due_date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLine {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentTotals {
    pub subtotal: String,
    pub tax_label: String,
    pub tax_amount: String,
    pub discount_label: String,
    pub discount_amount: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentCompany {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
}

impl From<&CompanyInfo> for DocumentCompany {
    fn from(c: &CompanyInfo) -> Self {
        Self {
            name: c.name.clone(),
            address: c.address.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
            website: c.website.clone().filter(|w| !w.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentClient {
    pub name: String,
    pub company: Option<String>,
    pub address: String,
    pub email: String,
}

impl DocumentClient {
    /// Company if known, else the contact name.
    pub fn label(&self) -> &str {
        self.company.as_deref().unwrap_or(&self.name)
    }
}

impl From<&Client> for DocumentClient {
    fn from(c: &Client) -> Self {
        Self {
            name: c.name.clone(),
            company: c.company.clone(),
            address: c.address.clone(),
            email: c.email.clone(),
        }
    }
}

/// Everything the template needs, already formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
    pub company: DocumentCompany,
    pub client: DocumentClient,
    pub invoice: DocumentInvoice,
    pub items: Vec<DocumentLine>,
    pub totals: DocumentTotals,
}

impl InvoiceDocument {
    /// Resolves the client and product names. The client must still exist.
    pub fn build<S: Storage>(invoice: &Invoice, store: &Store<S>) -> Result<Self> {
        let client = store
            .client(&invoice.client_id)
            .map(DocumentClient::from)
            .ok_or_else(|| Error::MissingClient {
                invoice_number: invoice.invoice_number.clone(),
                client_id: invoice.client_id.clone(),
            })?;

        let (r, g, b) = invoice.status.color();
        let items = invoice
            .items
            .iter()
            .map(|item| DocumentLine {
                name: store.product_name(&item.product_id).to_string(),
                description: item.description.clone(),
                quantity: item.quantity.to_string(),
                price: format_currency(item.price),
                total: format_currency(item.total),
            })
            .collect();

        Ok(Self {
            company: DocumentCompany::from(store.company()),
            client,
            invoice: DocumentInvoice {
                number: invoice.invoice_number.clone(),
                status: invoice.status.as_str().to_uppercase(),
                status_color: format!("#{r:02x}{g:02x}{b:02x}"),
                issue_date: format_date(invoice.issue_date),
                due_date: format_date(invoice.due_date),
                notes: invoice.notes.clone().filter(|n| !n.trim().is_empty()),
            },
            items,
            totals: DocumentTotals {
                subtotal: format_currency(invoice.subtotal),
                tax_label: format!("Tax ({}%)", invoice.tax),
                tax_amount: format_currency(invoice.tax_amount),
                discount_label: format!("Discount ({}%)", invoice.discount),
                discount_amount: format_currency(invoice.discount_amount),
                total: format_currency(invoice.total),
            },
        })
    }
}

/// Template set holding only the built-in invoice layout.
pub fn builtin_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
    tera.register_filter("typst", typst_literal);
    Ok(tera)
}

pub fn render_document(tera: &Tera, document: &InvoiceDocument) -> Result<String> {
    let context = Context::from_serialize(document)?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Writes invoices under `<root>/output/<year>/<client>/`.
pub struct Exporter {
    root: PathBuf,
}

impl Exporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn output_path(&self, invoice: &Invoice, client_label: &str) -> PathBuf {
        self.root
            .join("output")
            .join(invoice.issue_date.year().to_string())
            .join(slugify(client_label))
            .join(format!("Invoice-{}.pdf", invoice.invoice_number))
    }

    /// Loads `<root>/templates/*.tera`, seeding the default layout on first use.
    pub fn templates(&self) -> Result<Tera> {
        let template_dir = self.root.join("templates");
        fs::create_dir_all(&template_dir).map_err(|e| Error::io(&template_dir, e))?;
        let template_path = template_dir.join(TEMPLATE_NAME);
        if !template_path.exists() {
            info!(path = %template_path.display(), "initializing default template");
            fs::write(&template_path, DEFAULT_TEMPLATE).map_err(|e| Error::io(&template_path, e))?;
        }

        let glob = template_dir.join("*.tera");
        let mut tera = Tera::new(&glob.to_string_lossy())?;
        tera.register_filter("typst", typst_literal);
        Ok(tera)
    }

    /// Full export; returns the PDF path.
    pub fn export<S: Storage>(&self, invoice: &Invoice, store: &Store<S>) -> Result<PathBuf> {
        let document = InvoiceDocument::build(invoice, store)?;
        ensure_typst()?;

        let rendered = render_document(&self.templates()?, &document)?;
        let pdf_path = self.output_path(invoice, document.client.label());
        let typ_path = pdf_path.with_extension("typ");
        if let Some(dir) = pdf_path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        fs::write(&typ_path, rendered).map_err(|e| Error::io(&typ_path, e))?;

        compile(&typ_path, &pdf_path)?;
        info!(invoice_number = %invoice.invoice_number, path = %pdf_path.display(), "invoice exported");
        Ok(pdf_path)
    }

    /// Like [`Exporter::export`], but failures are only logged.
    pub fn export_or_log<S: Storage>(&self, invoice: &Invoice, store: &Store<S>) -> Option<PathBuf> {
        match self.export(invoice, store) {
            Ok(path) => Some(path),
            Err(err) => {
                error!(invoice_number = %invoice.invoice_number, error = %err, "export aborted");
                None
            }
        }
    }
}

fn ensure_typst() -> Result<()> {
    Command::new("typst")
        .arg("--version")
        .output()
        .map(|_| ())
        .map_err(|e| Error::Tool {
            tool: "typst",
            detail: format!("not installed ({e})"),
        })
}

fn compile(typ_path: &Path, pdf_path: &Path) -> Result<()> {
    let output = Command::new("typst")
        .arg("compile")
        .arg(typ_path)
        .arg(pdf_path)
        .output()
        .map_err(|e| Error::Tool {
            tool: "typst",
            detail: e.to_string(),
        })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::Tool {
            tool: "typst",
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Tera filter: turns a JSON scalar into a typst literal.
fn typst_literal(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let literal = match value {
        Value::Null => "none".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            for ch in s.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '"' => out.push_str("\\\""),
                    '\n' => out.push_str("\\n"),
                    '\r' => {}
                    '\t' => out.push_str("\\t"),
                    c => out.push(c),
                }
            }
            out.push('"');
            out
        }
        other => {
            return Err(tera::Error::msg(format!(
                "cannot write {other} as a typst literal"
            )));
        }
    };
    Ok(Value::String(literal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::new_invoice_item;
    use crate::model::{ClientDraft, InvoiceDraft, ProductDraft};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn store_with_invoice() -> (Store<MemoryStorage>, String, String) {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        let client_id = store
            .add_client(ClientDraft {
                name: "Ann \"AJ\" Lee".into(),
                email: "ann@lee.dev".into(),
                address: "1 Road\nSpringfield".into(),
                company: Some("Lee & Co".into()),
                ..ClientDraft::default()
            })
            .unwrap();
        let product_id = store
            .add_product(ProductDraft {
                name: "Consulting Hour".into(),
                price: 120.0,
                ..ProductDraft::default()
            })
            .unwrap();

        let mut first = new_invoice_item(store.product(&product_id));
        first.set_quantity(2.0);
        let mut second = new_invoice_item(None);
        second.product_id = "deleted".into();
        second.description = "Travel".into();
        second.set_price(30.0);

        let invoice_id = store
            .add_invoice(InvoiceDraft {
                client_id: client_id.clone(),
                items: vec![first, second],
                tax: 10.0,
                notes: Some("Net 30".into()),
                ..InvoiceDraft::new(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap())
            })
            .unwrap();
        (store, invoice_id, client_id)
    }

    #[test]
    fn document_resolves_names_and_formats_money() {
        let (store, invoice_id, _) = store_with_invoice();
        let invoice = store.invoice(&invoice_id).unwrap();
        let doc = InvoiceDocument::build(invoice, &store).unwrap();

        assert_eq!(doc.invoice.status, "DRAFT");
        assert_eq!(doc.invoice.status_color, "#64748b");
        assert_eq!(doc.invoice.issue_date, "Apr 2, 2025");
        assert_eq!(doc.items[0].name, "Consulting Hour");
        assert_eq!(doc.items[0].quantity, "2");
        assert_eq!(doc.items[1].name, "Unknown Product");
        assert_eq!(doc.totals.subtotal, "$270.00");
        assert_eq!(doc.totals.tax_label, "Tax (10%)");
        assert_eq!(doc.totals.discount_label, "Discount (0%)");
        assert_eq!(doc.totals.total, "$297.00");
    }

    #[test]
    fn export_needs_the_client() {
        let (mut store, invoice_id, client_id) = store_with_invoice();
        store.delete_client(&client_id).unwrap();
        let invoice = store.invoice(&invoice_id).unwrap();
        assert!(matches!(
            InvoiceDocument::build(invoice, &store),
            Err(Error::MissingClient { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        assert!(exporter.export_or_log(invoice, &store).is_none());
    }

    #[test]
    fn rendered_markup_quotes_user_text() {
        let (store, invoice_id, _) = store_with_invoice();
        let invoice = store.invoice(&invoice_id).unwrap();
        let doc = InvoiceDocument::build(invoice, &store).unwrap();
        let markup = render_document(&builtin_templates().unwrap(), &doc).unwrap();

        assert!(markup.contains(r#"name: "Ann \"AJ\" Lee""#));
        assert!(markup.contains(r#"address: "1 Road\nSpringfield""#));
        assert!(markup.contains(r#"website: none"#));
        assert!(markup.contains(r#"notes: "Net 30""#));
        assert!(markup.contains("Thank you for your business"));
        assert!(markup.contains("Total Due"));
    }

    #[test]
    fn output_is_grouped_by_year_and_client() {
        let (store, invoice_id, _) = store_with_invoice();
        let invoice = store.invoice(&invoice_id).unwrap();
        let doc = InvoiceDocument::build(invoice, &store).unwrap();
        assert_eq!(doc.client.label(), "Lee & Co");
        let path = Exporter::new("/data").output_path(invoice, doc.client.label());
        let expected = format!("/data/output/2025/lee-co/Invoice-{}.pdf", invoice.invoice_number);
        assert_eq!(path, PathBuf::from(expected));
    }

    #[test]
    fn literal_filter_rejects_composites() {
        let args = HashMap::new();
        assert_eq!(typst_literal(&Value::Null, &args).unwrap(), Value::String("none".into()));
        assert!(typst_literal(&serde_json::json!([1, 2]), &args).is_err());
    }
}
