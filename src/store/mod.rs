//! Application store.
//!
//! Owns the in-memory collections and mirrors every successful mutation to
//! the backing [`Storage`] by rewriting the whole collection.

mod clients;
mod invoices;
mod products;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{Client, CompanyInfo, Invoice, Product};
use crate::storage::{Storage, CLIENTS_KEY, COMPANY_KEY, INVOICES_KEY, PRODUCTS_KEY};

pub const UNKNOWN_CLIENT: &str = "Unknown Client";
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

pub struct Store<S: Storage> {
    storage: S,
    products: Vec<Product>,
    clients: Vec<Client>,
    invoices: Vec<Invoice>,
    company: CompanyInfo,
}

impl<S: Storage> Store<S> {
    /// Loads every record. Malformed data is returned as an error.
    pub fn open(storage: S) -> Result<Self> {
        let products: Vec<Product> = storage.load(PRODUCTS_KEY)?.unwrap_or_default();
        let clients: Vec<Client> = storage.load(CLIENTS_KEY)?.unwrap_or_default();
        let invoices: Vec<Invoice> = storage.load(INVOICES_KEY)?.unwrap_or_default();
        let company: CompanyInfo = storage.load(COMPANY_KEY)?.unwrap_or_default();

        debug!(
            products = products.len(),
            clients = clients.len(),
            invoices = invoices.len(),
            "store opened"
        );

        Ok(Self {
            storage,
            products,
            clients,
            invoices,
            company,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn company(&self) -> &CompanyInfo {
        &self.company
    }

    /// Replaces the company profile as a whole.
    pub fn save_company(&mut self, company: CompanyInfo) -> Result<()> {
        self.storage.save(COMPANY_KEY, &company)?;
        self.company = company;
        info!("company info saved");
        Ok(())
    }

    /// Client display name, or the placeholder when the id no longer resolves.
    pub fn client_name(&self, id: &str) -> &str {
        self.client(id).map_or(UNKNOWN_CLIENT, |c| c.name.as_str())
    }

    pub fn product_name(&self, id: &str) -> &str {
        self.product(id).map_or(UNKNOWN_PRODUCT, |p| p.name.as_str())
    }

    /// Fills empty product and client collections with sample records.
    pub fn seed_demo_data(&mut self) -> Result<()> {
        if self.products.is_empty() {
            let demo = vec![
                demo_product("prod-1", "Web Design Service", 1500.0, "Professional website design", "project"),
                demo_product("prod-2", "Logo Design", 500.0, "Custom logo design with revisions", "item"),
                demo_product("prod-3", "Consulting Hour", 120.0, "Professional consulting service", "hour"),
            ];
            self.commit(PRODUCTS_KEY, demo, |s, v| s.products = v)?;
            info!("seeded demo products");
        }

        if self.clients.is_empty() {
            let demo = vec![
                Client {
                    id: "client-1".into(),
                    name: "John Smith".into(),
                    email: "john@example.com".into(),
                    address: "123 Main St, Anytown, USA".into(),
                    phone: Some("(555) 123-4567".into()),
                    company: Some("Smith Enterprises".into()),
                },
                Client {
                    id: "client-2".into(),
                    name: "Sarah Johnson".into(),
                    email: "sarah@example.com".into(),
                    address: "456 Oak Ave, Somewhere, USA".into(),
                    phone: Some("(555) 987-6543".into()),
                    company: Some("Johnson Industries".into()),
                },
            ];
            self.commit(CLIENTS_KEY, demo, |s, v| s.clients = v)?;
            info!("seeded demo clients");
        }
        Ok(())
    }

    /// Persists `next` under `key`, then swaps it into memory.
    fn commit<T: Serialize>(
        &mut self,
        key: &str,
        next: Vec<T>,
        install: impl FnOnce(&mut Self, Vec<T>),
    ) -> Result<()> {
        self.storage.save(key, &next)?;
        install(self, next);
        Ok(())
    }
}

fn demo_product(id: &str, name: &str, price: f64, description: &str, unit: &str) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        price,
        description: Some(description.into()),
        unit: Some(unit.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;

    use chrono::NaiveDate;

    use super::*;
    use crate::error::Error;
    use crate::ids::new_invoice_item;
    use crate::lifecycle::InvoiceStatus;
    use crate::model::{InvoiceDraft, ProductDraft};
    use crate::storage::MemoryStorage;

    /// Memory storage whose writes can be switched off.
    #[derive(Default)]
    struct FailingWrites {
        inner: MemoryStorage,
        failing: Cell<bool>,
    }

    impl Storage for FailingWrites {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.failing.get() {
                return Err(Error::io(
                    format!("{key}.json"),
                    io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                ));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn empty_storage_opens_with_defaults() {
        let store = Store::open(MemoryStorage::new()).unwrap();
        assert!(store.products().is_empty());
        assert!(store.clients().is_empty());
        assert!(store.invoices().is_empty());
        assert_eq!(store.company(), &CompanyInfo::default());
    }

    #[test]
    fn malformed_storage_fails_to_open() {
        let storage = MemoryStorage::new();
        storage.set(INVOICES_KEY, "{\"oops\":").unwrap();
        assert!(Store::open(storage).is_err());
    }

    #[test]
    fn seeding_only_fills_empty_collections() {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        store.seed_demo_data().unwrap();
        assert_eq!(store.products().len(), 3);
        assert_eq!(store.clients().len(), 2);
        assert_eq!(store.product_name("prod-3"), "Consulting Hour");

        store.delete_client("client-2").unwrap();
        store.seed_demo_data().unwrap();
        assert_eq!(store.clients().len(), 1);
    }

    #[test]
    fn company_is_written_as_one_record() {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        let mut info = store.company().clone();
        info.name = "Acme Ltd".into();
        info.website = Some("acme.test".into());
        store.save_company(info).unwrap();

        let raw = store.storage().raw(COMPANY_KEY).unwrap();
        assert!(raw.contains("\"name\":\"Acme Ltd\""));
        assert!(raw.contains("\"website\":\"acme.test\""));
    }

    #[test]
    fn dangling_ids_resolve_to_placeholders() {
        let store = Store::open(MemoryStorage::new()).unwrap();
        assert_eq!(store.client_name("gone"), UNKNOWN_CLIENT);
        assert_eq!(store.product_name("gone"), UNKNOWN_PRODUCT);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let mut store = Store::open(FailingWrites::default()).unwrap();
        store.seed_demo_data().unwrap();
        let mut item = new_invoice_item(store.product("prod-1"));
        item.set_quantity(1.0);
        let invoice_id = store
            .add_invoice(InvoiceDraft {
                client_id: "client-1".into(),
                items: vec![item],
                ..InvoiceDraft::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            })
            .unwrap();
        let saved_invoices = store.storage().inner.raw(INVOICES_KEY);

        store.storage().failing.set(true);

        let product = ProductDraft {
            name: "Hosting".into(),
            price: 20.0,
            ..ProductDraft::default()
        };
        assert!(matches!(store.add_product(product), Err(Error::Io { .. })));
        assert_eq!(store.products().len(), 3);

        assert!(store.delete_client("client-1").is_err());
        assert_eq!(store.clients().len(), 2);
        assert!(store.client("client-1").is_some());

        assert!(store.set_invoice_status(&invoice_id, InvoiceStatus::Paid).is_err());
        assert_eq!(store.invoice(&invoice_id).unwrap().status, InvoiceStatus::Draft);
        assert_eq!(store.storage().inner.raw(INVOICES_KEY), saved_invoices);
    }
}
