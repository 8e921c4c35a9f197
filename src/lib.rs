//! Local invoicing: clients, products and invoices kept in a data directory,
//! with invoice totals, a manual status lifecycle and PDF export.

pub mod calc;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod format;
pub mod ids;
pub mod lifecycle;
pub mod logging;
pub mod mail;
pub mod model;
pub mod storage;
pub mod store;
pub mod validation;

pub use calc::{calculate_invoice, InvoiceTotals};
pub use error::{Error, Result};
pub use lifecycle::InvoiceStatus;
pub use model::{
    Client, ClientDraft, ClientPatch, CompanyInfo, Invoice, InvoiceDraft, InvoiceItem,
    InvoicePatch, Product, ProductDraft, ProductPatch,
};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::Store;
