//! Data models: records, aggregate table and configuration.

pub mod config;
pub mod record;
pub mod table;

pub use record::{
    AmazonInvoice, FlipkartInvoice, IdentityField, InvoiceIdentity, InvoiceRecord, VendorKind,
};
pub use table::{AggregateRow, AggregateTable};
