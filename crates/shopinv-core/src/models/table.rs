//! Unified export table built from vendor records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{InvoiceRecord, VendorKind};

/// Column headers of the aggregate table, in export order.
pub const COLUMNS: [&str; 6] = [
    "Source",
    "Order ID",
    "Order Date",
    "Invoice Number",
    "Seller",
    "Amount",
];

/// One row of the aggregate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    #[serde(rename = "Source")]
    pub source: VendorKind,

    #[serde(rename = "Order ID")]
    pub order_id: String,

    #[serde(rename = "Order Date")]
    pub order_date: String,

    #[serde(rename = "Invoice Number")]
    pub invoice_number: String,

    #[serde(rename = "Seller")]
    pub seller: String,

    /// `Total Amount` for Amazon, `Grand Total` for Flipkart.
    #[serde(rename = "Amount")]
    pub amount: Option<Decimal>,
}

impl AggregateRow {
    /// Merge a vendor record into the unified shape.
    ///
    /// Returns `None` for unknown documents, which never enter the table.
    pub fn from_record(record: &InvoiceRecord) -> Option<Self> {
        let (identity, amount) = match record {
            InvoiceRecord::Amazon(inv) => (&inv.identity, inv.total_amount),
            InvoiceRecord::Flipkart(inv) => (&inv.identity, inv.grand_total),
            InvoiceRecord::Unknown => return None,
        };

        Some(Self {
            source: record.vendor(),
            order_id: identity.order_id.clone(),
            order_date: identity.order_date.clone(),
            invoice_number: identity.invoice_number.clone(),
            seller: identity.seller.clone(),
            amount,
        })
    }

    /// Text cells in column order, without the amount.
    pub fn text_cells(&self) -> [&str; 5] {
        [
            self.source.name(),
            &self.order_id,
            &self.order_date,
            &self.invoice_number,
            &self.seller,
        ]
    }
}

/// Export-ready table of every recognized record in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTable {
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Build the table from records, skipping unknown documents.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a InvoiceRecord>,
    {
        Self {
            rows: records
                .into_iter()
                .filter_map(AggregateRow::from_record)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all known amounts.
    pub fn total_amount(&self) -> Decimal {
        self.rows.iter().filter_map(|r| r.amount).sum()
    }
}
