//! Invoice record models for the supported marketplaces.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marketplace layout a document was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorKind {
    /// Amazon (including Appario / ASSPL seller invoices).
    Amazon,
    /// Flipkart (including Consulting Rooms seller invoices).
    Flipkart,
    /// No known layout matched.
    Unknown,
}

impl VendorKind {
    /// Display name, also used as the `Source` column value.
    pub fn name(&self) -> &'static str {
        match self {
            VendorKind::Amazon => "Amazon",
            VendorKind::Flipkart => "Flipkart",
            VendorKind::Unknown => "Unknown",
        }
    }

    /// Whether a rule set exists for this vendor.
    pub fn is_supported(&self) -> bool {
        !matches!(self, VendorKind::Unknown)
    }
}

impl fmt::Display for VendorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity fields shared by every supported layout.
///
/// A field that was not found is an empty string, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceIdentity {
    #[serde(rename = "Order ID")]
    pub order_id: String,

    #[serde(rename = "Order Date")]
    pub order_date: String,

    #[serde(rename = "Invoice Number")]
    pub invoice_number: String,

    #[serde(rename = "Seller")]
    pub seller: String,
}

/// Identity field selector used by the anchor rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    OrderId,
    OrderDate,
    InvoiceNumber,
    Seller,
}

impl IdentityField {
    /// Column label of the field.
    pub fn label(&self) -> &'static str {
        match self {
            IdentityField::OrderId => "Order ID",
            IdentityField::OrderDate => "Order Date",
            IdentityField::InvoiceNumber => "Invoice Number",
            IdentityField::Seller => "Seller",
        }
    }
}

impl InvoiceIdentity {
    /// Mutable access to one field.
    pub fn field_mut(&mut self, field: IdentityField) -> &mut String {
        match field {
            IdentityField::OrderId => &mut self.order_id,
            IdentityField::OrderDate => &mut self.order_date,
            IdentityField::InvoiceNumber => &mut self.invoice_number,
            IdentityField::Seller => &mut self.seller,
        }
    }

    /// Shared access to one field.
    pub fn field(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::OrderId => &self.order_id,
            IdentityField::OrderDate => &self.order_date,
            IdentityField::InvoiceNumber => &self.invoice_number,
            IdentityField::Seller => &self.seller,
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            IdentityField::OrderId,
            IdentityField::OrderDate,
            IdentityField::InvoiceNumber,
            IdentityField::Seller,
        ]
        .into_iter()
        .filter(|f| self.field(*f).is_empty())
        .map(|f| f.label())
        .collect()
    }
}

/// Fields extracted from an Amazon invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmazonInvoice {
    #[serde(flatten)]
    pub identity: InvoiceIdentity,

    /// Invoice total.
    #[serde(rename = "Total Amount")]
    pub total_amount: Option<Decimal>,
}

/// Fields extracted from a Flipkart invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipkartInvoice {
    #[serde(flatten)]
    pub identity: InvoiceIdentity,

    /// Invoice grand total.
    #[serde(rename = "Grand Total")]
    pub grand_total: Option<Decimal>,
}

/// Structured record for one document, shaped by its vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Source")]
pub enum InvoiceRecord {
    Amazon(AmazonInvoice),
    Flipkart(FlipkartInvoice),
    Unknown,
}

impl InvoiceRecord {
    /// Vendor this record belongs to.
    pub fn vendor(&self) -> VendorKind {
        match self {
            InvoiceRecord::Amazon(_) => VendorKind::Amazon,
            InvoiceRecord::Flipkart(_) => VendorKind::Flipkart,
            InvoiceRecord::Unknown => VendorKind::Unknown,
        }
    }

    /// Identity fields, absent for unknown documents.
    pub fn identity(&self) -> Option<&InvoiceIdentity> {
        match self {
            InvoiceRecord::Amazon(inv) => Some(&inv.identity),
            InvoiceRecord::Flipkart(inv) => Some(&inv.identity),
            InvoiceRecord::Unknown => None,
        }
    }

    /// The vendor's amount field (`Total Amount` or `Grand Total`).
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            InvoiceRecord::Amazon(inv) => inv.total_amount,
            InvoiceRecord::Flipkart(inv) => inv.grand_total,
            InvoiceRecord::Unknown => None,
        }
    }

    /// Labels of fields that were left empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            InvoiceRecord::Amazon(inv) => {
                let mut missing = inv.identity.missing_fields();
                if inv.total_amount.is_none() {
                    missing.push("Total Amount");
                }
                missing
            }
            InvoiceRecord::Flipkart(inv) => {
                let mut missing = inv.identity.missing_fields();
                if inv.grand_total.is_none() {
                    missing.push("Grand Total");
                }
                missing
            }
            InvoiceRecord::Unknown => Vec::new(),
        }
    }
}
