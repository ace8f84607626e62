//! Flipkart invoice rule set.

use tracing::debug;

use super::rules::{AmountRule, AmountSource, AnchorRule, Capture, Overwrite, scan};
use super::text::DocumentText;
use super::InvoiceParser;
use crate::models::record::{FlipkartInvoice, IdentityField, InvoiceRecord, VendorKind};

const IDENTITY_RULES: &[AnchorRule] = &[
    AnchorRule {
        anchor: "Order ID:",
        field: IdentityField::OrderId,
        capture: Capture::Remainder,
    },
    // Flipkart prints date and time together, keep both.
    AnchorRule {
        anchor: "Order Date:",
        field: IdentityField::OrderDate,
        capture: Capture::Remainder,
    },
    AnchorRule {
        anchor: "Invoice Number #",
        field: IdentityField::InvoiceNumber,
        capture: Capture::Remainder,
    },
    AnchorRule {
        anchor: "Sold By:",
        field: IdentityField::Seller,
        capture: Capture::RemainderTrimComma,
    },
];

const AMOUNT_RULES: &[AmountRule] = &[
    AmountRule {
        anchor: "Grand Total",
        source: AmountSource::NextLineAfter { marker: "₹" },
        overwrite: Overwrite::Always,
    },
    AmountRule {
        anchor: "Total ₹",
        source: AmountSource::SameLineAfter { split_on: "₹" },
        overwrite: Overwrite::IfUnset,
    },
];

/// Parser for Flipkart tax invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipkartParser;

impl FlipkartParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract the Flipkart field set from a document.
    pub fn parse_invoice(&self, doc: &DocumentText<'_>) -> FlipkartInvoice {
        let result = scan(doc, IDENTITY_RULES, AMOUNT_RULES);
        debug!(
            "Flipkart invoice: order {:?}, grand total {:?}",
            result.identity.order_id, result.amount
        );

        FlipkartInvoice {
            identity: result.identity,
            grand_total: result.amount,
        }
    }
}

impl InvoiceParser for FlipkartParser {
    fn vendor(&self) -> VendorKind {
        VendorKind::Flipkart
    }

    fn parse(&self, doc: &DocumentText<'_>) -> InvoiceRecord {
        InvoiceRecord::Flipkart(self.parse_invoice(doc))
    }
}

/// Extract Flipkart fields from raw text.
pub fn parse_flipkart_invoice(text: &str) -> FlipkartInvoice {
    FlipkartParser::new().parse_invoice(&DocumentText::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_basic_invoice() {
        let text = [
            "Order ID: FK123",
            "Sold By: Consulting Rooms,",
            "Grand Total",
            "₹2,500.00",
        ]
        .join("\n");

        let invoice = parse_flipkart_invoice(&text);

        assert_eq!(invoice.identity.order_id, "FK123");
        assert_eq!(invoice.identity.seller, "Consulting Rooms");
        assert_eq!(invoice.grand_total, Some(dec("2500.0")));
    }

    #[test]
    fn test_parse_full_layout() {
        let text = r#"
            Tax Invoice
            Sold By: Consulting Rooms Private Limited ,,
            Order ID: OD229384756102938000
            Order Date: 05-02-2024, 10:14 PM
            Invoice Number # FAB1C2D3E4F5
            Product Title Qty Gross Amount Discount Taxable Value IGST Total
            Total 1 1999.00 -200.00 1524.58 274.42 ₹1,799.00
            Grand Total
            ₹ 1,799.00
            Authorized Signatory
        "#;

        let invoice = parse_flipkart_invoice(text);

        assert_eq!(invoice.identity.seller, "Consulting Rooms Private Limited ");
        assert_eq!(invoice.identity.order_id, "OD229384756102938000");
        assert_eq!(invoice.identity.order_date, "05-02-2024, 10:14 PM");
        assert_eq!(invoice.identity.invoice_number, "FAB1C2D3E4F5");
        assert_eq!(invoice.grand_total, Some(dec("1799")));
    }

    #[test]
    fn test_total_rupee_fallback() {
        let invoice = parse_flipkart_invoice("Order ID: OD1\nTotal ₹ 349.00");
        assert_eq!(invoice.grand_total, Some(dec("349")));
    }

    #[test]
    fn test_grand_total_overrides_earlier_total() {
        let text = "Total ₹ 349.00\nGrand Total\n₹ 399.00";
        let invoice = parse_flipkart_invoice(text);
        assert_eq!(invoice.grand_total, Some(dec("399")));
    }

    #[test]
    fn test_total_rupee_does_not_replace_grand_total() {
        let text = "Grand Total\n₹ 399.00\nTotal ₹ 349.00";
        let invoice = parse_flipkart_invoice(text);
        assert_eq!(invoice.grand_total, Some(dec("399")));
    }

    #[test]
    fn test_grand_total_without_rupee_on_next_line() {
        let invoice = parse_flipkart_invoice("Grand Total\n1,799.00");
        assert_eq!(invoice.grand_total, None);
    }

    #[test]
    fn test_missing_anchors_leave_fields_empty() {
        let invoice = parse_flipkart_invoice("flipkart.com\nKeep shopping");
        assert_eq!(invoice, FlipkartInvoice::default());
    }
}
