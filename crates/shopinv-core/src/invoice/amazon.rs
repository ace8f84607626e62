//! Amazon invoice rule set.

use tracing::debug;

use super::rules::{AmountRule, AmountSource, AnchorRule, Capture, Overwrite, scan};
use super::text::DocumentText;
use super::InvoiceParser;
use crate::models::record::{AmazonInvoice, IdentityField, InvoiceRecord, VendorKind};

const IDENTITY_RULES: &[AnchorRule] = &[
    AnchorRule {
        anchor: "Order Number:",
        field: IdentityField::OrderId,
        capture: Capture::FirstToken,
    },
    AnchorRule {
        anchor: "Order Date:",
        field: IdentityField::OrderDate,
        capture: Capture::FirstToken,
    },
    AnchorRule {
        anchor: "Invoice Number :",
        field: IdentityField::InvoiceNumber,
        capture: Capture::Remainder,
    },
    AnchorRule {
        anchor: "Sold By :",
        field: IdentityField::Seller,
        capture: Capture::NextLine,
    },
];

const AMOUNT_RULES: &[AmountRule] = &[
    AmountRule {
        anchor: "TOTAL:",
        source: AmountSource::NextLineBefore { marker: "Amount in Words:" },
        overwrite: Overwrite::Always,
    },
    AmountRule {
        anchor: "Invoice Value:",
        source: AmountSource::SameLineAfter { split_on: "Invoice Value:" },
        overwrite: Overwrite::IfUnset,
    },
    // Product rows for this item carry the order total in their last column.
    AmountRule {
        anchor: "Apple iPhone",
        source: AmountSource::TableRow { min_columns: 9 },
        overwrite: Overwrite::Always,
    },
];

/// Parser for Amazon tax invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonParser;

impl AmazonParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract the Amazon field set from a document.
    pub fn parse_invoice(&self, doc: &DocumentText<'_>) -> AmazonInvoice {
        let result = scan(doc, IDENTITY_RULES, AMOUNT_RULES);
        debug!(
            "Amazon invoice: order {:?}, total {:?}",
            result.identity.order_id, result.amount
        );

        AmazonInvoice {
            identity: result.identity,
            total_amount: result.amount,
        }
    }
}

impl InvoiceParser for AmazonParser {
    fn vendor(&self) -> VendorKind {
        VendorKind::Amazon
    }

    fn parse(&self, doc: &DocumentText<'_>) -> InvoiceRecord {
        InvoiceRecord::Amazon(self.parse_invoice(doc))
    }
}

/// Extract Amazon fields from raw text.
pub fn parse_amazon_invoice(text: &str) -> AmazonInvoice {
    AmazonParser::new().parse_invoice(&DocumentText::new(text))
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
            "Order Number: 123-4567890 Ref",
            "Order Date: 2024-01-15",
            "Sold By :",
            "ACME Traders",
            "Invoice Value: ₹1,299.00",
        ]
        .join("\n");

        let invoice = parse_amazon_invoice(&text);

        assert_eq!(invoice.identity.order_id, "123-4567890");
        assert_eq!(invoice.identity.order_date, "2024-01-15");
        assert_eq!(invoice.identity.seller, "ACME Traders");
        assert_eq!(invoice.identity.invoice_number, "");
        assert_eq!(invoice.total_amount, Some(dec("1299.0")));
    }

    #[test]
    fn test_parse_full_layout() {
        let text = r#"
            Tax Invoice/Bill of Supply/Cash Memo
            (Original for Recipient)
            Sold By :
            Appario Retail Private Ltd
            Order Number: 402-8837461-1234567
            Invoice Number : IN-BLR7-2291
            Order Date: 12.03.2024 Invoice Date: 12.03.2024
            TOTAL: ₹0.00 ₹2,499.00
            ₹2,499.00 Amount in Words:
            Two Thousand Four Hundred Ninety-nine only
        "#;

        let invoice = parse_amazon_invoice(text);

        assert_eq!(invoice.identity.seller, "Appario Retail Private Ltd");
        assert_eq!(invoice.identity.order_id, "402-8837461-1234567");
        assert_eq!(invoice.identity.invoice_number, "IN-BLR7-2291");
        assert_eq!(invoice.identity.order_date, "12.03.2024");
        assert_eq!(invoice.total_amount, Some(dec("2499")));
    }

    #[test]
    fn test_total_line_wins_over_invoice_value() {
        let text = "TOTAL:\n₹500.00 Amount in Words:\nInvoice Value: ₹700.00";
        let invoice = parse_amazon_invoice(text);
        assert_eq!(invoice.total_amount, Some(dec("500")));
    }

    #[test]
    fn test_product_row_overrides_total() {
        let text = [
            "TOTAL:",
            "500.00 Amount in Words:",
            "a|b|c|d|e|f|g|h|Apple iPhone 999.00",
        ]
        .join("\n");

        let invoice = parse_amazon_invoice(&text);
        assert_eq!(invoice.total_amount, Some(dec("999.0")));
    }

    #[test]
    fn test_short_product_row_is_ignored() {
        let text = "Invoice Value: 400.00\n1 | Apple iPhone 15 | 1 | 999.00";
        let invoice = parse_amazon_invoice(text);
        assert_eq!(invoice.total_amount, Some(dec("400")));
    }

    #[test]
    fn test_sold_by_on_last_line() {
        let invoice = parse_amazon_invoice("Order Number: 1\nSold By :");
        assert_eq!(invoice.identity.seller, "");
        assert_eq!(invoice.identity.order_id, "1");
    }

    #[test]
    fn test_amount_check_runs_on_identity_lines() {
        // "Order Date:" wins the identity check, the amount is still read
        let invoice = parse_amazon_invoice("Order Date: 01.02.2024 Invoice Value: 150.00");
        assert_eq!(invoice.identity.order_date, "01.02.2024");
        assert_eq!(invoice.total_amount, Some(dec("150")));
    }

    #[test]
    fn test_missing_anchors_leave_fields_empty() {
        let invoice = parse_amazon_invoice("amazon.in\nThank you for shopping");
        assert_eq!(invoice, AmazonInvoice::default());
    }

    #[test]
    fn test_parser_trait() {
        let parser = AmazonParser::new();
        assert_eq!(parser.vendor(), VendorKind::Amazon);
        let record = parser.parse(&DocumentText::new("Order Number: 9"));
        assert_eq!(record.vendor(), VendorKind::Amazon);
    }
}
