//! Keyword-based vendor classification.

use crate::models::record::VendorKind;

/// Lower-case keywords per vendor, checked in order. The first vendor with
/// a matching keyword wins.
pub const VENDOR_KEYWORDS: &[(VendorKind, &[&str])] = &[
    (VendorKind::Amazon, &["amazon", "appario", "asspl"]),
    (VendorKind::Flipkart, &["flipkart", "consulting rooms"]),
];

/// Decide which rule set applies to a document's text.
pub fn classify_vendor(text: &str) -> VendorKind {
    let lowered = text.to_lowercase();

    VENDOR_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(vendor, _)| *vendor)
        .unwrap_or(VendorKind::Unknown)
}
