//! Anchor-string rules shared by the vendor rule sets.
//!
//! A rule set is two ordered tables evaluated on every line of a document:
//! - identity rules, where the first rule that matches a line wins for that line;
//! - amount rules, which are all tried on every line, each with its own
//!   overwrite policy.

pub mod amounts;

pub use amounts::{format_inr, normalize_amount};

use rust_decimal::Decimal;
use tracing::trace;

use super::text::DocumentText;
use crate::models::record::{IdentityField, InvoiceIdentity};

/// How an identity value is taken once its anchor is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// First whitespace-delimited token after the anchor.
    FirstToken,
    /// Whole remainder after the anchor, trimmed.
    Remainder,
    /// Remainder after the anchor, trimmed, trailing commas removed.
    RemainderTrimComma,
    /// The following line, trimmed. Does not match on the last line.
    NextLine,
}

/// An identity field keyed by a literal anchor.
#[derive(Debug, Clone, Copy)]
pub struct AnchorRule {
    pub anchor: &'static str,
    pub field: IdentityField,
    pub capture: Capture,
}

impl AnchorRule {
    /// Value for `line`, or `None` if the rule does not match.
    ///
    /// A matching anchor with nothing after it yields an empty value.
    pub fn apply(&self, line: &str, next: Option<&str>) -> Option<String> {
        if !line.contains(self.anchor) {
            return None;
        }

        let rest = after_last(line, self.anchor);
        match self.capture {
            Capture::FirstToken => Some(rest.split_whitespace().next().unwrap_or("").to_string()),
            Capture::Remainder => Some(rest.trim().to_string()),
            Capture::RemainderTrimComma => Some(rest.trim().trim_end_matches(',').to_string()),
            Capture::NextLine => next.map(|n| n.trim().to_string()),
        }
    }
}

/// Whether an amount rule may replace a value found earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Replace whatever is there.
    Always,
    /// Only fill an empty (missing or zero) amount.
    IfUnset,
}

/// Where the raw amount text is read from once the anchor matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// Next line must contain `marker`; take the text before it.
    NextLineBefore { marker: &'static str },
    /// Next line must contain `marker`; take the text after its last occurrence.
    NextLineAfter { marker: &'static str },
    /// Take the text after the last `split_on` on the same line.
    SameLineAfter { split_on: &'static str },
    /// The line is a '|' table row with at least `min_columns`; take the last column.
    TableRow { min_columns: usize },
}

/// An amount detection strategy.
#[derive(Debug, Clone, Copy)]
pub struct AmountRule {
    pub anchor: &'static str,
    pub source: AmountSource,
    pub overwrite: Overwrite,
}

impl AmountRule {
    /// Raw amount text for `line`, or `None` if the rule does not match.
    pub fn capture<'a>(&self, line: &'a str, next: Option<&'a str>) -> Option<&'a str> {
        if !line.contains(self.anchor) {
            return None;
        }

        match self.source {
            AmountSource::NextLineBefore { marker } => {
                let next = next.filter(|n| n.contains(marker))?;
                next.split(marker).next().map(str::trim)
            }
            AmountSource::NextLineAfter { marker } => {
                let next = next.filter(|n| n.contains(marker))?;
                Some(after_last(next, marker).trim())
            }
            AmountSource::SameLineAfter { split_on } => Some(after_last(line, split_on).trim()),
            AmountSource::TableRow { min_columns } => {
                if !line.contains('|') {
                    return None;
                }
                let columns: Vec<&str> = line.split('|').map(str::trim).collect();
                if columns.len() < min_columns {
                    return None;
                }
                columns.last().copied()
            }
        }
    }
}

/// Fields collected by one pass over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub identity: InvoiceIdentity,
    pub amount: Option<Decimal>,
}

/// Run a rule set over every line of `doc`.
pub fn scan(
    doc: &DocumentText<'_>,
    identity_rules: &[AnchorRule],
    amount_rules: &[AmountRule],
) -> ScanResult {
    let mut result = ScanResult::default();

    for (i, &line) in doc.lines().iter().enumerate() {
        let next = doc.line(i + 1);

        for rule in identity_rules {
            if let Some(value) = rule.apply(line, next) {
                trace!("line {}: {:?} = {:?}", i, rule.field, value);
                *result.identity.field_mut(rule.field) = value;
                break;
            }
        }

        for rule in amount_rules {
            if rule.overwrite == Overwrite::IfUnset && !is_unset(result.amount) {
                continue;
            }
            if let Some(raw) = rule.capture(line, next) {
                result.amount = normalize_amount(raw);
                trace!("line {}: amount via {:?} = {:?}", i, rule.anchor, result.amount);
            }
        }
    }

    result
}

fn is_unset(amount: Option<Decimal>) -> bool {
    amount.is_none_or(|a| a.is_zero())
}

/// Text after the last occurrence of `anchor`, or the whole line if absent.
fn after_last<'a>(line: &'a str, anchor: &str) -> &'a str {
    line.rsplit_once(anchor).map(|(_, rest)| rest).unwrap_or(line)
}
