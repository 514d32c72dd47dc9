//! Data cleaner: numeric coercion, invalid-amount filtering, text normalization.
//!
//! Bad values are filtered, never fatal. An empty result is a valid outcome.

use crate::{
    dataset::{RawAmount, RawTransaction, Transaction},
    types::{percent_of, Amount, Percent},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub original_count: usize,
    pub retained_count: usize,
}

impl CleaningSummary {
    pub fn removed_count(&self) -> usize {
        self.original_count - self.retained_count
    }

    /// Retained / original × 100. `None` when there was nothing to clean.
    pub fn retention_rate(&self) -> Option<Percent> {
        (self.original_count > 0)
            .then(|| percent_of(self.retained_count as f64, self.original_count as f64))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanedDataset {
    pub transactions: Vec<Transaction>,
    pub summary: CleaningSummary,
}

/// Coerce a raw amount to a finite number. Anything else is missing.
pub fn coerce_amount(raw: &RawAmount) -> Option<Amount> {
    let value = match raw {
        RawAmount::Number(v) => *v,
        RawAmount::Text(s) => s.trim().parse::<f64>().ok()?,
        RawAmount::Missing => return None,
    };
    value.is_finite().then_some(value)
}

/// Label given to a text field whose cell was empty.
pub const MISSING_TEXT: &str = "NAN";

/// Trim and uppercase. An empty cell becomes [`MISSING_TEXT`]; a cell of
/// only whitespace trims to the empty string.
pub fn normalize_text(value: &str) -> String {
    if value.is_empty() {
        return MISSING_TEXT.to_string();
    }
    value.trim().to_uppercase()
}

/// Drop records with a missing or non-positive amount, then trim and
/// uppercase brand, center, outlet name and phone number.
pub fn clean_transactions(raw: &[RawTransaction]) -> CleanedDataset {
    let transactions: Vec<Transaction> = raw
        .iter()
        .filter_map(|r| {
            let amount = coerce_amount(&r.amount).filter(|a| *a > 0.0)?;
            Some(Transaction {
                brand_name: normalize_text(&r.brand_name),
                outlet_id: r.outlet_id.clone(),
                outlet_name: normalize_text(&r.outlet_name),
                center: normalize_text(&r.center),
                phone_number: normalize_text(&r.phone_number),
                amount,
            })
        })
        .collect();

    let summary = CleaningSummary {
        original_count: raw.len(),
        retained_count: transactions.len(),
    };

    match summary.retention_rate() {
        Some(rate) => log::info!(
            "data quality: {}/{} records retained ({rate:.1}%)",
            summary.retained_count,
            summary.original_count
        ),
        None => log::warn!("data quality: dataset has no records"),
    }

    CleanedDataset {
        transactions,
        summary,
    }
}
