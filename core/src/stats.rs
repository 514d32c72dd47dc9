//! Descriptive statistics over amount slices.
//!
//! Every function is total: empty input yields 0.0 or `None` rather than NaN.

use crate::types::Amount;
use std::collections::HashSet;

pub fn sum(values: &[Amount]) -> Amount {
    values.iter().sum()
}

pub fn mean(values: &[Amount]) -> Option<Amount> {
    (!values.is_empty()).then(|| sum(values) / values.len() as f64)
}

pub fn median(values: &[Amount]) -> Option<Amount> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Sample (n − 1) standard deviation. Undefined below two members.
pub fn sample_std(values: &[Amount]) -> Option<Amount> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[Amount]) -> Option<Amount> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[Amount]) -> Option<Amount> {
    values.iter().copied().reduce(f64::max)
}

/// Count of distinct values yielded by `items`.
pub fn distinct<'a>(items: impl IntoIterator<Item = &'a str>) -> usize {
    items.into_iter().collect::<HashSet<_>>().len()
}
