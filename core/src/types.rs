//! Shared primitive types used across the entire analysis.

/// A purchase amount in the dataset's currency.
pub type Amount = f64;

/// A percentage in [0, 100].
pub type Percent = f64;

/// The canonical run identifier.
pub type RunId = String;

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or 0.0 when the whole is not positive.
pub fn percent_of(part: f64, whole: f64) -> Percent {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Percent shares of `parts` at two decimals, summing to exactly 100.00.
///
/// Shares are floored to hundredths and the leftover hundredths go to the
/// largest remainders, earlier parts first on ties. Every share stays within
/// 0.01 of its exact value. All zeros when the total is not positive.
pub fn allocate_shares(parts: &[f64]) -> Vec<Percent> {
    const UNITS: f64 = 10_000.0;

    let total: f64 = parts.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return vec![0.0; parts.len()];
    }

    let exact: Vec<f64> = parts.iter().map(|p| p * UNITS / total).collect();
    let mut units: Vec<i64> = exact.iter().map(|e| e.floor() as i64).collect();

    let allocated: i64 = units.iter().sum();
    let leftover = (UNITS as i64 - allocated).clamp(0, parts.len() as i64) as usize;

    let mut order: Vec<usize> = (0..parts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - units[a] as f64;
        let rb = exact[b] - units[b] as f64;
        rb.total_cmp(&ra)
    });
    for &i in order.iter().take(leftover) {
        units[i] += 1;
    }

    units.into_iter().map(|u| u as f64 / 100.0).collect()
}
