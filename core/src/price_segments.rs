//! Price segmenter: fixed amount buckets over individual transactions.
//!
//! Buckets are left-closed, `[lower, upper)`, the last one unbounded above.
//! Every configured bucket appears in the output, populated or not.

use crate::{
    config::PriceSegmentConfig,
    dataset::Transaction,
    stats,
    types::{allocate_shares, round2, Amount, Percent},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSegmentRow {
    pub label: String,
    pub lower: Amount,
    /// `None` for the final, unbounded bucket.
    pub upper: Option<Amount>,
    pub transaction_count: usize,
    pub total_value: Amount,
    pub avg_value: Amount,
    pub unique_outlets: usize,
    pub unique_brands: usize,
    pub value_share_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSegmentation {
    pub rows: Vec<PriceSegmentRow>,
}

impl PriceSegmentation {
    pub fn get(&self, label: &str) -> Option<&PriceSegmentRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn share_sum(&self) -> Percent {
        self.rows.iter().map(|r| r.value_share_percent).sum()
    }
}

/// Index of the bucket holding `amount`: the number of edges at or below it.
pub fn bucket_index(amount: Amount, edges: &[Amount]) -> usize {
    edges.partition_point(|edge| *edge <= amount)
}

pub fn bucket_label(amount: Amount, config: &PriceSegmentConfig) -> &str {
    &config.labels[bucket_index(amount, &config.edges)]
}

pub fn segment_prices(transactions: &[Transaction], config: &PriceSegmentConfig) -> PriceSegmentation {
    let mut members: Vec<Vec<&Transaction>> = vec![Vec::new(); config.labels.len()];
    for t in transactions {
        members[bucket_index(t.amount, &config.edges)].push(t);
    }

    let mut rows: Vec<PriceSegmentRow> = members
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let amounts: Vec<Amount> = bucket.iter().map(|t| t.amount).collect();
            PriceSegmentRow {
                label: config.labels[i].clone(),
                lower: if i == 0 { 0.0 } else { config.edges[i - 1] },
                upper: config.edges.get(i).copied(),
                transaction_count: bucket.len(),
                total_value: round2(stats::sum(&amounts)),
                avg_value: round2(stats::mean(&amounts).unwrap_or(0.0)),
                unique_outlets: stats::distinct(bucket.iter().map(|t| t.outlet_id.as_str())),
                unique_brands: stats::distinct(bucket.iter().map(|t| t.brand_name.as_str())),
                value_share_percent: 0.0,
            }
        })
        .collect();

    let totals: Vec<Amount> = rows.iter().map(|r| r.total_value).collect();
    for (row, share) in rows.iter_mut().zip(allocate_shares(&totals)) {
        row.value_share_percent = share;
    }

    log::info!(
        "price segments: {} transactions across {} buckets",
        transactions.len(),
        rows.len()
    );
    PriceSegmentation { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_upper_bucket() {
        let config = PriceSegmentConfig::default();
        assert_eq!(bucket_label(999.0, &config), "0-1K");
        assert_eq!(bucket_label(1_000.0, &config), "1K-5K");
        assert_eq!(bucket_label(4_999.99, &config), "1K-5K");
        assert_eq!(bucket_label(5_000.0, &config), "5K-10K");
        assert_eq!(bucket_label(50_000.0, &config), "50K+");
        assert_eq!(bucket_label(1e12, &config), "50K+");
    }
}
