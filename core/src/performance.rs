//! Performance aggregator: grouped purchase statistics and market share.
//!
//! Groups are first ordered by key ascending, then stably sorted by total
//! purchase descending, so equal totals keep key order.

use crate::{
    concentration::SizeTier,
    dataset::Transaction,
    stats,
    types::{allocate_shares, round2, Amount, Percent},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Brand,
    Center,
}

impl GroupKey {
    pub fn of(self, t: &Transaction) -> &str {
        match self {
            Self::Brand => &t.brand_name,
            Self::Center => &t.center,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Brand => "Brand Name",
            Self::Center => "Center",
        }
    }
}

/// One group's aggregate. All decimals are rounded to two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub key: String,
    pub transaction_count: usize,
    pub total_purchase: Amount,
    pub avg_purchase: Amount,
    pub median_purchase: Amount,
    /// `None` for single-member groups.
    pub std_purchase: Option<Amount>,
    pub min_purchase: Amount,
    pub max_purchase: Amount,
    pub unique_outlets: usize,
    pub unique_centers: usize,
    pub unique_brands: usize,
    /// Distinct outlet names.
    pub unique_locations: usize,
    pub market_share_percent: Percent,
    /// Set by the concentration analyzer on brand tables.
    pub size_tier: Option<SizeTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTable {
    pub key: GroupKey,
    pub rows: Vec<PerformanceRow>,
}

impl PerformanceTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_purchase(&self) -> Amount {
        self.rows.iter().map(|r| r.total_purchase).sum()
    }

    pub fn share_sum(&self) -> Percent {
        self.rows.iter().map(|r| r.market_share_percent).sum()
    }

    /// The group with the largest total, if any.
    pub fn leader(&self) -> Option<&PerformanceRow> {
        self.rows.first()
    }

    pub fn get(&self, key: &str) -> Option<&PerformanceRow> {
        self.rows.iter().find(|r| r.key == key)
    }
}

fn summarize(key: &str, members: &[&Transaction]) -> PerformanceRow {
    let amounts: Vec<Amount> = members.iter().map(|t| t.amount).collect();

    PerformanceRow {
        key: key.to_string(),
        transaction_count: members.len(),
        total_purchase: round2(stats::sum(&amounts)),
        avg_purchase: round2(stats::mean(&amounts).unwrap_or(0.0)),
        median_purchase: round2(stats::median(&amounts).unwrap_or(0.0)),
        std_purchase: stats::sample_std(&amounts).map(round2),
        min_purchase: round2(stats::min(&amounts).unwrap_or(0.0)),
        max_purchase: round2(stats::max(&amounts).unwrap_or(0.0)),
        unique_outlets: stats::distinct(members.iter().map(|t| t.outlet_id.as_str())),
        unique_centers: stats::distinct(members.iter().map(|t| t.center.as_str())),
        unique_brands: stats::distinct(members.iter().map(|t| t.brand_name.as_str())),
        unique_locations: stats::distinct(members.iter().map(|t| t.outlet_name.as_str())),
        market_share_percent: 0.0,
        size_tier: None,
    }
}

/// Group cleaned transactions by `key` and derive each group's statistics
/// and share of the grand total.
pub fn aggregate_performance(transactions: &[Transaction], key: GroupKey) -> PerformanceTable {
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        groups.entry(key.of(t)).or_default().push(t);
    }

    let mut rows: Vec<PerformanceRow> = groups
        .iter()
        .map(|(k, members)| summarize(k, members))
        .collect();

    // Shares are taken against the sum of the rounded group totals.
    let totals: Vec<Amount> = rows.iter().map(|r| r.total_purchase).collect();
    for (row, share) in rows.iter_mut().zip(allocate_shares(&totals)) {
        row.market_share_percent = share;
    }

    rows.sort_by(|a, b| b.total_purchase.total_cmp(&a.total_purchase));

    log::debug!("aggregated {} groups by {:?}", rows.len(), key);
    PerformanceTable { key, rows }
}
