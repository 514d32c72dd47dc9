//! Competitive benchmarker: each brand's average purchase against the market.

use crate::{
    concentration::SizeTier,
    config::BenchmarkConfig,
    dataset::Transaction,
    performance::PerformanceTable,
    stats,
    types::{round2, Amount, Percent},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered worst to best, so tiers compare by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Poor,
    BelowAverage,
    Average,
    Good,
    Excellent,
}

impl PerformanceTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub brand: String,
    pub transaction_count: usize,
    pub total_purchase: Amount,
    pub avg_purchase: Amount,
    pub market_share_percent: Percent,
    pub size_tier: Option<SizeTier>,
    /// Brand average minus market average.
    pub vs_market_avg: Option<Amount>,
    /// Brand average over market average; undefined when the market average is zero.
    pub performance_ratio: Option<f64>,
    pub performance_tier: Option<PerformanceTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveBenchmark {
    /// Mean over every cleaned transaction; `None` for an empty dataset.
    pub market_average: Option<Amount>,
    pub rows: Vec<BenchmarkRow>,
}

impl CompetitiveBenchmark {
    pub fn get(&self, brand: &str) -> Option<&BenchmarkRow> {
        self.rows.iter().find(|r| r.brand == brand)
    }

    /// True when the market average is zero or undefined, so no ratio exists.
    pub fn is_degenerate(&self) -> bool {
        self.market_average.map_or(true, |m| m == 0.0)
    }
}

/// Mean purchase over all transactions (not the mean of brand means).
pub fn market_average(transactions: &[Transaction]) -> Option<Amount> {
    let amounts: Vec<Amount> = transactions.iter().map(|t| t.amount).collect();
    stats::mean(&amounts)
}

/// First inclusive lower bound met, from the top tier down.
pub fn performance_tier(ratio: f64, config: &BenchmarkConfig) -> PerformanceTier {
    if ratio >= config.excellent_min {
        PerformanceTier::Excellent
    } else if ratio >= config.good_min {
        PerformanceTier::Good
    } else if ratio >= config.average_min {
        PerformanceTier::Average
    } else if ratio >= config.below_average_min {
        PerformanceTier::BelowAverage
    } else {
        PerformanceTier::Poor
    }
}

pub fn benchmark_brands(
    brands: &PerformanceTable,
    market_avg: Option<Amount>,
    config: &BenchmarkConfig,
) -> CompetitiveBenchmark {
    let rows: Vec<BenchmarkRow> = brands
        .rows
        .iter()
        .map(|row| {
            let vs_market_avg = market_avg.map(|m| round2(row.avg_purchase - m));
            let performance_ratio = market_avg
                .filter(|m| *m != 0.0)
                .map(|m| round2(row.avg_purchase / m));
            BenchmarkRow {
                brand: row.key.clone(),
                transaction_count: row.transaction_count,
                total_purchase: row.total_purchase,
                avg_purchase: row.avg_purchase,
                market_share_percent: row.market_share_percent,
                size_tier: row.size_tier,
                vs_market_avg,
                performance_ratio,
                performance_tier: performance_ratio.map(|r| performance_tier(r, config)),
            }
        })
        .collect();

    let benchmark = CompetitiveBenchmark {
        market_average: market_avg,
        rows,
    };
    if benchmark.is_degenerate() {
        log::warn!("benchmark: market average is zero or undefined, ratios not computed");
    } else {
        log::info!("benchmark: {} brands against market average {:?}", benchmark.rows.len(), market_avg);
    }
    benchmark
}
