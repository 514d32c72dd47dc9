//! Data-quality report: a fixed list of named metrics describing the run.

use crate::{
    cleaning::CleanedDataset,
    concentration::MarketConcentration,
    stats,
    types::{Amount, Percent},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QualityValue {
    Count(usize),
    Percent(Option<Percent>),
    Currency(Option<Amount>),
    Index(f64),
}

impl QualityValue {
    pub fn render(&self, currency_symbol: &str) -> String {
        match self {
            Self::Count(n) => n.to_string(),
            Self::Percent(Some(p)) => format!("{p:.2}%"),
            Self::Currency(Some(v)) => format_currency(*v, currency_symbol),
            Self::Percent(None) | Self::Currency(None) => "N/A".to_string(),
            Self::Index(v) => format!("{v:.0}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetric {
    pub metric: String,
    pub value: QualityValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub metrics: Vec<QualityMetric>,
}

impl QualityReport {
    pub fn get(&self, metric: &str) -> Option<&QualityValue> {
        self.metrics.iter().find(|m| m.metric == metric).map(|m| &m.value)
    }
}

pub const METRIC_ORIGINAL: &str = "Total Records (Original)";
pub const METRIC_VALID: &str = "Valid Records (After Cleaning)";
pub const METRIC_SCORE: &str = "Data Quality Score (%)";
pub const METRIC_TOTAL: &str = "Total Purchase Amount";
pub const METRIC_AVERAGE: &str = "Average Purchase Amount";
pub const METRIC_MEDIAN: &str = "Median Purchase Amount";
pub const METRIC_OUTLETS: &str = "Unique Outlets";
pub const METRIC_BRANDS: &str = "Unique Brands";
pub const METRIC_CENTERS: &str = "Unique Centers";
pub const METRIC_REMOVED: &str = "Records Removed (Invalid Data)";
pub const METRIC_HHI: &str = "Market Concentration (HHI)";

pub fn build_quality_report(
    cleaned: &CleanedDataset,
    concentration: &MarketConcentration,
) -> QualityReport {
    let txns = &cleaned.transactions;
    let amounts: Vec<Amount> = txns.iter().map(|t| t.amount).collect();
    let summary = &cleaned.summary;

    let metric = |name: &str, value: QualityValue| QualityMetric {
        metric: name.to_string(),
        value,
    };

    QualityReport {
        metrics: vec![
            metric(METRIC_ORIGINAL, QualityValue::Count(summary.original_count)),
            metric(METRIC_VALID, QualityValue::Count(summary.retained_count)),
            metric(METRIC_SCORE, QualityValue::Percent(summary.retention_rate())),
            metric(METRIC_TOTAL, QualityValue::Currency(Some(stats::sum(&amounts)))),
            metric(METRIC_AVERAGE, QualityValue::Currency(stats::mean(&amounts))),
            metric(METRIC_MEDIAN, QualityValue::Currency(stats::median(&amounts))),
            metric(
                METRIC_OUTLETS,
                QualityValue::Count(stats::distinct(txns.iter().map(|t| t.outlet_id.as_str()))),
            ),
            metric(
                METRIC_BRANDS,
                QualityValue::Count(stats::distinct(txns.iter().map(|t| t.brand_name.as_str()))),
            ),
            metric(
                METRIC_CENTERS,
                QualityValue::Count(stats::distinct(txns.iter().map(|t| t.center.as_str()))),
            ),
            metric(METRIC_REMOVED, QualityValue::Count(summary.removed_count())),
            metric(METRIC_HHI, QualityValue::Index(concentration.hhi)),
        ],
    }
}

/// `₹1,234,567.89` style: symbol, comma-grouped integer part, two decimals.
pub fn format_currency(value: Amount, symbol: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{symbol}{grouped}.{frac_part}")
}
