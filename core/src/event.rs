//! The stage event log: one record per completed pipeline stage.
//!
//! Variants are appended as stages are added, never reordered.

use crate::{
    concentration::MarketStructure,
    types::{Amount, Percent, RunId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    // ── Engine events ──────────────────────────────
    RunStarted {
        run_id: RunId,
        raw_records: usize,
    },
    RunCompleted {
        run_id: RunId,
    },

    // ── Stage events ───────────────────────────────
    DatasetCleaned {
        original_count: usize,
        retained_count: usize,
    },
    BrandsAggregated {
        brand_count: usize,
        total_purchase: Amount,
    },
    ConcentrationMeasured {
        hhi: f64,
        structure: MarketStructure,
        market_leaders: usize,
    },
    PricesSegmented {
        populated_buckets: usize,
        total_buckets: usize,
    },
    CentersAggregated {
        center_count: usize,
    },
    BrandsBenchmarked {
        market_average: Option<Amount>,
        degenerate: bool,
    },
    QualityAssessed {
        retention_rate: Option<Percent>,
    },
    InsightsGenerated {
        line_count: usize,
    },
}

impl AnalysisEvent {
    /// Stable string name for the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. }            => "run_started",
            Self::RunCompleted { .. }          => "run_completed",
            Self::DatasetCleaned { .. }        => "dataset_cleaned",
            Self::BrandsAggregated { .. }      => "brands_aggregated",
            Self::ConcentrationMeasured { .. } => "concentration_measured",
            Self::PricesSegmented { .. }       => "prices_segmented",
            Self::CentersAggregated { .. }     => "centers_aggregated",
            Self::BrandsBenchmarked { .. }     => "brands_benchmarked",
            Self::QualityAssessed { .. }       => "quality_assessed",
            Self::InsightsGenerated { .. }     => "insights_generated",
        }
    }
}

/// An event tagged with its position in the run and the stage that emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub seq: u64,
    pub run_id: RunId,
    pub stage: String,
    pub event: AnalysisEvent,
}

/// Render entries as JSON lines, one entry per line.
pub fn to_json_lines(entries: &[EventLogEntry]) -> serde_json::Result<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    Ok(out)
}
