//! Snapshot serialization: every derived table of a run as one JSON document.
//!
//! Cleaned transactions are not included; the snapshot carries the
//! cleaning counters instead.

use crate::{
    benchmark::CompetitiveBenchmark,
    cleaning::CleaningSummary,
    concentration::MarketConcentration,
    engine::AnalysisOutcome,
    error::AnalysisResult,
    insights::StrategicInsights,
    performance::PerformanceTable,
    price_segments::PriceSegmentation,
    quality::QualityReport,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSnapshot<'a> {
    pub run_id: &'a str,
    pub generated_at: DateTime<Utc>,
    pub cleaning: &'a CleaningSummary,
    pub brand_performance: &'a PerformanceTable,
    pub market_concentration: &'a MarketConcentration,
    pub price_segmentation: &'a PriceSegmentation,
    pub geographical_analysis: &'a PerformanceTable,
    pub competitive_benchmarking: &'a CompetitiveBenchmark,
    pub data_quality: &'a QualityReport,
    pub strategic_insights: &'a StrategicInsights,
}

impl<'a> AnalysisSnapshot<'a> {
    pub fn new(outcome: &'a AnalysisOutcome, generated_at: DateTime<Utc>) -> Self {
        Self {
            run_id: &outcome.run_id,
            generated_at,
            cleaning: &outcome.cleaned.summary,
            brand_performance: &outcome.brands,
            market_concentration: &outcome.concentration,
            price_segmentation: &outcome.price_segments,
            geographical_analysis: &outcome.centers,
            competitive_benchmarking: &outcome.benchmark,
            data_quality: &outcome.quality,
            strategic_insights: &outcome.insights,
        }
    }

    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> AnalysisResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("snapshot written to {}", path.display());
        Ok(())
    }
}
