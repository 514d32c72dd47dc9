//! The analysis engine: runs every stage over one dataset snapshot.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Clean           (coercion, filtering, text normalization)
//!   2. Brand aggregate (per-brand statistics and market share)
//!   3. Concentration   (HHI, size tiers; annotates the brand table)
//!   4. Price segments  (fixed amount buckets)
//!   5. Center aggregate
//!   6. Benchmark       (brand average vs market average)
//!   7. Quality report
//!   8. Insights
//!
//! RULES:
//!   - Each stage takes earlier outputs as arguments and returns a new table.
//!   - Only stage 3 modifies an earlier output, and only the brand table.
//!   - Every completed stage is recorded in the event log.

use crate::{
    benchmark::{self, CompetitiveBenchmark},
    cleaning::{self, CleanedDataset},
    concentration::{self, MarketConcentration, SizeTier},
    config::AnalysisConfig,
    dataset::{AuxiliaryTable, Dataset},
    error::AnalysisResult,
    event::{AnalysisEvent, EventLogEntry},
    insights::{self, StrategicInsights},
    performance::{self, GroupKey, PerformanceTable},
    price_segments::{self, PriceSegmentation},
    quality::{self, QualityReport},
    types::RunId,
};
/// Every table derived from one run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub run_id: RunId,
    pub cleaned: CleanedDataset,
    pub brands: PerformanceTable,
    pub concentration: MarketConcentration,
    pub price_segments: PriceSegmentation,
    pub centers: PerformanceTable,
    pub benchmark: CompetitiveBenchmark,
    pub quality: QualityReport,
    pub insights: StrategicInsights,
    pub monthly_sales: Option<AuxiliaryTable>,
}

pub struct AnalysisEngine {
    pub run_id: RunId,
    config: AnalysisConfig,
    events: Vec<EventLogEntry>,
}

impl AnalysisEngine {
    pub fn new(run_id: RunId, config: AnalysisConfig) -> Self {
        Self {
            run_id,
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Events recorded so far, in emission order.
    pub fn events(&self) -> &[EventLogEntry] {
        &self.events
    }

    fn record(&mut self, stage: &str, event: AnalysisEvent) {
        log::info!("{stage}: {}", event.type_name());
        self.events.push(EventLogEntry {
            seq: self.events.len() as u64,
            run_id: self.run_id.clone(),
            stage: stage.to_string(),
            event,
        });
    }

    /// Run all stages in order. Fails only on an invalid configuration.
    pub fn run(&mut self, dataset: Dataset) -> AnalysisResult<AnalysisOutcome> {
        self.config.validate()?;
        let run_id = self.run_id.clone();

        self.record(
            "engine",
            AnalysisEvent::RunStarted {
                run_id: run_id.clone(),
                raw_records: dataset.transactions.len(),
            },
        );

        // 1. Clean
        let cleaned = cleaning::clean_transactions(&dataset.transactions);
        self.record(
            "cleaning",
            AnalysisEvent::DatasetCleaned {
                original_count: cleaned.summary.original_count,
                retained_count: cleaned.summary.retained_count,
            },
        );
        let txns = &cleaned.transactions;

        // 2. Brand aggregate
        let mut brands = performance::aggregate_performance(txns, GroupKey::Brand);
        self.record(
            "performance",
            AnalysisEvent::BrandsAggregated {
                brand_count: brands.rows.len(),
                total_purchase: brands.total_purchase(),
            },
        );

        // 3. Concentration
        let concentration =
            concentration::analyze_concentration(&mut brands, &self.config.concentration);
        self.record(
            "concentration",
            AnalysisEvent::ConcentrationMeasured {
                hhi: concentration.hhi,
                structure: concentration.structure,
                market_leaders: concentration.tier_count(SizeTier::MarketLeader),
            },
        );

        // 4. Price segments
        let price_segments = price_segments::segment_prices(txns, &self.config.price_segments);
        self.record(
            "price_segments",
            AnalysisEvent::PricesSegmented {
                populated_buckets: price_segments
                    .rows
                    .iter()
                    .filter(|r| r.transaction_count > 0)
                    .count(),
                total_buckets: price_segments.rows.len(),
            },
        );

        // 5. Center aggregate
        let centers = performance::aggregate_performance(txns, GroupKey::Center);
        self.record(
            "geography",
            AnalysisEvent::CentersAggregated {
                center_count: centers.rows.len(),
            },
        );

        // 6. Benchmark
        let market_avg = benchmark::market_average(txns);
        let benchmark = benchmark::benchmark_brands(&brands, market_avg, &self.config.benchmark);
        self.record(
            "benchmark",
            AnalysisEvent::BrandsBenchmarked {
                market_average: market_avg,
                degenerate: benchmark.is_degenerate(),
            },
        );

        // 7. Quality
        let quality = quality::build_quality_report(&cleaned, &concentration);
        self.record(
            "quality",
            AnalysisEvent::QualityAssessed {
                retention_rate: cleaned.summary.retention_rate(),
            },
        );

        // 8. Insights
        let insights =
            insights::generate_insights(&brands, &concentration, &self.config.concentration);
        self.record(
            "insights",
            AnalysisEvent::InsightsGenerated {
                line_count: insights.lines().len(),
            },
        );

        self.record("engine", AnalysisEvent::RunCompleted { run_id: run_id.clone() });
        log::info!("run {run_id}: complete ({} events)", self.events.len());

        Ok(AnalysisOutcome {
            run_id,
            cleaned,
            brands,
            concentration,
            price_segments,
            centers,
            benchmark,
            quality,
            insights,
            monthly_sales: dataset.monthly_sales,
        })
    }
}
