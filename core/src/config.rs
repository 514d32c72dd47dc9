use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Input / output ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Sheet holding the transaction-level relation.
    pub transaction_sheet: String,
    /// Sheet holding the auxiliary monthly-sales relation.
    pub monthly_sheet: String,
    /// File-name prefix used when discovering the latest dataset.
    pub dataset_prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            transaction_sheet: "Brand_Purchase".into(),
            monthly_sheet: "Monthly_Sell".into(),
            dataset_prefix: "Cleaned_Data_".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_prefix: String,
    pub currency_symbol: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_prefix: "Market_Analysis_Report_".into(),
            currency_symbol: "₹".into(),
        }
    }
}

// ── Market structure ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentrationConfig {
    /// HHI strictly above this value is "Highly Concentrated".
    pub highly_concentrated_above: f64,
    /// Inclusive lower bounds on market share percent.
    pub market_leader_min: f64,
    pub major_player_min: f64,
    pub medium_player_min: f64,
}

impl Default for ConcentrationConfig {
    fn default() -> Self {
        Self {
            highly_concentrated_above: 2500.0,
            market_leader_min: 10.0,
            major_player_min: 5.0,
            medium_player_min: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Inclusive lower bounds on the performance ratio.
    pub excellent_min: f64,
    pub good_min: f64,
    pub average_min: f64,
    pub below_average_min: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            excellent_min: 2.0,
            good_min: 1.5,
            average_min: 1.0,
            below_average_min: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSegmentConfig {
    /// Interior bucket edges, ascending. Bucket i covers [edges[i-1], edges[i]).
    pub edges: Vec<f64>,
    /// One label per bucket: `edges.len() + 1` entries.
    pub labels: Vec<String>,
}

impl Default for PriceSegmentConfig {
    fn default() -> Self {
        Self {
            edges: vec![1_000.0, 5_000.0, 10_000.0, 50_000.0],
            labels: vec![
                "0-1K".into(),
                "1K-5K".into(),
                "5K-10K".into(),
                "10K-50K".into(),
                "50K+".into(),
            ],
        }
    }
}

// ── Dashboard ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub width: u32,
    pub height: u32,
    pub top_brands: usize,
    pub share_brands: usize,
    pub top_centers: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 1400,
            top_brands: 10,
            share_brands: 8,
            top_centers: 8,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub concentration: ConcentrationConfig,
    pub benchmark: BenchmarkConfig,
    pub price_segments: PriceSegmentConfig,
    pub dashboard: DashboardConfig,
}

impl AnalysisConfig {
    /// Load from a JSON file. Omitted fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        let c = &self.concentration;
        if !(c.market_leader_min > c.major_player_min && c.major_player_min > c.medium_player_min)
        {
            return Err(AnalysisError::InvalidConfig(
                "size tier bounds must be strictly descending".into(),
            ));
        }

        let b = &self.benchmark;
        if !(b.excellent_min > b.good_min
            && b.good_min > b.average_min
            && b.average_min > b.below_average_min)
        {
            return Err(AnalysisError::InvalidConfig(
                "performance tier bounds must be strictly descending".into(),
            ));
        }

        let p = &self.price_segments;
        if p.edges.iter().any(|e| !e.is_finite() || *e <= 0.0)
            || p.edges.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(AnalysisError::InvalidConfig(
                "price segment edges must be positive and strictly ascending".into(),
            ));
        }
        if p.labels.len() != p.edges.len() + 1 {
            return Err(AnalysisError::InvalidConfig(format!(
                "expected {} price segment labels, got {}",
                p.edges.len() + 1,
                p.labels.len()
            )));
        }

        let d = &self.dashboard;
        if d.width == 0 || d.height == 0 {
            return Err(AnalysisError::InvalidConfig(
                "dashboard width and height must be positive".into(),
            ));
        }
        if d.top_brands == 0 || d.share_brands == 0 || d.top_centers == 0 {
            return Err(AnalysisError::InvalidConfig(
                "dashboard panel sizes must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "output": { "currency_symbol": "$" } }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output.currency_symbol, "$");
        assert_eq!(config.output.report_prefix, "Market_Analysis_Report_");
        assert_eq!(config.concentration.highly_concentrated_above, 2500.0);
        assert_eq!(config.price_segments.labels.len(), 5);
    }

    #[test]
    fn rejects_unordered_edges() {
        let mut config = AnalysisConfig::default();
        config.price_segments.edges = vec![5_000.0, 1_000.0, 10_000.0, 50_000.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_dashboard() {
        let mut config = AnalysisConfig::default();
        config.dashboard.height = 0;
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));

        let mut config = AnalysisConfig::default();
        config.dashboard.top_centers = 0;
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let mut config = AnalysisConfig::default();
        config.price_segments.labels.pop();
        assert!(config.validate().is_err());
    }
}
