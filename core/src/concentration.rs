//! Concentration analyzer: Herfindahl-Hirschman Index and brand size tiers.

use crate::{
    config::ConcentrationConfig,
    performance::PerformanceTable,
    types::Percent,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HHI_MAX: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    SmallPlayer,
    MediumPlayer,
    MajorPlayer,
    MarketLeader,
}

impl SizeTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::MarketLeader => "Market Leader",
            Self::MajorPlayer => "Major Player",
            Self::MediumPlayer => "Medium Player",
            Self::SmallPlayer => "Small Player",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStructure {
    HighlyConcentrated,
    Competitive,
    /// No brands: the index carries no information.
    Undefined,
}

impl MarketStructure {
    pub fn label(self) -> &'static str {
        match self {
            Self::HighlyConcentrated => "Highly Concentrated",
            Self::Competitive => "Competitive",
            Self::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for MarketStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSegment {
    pub brand: String,
    pub market_share_percent: Percent,
    pub size_tier: SizeTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConcentration {
    /// HHI in [0, 10000]; 0 for an empty market.
    pub hhi: f64,
    pub structure: MarketStructure,
    /// Brands in the order of the brand performance table.
    pub segments: Vec<BrandSegment>,
}

impl MarketConcentration {
    /// Number of brands in the given tier.
    pub fn tier_count(&self, tier: SizeTier) -> usize {
        self.segments.iter().filter(|s| s.size_tier == tier).count()
    }
}

/// Σ (share / 100)² × 10000 over percentage shares.
pub fn herfindahl_index(shares: impl IntoIterator<Item = Percent>) -> f64 {
    let hhi: f64 = shares
        .into_iter()
        .map(|s| (s / 100.0).powi(2))
        .sum::<f64>()
        * HHI_MAX;
    hhi.clamp(0.0, HHI_MAX)
}

pub fn classify_structure(hhi: f64, brand_count: usize, config: &ConcentrationConfig) -> MarketStructure {
    if brand_count == 0 {
        MarketStructure::Undefined
    } else if hhi > config.highly_concentrated_above {
        MarketStructure::HighlyConcentrated
    } else {
        MarketStructure::Competitive
    }
}

/// First inclusive lower bound met, from the top tier down.
pub fn size_tier(share: Percent, config: &ConcentrationConfig) -> SizeTier {
    if share >= config.market_leader_min {
        SizeTier::MarketLeader
    } else if share >= config.major_player_min {
        SizeTier::MajorPlayer
    } else if share >= config.medium_player_min {
        SizeTier::MediumPlayer
    } else {
        SizeTier::SmallPlayer
    }
}

/// Compute the market's HHI and tier every brand, annotating the brand
/// table's rows with their tier.
pub fn analyze_concentration(
    brands: &mut PerformanceTable,
    config: &ConcentrationConfig,
) -> MarketConcentration {
    let hhi = herfindahl_index(brands.rows.iter().map(|r| r.market_share_percent));
    let structure = classify_structure(hhi, brands.rows.len(), config);

    let segments = brands
        .rows
        .iter_mut()
        .map(|row| {
            let tier = size_tier(row.market_share_percent, config);
            row.size_tier = Some(tier);
            BrandSegment {
                brand: row.key.clone(),
                market_share_percent: row.market_share_percent,
                size_tier: tier,
            }
        })
        .collect();

    if structure == MarketStructure::Undefined {
        log::warn!("concentration: no brands, index undefined");
    } else {
        log::info!("concentration: HHI={hhi:.0} ({structure})");
    }

    MarketConcentration {
        hhi,
        structure,
        segments,
    }
}
