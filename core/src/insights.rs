//! Strategic narrative rendered from the concentration and brand tables.

use crate::{
    concentration::{MarketConcentration, MarketStructure, SizeTier},
    config::ConcentrationConfig,
    performance::PerformanceTable,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSection {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicInsights {
    pub sections: Vec<InsightSection>,
}

impl StrategicInsights {
    /// Flatten to display lines: each title followed by bulleted lines.
    pub fn lines(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|s| {
                std::iter::once(format!("{}:", s.title))
                    .chain(s.lines.iter().map(|l| format!("• {l}")))
            })
            .collect()
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

const NO_MARKET: &str = "No valid transactions; nothing to assess";

pub fn generate_insights(
    brands: &PerformanceTable,
    concentration: &MarketConcentration,
    config: &ConcentrationConfig,
) -> StrategicInsights {
    let section = |title: &str, lines: Vec<String>| InsightSection {
        title: title.to_string(),
        lines,
    };

    let leader = match (concentration.structure, brands.leader()) {
        (MarketStructure::Undefined, _) | (_, None) => {
            return StrategicInsights {
                sections: vec![
                    section("MARKET STRUCTURE", vec![NO_MARKET.into()]),
                    section("PERFORMANCE LEADERS", vec![NO_MARKET.into()]),
                    section("STRATEGIC RECOMMENDATIONS", vec![NO_MARKET.into()]),
                ],
            }
        }
        (_, Some(leader)) => leader,
    };

    let recommendations = match concentration.structure {
        MarketStructure::HighlyConcentrated => vec![
            "Focus on competitor analysis and market entry barriers".to_string(),
            "Explore niche markets and underserved segments".to_string(),
        ],
        _ => vec![
            "Emphasize differentiation and brand building".to_string(),
            "Consider partnership strategies".to_string(),
        ],
    };

    StrategicInsights {
        sections: vec![
            section(
                "MARKET STRUCTURE",
                vec![
                    format!(
                        "Market Concentration: HHI = {:.0} ({})",
                        concentration.hhi, concentration.structure
                    ),
                    format!(
                        "Market Leaders: {} brands with ≥{}% share",
                        concentration.tier_count(SizeTier::MarketLeader),
                        config.market_leader_min
                    ),
                ],
            ),
            section(
                "PERFORMANCE LEADERS",
                vec![format!(
                    "Market Leader: {} ({}% market share)",
                    leader.key, leader.market_share_percent
                )],
            ),
            section("STRATEGIC RECOMMENDATIONS", recommendations),
        ],
    }
}
