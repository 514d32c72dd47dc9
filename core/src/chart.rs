//! Strategic dashboard rendering using the [`plotters`] crate.
//!
//! One PNG holds four bar panels in a 2×2 grid: top brands by purchase
//! volume, brand market share, revenue by price segment, and top centers.

use crate::{
    config::DashboardConfig,
    performance::PerformanceTable,
    price_segments::PriceSegmentation,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, ChartError>;

const BRAND_BLUE: RGBColor = RGBColor(0x2E, 0x86, 0xAB);
const SHARE_GREEN: RGBColor = RGBColor(0x2E, 0x8B, 0x57);
const SEGMENT_GOLD: RGBColor = RGBColor(0xFF, 0xD7, 0x00);
const CENTER_ORANGE: RGBColor = RGBColor(0xFF, 0x8C, 0x00);

/// One bar panel of the dashboard.
#[derive(Debug, Clone)]
pub struct BarPanel {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: RGBColor,
}

impl BarPanel {
    fn from_table(
        title: &str,
        table: &PerformanceTable,
        top_n: usize,
        value: impl Fn(&crate::performance::PerformanceRow) -> f64,
        color: RGBColor,
    ) -> Self {
        let rows = table.rows.iter().take(top_n);
        Self {
            title: title.to_string(),
            labels: rows.clone().map(|r| r.key.clone()).collect(),
            values: rows.map(value).collect(),
            color,
        }
    }
}

/// Build the four dashboard panels from the derived tables.
pub fn dashboard_panels(
    brands: &PerformanceTable,
    centers: &PerformanceTable,
    segments: &PriceSegmentation,
    config: &DashboardConfig,
) -> Vec<BarPanel> {
    vec![
        BarPanel::from_table(
            &format!("Top {} Brands by Purchase Volume", config.top_brands),
            brands,
            config.top_brands,
            |r| r.total_purchase,
            BRAND_BLUE,
        ),
        BarPanel::from_table(
            "Market Share Distribution (%)",
            brands,
            config.share_brands,
            |r| r.market_share_percent,
            SHARE_GREEN,
        ),
        BarPanel {
            title: "Revenue by Price Segment".to_string(),
            labels: segments.rows.iter().map(|r| r.label.clone()).collect(),
            values: segments.rows.iter().map(|r| r.total_value).collect(),
            color: SEGMENT_GOLD,
        },
        BarPanel::from_table(
            "Top Centers by Performance",
            centers,
            config.top_centers,
            |r| r.total_purchase,
            CENTER_ORANGE,
        ),
    ]
}

/// Render the panels as a 2×2 grid PNG at `output_path`.
///
/// An empty brand panel is rejected: there is no market to draw.
pub fn render_dashboard(panels: &[BarPanel], output_path: &Path, size: (u32, u32)) -> Result<()> {
    if panels.first().map_or(true, |p| p.values.is_empty()) {
        return Err(ChartError::InvalidData("no brands to chart".to_string()));
    }

    let root = BitMapBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let root = root
        .titled("STRATEGIC MARKET ANALYSIS DASHBOARD", ("sans-serif", 40))
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels) {
        draw_bar_panel(area, panel)?;
    }

    root.present()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;
    log::info!("dashboard rendered to {}", output_path.display());
    Ok(())
}

fn draw_bar_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &BarPanel) -> Result<()> {
    let n = panel.values.len().max(1) as u32;
    let y_max = panel.values.iter().copied().fold(0.0, f64::max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)
        .map_err(|e| ChartError::ChartConfig(e.to_string()))?;

    let labels = &panel.labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(panel.color.filled())
                .margin(8)
                .data(panel.values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
        )
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_market_is_rejected_before_drawing() {
        let empty = BarPanel {
            title: "Top Brands".into(),
            labels: vec![],
            values: vec![],
            color: BRAND_BLUE,
        };
        let path = std::env::temp_dir().join("never_written_dashboard.png");
        let err = render_dashboard(&[empty], &path, (400, 300)).unwrap_err();
        assert!(matches!(err, ChartError::InvalidData(_)));
        assert!(!path.exists());
    }
}
