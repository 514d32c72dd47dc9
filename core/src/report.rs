//! Multi-sheet workbook output.
//!
//! Each derived table becomes one sheet with a styled header row. Undefined
//! values are written as the text `N/A`. Failure to save is fatal to the run.

use crate::{
    config::OutputConfig,
    engine::AnalysisOutcome,
    error::AnalysisResult,
    performance::PerformanceRow,
    quality::QualityValue,
};
use rust_xlsxwriter::{Color, Format, FormatBorder, Image, Workbook, Worksheet};
use std::path::Path;

pub const SHEET_BRAND_PERFORMANCE: &str = "Brand_Performance";
pub const SHEET_MARKET_CONCENTRATION: &str = "Market_Concentration";
pub const SHEET_PRICE_SEGMENTATION: &str = "Price_Segmentation";
pub const SHEET_GEOGRAPHICAL: &str = "Geographical_Analysis";
pub const SHEET_BENCHMARKING: &str = "Competitive_Benchmarking";
pub const SHEET_DATA_QUALITY: &str = "Data_Quality_Report";
pub const SHEET_INSIGHTS: &str = "Strategic_Insights";

/// Sheet order in the written workbook.
pub const REPORT_SHEETS: [&str; 7] = [
    SHEET_BRAND_PERFORMANCE,
    SHEET_MARKET_CONCENTRATION,
    SHEET_PRICE_SEGMENTATION,
    SHEET_GEOGRAPHICAL,
    SHEET_BENCHMARKING,
    SHEET_DATA_QUALITY,
    SHEET_INSIGHTS,
];

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Count(usize),
    Missing,
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    fn opt(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }

    fn opt_text<T: ToString>(value: Option<T>) -> Self {
        value.map_or(Self::Missing, |v| Self::Text(v.to_string()))
    }
}

struct Formats {
    header: Format,
    number: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x2E86AB))
                .set_border(FormatBorder::Thin),
            number: Format::new().set_num_format("#,##0.00"),
        }
    }
}

/// A rectangular table destined for one sheet.
struct SheetTable {
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    fn write(&self, ws: &mut Worksheet, formats: &Formats, first_row: u32) -> AnalysisResult<u32> {
        for (col, header) in self.headers.iter().enumerate() {
            ws.write_string_with_format(first_row, col as u16, *header, &formats.header)?;
            ws.set_column_width(col as u16, (header.len() as f64 + 4.0).max(14.0))?;
        }
        let mut row_idx = first_row + 1;
        for row in &self.rows {
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => {
                        ws.write_string(row_idx, col, s.as_str())?;
                    }
                    Cell::Number(v) => {
                        ws.write_number_with_format(row_idx, col, *v, &formats.number)?;
                    }
                    Cell::Count(n) => {
                        ws.write_number(row_idx, col, *n as f64)?;
                    }
                    Cell::Missing => {
                        ws.write_string(row_idx, col, NOT_AVAILABLE)?;
                    }
                }
            }
            row_idx += 1;
        }
        Ok(row_idx)
    }
}

// ── Table builders ───────────────────────────────────────────────────────────

fn brand_performance_table(outcome: &AnalysisOutcome) -> SheetTable {
    SheetTable {
        headers: vec![
            "Brand Name",
            "Transaction_Count",
            "Total_Purchase",
            "Avg_Purchase",
            "Median_Purchase",
            "Std_Purchase",
            "Min_Purchase",
            "Max_Purchase",
            "Unique_Outlets",
            "Unique_Centers",
            "Unique_Locations",
            "Market_Share_Percent",
            "Brand_Size_Category",
        ],
        rows: outcome
            .brands
            .rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.key),
                    Cell::Count(r.transaction_count),
                    Cell::Number(r.total_purchase),
                    Cell::Number(r.avg_purchase),
                    Cell::Number(r.median_purchase),
                    Cell::opt(r.std_purchase),
                    Cell::Number(r.min_purchase),
                    Cell::Number(r.max_purchase),
                    Cell::Count(r.unique_outlets),
                    Cell::Count(r.unique_centers),
                    Cell::Count(r.unique_locations),
                    Cell::Number(r.market_share_percent),
                    Cell::opt_text(r.size_tier),
                ]
            })
            .collect(),
    }
}

fn concentration_table(outcome: &AnalysisOutcome) -> SheetTable {
    let c = &outcome.concentration;
    let mut rows: Vec<Vec<Cell>> = c
        .segments
        .iter()
        .map(|s| {
            vec![
                Cell::text(&s.brand),
                Cell::Number(s.market_share_percent),
                Cell::text(s.size_tier.label()),
            ]
        })
        .collect();
    rows.push(vec![]);
    rows.push(vec![Cell::text("HHI"), Cell::Number(c.hhi)]);
    rows.push(vec![Cell::text("Market Structure"), Cell::text(c.structure.label())]);

    SheetTable {
        headers: vec!["Brand Name", "Market_Share_Percent", "Brand_Size_Category"],
        rows,
    }
}

fn price_segment_table(outcome: &AnalysisOutcome) -> SheetTable {
    SheetTable {
        headers: vec![
            "Purchase_Amount_Category",
            "Transaction_Count",
            "Total_Value",
            "Avg_Value",
            "Unique_Outlets",
            "Unique_Brands",
            "Value_Share_Percent",
        ],
        rows: outcome
            .price_segments
            .rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.label),
                    Cell::Count(r.transaction_count),
                    Cell::Number(r.total_value),
                    Cell::Number(r.avg_value),
                    Cell::Count(r.unique_outlets),
                    Cell::Count(r.unique_brands),
                    Cell::Number(r.value_share_percent),
                ]
            })
            .collect(),
    }
}

fn geographical_table(outcome: &AnalysisOutcome) -> SheetTable {
    let row = |r: &PerformanceRow| {
        vec![
            Cell::text(&r.key),
            Cell::Number(r.total_purchase),
            Cell::Number(r.avg_purchase),
            Cell::Count(r.transaction_count),
            Cell::opt(r.std_purchase),
            Cell::Number(r.median_purchase),
            Cell::Count(r.unique_outlets),
            Cell::Count(r.unique_brands),
            Cell::Count(r.unique_locations),
            Cell::Number(r.market_share_percent),
        ]
    };
    SheetTable {
        headers: vec![
            "Center",
            "Total_Purchase",
            "Avg_Purchase",
            "Transaction_Count",
            "Std_Purchase",
            "Median_Purchase",
            "Unique_Outlets",
            "Unique_Brands",
            "Unique_Locations",
            "Market_Share_Percent",
        ],
        rows: outcome.centers.rows.iter().map(row).collect(),
    }
}

fn benchmark_table(outcome: &AnalysisOutcome) -> SheetTable {
    let b = &outcome.benchmark;
    let mut rows: Vec<Vec<Cell>> = b
        .rows
        .iter()
        .map(|r| {
            vec![
                Cell::text(&r.brand),
                Cell::Count(r.transaction_count),
                Cell::Number(r.total_purchase),
                Cell::Number(r.avg_purchase),
                Cell::Number(r.market_share_percent),
                Cell::opt_text(r.size_tier),
                Cell::opt(r.vs_market_avg),
                Cell::opt(r.performance_ratio),
                Cell::opt_text(r.performance_tier),
            ]
        })
        .collect();
    rows.push(vec![]);
    rows.push(vec![Cell::text("Market Average"), Cell::opt(b.market_average)]);

    SheetTable {
        headers: vec![
            "Brand Name",
            "Transaction_Count",
            "Total_Purchase",
            "Avg_Purchase",
            "Market_Share_Percent",
            "Brand_Size_Category",
            "Vs_Market_Avg",
            "Performance_Ratio",
            "Performance_Category",
        ],
        rows,
    }
}

fn quality_table(outcome: &AnalysisOutcome, output: &OutputConfig) -> SheetTable {
    SheetTable {
        headers: vec!["Metric", "Count/Value"],
        rows: outcome
            .quality
            .metrics
            .iter()
            .map(|m| {
                let value = match &m.value {
                    QualityValue::Count(n) => Cell::Count(*n),
                    other => Cell::Text(other.render(&output.currency_symbol)),
                };
                vec![Cell::text(&m.metric), value]
            })
            .collect(),
    }
}

fn insights_table(outcome: &AnalysisOutcome) -> SheetTable {
    SheetTable {
        headers: vec!["Strategic Insights"],
        rows: outcome
            .insights
            .lines()
            .into_iter()
            .map(|l| vec![Cell::Text(l)])
            .collect(),
    }
}

// ── Workbook ─────────────────────────────────────────────────────────────────

/// Write every derived table to `path`, embedding the dashboard PNG on the
/// brand sheet when one is supplied.
pub fn write_report(
    outcome: &AnalysisOutcome,
    dashboard: Option<&Path>,
    path: &Path,
    output: &OutputConfig,
) -> AnalysisResult<()> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let tables = [
        (SHEET_BRAND_PERFORMANCE, brand_performance_table(outcome)),
        (SHEET_MARKET_CONCENTRATION, concentration_table(outcome)),
        (SHEET_PRICE_SEGMENTATION, price_segment_table(outcome)),
        (SHEET_GEOGRAPHICAL, geographical_table(outcome)),
        (SHEET_BENCHMARKING, benchmark_table(outcome)),
        (SHEET_DATA_QUALITY, quality_table(outcome, output)),
        (SHEET_INSIGHTS, insights_table(outcome)),
    ];

    for (name, table) in &tables {
        let ws = workbook.add_worksheet();
        ws.set_name(*name)?;
        table.write(ws, &formats, 0)?;
        ws.set_freeze_panes(1, 0)?;

        if *name == SHEET_BRAND_PERFORMANCE {
            if let Some(png) = dashboard {
                let image = Image::new(png)?;
                ws.insert_image(1, table.headers.len() as u16 + 1, &image)?;
            }
        }
        log::debug!("sheet {name}: {} rows", table.rows.len());
    }

    workbook.save(path)?;
    log::info!("report saved to {}", path.display());
    Ok(())
}
