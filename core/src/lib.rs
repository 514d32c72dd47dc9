//! Retail market analysis: cleaning, brand and center performance, market
//! concentration, price segmentation, competitive benchmarking, and the
//! multi-sheet report built from them.

pub mod benchmark;
pub mod chart;
pub mod cleaning;
pub mod concentration;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod event;
pub mod insights;
pub mod loader;
pub mod performance;
pub mod price_segments;
pub mod quality;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod types;
