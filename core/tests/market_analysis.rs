//! Analytical stages over in-memory transactions: aggregation, concentration,
//! price buckets, benchmarking and cleaning.

use market_analysis_core::{
    benchmark::{self, PerformanceTier},
    cleaning,
    concentration::{self, MarketStructure, SizeTier},
    config::{AnalysisConfig, BenchmarkConfig, ConcentrationConfig},
    dataset::{RawAmount, RawTransaction, Transaction},
    performance::{aggregate_performance, GroupKey},
    price_segments,
};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn txn(brand: &str, center: &str, outlet: &str, amount: f64) -> Transaction {
    Transaction {
        brand_name: brand.to_string(),
        outlet_id: outlet.to_string(),
        outlet_name: format!("OUTLET {outlet}"),
        center: center.to_string(),
        phone_number: "9800000000".to_string(),
        amount,
    }
}

fn raw(brand: &str, center: &str, amount: RawAmount) -> RawTransaction {
    RawTransaction {
        brand_name: brand.to_string(),
        outlet_id: "O1".to_string(),
        outlet_name: "corner store".to_string(),
        center: center.to_string(),
        phone_number: " 98000 ".to_string(),
        amount,
    }
}

fn random_market(seed: u64, n: usize) -> Vec<Transaction> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let brands = ["A", "B", "C", "D", "E", "F"];
    let centers = ["NORTH", "SOUTH", "EAST"];
    (0..n)
        .map(|i| {
            let brand = brands[rng.gen_range(0..brands.len())];
            let center = centers[rng.gen_range(0..centers.len())];
            let amount = (rng.gen_range(1.0..60_000.0_f64) * 100.0).round() / 100.0;
            txn(brand, center, &format!("O{}", i % 17), amount)
        })
        .collect()
}

fn concentrated_market() -> Vec<Transaction> {
    vec![
        txn("A", "NORTH", "O1", 400.0),
        txn("A", "SOUTH", "O2", 300.0),
        txn("B", "NORTH", "O3", 200.0),
        txn("C", "EAST", "O4", 100.0),
    ]
}

// ── Brand performance ────────────────────────────────────────────────────────

/// Market shares of any non-empty market add up to 100 within rounding.
#[test]
fn market_shares_sum_to_one_hundred() {
    for seed in [1u64, 7, 42, 0xBEEF] {
        let table = aggregate_performance(&random_market(seed, 500), GroupKey::Brand);
        let sum = table.share_sum();
        assert!((sum - 100.0).abs() <= 0.1, "seed {seed}: share sum {sum}");
    }
}

/// Many equally sized brands still share exactly 100 percent, each within a
/// hundredth of its exact share.
#[test]
fn many_equal_brands_share_exactly_one_hundred() {
    for n in [60usize, 300] {
        let txns: Vec<Transaction> = (0..n)
            .map(|i| txn(&format!("B{i:03}"), "NORTH", "O1", 100.0))
            .collect();
        let table = aggregate_performance(&txns, GroupKey::Brand);
        assert_eq!(table.rows.len(), n);

        let exact = 100.0 / n as f64;
        for row in &table.rows {
            assert!((row.market_share_percent - exact).abs() <= 0.01 + 1e-9, "{n}: {}", row.market_share_percent);
        }
        let sum = table.share_sum();
        assert!((sum - 100.0).abs() < 1e-6, "{n} brands: share sum {sum}");
    }
}

/// The index of a fragmented market stays close to its exact value.
#[test]
fn fragmented_market_hhi_tracks_exact_value() {
    let txns: Vec<Transaction> = (0..300)
        .map(|i| txn(&format!("B{i:03}"), "NORTH", "O1", 100.0))
        .collect();
    let mut brands = aggregate_performance(&txns, GroupKey::Brand);
    let result = concentration::analyze_concentration(&mut brands, &ConcentrationConfig::default());
    let exact = concentration::HHI_MAX / 300.0;
    assert!((result.hhi - exact).abs() < 0.05, "hhi = {}", result.hhi);
    assert_eq!(result.structure, MarketStructure::Competitive);
}

/// Center shares sum to 100 on their own, independent of brand shares.
#[test]
fn center_shares_sum_to_one_hundred() {
    let txns: Vec<Transaction> = (0..70)
        .map(|i| txn("A", &format!("C{i:02}"), "O1", 10.0 + (i % 7) as f64))
        .collect();
    let table = aggregate_performance(&txns, GroupKey::Center);
    assert_eq!(table.rows.len(), 70);
    assert!((table.share_sum() - 100.0).abs() < 1e-6);

    for seed in [5u64, 99] {
        let centers = aggregate_performance(&random_market(seed, 500), GroupKey::Center);
        assert!((centers.share_sum() - 100.0).abs() < 1e-6);
    }
}

/// Rows are ordered by total purchase, largest first.
#[test]
fn brand_rows_sorted_by_total_descending() {
    let table = aggregate_performance(&random_market(3, 300), GroupKey::Brand);
    for pair in table.rows.windows(2) {
        assert!(pair[0].total_purchase >= pair[1].total_purchase);
    }
}

/// Groups with equal totals keep ascending key order.
#[test]
fn tied_totals_keep_key_order() {
    let txns = vec![
        txn("ZETA", "NORTH", "O1", 50.0),
        txn("ALPHA", "NORTH", "O2", 50.0),
        txn("MID", "NORTH", "O3", 50.0),
    ];
    let table = aggregate_performance(&txns, GroupKey::Brand);
    let keys: Vec<&str> = table.rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, ["ALPHA", "MID", "ZETA"]);
}

/// A single-member group has no standard deviation.
#[test]
fn single_member_group_has_no_std() {
    let txns = vec![
        txn("SOLO", "NORTH", "O1", 120.0),
        txn("PAIR", "NORTH", "O1", 100.0),
        txn("PAIR", "SOUTH", "O2", 200.0),
    ];
    let table = aggregate_performance(&txns, GroupKey::Brand);
    assert_eq!(table.get("SOLO").unwrap().std_purchase, None);

    let pair = table.get("PAIR").unwrap();
    assert_eq!(pair.std_purchase, Some(70.71));
    assert_eq!(pair.median_purchase, 150.0);
    assert_eq!(pair.unique_centers, 2);
    assert_eq!(pair.unique_outlets, 2);
}

/// Center aggregation counts the brands present in each center.
#[test]
fn center_rows_count_brands() {
    let table = aggregate_performance(&concentrated_market(), GroupKey::Center);
    let north = table.get("NORTH").unwrap();
    assert_eq!(north.unique_brands, 2);
    assert_eq!(north.total_purchase, 600.0);
    assert_eq!(north.market_share_percent, 60.0);
}

// ── Concentration ────────────────────────────────────────────────────────────

/// 70/20/10 shares give an HHI of 5400 and a highly concentrated market.
#[test]
fn seventy_twenty_ten_market_is_highly_concentrated() {
    let config = ConcentrationConfig::default();
    let mut brands = aggregate_performance(&concentrated_market(), GroupKey::Brand);
    let result = concentration::analyze_concentration(&mut brands, &config);

    assert!((result.hhi - 5400.0).abs() < 1e-6, "hhi = {}", result.hhi);
    assert_eq!(result.structure, MarketStructure::HighlyConcentrated);
    assert_eq!(brands.get("A").unwrap().size_tier, Some(SizeTier::MarketLeader));
    assert_eq!(brands.get("C").unwrap().size_tier, Some(SizeTier::MarketLeader));
    assert_eq!(result.tier_count(SizeTier::MarketLeader), 3);
}

/// A monopoly sits at the HHI ceiling.
#[test]
fn single_brand_has_maximum_hhi() {
    let config = ConcentrationConfig::default();
    let txns = vec![txn("ONLY", "NORTH", "O1", 10.0), txn("ONLY", "SOUTH", "O2", 20.0)];
    let mut brands = aggregate_performance(&txns, GroupKey::Brand);
    let result = concentration::analyze_concentration(&mut brands, &config);
    assert_eq!(result.hhi, concentration::HHI_MAX);
    assert_eq!(result.structure, MarketStructure::HighlyConcentrated);
}

/// HHI stays within its bounds for arbitrary markets.
#[test]
fn hhi_is_bounded() {
    let config = ConcentrationConfig::default();
    for seed in 0..20u64 {
        let mut brands = aggregate_performance(&random_market(seed, 50), GroupKey::Brand);
        let result = concentration::analyze_concentration(&mut brands, &config);
        assert!((0.0..=concentration::HHI_MAX).contains(&result.hhi));
        assert_ne!(result.structure, MarketStructure::Undefined);
    }
}

/// Tier boundaries are inclusive lower bounds.
#[test]
fn size_tier_boundaries_are_inclusive() {
    let config = ConcentrationConfig::default();
    assert_eq!(concentration::size_tier(10.0, &config), SizeTier::MarketLeader);
    assert_eq!(concentration::size_tier(9.99, &config), SizeTier::MajorPlayer);
    assert_eq!(concentration::size_tier(5.0, &config), SizeTier::MajorPlayer);
    assert_eq!(concentration::size_tier(1.0, &config), SizeTier::MediumPlayer);
    assert_eq!(concentration::size_tier(0.99, &config), SizeTier::SmallPlayer);
}

// ── Price segmentation ───────────────────────────────────────────────────────

/// Bucket edges are left-closed: 1000 belongs to 1K-5K.
#[test]
fn price_bucket_boundaries() {
    let config = AnalysisConfig::default().price_segments;
    assert_eq!(price_segments::bucket_label(999.0, &config), "0-1K");
    assert_eq!(price_segments::bucket_label(1000.0, &config), "1K-5K");
    assert_eq!(price_segments::bucket_label(1001.0, &config), "1K-5K");
    assert_eq!(price_segments::bucket_label(50_000.0, &config), "50K+");
    assert_eq!(price_segments::bucket_label(0.01, &config), "0-1K");
}

/// Every configured bucket is reported even when nothing falls in it.
#[test]
fn empty_buckets_are_reported() {
    let config = AnalysisConfig::default().price_segments;
    let txns = vec![txn("A", "NORTH", "O1", 250.0), txn("B", "NORTH", "O2", 750.0)];
    let seg = price_segments::segment_prices(&txns, &config);

    assert_eq!(seg.rows.len(), 5);
    let low = seg.get("0-1K").unwrap();
    assert_eq!(low.transaction_count, 2);
    assert_eq!(low.avg_value, 500.0);
    assert_eq!(low.value_share_percent, 100.0);

    let top = seg.get("50K+").unwrap();
    assert_eq!(top.transaction_count, 0);
    assert_eq!(top.total_value, 0.0);
    assert_eq!(top.upper, None);
}

/// Value shares across buckets add up to 100 within rounding.
#[test]
fn bucket_value_shares_sum_to_one_hundred() {
    let config = AnalysisConfig::default().price_segments;
    let seg = price_segments::segment_prices(&random_market(11, 400), &config);
    assert!((seg.share_sum() - 100.0).abs() < 1e-6);
}

// ── Benchmarking ─────────────────────────────────────────────────────────────

/// A higher performance ratio never yields a lower tier.
#[test]
fn performance_tier_is_monotonic() {
    let config = BenchmarkConfig::default();
    let mut rng = Pcg64Mcg::seed_from_u64(0x5EED);
    let mut ratios: Vec<f64> = (0..1000).map(|_| rng.gen_range(0.0..3.0)).collect();
    ratios.sort_by(f64::total_cmp);

    let tiers: Vec<PerformanceTier> = ratios
        .iter()
        .map(|r| benchmark::performance_tier(*r, &config))
        .collect();
    for pair in tiers.windows(2) {
        assert!(pair[0] <= pair[1], "{:?} > {:?}", pair[0], pair[1]);
    }
    assert_eq!(benchmark::performance_tier(2.0, &config), PerformanceTier::Excellent);
    assert_eq!(benchmark::performance_tier(0.49, &config), PerformanceTier::Poor);
}

/// The market average is the mean of all purchases, not of brand means.
#[test]
fn benchmark_uses_transaction_mean() {
    let config = AnalysisConfig::default();
    let txns = concentrated_market();
    let brands = aggregate_performance(&txns, GroupKey::Brand);
    let avg = benchmark::market_average(&txns);
    assert_eq!(avg, Some(250.0));

    let bench = benchmark::benchmark_brands(&brands, avg, &config.benchmark);
    let a = bench.get("A").unwrap();
    assert_eq!(a.avg_purchase, 350.0);
    assert_eq!(a.vs_market_avg, Some(100.0));
    assert_eq!(a.performance_ratio, Some(1.4));
    assert_eq!(a.performance_tier, Some(PerformanceTier::Average));
    assert!(!bench.is_degenerate());
}

/// With no transactions the market average is undefined, which is degenerate.
#[test]
fn undefined_market_average_is_degenerate() {
    let config = BenchmarkConfig::default();
    let brands = aggregate_performance(&[], GroupKey::Brand);
    let avg = benchmark::market_average(&[]);
    assert_eq!(avg, None);

    let bench = benchmark::benchmark_brands(&brands, avg, &config);
    assert!(bench.rows.is_empty());
    assert!(bench.is_degenerate());
}

/// A zero market average leaves ratios and tiers undefined.
#[test]
fn zero_market_average_is_degenerate() {
    let config = BenchmarkConfig::default();
    let brands = aggregate_performance(&concentrated_market(), GroupKey::Brand);
    let bench = benchmark::benchmark_brands(&brands, Some(0.0), &config);
    assert!(bench.is_degenerate());
    assert!(bench.rows.iter().all(|r| r.performance_ratio.is_none()));
    assert!(bench.rows.iter().all(|r| r.performance_tier.is_none()));
}

// ── Cleaning ─────────────────────────────────────────────────────────────────

/// Invalid amounts are dropped and text fields normalized.
#[test]
fn cleaning_drops_invalid_amounts() {
    let rows = vec![
        raw(" acme ", "north", RawAmount::Number(100.0)),
        raw("acme", "north", RawAmount::Text("250.5".into())),
        raw("acme", "north", RawAmount::Text("n/a".into())),
        raw("acme", "north", RawAmount::Number(0.0)),
        raw("acme", "north", RawAmount::Number(-5.0)),
        raw("acme", "north", RawAmount::Number(f64::NAN)),
        raw("acme", "north", RawAmount::Missing),
    ];
    let cleaned = cleaning::clean_transactions(&rows);
    assert_eq!(cleaned.summary.original_count, 7);
    assert_eq!(cleaned.summary.retained_count, 2);
    assert_eq!(cleaned.summary.removed_count(), 5);

    let first = &cleaned.transactions[0];
    assert_eq!(first.brand_name, "ACME");
    assert_eq!(first.center, "NORTH");
    assert_eq!(first.outlet_name, "CORNER STORE");
    assert_eq!(first.phone_number, "98000");
    assert_eq!(cleaned.transactions[1].amount, 250.5);
}

/// An empty text cell is labelled as missing rather than grouped under "".
#[test]
fn empty_text_cells_become_missing_label() {
    let rows = vec![
        raw("", "north", RawAmount::Number(10.0)),
        raw("acme", "", RawAmount::Number(20.0)),
    ];
    let cleaned = cleaning::clean_transactions(&rows);
    assert_eq!(cleaned.transactions[0].brand_name, cleaning::MISSING_TEXT);
    assert_eq!(cleaned.transactions[1].center, cleaning::MISSING_TEXT);

    let brands = aggregate_performance(&cleaned.transactions, GroupKey::Brand);
    assert!(brands.get("").is_none());
    assert!(brands.get("NAN").is_some());
}

/// Cleaning already-clean records changes nothing and keeps every record.
#[test]
fn cleaning_is_idempotent() {
    let rows = vec![
        raw(" acme ", "north", RawAmount::Number(100.0)),
        raw("Globex", " South", RawAmount::Text(" 42 ".into())),
    ];
    let once = cleaning::clean_transactions(&rows);
    let again_input: Vec<RawTransaction> = once.transactions.iter().map(RawTransaction::from).collect();
    let twice = cleaning::clean_transactions(&again_input);

    assert_eq!(once.transactions, twice.transactions);
    assert_eq!(twice.summary.retention_rate(), Some(100.0));
}
