//! Benchmark suite for cpescout
//!
//! Run with: `cargo bench --bench benchmarks`
//! View report: `open target/criterion/report/index.html`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cpescout::catalog::CatalogRecord;
use cpescout::config::ScoringWeights;
use cpescout::cpe::DeconstructedCpe;
use cpescout::normalize::extract_version;
use cpescout::parser::AssetParser;
use cpescout::rank::rank;
use cpescout::score::Scorer;
use cpescout::similarity::{jaccard, levenshtein_distance};

// =============================================================================
// Test Data Generation
// =============================================================================

const ASSET_NAMES: &[&str] = &[
    "Apache HTTP Server 2.4.51",
    "eWon eWon Firmware 10.0s0",
    "Siemens SIMATIC S7-1500 Firmware v2.9.4",
    "Cisco IOS XE 17.3.1",
    "Microsoft Windows Server 2019",
    "nginx 1.24.0",
    "OpenSSL",
    "Schneider Electric Modicon M340",
];

fn generate_records(count: usize) -> Vec<CatalogRecord> {
    let vendors = ["apache", "cisco", "siemens", "microsoft", "nginx", "ewon"];
    let products = ["http_server", "ios_xe", "simatic_s7", "windows", "nginx", "ewon_firmware"];

    (0..count)
        .map(|i| {
            let vendor = vendors[i % vendors.len()];
            let product = products[i % products.len()];
            let cpe_name = format!(
                "cpe:2.3:a:{}:{}:{}.{}.{}:*:*:*:*:*:*:*",
                vendor,
                product,
                i % 20,
                i % 10,
                i % 5
            );
            CatalogRecord {
                cpe_name: cpe_name.clone(),
                cpe_name_id: format!("id-{i}"),
                title: format!("{vendor} {product}"),
                deprecated: false,
            }
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_asset_parsing(c: &mut Criterion) {
    let parser = AssetParser::new();
    let mut group = c.benchmark_group("asset_parsing");

    for name in ASSET_NAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| parser.parse(black_box(name)));
        });
    }
    group.finish();
}

fn bench_version_extraction(c: &mut Criterion) {
    c.bench_function("extract_version", |b| {
        b.iter(|| {
            for name in ASSET_NAMES {
                black_box(extract_version(black_box(name)));
            }
        });
    });
}

fn bench_cpe_deconstruction(c: &mut Criterion) {
    let uri = "cpe:2.3:o:siemens:simatic_s7-1500_firmware:2.9.4:*:*:*:*:*:*:*";
    c.bench_function("cpe_deconstruction", |b| {
        b.iter(|| DeconstructedCpe::from_uri(black_box(uri)));
    });
}

fn bench_levenshtein(c: &mut Criterion) {
    c.bench_function("levenshtein_distance", |b| {
        b.iter(|| levenshtein_distance(black_box("simatic_s7_1500"), black_box("simatic s7 1200")));
    });
}

fn bench_jaccard(c: &mut Criterion) {
    let a: Vec<String> = ["siemens", "simatic", "s7", "1500", "firmware"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let b_tokens: Vec<String> = ["siemens", "simatic", "s7", "1200"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    c.bench_function("jaccard", |b| {
        b.iter(|| jaccard(black_box(&a), black_box(&b_tokens)));
    });
}

fn bench_scoring(c: &mut Criterion) {
    let parser = AssetParser::new();
    let scorer = Scorer::new(ScoringWeights::default());
    let asset = parser.parse("Siemens SIMATIC S7-1500 Firmware v2.9.4");

    let mut group = c.benchmark_group("scoring");
    for size in [10, 100, 1000] {
        let records = generate_records(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let candidates: Vec<_> = records
                    .iter()
                    .map(|r| scorer.score_record(black_box(&asset), r))
                    .collect();
                black_box(candidates)
            });
        });
    }
    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let parser = AssetParser::new();
    let scorer = Scorer::new(ScoringWeights::default());
    let asset = parser.parse("Apache HTTP Server 2.4.51");
    let candidates: Vec<_> = generate_records(1000)
        .iter()
        .map(|r| scorer.score_record(&asset, r))
        .collect();

    c.bench_function("rank_1000", |b| {
        b.iter(|| rank(black_box(candidates.clone()), 5));
    });
}

criterion_group!(
    benches,
    bench_asset_parsing,
    bench_version_extraction,
    bench_cpe_deconstruction,
    bench_levenshtein,
    bench_jaccard,
    bench_scoring,
    bench_ranking
);
criterion_main!(benches);
