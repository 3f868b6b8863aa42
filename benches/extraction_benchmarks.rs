#![allow(missing_docs)]
//! Benchmarks for shelflink.
//!
//! Measures streaming extraction of synthetic MARCXML catalogs, shelf-order
//! sorting and domain grouping using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shelflink::extractor::{extract_records, ExtractorConfig, MARCXML_NS};
use shelflink::grouping::{analyze, GroupingConfig};
use shelflink::record::sorted_by_call_number;
use shelflink::Record;
use std::fmt::Write;

/// Build a catalog of `count` records with call numbers and two links each.
fn synthetic_catalog(count: usize) -> Vec<u8> {
    let mut xml =
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><collection xmlns="{MARCXML_NS}">"#);
    for i in 0..count {
        write!(
            xml,
            r#"<record><leader>00000cam  2200000 a 4500</leader>
<controlfield tag="001">bench{i:07}</controlfield>
<datafield tag="050" ind1="0" ind2="0"><subfield code="a">QA{}.{}</subfield><subfield code="b">.C{} {}</subfield></datafield>
<datafield tag="856" ind1="4" ind2="0"><subfield code="u">http://host{}.com/item/{i}</subfield></datafield>
<datafield tag="856" ind1="4" ind2="1"><subfield code="u">https://www.jstor.com/stable/{i}</subfield></datafield>
</record>"#,
            i % 900,
            i % 17,
            i % 97,
            1900 + i % 120,
            i % 31,
        )
        .unwrap();
    }
    xml.push_str("</collection>");
    xml.into_bytes()
}

fn extract(fixture: &[u8]) -> Vec<Record> {
    extract_records(fixture, &ExtractorConfig::default())
        .unwrap()
        .records
}

/// Benchmark extracting 1,000 records.
fn benchmark_extract_1k(c: &mut Criterion) {
    let fixture = black_box(synthetic_catalog(1_000));

    c.bench_function("extract_1k_records", |b| {
        b.iter(|| extract(&fixture).len());
    });
}

/// Benchmark extracting 10,000 records.
fn benchmark_extract_10k(c: &mut Criterion) {
    let fixture = black_box(synthetic_catalog(10_000));

    c.bench_function("extract_10k_records", |b| {
        b.iter(|| extract(&fixture).len());
    });
}

fn benchmark_sort_10k(c: &mut Criterion) {
    let records = extract(&synthetic_catalog(10_000));

    c.bench_function("sort_10k_by_call_number", |b| {
        b.iter(|| sorted_by_call_number(black_box(&records)).len());
    });
}

fn benchmark_group_10k(c: &mut Criterion) {
    let records = extract(&synthetic_catalog(10_000));
    let config = GroupingConfig::default();

    c.bench_function("group_10k_by_domain", |b| {
        b.iter(|| analyze(black_box(&records), &config).groups.len());
    });
}

criterion_group!(
    benches,
    benchmark_extract_1k,
    benchmark_extract_10k,
    benchmark_sort_10k,
    benchmark_group_10k
);
criterion_main!(benches);
