#![no_main]

use libfuzzer_sys::fuzz_target;
use shelflink::extractor::{ExtractorConfig, RecordExtractor};
use shelflink::grouping::{analyze, GroupingConfig};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must yield records or an error, never a panic.
    let mut records = Vec::new();
    for record in RecordExtractor::new(data, &ExtractorConfig::default()) {
        match record {
            Ok(record) => records.push(record),
            Err(_) => break,
        }
    }
    let _ = analyze(&records, &GroupingConfig::default());
});
