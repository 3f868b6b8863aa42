//! Integration tests for MARCXML extraction from files and large streams.

mod common;

use common::{collection, RecordXml, SyntheticCatalog};
use shelflink::extractor::{extract_file, extract_records, ExtractorConfig, RecordExtractor};
use shelflink::recovery::RecoveryMode;
use shelflink::url::ClassifierKind;
use shelflink::ShelflinkError;
use std::io::{BufReader, Write};

const SAMPLE: &str = "tests/data/sample_catalog.xml";

#[test]
fn test_extract_sample_catalog() {
    let extraction = extract_file(SAMPLE, &ExtractorConfig::default()).expect("sample extracts");

    let ids: Vec<&str> = extraction.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["ocm10000001", "ocm10000002", "ocm10000003", "ocm10000005", "ocm10000006"]
    );
    assert_eq!(extraction.stats.records_extracted, 5);
    assert_eq!(extraction.stats.records_skipped, 1);
    assert_eq!(extraction.stats.messages.len(), 1);

    let first = &extraction.records[0];
    let call_number = first.call_number.as_ref().expect("050 present");
    assert_eq!(call_number.class_part, "QA76.73");
    assert_eq!(call_number.item_part.as_deref(), Some(".J38 2003"));
    assert_eq!(call_number.class_digits, "7673");
    // hdl.handle.net has no ".com", so only the JSTOR link counts
    assert_eq!(first.url_count(), 1);
    assert_eq!(first.urls[0].domain, "www.jstor.com");
}

#[test]
fn test_sample_falls_back_to_local_call_number() {
    let extraction = extract_file(SAMPLE, &ExtractorConfig::default()).unwrap();
    let record = &extraction.records[1];
    let call_number = record.call_number.as_ref().expect("090 used");
    assert_eq!(call_number.class_letters, "PS");
    assert_eq!(call_number.class_digits, "3545");
    assert_eq!(call_number.cutter_letters, "I");
    assert_eq!(call_number.cutter_digits, "345");
    assert_eq!(call_number.edition, " G7 1990");

    assert_eq!(record.urls[1].port, Some(8080));
    assert_eq!(record.urls[1].domain, "archive.com");
    assert_eq!(record.urls[1].path, "/details/202");
}

#[test]
fn test_sample_record_without_links_or_call_number() {
    let extraction = extract_file(SAMPLE, &ExtractorConfig::default()).unwrap();
    assert!(extraction.records[2].urls.is_empty());
    assert!(extraction.records[3].call_number.is_none());
}

#[test]
fn test_sample_strict_mode_stops_at_missing_control_number() {
    let config = ExtractorConfig::default().with_recovery_mode(RecoveryMode::Strict);
    let result = extract_file(SAMPLE, &config);
    match result {
        Err(ShelflinkError::MissingRequiredField { field, .. }) => {
            assert!(field.contains("001"));
        },
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn test_sample_with_scheme_classifier() {
    let config = ExtractorConfig::default().with_classifier(ClassifierKind::Scheme);
    let extraction = extract_file(SAMPLE, &config).unwrap();
    let first = &extraction.records[0];
    assert_eq!(first.url_count(), 2);
    assert_eq!(first.domains(), vec!["www.jstor.com", "hdl.handle.net"]);
}

#[test]
fn test_extract_from_temp_file() {
    let xml = collection(&[
        RecordXml::new()
            .control_number("t1")
            .call_number("050", "HF5548", Some(".4 .M523"))
            .url("http://office.com/help")
            .build(),
        RecordXml::new().control_number("t2").build(),
    ]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(xml.as_bytes()).unwrap();
    file.flush().unwrap();

    let extraction = extract_file(file.path(), &ExtractorConfig::default()).unwrap();
    assert_eq!(extraction.records.len(), 2);
    assert_eq!(extraction.records[0].urls[0].domain, "office.com");
    assert_eq!(extraction.stats.records_skipped, 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = extract_file(dir.path().join("absent.xml"), &ExtractorConfig::default());
    assert!(matches!(result, Err(ShelflinkError::IoError(_))));
}

#[test]
fn test_streams_large_catalog() {
    let total = 10_000;
    let source = BufReader::new(SyntheticCatalog::new(total));
    let mut extractor = RecordExtractor::new(source, &ExtractorConfig::default());

    let mut count = 0;
    while let Some(record) = extractor.next_record().expect("synthetic catalog is well formed") {
        assert_eq!(record.id, format!("rec{count:06}"));
        assert!(record.call_number.is_some());
        // mirror.example.org is not a .com link
        assert_eq!(record.url_count(), 1);
        count += 1;
    }

    assert_eq!(count, total);
    assert_eq!(extractor.stats().records_extracted, total);
    assert!(extractor.next_record().unwrap().is_none());
}

#[test]
fn test_extractor_iterator_collects_results() {
    let source = BufReader::new(SyntheticCatalog::new(25));
    let records: Result<Vec<_>, _> =
        RecordExtractor::new(source, &ExtractorConfig::default()).collect();
    let records = records.unwrap();
    assert_eq!(records.len(), 25);
    assert_eq!(records[24].id, "rec000024");
}

#[test]
fn test_empty_collection() {
    let extraction =
        extract_records(collection(&[]).as_bytes(), &ExtractorConfig::default()).unwrap();
    assert!(extraction.records.is_empty());
    assert_eq!(extraction.stats.records_extracted, 0);
}

#[test]
fn test_truncated_export_is_rejected() {
    let full = std::fs::read_to_string(SAMPLE).unwrap();
    let cut = full.find("</marc:collection>").unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&full.as_bytes()[..cut]).unwrap();
    file.flush().unwrap();

    let result = extract_file(file.path(), &ExtractorConfig::default());
    assert!(matches!(result, Err(ShelflinkError::MalformedStream(_))));
}

#[test]
fn test_trailing_record_after_collection_is_rejected() {
    let mut xml = collection(&[RecordXml::new().control_number("in").build()]);
    xml.push_str(&RecordXml::new().control_number("out").build());

    let result = extract_records(xml.as_bytes(), &ExtractorConfig::default());
    assert!(matches!(result, Err(ShelflinkError::MalformedStream(_))));
}
