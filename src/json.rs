//! JSON serialization of records and URL analyses.
//!
//! Records serialize with their parsed call-number components and URL parts,
//! so a JSON dump can be reloaded with [`json_to_records`] without reading the
//! catalog export again. Analyses are rendered with group members as record
//! ids rather than full records.
//!
//! # Examples
//!
//! ```
//! use shelflink::{json, CallNumber, Record};
//!
//! let records = vec![Record::new("1", Some(CallNumber::parse("QA76", None)), vec![])];
//! let text = json::records_to_json(&records)?;
//! let restored = json::json_to_records(&text)?;
//! assert_eq!(restored, records);
//! # Ok::<(), shelflink::ShelflinkError>(())
//! ```

use crate::error::Result;
use crate::grouping::UrlAnalysis;
use crate::record::Record;
use serde_json::{json, Map, Value};

/// Serialize records to a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn records_to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Deserialize records written by [`records_to_json`].
///
/// # Errors
///
/// Returns an error if the input is not a JSON array of records.
pub fn json_to_records(json: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(json)?)
}

/// Convert an analysis to a JSON value.
///
/// Produces an object with:
/// - `groups`: array of `{name, record_count, records: [id...]}`
/// - `url_counts`: object mapping URL count (as a string key) to record count
/// - `highlight_url_count` and `highlighted` (array of ids)
#[must_use]
pub fn analysis_to_json(analysis: &UrlAnalysis<'_>) -> Value {
    let groups: Vec<Value> = analysis
        .groups
        .values()
        .map(|group| {
            json!({
                "name": group.name,
                "record_count": group.len(),
                "records": group.records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();

    let mut url_counts = Map::new();
    for (urls, records) in &analysis.url_counts {
        url_counts.insert(urls.to_string(), json!(records));
    }

    json!({
        "groups": groups,
        "url_counts": url_counts,
        "highlight_url_count": analysis.highlight_url_count,
        "highlighted": analysis.highlighted.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
    })
}
