//! Catalog records as extracted from a MARCXML export.
//!
//! A [`Record`] keeps only what the reports need: the control number from
//! controlfield 001, the call number from 050 (or 090), and the URLs found in
//! 856 fields.
//!
//! # Examples
//!
//! ```
//! use shelflink::{CallNumber, Record};
//! use shelflink::record::sort_by_call_number;
//!
//! let mut records = vec![
//!     Record::new("2", Some(CallNumber::parse("QA76", Some("C35"))), vec![]),
//!     Record::new("1", Some(CallNumber::parse("PS3545", None)), vec![]),
//! ];
//! sort_by_call_number(&mut records);
//! assert_eq!(records[0].id, "1");
//! ```

use crate::call_number::{self, CallNumber};
use crate::url::Url;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A bibliographic record reduced to its identifier, call number and URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Control number (controlfield 001)
    pub id: String,
    /// Call number from datafield 050, falling back to 090
    pub call_number: Option<CallNumber>,
    /// URLs harvested from 856 fields, in document order
    pub urls: Vec<Url>,
}

impl Record {
    /// Create a record from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, call_number: Option<CallNumber>, urls: Vec<Url>) -> Self {
        Record {
            id: id.into(),
            call_number,
            urls,
        }
    }

    /// Number of URLs on this record.
    #[must_use]
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// Domains of this record's URLs, in order, with repeats removed.
    #[must_use]
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = Vec::new();
        for url in &self.urls {
            if !domains.contains(&url.domain.as_str()) {
                domains.push(&url.domain);
            }
        }
        domains
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Order two records by call number.
///
/// Records without a call number sort after every record that has one.
#[must_use]
pub fn compare_records(a: &Record, b: &Record) -> Ordering {
    match (&a.call_number, &b.call_number) {
        (Some(x), Some(y)) => call_number::compare(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort records in place by call number.
///
/// The sort is stable: records with equal call numbers keep their relative
/// order from the input.
pub fn sort_by_call_number(records: &mut [Record]) {
    records.sort_by(compare_records);
}

/// Borrow records in call-number order without reordering the collection.
#[must_use]
pub fn sorted_by_call_number(records: &[Record]) -> Vec<&Record> {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| compare_records(a, b));
    sorted
}
