#![warn(missing_docs)]

//! # shelflink
//!
//! Call numbers and links from MARCXML catalog exports.
//!
//! `shelflink` streams a MARCXML `<collection>`, pulls the control number
//! (001), the call number (050, falling back to 090) and every URL embedded in
//! 856 fields out of each record, and then sorts the records into shelf order
//! or groups them by the domains they link to.
//!
//! ## Quick Start
//!
//! ### Extracting records
//!
//! ```no_run
//! use shelflink::extractor::{extract_file, ExtractorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extraction = extract_file("catalog.xml", &ExtractorConfig::default())?;
//! for record in &extraction.records {
//!     println!("{} has {} links", record.id, record.urls.len());
//! }
//! println!("skipped {} records", extraction.stats.records_skipped);
//! # Ok(())
//! # }
//! ```
//!
//! ### Shelf order
//!
//! ```
//! use shelflink::{CallNumber, Record};
//! use shelflink::record::sort_by_call_number;
//!
//! let mut records = vec![
//!     Record::new("b", Some(CallNumber::parse("QA76", Some("C35 2001"))), vec![]),
//!     Record::new("a", Some(CallNumber::parse("QA76", Some("C35 1990"))), vec![]),
//! ];
//! sort_by_call_number(&mut records);
//! assert_eq!(records[0].id, "a");
//! ```
//!
//! ### Grouping by domain
//!
//! ```
//! use shelflink::grouping::{analyze, GroupingConfig};
//! use shelflink::report::render_text_report;
//! use shelflink::url::Url;
//! use shelflink::Record;
//!
//! let records = vec![Record::new("1", None, vec![Url::parse("https://www.jstor.com/x")])];
//! let analysis = analyze(&records, &GroupingConfig::default());
//! assert_eq!(analysis.groups["www.jstor.com"].len(), 1);
//! print!("{}", render_text_report(&analysis));
//! ```
//!
//! ## Modules
//!
//! - [`call_number`]: Call-number parsing and ordering
//! - [`url`]: URL detection and decomposition
//! - [`element`]: Owned per-record XML element trees
//! - [`extractor`]: Streaming MARCXML record extraction
//! - [`record`]: The extracted `Record` and shelf-order sorting
//! - [`recovery`]: Handling records that cannot be built
//! - [`grouping`]: Domain groups and URL-count tallies
//! - [`report`]: Text reports
//! - [`json`]: JSON serialization
//! - [`config`]: Run configuration
//! - [`error`]: Error types and result type

pub mod call_number;
pub mod config;
pub mod element;
pub mod error;
pub mod extractor;
pub mod grouping;
pub mod json;
pub mod record;
pub mod recovery;
pub mod report;
pub mod url;

pub use call_number::CallNumber;
pub use config::ShelflinkConfig;
pub use element::{Element, ElementNode};
pub use error::{Result, ShelflinkError};
pub use extractor::{extract_file, extract_records, ExtractorConfig, RecordExtractor};
pub use grouping::{analyze, GroupingConfig, MembershipPolicy, RecordGroup, UrlAnalysis};
pub use record::Record;
pub use recovery::{RecoveryContext, RecoveryMode};
pub use url::{Url, UrlClassifier};
