//! Line-oriented text reports.
//!
//! Two reports are produced:
//!
//! - the **domain report** ([`render_text_report`]): one block per domain
//!   group, the URL-count histogram, and the ids of the records having the
//!   highlighted number of URLs;
//! - the **shelf listing** ([`render_shelf_listing`]): one line per record in
//!   call-number order.
//!
//! # Examples
//!
//! ```
//! use shelflink::grouping::{analyze, GroupingConfig};
//! use shelflink::report::render_text_report;
//! use shelflink::url::Url;
//! use shelflink::Record;
//!
//! let records = vec![Record::new("42", None, vec![Url::parse("http://a.com/x")])];
//! let analysis = analyze(&records, &GroupingConfig::default());
//! let text = render_text_report(&analysis);
//! assert!(text.starts_with("Record group a.com:\n\tRecord count: 1\n"));
//! ```

use crate::error::Result;
use crate::grouping::UrlAnalysis;
use crate::json;
use crate::record::{sorted_by_call_number, Record};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::io;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Plain text, as rendered by this module
    #[default]
    Text,
    /// Pretty-printed JSON, as rendered by [`crate::json`]
    Json,
}

/// Options for report output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format
    pub format: ReportFormat,
}

/// Render the domain report as text.
#[must_use]
pub fn render_text_report(analysis: &UrlAnalysis<'_>) -> String {
    let mut output = String::new();

    for group in analysis.groups.values() {
        writeln!(output, "{group}").ok();
    }

    let counts: Vec<String> = analysis
        .url_counts
        .iter()
        .map(|(urls, records)| format!("{urls}: {records}"))
        .collect();
    writeln!(
        output,
        "Number of records found with a given number of associated URLs (url_count: record_count):"
    )
    .ok();
    writeln!(output, "{{{}}}", counts.join(", ")).ok();

    writeln!(output).ok();
    writeln!(output, "Records with {} URLs:", analysis.highlight_url_count).ok();
    let ids: Vec<&str> = analysis.highlighted.iter().map(|r| r.id.as_str()).collect();
    writeln!(output, "{}", ids.join(",")).ok();

    output
}

/// Render records in call-number order, one `id<TAB>call number` line each.
///
/// Records without a call number come last, with an empty second column.
#[must_use]
pub fn render_shelf_listing(records: &[Record]) -> String {
    let mut output = String::new();
    for record in sorted_by_call_number(records) {
        match &record.call_number {
            Some(call_number) => writeln!(output, "{}\t{}", record.id, call_number).ok(),
            None => writeln!(output, "{}\t", record.id).ok(),
        };
    }
    output
}

/// Write the domain report to `writer` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON rendering or the write fails.
pub fn write_report<W: io::Write>(
    writer: &mut W,
    analysis: &UrlAnalysis<'_>,
    format: ReportFormat,
) -> Result<()> {
    match format {
        ReportFormat::Text => writer.write_all(render_text_report(analysis).as_bytes())?,
        ReportFormat::Json => {
            let rendered = serde_json::to_string_pretty(&json::analysis_to_json(analysis))?;
            writeln!(writer, "{rendered}")?;
        },
    }
    Ok(())
}

/// Write the shelf listing to `writer` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON rendering or the write fails.
pub fn write_shelf_listing<W: io::Write>(
    writer: &mut W,
    records: &[Record],
    format: ReportFormat,
) -> Result<()> {
    match format {
        ReportFormat::Text => writer.write_all(render_shelf_listing(records).as_bytes())?,
        ReportFormat::Json => {
            let sorted = sorted_by_call_number(records);
            writeln!(writer, "{}", serde_json::to_string_pretty(&sorted)?)?;
        },
    }
    Ok(())
}
