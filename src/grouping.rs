//! Grouping records by URL domain and tallying URL counts.
//!
//! Groups borrow records from the caller's collection; a record with URLs on
//! several domains appears in several groups. Whether a record with two URLs
//! on the *same* domain is listed once or twice in that group is decided by
//! [`MembershipPolicy`].
//!
//! # Examples
//!
//! ```
//! use shelflink::grouping::{group_by_domain, MembershipPolicy};
//! use shelflink::url::Url;
//! use shelflink::Record;
//!
//! let records = vec![Record::new(
//!     "1",
//!     None,
//!     vec![Url::parse("http://a.com/1"), Url::parse("http://a.com/2")],
//! )];
//!
//! let groups = group_by_domain(&records, MembershipPolicy::Distinct);
//! assert_eq!(groups["a.com"].len(), 1);
//!
//! let groups = group_by_domain(&records, MembershipPolicy::PerUrl);
//! assert_eq!(groups["a.com"].len(), 2);
//! ```

use crate::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ptr;

/// How often a record is listed in a domain group it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipPolicy {
    /// Once per group, however many of its URLs share the domain (default)
    #[default]
    Distinct,
    /// Once per URL, so a record can repeat within a group
    PerUrl,
}

/// Options for [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Group membership rule
    pub membership: MembershipPolicy,
    /// URL count whose records are listed individually in the analysis
    pub highlight_url_count: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            membership: MembershipPolicy::default(),
            highlight_url_count: 2,
        }
    }
}

/// Records sharing a URL domain.
#[derive(Debug, Clone)]
pub struct RecordGroup<'a> {
    /// The domain
    pub name: String,
    /// Member records, in the order they were added
    pub records: Vec<&'a Record>,
}

impl<'a> RecordGroup<'a> {
    /// Create an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        RecordGroup {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Add a record to the group.
    pub fn add_record(&mut self, record: &'a Record) {
        self.records.push(record);
    }

    /// Number of entries in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the group has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if `record` (by identity, not value) is a member.
    #[must_use]
    pub fn contains(&self, record: &Record) -> bool {
        self.records.iter().any(|member| ptr::eq(*member, record))
    }
}

impl fmt::Display for RecordGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record group {}:\n\tRecord count: {}",
            self.name,
            self.records.len()
        )
    }
}

/// Group records by the domain of each of their URLs.
///
/// Groups are ordered by the first appearance of their domain.
#[must_use]
pub fn group_by_domain(
    records: &[Record],
    policy: MembershipPolicy,
) -> IndexMap<String, RecordGroup<'_>> {
    let mut groups: IndexMap<String, RecordGroup<'_>> = IndexMap::new();

    for record in records {
        for url in &record.urls {
            let group = groups
                .entry(url.domain.clone())
                .or_insert_with(|| RecordGroup::new(url.domain.clone()));

            // A record's URLs are visited together, so a repeat is always the last entry.
            if policy == MembershipPolicy::Distinct
                && group.records.last().is_some_and(|last| ptr::eq(*last, record))
            {
                continue;
            }
            group.add_record(record);
        }
    }

    groups
}

/// Map from URL count to the number of records having that many URLs.
#[must_use]
pub fn url_count_histogram(records: &[Record]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.url_count()).or_insert(0) += 1;
    }
    counts
}

/// Records having exactly `count` URLs, in input order.
#[must_use]
pub fn records_with_url_count(records: &[Record], count: usize) -> Vec<&Record> {
    records
        .iter()
        .filter(|record| record.url_count() == count)
        .collect()
}

/// Everything the URL report shows.
#[derive(Debug, Clone)]
pub struct UrlAnalysis<'a> {
    /// Domain groups, ordered by first appearance
    pub groups: IndexMap<String, RecordGroup<'a>>,
    /// URL count → number of records
    pub url_counts: BTreeMap<usize, usize>,
    /// The URL count used for `highlighted`
    pub highlight_url_count: usize,
    /// Records with exactly `highlight_url_count` URLs
    pub highlighted: Vec<&'a Record>,
}

/// Group, count and highlight in one pass over the configuration.
#[must_use]
pub fn analyze<'a>(records: &'a [Record], config: &GroupingConfig) -> UrlAnalysis<'a> {
    let analysis = UrlAnalysis {
        groups: group_by_domain(records, config.membership),
        url_counts: url_count_histogram(records),
        highlight_url_count: config.highlight_url_count,
        highlighted: records_with_url_count(records, config.highlight_url_count),
    };
    tracing::debug!(
        records = records.len(),
        groups = analysis.groups.len(),
        "grouped records by domain"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::Url;

    fn record(id: &str, urls: &[&str]) -> Record {
        Record::new(id, None, urls.iter().map(|u| Url::parse(u)).collect())
    }

    #[test]
    fn test_record_in_each_of_its_domains() {
        let records = vec![record("1", &["http://a.com/x", "http://b.com/y"])];
        let groups = group_by_domain(&records, MembershipPolicy::Distinct);
        assert_eq!(groups.len(), 2);
        assert!(groups["a.com"].contains(&records[0]));
        assert!(groups["b.com"].contains(&records[0]));
    }

    #[test]
    fn test_same_domain_twice_distinct_policy() {
        let records = vec![
            record("1", &["http://a.com/x", "http://b.com/z", "http://a.com/y"]),
            record("2", &["http://a.com/w"]),
        ];
        let groups = group_by_domain(&records, MembershipPolicy::Distinct);
        let ids: Vec<&str> = groups["a.com"].records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_same_domain_twice_per_url_policy() {
        let records = vec![record("1", &["http://a.com/x", "http://a.com/y"])];
        let groups = group_by_domain(&records, MembershipPolicy::PerUrl);
        assert_eq!(groups["a.com"].len(), 2);
    }

    #[test]
    fn test_groups_ordered_by_first_appearance() {
        let records = vec![
            record("1", &["http://z.com/"]),
            record("2", &["http://a.com/", "http://z.com/"]),
        ];
        let groups = group_by_domain(&records, MembershipPolicy::Distinct);
        let names: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(names, ["z.com", "a.com"]);
    }

    #[test]
    fn test_identical_records_are_separate_members() {
        let records = vec![record("1", &["http://a.com/"]), record("1", &["http://a.com/"])];
        let groups = group_by_domain(&records, MembershipPolicy::Distinct);
        assert_eq!(groups["a.com"].len(), 2);
    }

    #[test]
    fn test_url_count_histogram() {
        let records = vec![
            record("1", &[]),
            record("2", &["http://a.com/"]),
            record("3", &["http://a.com/", "http://b.com/"]),
            record("4", &["http://c.com/"]),
        ];
        let counts = url_count_histogram(&records);
        assert_eq!(counts.get(&0), Some(&1));
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), None);
    }

    #[test]
    fn test_analyze_highlights_records() {
        let records = vec![
            record("1", &["http://a.com/", "http://b.com/"]),
            record("2", &["http://a.com/"]),
            record("3", &["http://c.com/", "http://c.com/2"]),
        ];
        let analysis = analyze(&records, &GroupingConfig::default());
        let ids: Vec<&str> = analysis.highlighted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(analysis.groups.len(), 3);
        assert_eq!(analysis.url_counts.get(&2), Some(&2));
    }

    #[test]
    fn test_group_display() {
        let records = vec![record("1", &["http://a.com/"]), record("2", &["http://a.com/"])];
        let groups = group_by_domain(&records, MembershipPolicy::Distinct);
        assert_eq!(
            groups["a.com"].to_string(),
            "Record group a.com:\n\tRecord count: 2"
        );
    }
}
