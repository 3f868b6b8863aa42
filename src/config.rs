//! Configuration for extraction, grouping and reporting.
//!
//! [`ShelflinkConfig`] gathers the per-stage options. Every field has a
//! default, so a configuration file only needs the values it changes:
//!
//! ```json
//! {
//!   "extractor": { "recovery_mode": "strict", "classifier": "scheme" },
//!   "grouping": { "membership": "per_url" }
//! }
//! ```

use crate::error::{Result, ShelflinkError};
use crate::extractor::ExtractorConfig;
use crate::grouping::GroupingConfig;
use crate::report::ReportConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete configuration for one run.
///
/// # Examples
///
/// ```
/// use shelflink::config::ShelflinkConfig;
/// use shelflink::grouping::MembershipPolicy;
///
/// let config = ShelflinkConfig::from_json(r#"{"grouping": {"membership": "per_url"}}"#)?;
/// assert_eq!(config.grouping.membership, MembershipPolicy::PerUrl);
/// assert_eq!(config.extractor.progress_interval, 1000);
/// # Ok::<(), shelflink::ShelflinkError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShelflinkConfig {
    /// Extraction options
    pub extractor: ExtractorConfig,
    /// Grouping options
    pub grouping: GroupingConfig,
    /// Report options
    pub report: ReportConfig,
}

impl ShelflinkConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ShelflinkError::InvalidConfig`] if the text is not valid
    /// configuration JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ShelflinkError::InvalidConfig(e.to_string()))
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid
    /// configuration JSON.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            ShelflinkError::InvalidConfig(msg) => {
                ShelflinkError::InvalidConfig(format!("{}: {msg}", path.display()))
            },
            other => other,
        })
    }
}
