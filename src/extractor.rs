//! Streaming extraction of records from MARCXML catalog exports.
//!
//! [`RecordExtractor`] reads a `<collection>` of `<record>` elements one event
//! at a time with [`quick_xml::NsReader`]. Only the record currently being read
//! is held in memory, as an [`Element`] tree; it is turned into a [`Record`]
//! and dropped as soon as its closing tag is seen, so memory stays bounded by
//! the largest single record however large the export is.
//!
//! Element names are resolved through the namespace declarations in scope at
//! each point of the stream. Both default-namespace
//! (`<collection xmlns="http://www.loc.gov/MARC21/slim">`) and prefixed
//! (`<marc:collection xmlns:marc="...">`) exports are read the same way.
//!
//! # Examples
//!
//! ```
//! use shelflink::extractor::{extract_records, ExtractorConfig};
//!
//! let xml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
//!   <record>
//!     <controlfield tag="001">rec1</controlfield>
//!     <datafield tag="050" ind1=" " ind2="4">
//!       <subfield code="a">QA76</subfield>
//!       <subfield code="b">C35 1990</subfield>
//!     </datafield>
//!     <datafield tag="856" ind1="4" ind2="0">
//!       <subfield code="u">http://example.com/book</subfield>
//!     </datafield>
//!   </record>
//! </collection>"#;
//!
//! let extraction = extract_records(xml.as_bytes(), &ExtractorConfig::default())?;
//! let record = &extraction.records[0];
//! assert_eq!(record.id, "rec1");
//! assert_eq!(record.urls[0].domain, "example.com");
//! # Ok::<(), shelflink::ShelflinkError>(())
//! ```

use crate::call_number::CallNumber;
use crate::element::{Element, ElementNode};
use crate::error::{Result, ShelflinkError};
use crate::record::Record;
use crate::recovery::{RecoveryContext, RecoveryMode};
use crate::url::{ClassifierKind, Url, UrlClassifier};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The MARCXML namespace URI.
pub const MARCXML_NS: &str = "http://www.loc.gov/MARC21/slim";

const RECORD: &str = "record";
const CONTROLFIELD: &str = "controlfield";
const DATAFIELD: &str = "datafield";
const SUBFIELD: &str = "subfield";

/// Which namespace MARC element names must resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceMatch {
    /// The namespace of the document's root element (default)
    #[default]
    Document,
    /// A fixed namespace URI
    Exact(String),
    /// Match on local names only
    Any,
}

/// Options for [`RecordExtractor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// What to do with records missing controlfield 001
    pub recovery_mode: RecoveryMode,
    /// Namespace MARC elements must belong to
    pub namespace: NamespaceMatch,
    /// Log progress every this many records (0 disables)
    pub progress_interval: usize,
    /// Rule deciding which 856 leaf texts are URLs
    pub classifier: ClassifierKind,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            recovery_mode: RecoveryMode::default(),
            namespace: NamespaceMatch::default(),
            progress_interval: 1000,
            classifier: ClassifierKind::default(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recovery mode.
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.recovery_mode = mode;
        self
    }

    /// Set the namespace rule.
    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceMatch) -> Self {
        self.namespace = namespace;
        self
    }

    /// Set the URL classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierKind) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set how often progress is logged (0 disables).
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Records turned into [`Record`] values
    pub records_extracted: usize,
    /// Records skipped under [`RecoveryMode::Lenient`]
    pub records_skipped: usize,
    /// Why each skipped record was skipped
    pub messages: Vec<String>,
}

/// All records of a document plus the run's counters.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Extracted records in document order
    pub records: Vec<Record>,
    /// Counters for the run
    pub stats: ExtractionStats,
}

/// Matches MARC element names under the configured namespace rule.
#[derive(Clone, Copy)]
struct MarcNames<'a> {
    rule: &'a NamespaceMatch,
    document: Option<&'a str>,
}

impl<'a> MarcNames<'a> {
    fn accepts(self, element: &Element, local_name: &str) -> bool {
        match self.rule {
            NamespaceMatch::Any => element.local_name == local_name,
            NamespaceMatch::Exact(uri) => element.is_named(Some(uri.as_str()), local_name),
            NamespaceMatch::Document => element.is_named(self.document, local_name),
        }
    }

    /// Children named `local_name` whose `attr` attribute equals `value`.
    fn children_with(
        self,
        parent: &'a Element,
        local_name: &'a str,
        attr: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        parent.children_named(local_name).filter(move |child| {
            self.accepts(child, local_name) && child.attribute(attr) == Some(value)
        })
    }

    fn field(
        self,
        record: &'a Element,
        local_name: &'a str,
        tag: &'a str,
    ) -> Option<&'a Element> {
        self.children_with(record, local_name, "tag", tag).next()
    }

    fn subfield(self, field: &'a Element, code: &'a str) -> Option<&'a str> {
        self.children_with(field, SUBFIELD, "code", code)
            .next()
            .map(|subfield| subfield.text.as_str())
    }
}

/// Streaming reader turning `<record>` elements into [`Record`] values.
///
/// # Examples
///
/// ```
/// use shelflink::extractor::{ExtractorConfig, RecordExtractor};
///
/// let xml = r#"<collection>
///   <record><controlfield tag="001">a</controlfield></record>
///   <record><controlfield tag="001">b</controlfield></record>
/// </collection>"#;
///
/// let mut extractor = RecordExtractor::new(xml.as_bytes(), &ExtractorConfig::default());
/// while let Some(record) = extractor.next_record()? {
///     println!("{}", record.id);
/// }
/// assert_eq!(extractor.stats().records_extracted, 2);
/// # Ok::<(), shelflink::ShelflinkError>(())
/// ```
pub struct RecordExtractor<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    /// Open elements of the record being read; empty between records
    stack: Vec<Element>,
    /// Namespace of the root element, once seen
    document_namespace: Option<Option<String>>,
    /// Non-record elements open outside any record (the root and wrappers)
    open_outside: usize,
    /// Set once the root element has closed
    root_closed: bool,
    namespace: NamespaceMatch,
    classifier: Box<dyn UrlClassifier>,
    recovery: RecoveryContext,
    progress_interval: usize,
    records_seen: usize,
    records_extracted: usize,
    finished: bool,
}

/// What one XML event means for the record under construction.
enum Step {
    Open(Element),
    Leaf(Element),
    Text(String),
    Close,
    Eof,
    Skip,
}

impl<R: BufRead> RecordExtractor<R> {
    /// Create an extractor over `source`.
    pub fn new(source: R, config: &ExtractorConfig) -> Self {
        RecordExtractor {
            reader: NsReader::from_reader(source),
            buf: Vec::new(),
            stack: Vec::new(),
            document_namespace: None,
            open_outside: 0,
            root_closed: false,
            namespace: config.namespace.clone(),
            classifier: config.classifier.build(),
            recovery: RecoveryContext::new(config.recovery_mode),
            progress_interval: config.progress_interval,
            records_seen: 0,
            records_extracted: 0,
            finished: false,
        }
    }

    /// Replace the URL classifier chosen by the configuration.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn UrlClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at the end of the document. Records without a
    /// controlfield 001 are skipped in lenient mode and reported as
    /// [`ShelflinkError::MissingRequiredField`] in strict mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not well-formed XML, ends inside a
    /// record, uses an undeclared namespace prefix, or (in strict mode) a
    /// record has no identifier. No further records are produced after an
    /// error.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let result = self.read_next();
        if result.is_err() {
            self.finished = true;
        }
        result
    }

    /// Counters for the records read so far.
    #[must_use]
    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats {
            records_extracted: self.records_extracted,
            records_skipped: self.recovery.skipped,
            messages: self.recovery.recovery_messages.clone(),
        }
    }

    fn read_next(&mut self) -> Result<Option<Record>> {
        while let Some(element) = self.next_record_element()? {
            self.records_seen += 1;
            let position = self.records_seen;

            let names = MarcNames {
                rule: &self.namespace,
                document: self.document_namespace.as_ref().and_then(Option::as_deref),
            };
            match build_record(&element, names, self.classifier.as_ref(), position) {
                Ok(record) => {
                    self.records_extracted += 1;
                    if self.progress_interval > 0
                        && self.records_extracted % self.progress_interval == 0
                    {
                        tracing::info!("Processed {} records", self.records_extracted);
                    }
                    return Ok(Some(record));
                },
                Err(error) => {
                    let context = format!("record {position}");
                    self.recovery.recover::<Record>(error, &context)?;
                },
            }
        }
        Ok(None)
    }

    /// Advance the stream to the end of the next `<record>` and return its tree.
    fn next_record_element(&mut self) -> Result<Option<Element>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let step = {
                let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
                match event {
                    Event::Start(start) => Step::Open(open_element(&resolved, &start)?),
                    Event::Empty(start) => Step::Leaf(open_element(&resolved, &start)?),
                    Event::Text(text) if !self.stack.is_empty() => {
                        Step::Text(text.unescape()?.into_owned())
                    },
                    Event::CData(data) if !self.stack.is_empty() => {
                        Step::Text(String::from_utf8_lossy(&data).into_owned())
                    },
                    Event::End(_) => Step::Close,
                    Event::Eof => Step::Eof,
                    _ => Step::Skip,
                }
            };

            match step {
                Step::Open(element) => {
                    if self.stack.is_empty() {
                        self.check_before_root_end(&element)?;
                        if !self.starts_record(&element) {
                            self.open_outside += 1;
                            continue;
                        }
                    }
                    self.stack.push(element);
                },
                Step::Leaf(element) => match self.stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => {
                        self.check_before_root_end(&element)?;
                        if self.open_outside == 0 {
                            self.root_closed = true;
                        }
                        if self.starts_record(&element) {
                            return Ok(Some(element));
                        }
                    },
                },
                Step::Text(text) => {
                    if let Some(current) = self.stack.last_mut() {
                        current.text.push_str(&text);
                    }
                },
                Step::Close => match self.stack.pop() {
                    Some(closed) => match self.stack.last_mut() {
                        Some(parent) => parent.children.push(closed),
                        None => {
                            if self.open_outside == 0 {
                                self.root_closed = true;
                            }
                            return Ok(Some(closed));
                        },
                    },
                    None => {
                        self.open_outside = self.open_outside.saturating_sub(1);
                        if self.open_outside == 0 {
                            self.root_closed = true;
                        }
                    },
                },
                Step::Eof => {
                    self.finished = true;
                    if let Some(open) = self.stack.last() {
                        return Err(ShelflinkError::MalformedStream(format!(
                            "document ended inside <{}> of record {}",
                            open.local_name,
                            self.records_seen + 1
                        )));
                    }
                    if self.open_outside > 0 {
                        return Err(ShelflinkError::MalformedStream(format!(
                            "document ended with {} element(s) still open after record {}",
                            self.open_outside, self.records_seen
                        )));
                    }
                    if self.document_namespace.is_none() {
                        return Err(ShelflinkError::MalformedStream(
                            "document has no root element".to_string(),
                        ));
                    }
                    tracing::info!(
                        extracted = self.records_extracted,
                        skipped = self.recovery.skipped,
                        "extraction finished"
                    );
                    return Ok(None);
                },
                Step::Skip => {},
            }
        }
    }

    /// A well-formed document has a single root; nothing may start after it.
    fn check_before_root_end(&self, element: &Element) -> Result<()> {
        if self.root_closed {
            return Err(ShelflinkError::MalformedStream(format!(
                "<{}> after the root element closed",
                element.local_name
            )));
        }
        Ok(())
    }

    /// Called for elements seen outside any record.
    fn starts_record(&mut self, element: &Element) -> bool {
        if self.document_namespace.is_none() {
            self.document_namespace = Some(element.namespace.clone());
        }
        let names = MarcNames {
            rule: &self.namespace,
            document: self.document_namespace.as_ref().and_then(Option::as_deref),
        };
        names.accepts(element, RECORD)
    }
}

impl<R: BufRead> Iterator for RecordExtractor<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl<R: BufRead> fmt::Debug for RecordExtractor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordExtractor")
            .field("namespace", &self.namespace)
            .field("document_namespace", &self.document_namespace)
            .field("classifier", &self.classifier)
            .field("records_seen", &self.records_seen)
            .field("records_extracted", &self.records_extracted)
            .field("open_outside", &self.open_outside)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Build an owned element (without children) from a start tag.
fn open_element(resolved: &ResolveResult, start: &BytesStart) -> Result<Element> {
    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(ShelflinkError::MalformedStream(format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(prefix)
            )));
        },
    };

    let mut element = Element::new(
        namespace,
        String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
    );
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((name, value));
    }
    Ok(element)
}

/// Turn one `<record>` tree into a [`Record`].
fn build_record(
    element: &Element,
    names: MarcNames<'_>,
    classifier: &dyn UrlClassifier,
    position: usize,
) -> Result<Record> {
    let id = names
        .field(element, CONTROLFIELD, "001")
        .map(|field| field.text.trim())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ShelflinkError::MissingRequiredField {
            field: "controlfield 001".to_string(),
            position,
        })?;

    let call_number = names
        .field(element, DATAFIELD, "050")
        .or_else(|| names.field(element, DATAFIELD, "090"))
        .map(|field| {
            let class_part = names.subfield(field, "a").unwrap_or_default();
            CallNumber::parse(class_part, names.subfield(field, "b"))
        });

    let mut urls = Vec::new();
    harvest_urls(
        names.children_with(element, DATAFIELD, "tag", "856"),
        classifier,
        &mut urls,
    );

    Ok(Record::new(id, call_number, urls))
}

/// Collect URLs from `nodes`, depth first, in document order.
///
/// A node with children is never read itself; only leaves are offered to the
/// classifier, however deeply they are nested.
pub fn harvest_urls<'n, N, I>(nodes: I, classifier: &dyn UrlClassifier, urls: &mut Vec<Url>)
where
    N: ElementNode + 'n,
    I: IntoIterator<Item = &'n N>,
{
    for node in nodes {
        if node.is_leaf() {
            if let Some(text) = node.text() {
                if classifier.is_url_like(text) {
                    urls.push(Url::parse(text));
                }
            }
        } else {
            harvest_urls(node.child_nodes(), classifier, urls);
        }
    }
}

/// Extract every record from `source`.
///
/// # Errors
///
/// Returns the first error [`RecordExtractor::next_record`] reports.
pub fn extract_records<R: BufRead>(source: R, config: &ExtractorConfig) -> Result<Extraction> {
    let mut extractor = RecordExtractor::new(source, config);
    let mut records = Vec::new();
    while let Some(record) = extractor.next_record()? {
        records.push(record);
    }
    Ok(Extraction {
        records,
        stats: extractor.stats(),
    })
}

/// Extract every record from the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or extraction fails.
pub fn extract_file<P: AsRef<Path>>(path: P, config: &ExtractorConfig) -> Result<Extraction> {
    let file = File::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "reading catalog export");
    extract_records(BufReader::new(file), config)
}
